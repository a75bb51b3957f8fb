/// Instrumentation for the render pipeline: cheap atomic counters that are
/// compiled in only with the `profiling` feature.
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for the cull/collect/sort/raster stages
pub struct PipelineCounters {
    // Visibility / collection counters
    pub meshes_tested: AtomicU64,
    pub meshes_culled: AtomicU64,
    pub faces_dropped_unprojectable: AtomicU64,
    pub faces_backfaced: AtomicU64,
    pub triangles_collected: AtomicU64,

    // Rasterization counters
    pub triangles_rasterized: AtomicU64,
    pub spans_filled: AtomicU64,
    pub pixels_written: AtomicU64,
}

impl PipelineCounters {
    pub const fn new() -> Self {
        Self {
            meshes_tested: AtomicU64::new(0),
            meshes_culled: AtomicU64::new(0),
            faces_dropped_unprojectable: AtomicU64::new(0),
            faces_backfaced: AtomicU64::new(0),
            triangles_collected: AtomicU64::new(0),
            triangles_rasterized: AtomicU64::new(0),
            spans_filled: AtomicU64::new(0),
            pixels_written: AtomicU64::new(0),
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.meshes_tested.store(0, Ordering::Relaxed);
        self.meshes_culled.store(0, Ordering::Relaxed);
        self.faces_dropped_unprojectable.store(0, Ordering::Relaxed);
        self.faces_backfaced.store(0, Ordering::Relaxed);
        self.triangles_collected.store(0, Ordering::Relaxed);
        self.triangles_rasterized.store(0, Ordering::Relaxed);
        self.spans_filled.store(0, Ordering::Relaxed);
        self.pixels_written.store(0, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            meshes_tested: self.meshes_tested.load(Ordering::Relaxed),
            meshes_culled: self.meshes_culled.load(Ordering::Relaxed),
            faces_dropped_unprojectable: self.faces_dropped_unprojectable.load(Ordering::Relaxed),
            faces_backfaced: self.faces_backfaced.load(Ordering::Relaxed),
            triangles_collected: self.triangles_collected.load(Ordering::Relaxed),
            triangles_rasterized: self.triangles_rasterized.load(Ordering::Relaxed),
            spans_filled: self.spans_filled.load(Ordering::Relaxed),
            pixels_written: self.pixels_written.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of counter values at a point in time
#[derive(Debug, Clone, Copy)]
pub struct CounterSnapshot {
    pub meshes_tested: u64,
    pub meshes_culled: u64,
    pub faces_dropped_unprojectable: u64,
    pub faces_backfaced: u64,
    pub triangles_collected: u64,
    pub triangles_rasterized: u64,
    pub spans_filled: u64,
    pub pixels_written: u64,
}

impl CounterSnapshot {
    /// Print formatted report
    pub fn print_report(&self) {
        println!("\n=== Pipeline Counters Report ===");
        println!("\nVisibility / Collection:");
        println!("  meshes tested:              {:12}", self.meshes_tested);
        println!("  meshes culled:              {:12}", self.meshes_culled);
        println!(
            "  faces dropped (near plane): {:12}",
            self.faces_dropped_unprojectable
        );
        println!("  faces backface-culled:      {:12}", self.faces_backfaced);
        println!("  triangles collected:        {:12}", self.triangles_collected);

        println!("\nRasterization:");
        println!("  triangles rasterized:       {:12}", self.triangles_rasterized);
        println!("  spans filled:               {:12}", self.spans_filled);
        println!("  pixels written:             {:12}", self.pixels_written);
        if self.spans_filled > 0 {
            let avg = self.pixels_written as f64 / self.spans_filled as f64;
            println!("  avg span length:            {:12.2}", avg);
        }
        println!();
    }
}

/// Global pipeline counters instance
pub static PIPELINE_COUNTERS: PipelineCounters = PipelineCounters::new();

/// Macro for incrementing a counter (only when profiling feature is enabled)
#[macro_export]
macro_rules! count_call {
    ($counter:expr) => {
        #[cfg(feature = "profiling")]
        {
            $counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        }
    };
}

/// Macro for adding to a counter (only when profiling feature is enabled)
#[macro_export]
macro_rules! count_add {
    ($counter:expr, $value:expr) => {
        #[cfg(feature = "profiling")]
        {
            $counter.fetch_add($value, std::sync::atomic::Ordering::Relaxed);
        }
    };
}
