/// Performance measurement utilities
/// Stage timings per frame plus atomic call counters for the hot paths
pub mod profiling;

pub use profiling::{CounterSnapshot, PipelineCounters, PIPELINE_COUNTERS};

/// Per-frame stage timing accumulator, in microseconds.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameStats {
    pub visibility_us: f64,
    pub collect_us: f64,
    pub sort_us: f64,
    pub raster_us: f64,
    pub total_us: f64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print_summary(&self) {
        let pct = |v: f64| {
            if self.total_us > 0.0 {
                v / self.total_us * 100.0
            } else {
                0.0
            }
        };
        println!("\n========== FRAME SUMMARY ==========");
        println!(
            "Visibility:     {:8.2}μs ({:5.1}%)",
            self.visibility_us,
            pct(self.visibility_us)
        );
        println!(
            "Collect:        {:8.2}μs ({:5.1}%)",
            self.collect_us,
            pct(self.collect_us)
        );
        println!(
            "Depth sort:     {:8.2}μs ({:5.1}%)",
            self.sort_us,
            pct(self.sort_us)
        );
        println!(
            "Rasterization:  {:8.2}μs ({:5.1}%)",
            self.raster_us,
            pct(self.raster_us)
        );
        println!("───────────────────────────────────");
        println!("Total:          {:8.2}μs", self.total_us);
        println!("===================================\n");
    }
}
