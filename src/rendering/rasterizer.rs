/// Scanline triangle rasterizer with perspective-correct texture mapping.
///
/// Triangles are split at the middle vertex into an upper and a lower half;
/// each half walks its scanlines with fixed-step DDA interpolation of
/// (x, w, u*w, v*w) along the major (top-to-bottom) edge and the active
/// minor edge, then hands every row to the framebuffer's span primitive for
/// the per-pixel perspective divide. No depth buffer: callers draw triangles
/// in back-to-front order.
use std::sync::Arc;

use crate::count_call;
#[cfg(feature = "profiling")]
use crate::perf::PIPELINE_COUNTERS;
use crate::rendering::framebuffer::{Framebuffer, SpanPoint};
use crate::rendering::pipeline::{CollectedTriangle, RasterVertex};
use crate::rendering::texture::{TextureAtlas, TileTexture};

/// Edge state for scanline rasterization: current attribute values at the
/// active row plus their per-row increments.
#[derive(Copy, Clone)]
struct SpanEdge {
    x: f32,
    w: f32,
    uw: f32,
    vw: f32,
    dx: f32,
    dw: f32,
    duw: f32,
    dvw: f32,
}

impl SpanEdge {
    /// Edge from `a` down to `b`, positioned at integer row `first_row`.
    /// Callers guarantee b.y > a.y (a non-empty row range implies it).
    fn new(a: &RasterVertex, b: &RasterVertex, first_row: i32) -> Self {
        let inv_dy = 1.0 / (b.y - a.y);
        let dx = (b.x - a.x) * inv_dy;
        let dw = (b.w - a.w) * inv_dy;
        let duw = (b.uw - a.uw) * inv_dy;
        let dvw = (b.vw - a.vw) * inv_dy;

        let offset = first_row as f32 - a.y;
        Self {
            x: a.x + dx * offset,
            w: a.w + dw * offset,
            uw: a.uw + duw * offset,
            vw: a.vw + dvw * offset,
            dx,
            dw,
            duw,
            dvw,
        }
    }

    #[inline]
    fn point(&self) -> SpanPoint {
        SpanPoint {
            x: self.x,
            w: self.w,
            uw: self.uw,
            vw: self.vw,
        }
    }

    #[inline]
    fn step(&mut self) {
        self.x += self.dx;
        self.w += self.dw;
        self.uw += self.duw;
        self.vw += self.dvw;
    }
}

pub struct Rasterizer {
    /// Shared texture atlas for all scene textures.
    pub atlas: Arc<TextureAtlas>,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::new_with_atlas(Arc::new(TextureAtlas::default()))
    }

    /// Create a rasterizer with a specific texture atlas.
    pub fn new_with_atlas(atlas: Arc<TextureAtlas>) -> Self {
        Self { atlas }
    }

    /// Draw an already-sorted triangle list back-to-front.
    pub fn draw_frame(&self, triangles: &[CollectedTriangle], framebuffer: &mut Framebuffer) {
        for triangle in triangles {
            self.draw_triangle(triangle, framebuffer);
        }
    }

    /// Rasterize one screen-space triangle.
    pub fn draw_triangle(&self, triangle: &CollectedTriangle, framebuffer: &mut Framebuffer) {
        count_call!(PIPELINE_COUNTERS.triangles_rasterized);
        let texture = self.atlas.get(triangle.texture);

        // Sort corners by ascending screen y; ties keep their order, so the
        // split is deterministic.
        let mut v = triangle.verts;
        if v[1].y < v[0].y {
            v.swap(0, 1);
        }
        if v[2].y < v[1].y {
            v.swap(1, 2);
        }
        if v[1].y < v[0].y {
            v.swap(0, 1);
        }

        // Upper half runs from the top vertex to the middle vertex's row,
        // the lower half from there to the bottom vertex. Either half may be
        // empty (flat-top / flat-bottom); both use the long v0->v2 edge as
        // the major edge.
        self.fill_half(framebuffer, texture, &v[0], &v[2], &v[0], &v[1]);
        self.fill_half(framebuffer, texture, &v[0], &v[2], &v[1], &v[2]);
    }

    /// Fill the scanlines covered by one minor edge. Rows are the integer
    /// ys in [ceil(minor_a.y), ceil(minor_b.y)), clamped to
    /// [-1, height - 1]; rows above the screen advance the interpolators
    /// without emitting a span.
    fn fill_half(
        &self,
        framebuffer: &mut Framebuffer,
        texture: &TileTexture,
        major_a: &RasterVertex,
        major_b: &RasterVertex,
        minor_a: &RasterVertex,
        minor_b: &RasterVertex,
    ) {
        let y_first = (minor_a.y.ceil() as i32).max(-1);
        let y_last = (minor_b.y.ceil() as i32).min(framebuffer.height as i32);
        if y_first >= y_last {
            // Zero-height half: a no-op, not an error.
            return;
        }

        let mut major = SpanEdge::new(major_a, major_b, y_first);
        let mut minor = SpanEdge::new(minor_a, minor_b, y_first);

        for y in y_first..y_last {
            if y >= 0 {
                framebuffer.draw_textured_span(y, major.point(), minor.point(), texture);
            }
            major.step();
            minor.step();
        }
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}
