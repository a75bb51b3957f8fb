pub mod camera;
pub mod math;
pub mod perf;
/// Painter's-algorithm software 3D renderer: frustum culling, perspective
/// projection, back-to-front depth sorting and perspective-correct scanline
/// texture mapping, with no depth buffer.
pub mod rendering;
pub mod scene;

pub use camera::{
    aabb_corners_visible, Camera, CameraController, Frustum, Projection, ProjectionError,
    CAMERA_DOLLY, NEAR_DEPTH_EPS,
};
pub use math::{Aabb, Plane};
pub use perf::{CounterSnapshot, FrameStats, PipelineCounters, PIPELINE_COUNTERS};
pub use rendering::pipeline::project_point;
pub use rendering::{
    CollectedTriangle, FrameContext, Framebuffer, Rasterizer, TextureAtlas, BACKGROUND_DEPTH_BIAS,
};
pub use scene::{Face, MeshData, MeshInstance, TextureId};
