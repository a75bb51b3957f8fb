/// Software rendering pipeline: transform/cull/collect, depth sort and
/// scanline rasterization into a plain pixel buffer.
pub mod framebuffer;
pub mod pipeline;
pub mod rasterizer;
pub mod texture;

pub use framebuffer::{Framebuffer, SpanPoint};
pub use pipeline::{
    CollectedTriangle, FrameContext, ProjectedVertex, RasterVertex, BACKGROUND_DEPTH_BIAS,
};
pub use rasterizer::Rasterizer;
pub use texture::{TextureAtlas, TileTexture, TEX_SIZE};
