/// Per-frame geometry pipeline: world -> camera -> screen transform, dual
/// backface culling, triangle collection and the back-to-front depth sort
/// that replaces a depth buffer.
use glam::{Vec2, Vec3};
use std::cmp::Ordering;

use crate::camera::{Camera, Projection, ViewTransform, CAMERA_DOLLY, NEAR_DEPTH_EPS};
use crate::count_call;
#[cfg(feature = "profiling")]
use crate::perf::PIPELINE_COUNTERS;
use crate::scene::{MeshInstance, TextureId};

/// Depth added to background-flagged instances so they sort behind all
/// regular geometry. Must exceed the depth spread of any non-background
/// scene content.
pub const BACKGROUND_DEPTH_BIAS: f32 = 1000.0;

/// A mesh vertex after transform and projection, valid for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ProjectedVertex {
    pub screen: Vec2,
    /// Camera-space position (camera at the origin, before the dolly
    /// offset). Kept so the backface test runs in a depth-linear space
    /// instead of on projected coordinates.
    pub cam: Vec3,
    /// View depth including the dolly offset; always > NEAR_DEPTH_EPS.
    pub depth: f32,
    /// Reciprocal view depth.
    pub inv_depth: f32,
}

/// Vertex handed to the rasterizer: screen position plus attributes already
/// weighted by reciprocal depth for perspective-correct interpolation.
#[derive(Debug, Clone, Copy)]
pub struct RasterVertex {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub uw: f32,
    pub vw: f32,
}

/// A visible screen-space triangle awaiting rasterization.
/// Produced fresh each frame; never persisted.
#[derive(Debug, Clone, Copy)]
pub struct CollectedTriangle {
    pub verts: [RasterVertex; 3],
    pub texture: TextureId,
    /// Sort key: mean view depth of the corners, plus the background bias.
    pub depth: f32,
}

/// Everything one frame's geometry stages thread through: the camera
/// snapshot, the projection, and the accumulating triangle list. The list
/// and the per-mesh projection scratch are reused across frames.
pub struct FrameContext {
    camera: Camera,
    view: ViewTransform,
    projection: Projection,
    pub triangles: Vec<CollectedTriangle>,
    projected: Vec<Option<ProjectedVertex>>,
}

impl FrameContext {
    pub fn new(camera: &Camera, projection: Projection) -> Self {
        Self {
            camera: *camera,
            view: ViewTransform::new(camera),
            projection,
            triangles: Vec::new(),
            projected: Vec::new(),
        }
    }

    /// Start a new frame: snapshot the camera and clear the triangle list
    /// (keeping its capacity).
    pub fn begin_frame(&mut self, camera: &Camera) {
        self.camera = *camera;
        self.view = ViewTransform::new(camera);
        self.triangles.clear();
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Transform, project, cull and collect one mesh instance.
    ///
    /// Faces survive only when all three vertices are projectable and both
    /// culling gates agree the face is front-facing: the camera-space normal
    /// test and the screen-space signed-area test. Keeping both is deliberate
    /// protection against the two spaces disagreeing on near-edge-on
    /// triangles.
    pub fn collect_mesh(&mut self, instance: &MeshInstance<'_>) {
        count_call!(PIPELINE_COUNTERS.meshes_tested);
        let focal = self.projection.focal;
        let center = Vec2::new(self.projection.half_width, self.projection.half_height);

        self.projected.clear();
        self.projected.reserve(instance.mesh.vertices.len());
        for &vertex in &instance.mesh.vertices {
            let cam = self.view.apply(vertex + instance.offset);
            let depth = cam.z + CAMERA_DOLLY;
            self.projected.push(if depth > NEAR_DEPTH_EPS {
                let inv_depth = 1.0 / depth;
                Some(ProjectedVertex {
                    screen: center + Vec2::new(cam.x, cam.y) * (focal * inv_depth),
                    cam,
                    depth,
                    inv_depth,
                })
            } else {
                None
            });
        }

        let bias = if instance.background {
            BACKGROUND_DEPTH_BIAS
        } else {
            0.0
        };

        for face in &instance.mesh.faces {
            let [i0, i1, i2] = face.indices;
            let (Some(p0), Some(p1), Some(p2)) = (
                self.projected.get(i0).copied().flatten(),
                self.projected.get(i1).copied().flatten(),
                self.projected.get(i2).copied().flatten(),
            ) else {
                count_call!(PIPELINE_COUNTERS.faces_dropped_unprojectable);
                continue;
            };

            // Gate 1: camera-space normal against the view ray to the
            // centroid. Front faces wind so the geometric normal points away
            // from the camera.
            let normal = (p1.cam - p0.cam).cross(p2.cam - p0.cam);
            let centroid = (p0.cam + p1.cam + p2.cam) / 3.0;
            if normal.dot(centroid) <= 0.0 {
                count_call!(PIPELINE_COUNTERS.faces_backfaced);
                continue;
            }

            // Gate 2: screen-space winding (positive area = clockwise with
            // y down).
            let e1 = p1.screen - p0.screen;
            let e2 = p2.screen - p0.screen;
            if e1.perp_dot(e2) <= 0.0 {
                count_call!(PIPELINE_COUNTERS.faces_backfaced);
                continue;
            }

            let texture = instance.texture_override.unwrap_or(face.texture);
            self.triangles.push(CollectedTriangle {
                verts: [
                    raster_vertex(&p0, face.uvs[0]),
                    raster_vertex(&p1, face.uvs[1]),
                    raster_vertex(&p2, face.uvs[2]),
                ],
                texture,
                depth: (p0.depth + p1.depth + p2.depth) / 3.0 + bias,
            });
            count_call!(PIPELINE_COUNTERS.triangles_collected);
        }
    }

    /// Order the frame's triangles farthest-first for painter's-algorithm
    /// compositing. The sort is stable, so equal depths keep collection
    /// order; on the nearly-sorted lists coherent frames produce it runs
    /// close to linear.
    pub fn sort_back_to_front(&mut self) {
        self.triangles
            .sort_by(|a, b| b.depth.partial_cmp(&a.depth).unwrap_or(Ordering::Equal));
    }
}

#[inline]
fn raster_vertex(p: &ProjectedVertex, uv: Vec2) -> RasterVertex {
    RasterVertex {
        x: p.screen.x,
        y: p.screen.y,
        w: p.inv_depth,
        uw: uv.x * p.inv_depth,
        vw: uv.y * p.inv_depth,
    }
}

/// Project a single world-space point through the camera. Returns its screen
/// position, or None when it sits at or behind the near threshold.
pub fn project_point(camera: &Camera, projection: &Projection, world: Vec3) -> Option<Vec2> {
    let cam = camera.world_to_camera(world);
    let depth = cam.z + CAMERA_DOLLY;
    if depth <= NEAR_DEPTH_EPS {
        return None;
    }
    let scale = projection.focal / depth;
    Some(Vec2::new(
        projection.half_width + cam.x * scale,
        projection.half_height + cam.y * scale,
    ))
}
