/// Camera system with FPS-style controls, projection parameters and
/// view-frustum extraction for mesh-level visibility culling.
use glam::Vec3;
use thiserror::Error;

use crate::math::{Aabb, Plane};

/// Depth offset applied after the camera rotation: the projection origin sits
/// this far behind the camera, so geometry at the camera plane still projects
/// with a positive depth instead of being dropped at the near threshold.
pub const CAMERA_DOLLY: f32 = 4.0;

/// Minimum view-space depth for a vertex to be projectable.
pub const NEAR_DEPTH_EPS: f32 = 0.001;

/// Extra slack on the normalized corner test so geometry does not pop at the
/// screen border.
const CORNER_TEST_MARGIN: f32 = 1.2;

/// Free camera pose: position plus yaw/pitch, no roll.
///
/// World axes are right-handed with +Y pointing down (screen-aligned): the
/// ground plane sits at y = 0 and geometry above it extends towards -y.
/// Yaw spins around the world Y axis, pitch tilts around the camera X axis;
/// positive pitch looks towards -y (up).
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,   // Rotation around Y axis (radians)
    pub pitch: f32, // Rotation around X axis (radians)

    // Movement state
    pub move_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            move_speed: 10.0,
            mouse_sensitivity: 0.002,
        }
    }

    /// Direction the camera looks along (camera-space +Z in world space).
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(sin_yaw * cos_pitch, -sin_pitch, cos_yaw * cos_pitch)
    }

    /// Screen-right direction (camera-space +X in world space).
    pub fn right(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(cos_yaw, 0.0, -sin_yaw)
    }

    /// Screen-down direction (camera-space +Y in world space).
    pub fn screen_down(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(sin_yaw * sin_pitch, cos_pitch, cos_yaw * sin_pitch)
    }

    /// Transform a world-space point into camera space (rotation only, camera
    /// at the origin; no dolly applied).
    #[inline]
    pub fn world_to_camera(&self, world: Vec3) -> Vec3 {
        ViewTransform::new(self).apply(world)
    }

    /// Update camera orientation from mouse delta
    pub fn rotate(&mut self, mouse_delta_x: f32, mouse_delta_y: f32) {
        self.yaw += mouse_delta_x * self.mouse_sensitivity;
        self.pitch -= mouse_delta_y * self.mouse_sensitivity;

        // Clamp pitch to prevent gimbal lock
        const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
        self.pitch = self.pitch.clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Move camera in local space. `up` is measured against the world
    /// vertical, i.e. positive values move away from the ground at y = 0.
    pub fn move_local(&mut self, forward: f32, right: f32, up: f32, dt: f32) {
        let move_vec = self.forward() * forward + self.right() * right + Vec3::NEG_Y * up;
        self.position += move_vec * self.move_speed * dt;
    }
}

/// Precomputed inverse camera rotation, hoisted out of per-vertex loops.
#[derive(Debug, Clone, Copy)]
pub struct ViewTransform {
    position: Vec3,
    sin_yaw: f32,
    cos_yaw: f32,
    sin_pitch: f32,
    cos_pitch: f32,
}

impl ViewTransform {
    pub fn new(camera: &Camera) -> Self {
        let (sin_yaw, cos_yaw) = camera.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = camera.pitch.sin_cos();
        Self {
            position: camera.position,
            sin_yaw,
            cos_yaw,
            sin_pitch,
            cos_pitch,
        }
    }

    /// World point -> camera space: subtract the camera position, then rotate
    /// by -yaw around Y and -pitch around X.
    #[inline]
    pub fn apply(&self, world: Vec3) -> Vec3 {
        let rel = world - self.position;
        let x = rel.x * self.cos_yaw - rel.z * self.sin_yaw;
        let z1 = rel.x * self.sin_yaw + rel.z * self.cos_yaw;
        let y = rel.y * self.cos_pitch + z1 * self.sin_pitch;
        let z = -rel.y * self.sin_pitch + z1 * self.cos_pitch;
        Vec3::new(x, y, z)
    }
}

/// Invalid projection parameters, rejected once at construction so the
/// per-frame pipeline never has to re-validate.
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("vertical fov must lie strictly between 0 and 180 degrees, got {degrees}")]
    Fov { degrees: f32 },
    #[error("near/far must satisfy 0 < near < far, got near={near}, far={far}")]
    DepthRange { near: f32, far: f32 },
    #[error("viewport must be non-empty, got {width}x{height}")]
    Viewport { width: usize, height: usize },
}

/// Validated perspective projection parameters plus derived constants.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub width: usize,
    pub height: usize,
    pub aspect: f32,
    pub tan_half_fov: f32,
    /// Screen-space scale factor: half_height / tan(fov / 2).
    pub focal: f32,
    pub half_width: f32,
    pub half_height: f32,
}

impl Projection {
    pub fn new(
        fov_degrees: f32,
        width: usize,
        height: usize,
        near: f32,
        far: f32,
    ) -> Result<Self, ProjectionError> {
        if !(fov_degrees > 0.0 && fov_degrees < 180.0) {
            return Err(ProjectionError::Fov {
                degrees: fov_degrees,
            });
        }
        if !(near > 0.0 && far > near) {
            return Err(ProjectionError::DepthRange { near, far });
        }
        if width == 0 || height == 0 {
            return Err(ProjectionError::Viewport { width, height });
        }

        let fov = fov_degrees.to_radians();
        let tan_half_fov = (fov * 0.5).tan();
        let half_width = width as f32 * 0.5;
        let half_height = height as f32 * 0.5;
        Ok(Self {
            fov,
            near,
            far,
            width,
            height,
            aspect: width as f32 / height as f32,
            tan_half_fov,
            focal: half_height / tan_half_fov,
            half_width,
            half_height,
        })
    }
}

/// View frustum as 6 planes with inward-pointing unit normals.
/// Rebuilt whenever the camera pose or projection parameters change and
/// reused for every visibility test that frame.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    pub near: Plane,
    pub far: Plane,
    pub left: Plane,
    pub right: Plane,
    pub top: Plane,
    pub bottom: Plane,
}

impl Frustum {
    /// Build the frustum from the camera pose and projection parameters.
    ///
    /// Near/far planes come straight from the forward vector and the plane
    /// center points. The side planes pass through the camera position; their
    /// inward normals are the corresponding basis axis rotated towards the
    /// forward vector by atan2(far-plane half extent, far).
    pub fn from_pose(camera: &Camera, projection: &Projection) -> Self {
        let pos = camera.position;
        let forward = camera.forward();
        let right = camera.right();
        let down = camera.screen_down();

        let half_v = projection.tan_half_fov * projection.far;
        let half_h = half_v * projection.aspect;
        let (sin_h, cos_h) = half_h.atan2(projection.far).sin_cos();
        let (sin_v, cos_v) = half_v.atan2(projection.far).sin_cos();

        Self {
            near: Plane::from_normal_and_point(forward, pos + forward * projection.near),
            far: Plane::from_normal_and_point(-forward, pos + forward * projection.far),
            left: Plane::from_normal_and_point(forward * sin_h + right * cos_h, pos),
            right: Plane::from_normal_and_point(forward * sin_h - right * cos_h, pos),
            top: Plane::from_normal_and_point(forward * sin_v + down * cos_v, pos),
            bottom: Plane::from_normal_and_point(forward * sin_v - down * cos_v, pos),
        }
    }

    /// All 6 planes in near, far, left, right, top, bottom order.
    #[inline]
    pub fn all(&self) -> [Plane; 6] {
        [
            self.near, self.far, self.left, self.right, self.top, self.bottom,
        ]
    }

    /// Test whether an AABB intersects the frustum.
    ///
    /// Separating-plane test against the box's projection radius: the box is
    /// rejected only when it lies entirely on the outside of some plane.
    /// Conservative: a box near a frustum corner can pass even when it is
    /// actually outside, but a partially visible box is never culled.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        for plane in self.all() {
            let radius = aabb.projection_radius(plane.normal);
            if plane.signed_distance(aabb.center) < -radius {
                return false;
            }
        }
        true
    }
}

/// Cheap corner-based visibility test that skips the full plane math.
///
/// Each AABB corner is brought into camera space and projected to normalized
/// device coordinates; the box counts as visible when at least one corner
/// lands within the widened unit square and inside the [near, far] depth
/// band. False-positive-biased: a box surrounding the camera or crossing the
/// frustum without a corner inside can slip through, which is acceptable for
/// an early-reject path.
pub fn aabb_corners_visible(camera: &Camera, projection: &Projection, aabb: &Aabb) -> bool {
    let view = ViewTransform::new(camera);
    for corner in aabb.corners() {
        let cam = view.apply(corner);
        let depth = cam.z + CAMERA_DOLLY;
        if depth < projection.near || depth > projection.far {
            continue;
        }
        let ndc_x = cam.x / (depth * projection.tan_half_fov * projection.aspect);
        let ndc_y = cam.y / (depth * projection.tan_half_fov);
        if ndc_x.abs() <= CORNER_TEST_MARGIN && ndc_y.abs() <= CORNER_TEST_MARGIN {
            return true;
        }
    }
    false
}

/// Camera controller - handles input state
pub struct CameraController {
    pub forward_pressed: bool,
    pub backward_pressed: bool,
    pub left_pressed: bool,
    pub right_pressed: bool,
    pub up_pressed: bool,
    pub down_pressed: bool,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            forward_pressed: false,
            backward_pressed: false,
            left_pressed: false,
            right_pressed: false,
            up_pressed: false,
            down_pressed: false,
        }
    }

    /// Update camera based on controller state
    pub fn update_camera(&self, camera: &mut Camera, dt: f32) {
        let mut forward = 0.0;
        let mut right = 0.0;
        let mut up = 0.0;

        if self.forward_pressed {
            forward += 1.0;
        }
        if self.backward_pressed {
            forward -= 1.0;
        }
        if self.right_pressed {
            right += 1.0;
        }
        if self.left_pressed {
            right -= 1.0;
        }
        if self.up_pressed {
            up += 1.0;
        }
        if self.down_pressed {
            up -= 1.0;
        }

        camera.move_local(forward, right, up, dt);
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_projection() -> Projection {
        Projection::new(70.0, 480, 270, 0.5, 200.0).unwrap()
    }

    #[test]
    fn camera_basis_is_orthonormal() {
        let mut camera = Camera::new(Vec3::new(3.0, -2.0, 7.0));
        camera.yaw = 1.3;
        camera.pitch = -0.6;

        let f = camera.forward();
        let r = camera.right();
        let d = camera.screen_down();
        assert_relative_eq!(f.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(r.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(d.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(f.dot(r), 0.0, epsilon = 1e-6);
        assert_relative_eq!(f.dot(d), 0.0, epsilon = 1e-6);
        assert_relative_eq!(r.dot(d), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn world_to_camera_maps_forward_to_depth_axis() {
        let mut camera = Camera::new(Vec3::new(-4.0, 1.0, 9.0));
        camera.yaw = 2.4;
        camera.pitch = 0.7;

        let p = camera.position + camera.forward() * 12.5;
        let cam = camera.world_to_camera(p);
        assert_relative_eq!(cam.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(cam.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(cam.z, 12.5, epsilon = 1e-4);
    }

    #[test]
    fn projection_rejects_bad_parameters() {
        assert!(matches!(
            Projection::new(0.0, 480, 270, 0.5, 200.0),
            Err(ProjectionError::Fov { .. })
        ));
        assert!(matches!(
            Projection::new(180.0, 480, 270, 0.5, 200.0),
            Err(ProjectionError::Fov { .. })
        ));
        assert!(matches!(
            Projection::new(70.0, 480, 270, 5.0, 2.0),
            Err(ProjectionError::DepthRange { .. })
        ));
        assert!(matches!(
            Projection::new(70.0, 0, 270, 0.5, 200.0),
            Err(ProjectionError::Viewport { .. })
        ));
    }

    #[test]
    fn frustum_culls_box_behind_camera() {
        let camera = Camera::new(Vec3::ZERO);
        let frustum = Frustum::from_pose(&camera, &test_projection());

        // Camera looks towards +Z, so a box on -Z is behind it.
        let front = Aabb::new(Vec3::new(0.0, 0.0, 10.0), Vec3::splat(1.0));
        let back = Aabb::new(Vec3::new(0.0, 0.0, -10.0), Vec3::splat(1.0));

        assert!(
            frustum.intersects_aabb(&front),
            "box in front of camera should be inside frustum"
        );
        assert!(
            !frustum.intersects_aabb(&back),
            "box behind camera should be outside frustum"
        );
    }

    #[test]
    fn corner_test_accepts_front_rejects_back() {
        let camera = Camera::new(Vec3::ZERO);
        let projection = test_projection();

        let front = Aabb::new(Vec3::new(0.0, 0.0, 20.0), Vec3::splat(2.0));
        let back = Aabb::new(Vec3::new(0.0, 0.0, -20.0), Vec3::splat(2.0));
        assert!(aabb_corners_visible(&camera, &projection, &front));
        assert!(!aabb_corners_visible(&camera, &projection, &back));
    }
}
