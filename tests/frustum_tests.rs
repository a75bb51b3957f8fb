/// Frustum extraction and visibility-test properties, checked across a range
/// of camera poses.
use approx::assert_relative_eq;
use glam::Vec3;
use painter_engine::*;

fn projection() -> Projection {
    Projection::new(70.0, 480, 270, 0.5, 200.0).unwrap()
}

fn posed_camera(position: Vec3, yaw: f32, pitch: f32) -> Camera {
    let mut camera = Camera::new(position);
    camera.yaw = yaw;
    camera.pitch = pitch;
    camera
}

const POSES: [(Vec3, f32, f32); 4] = [
    (Vec3::ZERO, 0.0, 0.0),
    (Vec3::new(10.0, -5.0, 3.0), 1.2, 0.3),
    (Vec3::new(-7.0, 2.0, -20.0), -2.5, -0.8),
    (Vec3::new(0.5, -0.5, 0.5), 3.1, 1.1),
];

#[test]
fn all_plane_normals_are_unit_length() {
    let projection = projection();
    for (position, yaw, pitch) in POSES {
        let frustum = Frustum::from_pose(&posed_camera(position, yaw, pitch), &projection);
        for plane in frustum.all() {
            assert_relative_eq!(plane.normal.length(), 1.0, epsilon = 1e-5);
        }
    }
}

#[test]
fn camera_position_sits_behind_near_plane() {
    let projection = projection();
    for (position, yaw, pitch) in POSES {
        let camera = posed_camera(position, yaw, pitch);
        let frustum = Frustum::from_pose(&camera, &projection);

        // The camera is `near` units outside the near plane's inside
        // half-space, and `far` units inside the far plane's.
        assert_relative_eq!(
            frustum.near.signed_distance(camera.position),
            -projection.near,
            epsilon = 1e-3
        );
        assert_relative_eq!(
            frustum.far.signed_distance(camera.position),
            projection.far,
            epsilon = 1e-2
        );

        // The side planes all pass through the camera position.
        for plane in [frustum.left, frustum.right, frustum.top, frustum.bottom] {
            assert_relative_eq!(plane.signed_distance(camera.position), 0.0, epsilon = 1e-3);
        }
    }
}

#[test]
fn points_beyond_near_and_far_are_outside() {
    let projection = projection();
    for (position, yaw, pitch) in POSES {
        let camera = posed_camera(position, yaw, pitch);
        let frustum = Frustum::from_pose(&camera, &projection);
        let forward = camera.forward();

        let before_near = camera.position + forward * (projection.near * 0.5);
        let beyond_far = camera.position + forward * (projection.far + 1.0);
        let inside = camera.position + forward * (projection.far * 0.5);

        assert!(frustum.near.signed_distance(before_near) < 0.0);
        assert!(frustum.far.signed_distance(beyond_far) < 0.0);
        for plane in frustum.all() {
            assert!(
                plane.signed_distance(inside) > 0.0,
                "on-axis midpoint must be inside every plane"
            );
        }
    }
}

#[test]
fn on_axis_aabb_is_visible_far_offset_aabb_is_not() {
    let projection = projection();
    for (position, yaw, pitch) in POSES {
        let camera = posed_camera(position, yaw, pitch);
        let frustum = Frustum::from_pose(&camera, &projection);
        let forward = camera.forward();
        let right = camera.right();

        // Centered on the view axis halfway to the far plane, smaller than
        // the frustum cross-section at that depth.
        let centered = Aabb::new(camera.position + forward * 100.0, Vec3::splat(1.0));
        assert!(frustum.intersects_aabb(&centered));

        // Same depth but pushed sideways far past the frustum edge.
        let offside = Aabb::new(
            camera.position + forward * 100.0 + right * 600.0,
            Vec3::splat(1.0),
        );
        assert!(!frustum.intersects_aabb(&offside));

        // Behind the camera entirely.
        let behind = Aabb::new(camera.position - forward * 50.0, Vec3::splat(1.0));
        assert!(!frustum.intersects_aabb(&behind));
    }
}

#[test]
fn corner_test_agrees_on_clear_cases() {
    let projection = projection();
    for (position, yaw, pitch) in POSES {
        let camera = posed_camera(position, yaw, pitch);
        let forward = camera.forward();
        let right = camera.right();

        let ahead = Aabb::new(camera.position + forward * 50.0, Vec3::splat(2.0));
        let behind = Aabb::new(camera.position - forward * 50.0, Vec3::splat(2.0));
        let offside = Aabb::new(
            camera.position + forward * 50.0 + right * 500.0,
            Vec3::splat(2.0),
        );

        assert!(aabb_corners_visible(&camera, &projection, &ahead));
        assert!(!aabb_corners_visible(&camera, &projection, &behind));
        assert!(!aabb_corners_visible(&camera, &projection, &offside));
    }
}

#[test]
fn corner_test_margin_keeps_borderline_boxes() {
    // A box just past the exact screen edge still passes thanks to the
    // widened margin, which is what prevents popping at the border.
    let camera = Camera::new(Vec3::ZERO);
    let projection = projection();

    let edge_x = 50.0 * projection.tan_half_fov * projection.aspect;
    let just_outside = Aabb::new(
        Vec3::new(edge_x * 1.1, 0.0, 50.0),
        Vec3::splat(0.1),
    );
    assert!(aabb_corners_visible(&camera, &projection, &just_outside));
}
