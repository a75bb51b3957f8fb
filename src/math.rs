/// Plane and bounding-box primitives for visibility testing.
/// Vector arithmetic itself comes from glam.
use glam::Vec3;

/// Plane in Hessian normal form: all points p with normal.dot(p) + d == 0.
/// The half-space where `normal.dot(p) + d >= 0` counts as "inside".
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    /// Build a plane from a normal direction and any point on the plane.
    /// The normal is normalized here; passing a zero-length normal is a
    /// caller bug (degenerate basis) and yields NaN components in release
    /// builds rather than a panic mid-frame.
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        debug_assert!(
            normal.length_squared() > 1e-12,
            "plane normal must be nonzero"
        );
        let normal = normal.normalize();
        Self {
            normal,
            d: -normal.dot(point),
        }
    }

    /// Signed distance from a point to the plane.
    /// Positive on the inside half-space.
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.d
    }
}

/// Axis-aligned bounding box described by center and per-axis half extents.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Smallest box containing all given points.
    /// An empty slice produces a degenerate box at the origin.
    pub fn from_points(points: &[Vec3]) -> Self {
        if points.is_empty() {
            return Self::new(Vec3::ZERO, Vec3::ZERO);
        }
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for &p in points {
            min = min.min(p);
            max = max.max(p);
        }
        Self {
            center: (min + max) * 0.5,
            half_extents: (max - min) * 0.5,
        }
    }

    /// Box translated by `offset`.
    #[inline]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            center: self.center + offset,
            half_extents: self.half_extents,
        }
    }

    /// Half-length of the box projected onto a direction:
    /// the largest |n . (corner - center)| over all 8 corners.
    #[inline]
    pub fn projection_radius(&self, normal: Vec3) -> f32 {
        self.half_extents.dot(normal.abs())
    }

    /// The 8 corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let c = self.center;
        let h = self.half_extents;
        [
            c + Vec3::new(-h.x, -h.y, -h.z),
            c + Vec3::new(h.x, -h.y, -h.z),
            c + Vec3::new(-h.x, h.y, -h.z),
            c + Vec3::new(h.x, h.y, -h.z),
            c + Vec3::new(-h.x, -h.y, h.z),
            c + Vec3::new(h.x, -h.y, h.z),
            c + Vec3::new(-h.x, h.y, h.z),
            c + Vec3::new(h.x, h.y, h.z),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn plane_signed_distance_sides() {
        // Plane y = 2 with normal pointing towards -y (inside above, y-down world).
        let plane =
            Plane::from_normal_and_point(Vec3::new(0.0, -3.0, 0.0), Vec3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(plane.normal.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(
            plane.signed_distance(Vec3::new(5.0, 2.0, -7.0)),
            0.0,
            epsilon = 1e-5
        );
        assert!(plane.signed_distance(Vec3::new(0.0, -1.0, 0.0)) > 0.0);
        assert!(plane.signed_distance(Vec3::new(0.0, 4.0, 0.0)) < 0.0);
    }

    #[test]
    fn aabb_projection_radius_is_corner_extent() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
        let n = Vec3::new(1.0, -1.0, 1.0).normalize();
        let radius = aabb.projection_radius(n);

        let max_corner = aabb
            .corners()
            .iter()
            .map(|c| n.dot(*c).abs())
            .fold(0.0f32, f32::max);
        assert_relative_eq!(radius, max_corner, epsilon = 1e-5);
    }

    #[test]
    fn aabb_from_points_bounds_input() {
        let aabb = Aabb::from_points(&[
            Vec3::new(-1.0, 0.0, 2.0),
            Vec3::new(3.0, -4.0, 2.0),
            Vec3::new(1.0, 1.0, 8.0),
        ]);
        assert_relative_eq!(aabb.center.x, 1.0);
        assert_relative_eq!(aabb.half_extents.y, 2.5);
        assert_relative_eq!(aabb.half_extents.z, 3.0);
    }
}
