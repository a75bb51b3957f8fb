/// Procedural mesh generators for the demo scene: boxes, ground planes,
/// UV spheres and a deterministic city layout.
///
/// Faces are wound so that the geometric normal (cross of the first two
/// edges) points into the solid; the culling stage treats exactly that
/// winding as front-facing when seen from outside.
use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{Face, MeshData, TextureId};

/// Texel density: one world unit maps to one 16-texel tile.
pub const TEXELS_PER_UNIT: f32 = 16.0;

struct MeshBuilder {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
}

impl MeshBuilder {
    fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    fn vertex(&mut self, position: Vec3) -> usize {
        self.vertices.push(position);
        self.vertices.len() - 1
    }

    fn triangle(&mut self, indices: [usize; 3], texture: TextureId, uvs: [Vec2; 3]) {
        self.faces.push(Face {
            indices,
            texture,
            uvs,
        });
    }

    /// Two triangles for a quad given corners in winding order.
    fn quad(&mut self, corners: [usize; 4], texture: TextureId, uvs: [Vec2; 4]) {
        self.triangle(
            [corners[0], corners[1], corners[2]],
            texture,
            [uvs[0], uvs[1], uvs[2]],
        );
        self.triangle(
            [corners[0], corners[2], corners[3]],
            texture,
            [uvs[0], uvs[2], uvs[3]],
        );
    }

    fn build(self) -> MeshData {
        MeshData::new(self.vertices, self.faces)
    }
}

/// Axis-aligned box centered at the origin. Walls take `side_texture`; the
/// -y face (the top, in y-down world axes) takes `top_texture` and the +y
/// face `bottom_texture`. UVs tile with the box dimensions.
pub fn box_mesh(
    half_extents: Vec3,
    side_texture: TextureId,
    top_texture: TextureId,
    bottom_texture: TextureId,
) -> MeshData {
    let h = half_extents;
    let mut b = MeshBuilder::new();

    let u_x = 2.0 * h.x * TEXELS_PER_UNIT;
    let u_z = 2.0 * h.z * TEXELS_PER_UNIT;
    let v_y = 2.0 * h.y * TEXELS_PER_UNIT;

    // -Z wall, seen from -z
    let f = [
        b.vertex(Vec3::new(-h.x, -h.y, -h.z)),
        b.vertex(Vec3::new(h.x, -h.y, -h.z)),
        b.vertex(Vec3::new(h.x, h.y, -h.z)),
        b.vertex(Vec3::new(-h.x, h.y, -h.z)),
    ];
    b.quad(f, side_texture, face_uvs(u_x, v_y));

    // +Z wall, seen from +z
    let f = [
        b.vertex(Vec3::new(h.x, -h.y, h.z)),
        b.vertex(Vec3::new(-h.x, -h.y, h.z)),
        b.vertex(Vec3::new(-h.x, h.y, h.z)),
        b.vertex(Vec3::new(h.x, h.y, h.z)),
    ];
    b.quad(f, side_texture, face_uvs(u_x, v_y));

    // +X wall
    let f = [
        b.vertex(Vec3::new(h.x, -h.y, h.z)),
        b.vertex(Vec3::new(h.x, h.y, h.z)),
        b.vertex(Vec3::new(h.x, h.y, -h.z)),
        b.vertex(Vec3::new(h.x, -h.y, -h.z)),
    ];
    b.quad(
        f,
        side_texture,
        [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, v_y),
            Vec2::new(u_z, v_y),
            Vec2::new(u_z, 0.0),
        ],
    );

    // -X wall
    let f = [
        b.vertex(Vec3::new(-h.x, -h.y, -h.z)),
        b.vertex(Vec3::new(-h.x, h.y, -h.z)),
        b.vertex(Vec3::new(-h.x, h.y, h.z)),
        b.vertex(Vec3::new(-h.x, -h.y, h.z)),
    ];
    b.quad(
        f,
        side_texture,
        [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, v_y),
            Vec2::new(u_z, v_y),
            Vec2::new(u_z, 0.0),
        ],
    );

    // -y face (top)
    let f = [
        b.vertex(Vec3::new(-h.x, -h.y, -h.z)),
        b.vertex(Vec3::new(-h.x, -h.y, h.z)),
        b.vertex(Vec3::new(h.x, -h.y, h.z)),
        b.vertex(Vec3::new(h.x, -h.y, -h.z)),
    ];
    b.quad(
        f,
        top_texture,
        [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, u_z),
            Vec2::new(u_x, u_z),
            Vec2::new(u_x, 0.0),
        ],
    );

    // +y face (bottom)
    let f = [
        b.vertex(Vec3::new(-h.x, h.y, -h.z)),
        b.vertex(Vec3::new(h.x, h.y, -h.z)),
        b.vertex(Vec3::new(h.x, h.y, h.z)),
        b.vertex(Vec3::new(-h.x, h.y, h.z)),
    ];
    b.quad(
        f,
        bottom_texture,
        [
            Vec2::new(0.0, 0.0),
            Vec2::new(u_x, 0.0),
            Vec2::new(u_x, u_z),
            Vec2::new(0.0, u_z),
        ],
    );

    b.build()
}

fn face_uvs(u_max: f32, v_max: f32) -> [Vec2; 4] {
    [
        Vec2::new(0.0, 0.0),
        Vec2::new(u_max, 0.0),
        Vec2::new(u_max, v_max),
        Vec2::new(0.0, v_max),
    ]
}

/// Square ground quad at y = 0 centered on the origin, visible from above.
pub fn ground_plane(half_size: f32, texture: TextureId) -> MeshData {
    let mut b = MeshBuilder::new();
    let u_max = 2.0 * half_size * TEXELS_PER_UNIT;

    let f = [
        b.vertex(Vec3::new(-half_size, 0.0, -half_size)),
        b.vertex(Vec3::new(-half_size, 0.0, half_size)),
        b.vertex(Vec3::new(half_size, 0.0, half_size)),
        b.vertex(Vec3::new(half_size, 0.0, -half_size)),
    ];
    b.quad(
        f,
        texture,
        [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, u_max),
            Vec2::new(u_max, u_max),
            Vec2::new(u_max, 0.0),
        ],
    );
    b.build()
}

/// UV sphere centered at the origin. Ring 0 is the -y pole (the top).
pub fn uv_sphere(radius: f32, segments: usize, rings: usize, texture: TextureId) -> MeshData {
    debug_assert!(segments >= 3 && rings >= 2, "sphere needs a real grid");
    let mut b = MeshBuilder::new();

    // Vertex grid: (rings + 1) latitudes x (segments + 1) longitudes. The
    // seam column is duplicated so UVs do not wrap backwards across it.
    let mut grid = Vec::with_capacity((rings + 1) * (segments + 1));
    for i in 0..=rings {
        let phi = std::f32::consts::PI * i as f32 / rings as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for j in 0..=segments {
            let theta = std::f32::consts::TAU * j as f32 / segments as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let position = Vec3::new(
                radius * sin_phi * cos_theta,
                -radius * cos_phi,
                radius * sin_phi * sin_theta,
            );
            let uv = Vec2::new(
                2.0 * TEXELS_PER_UNIT * j as f32 / segments as f32,
                TEXELS_PER_UNIT * i as f32 / rings as f32,
            );
            grid.push((b.vertex(position), uv));
        }
    }

    let at = |i: usize, j: usize| grid[i * (segments + 1) + j];
    for i in 0..rings {
        for j in 0..segments {
            let (v00, t00) = at(i, j);
            let (v01, t01) = at(i, j + 1);
            let (v11, t11) = at(i + 1, j + 1);
            let (v10, t10) = at(i + 1, j);
            if i == 0 {
                // Ring 0 collapses to the pole
                b.triangle([v00, v11, v10], texture, [t00, t11, t10]);
            } else if i == rings - 1 {
                b.triangle([v00, v01, v11], texture, [t00, t01, t11]);
            } else {
                b.quad([v00, v01, v11, v10], texture, [t00, t01, t11, t10]);
            }
        }
    }
    b.build()
}

/// Deterministic grid of box buildings. Returns each building's mesh and its
/// world offset; bases sit on the ground plane at y = 0.
pub fn city_blocks(
    seed: u64,
    blocks_x: usize,
    blocks_z: usize,
    spacing: f32,
    side_texture: TextureId,
    roof_texture: TextureId,
) -> Vec<(MeshData, Vec3)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut buildings = Vec::with_capacity(blocks_x * blocks_z);

    let origin_x = -(blocks_x as f32 - 1.0) * spacing * 0.5;
    let origin_z = -(blocks_z as f32 - 1.0) * spacing * 0.5;

    for bx in 0..blocks_x {
        for bz in 0..blocks_z {
            let width = rng.gen_range(1.5..3.0);
            let height = rng.gen_range(2.0..9.0);
            let depth = rng.gen_range(1.5..3.0);
            let mesh = box_mesh(
                Vec3::new(width * 0.5, height * 0.5, depth * 0.5),
                side_texture,
                roof_texture,
                roof_texture,
            );
            let offset = Vec3::new(
                origin_x + bx as f32 * spacing,
                -height * 0.5,
                origin_z + bz as f32 * spacing,
            );
            buildings.push((mesh, offset));
        }
    }
    buildings
}
