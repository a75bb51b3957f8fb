/// Scene data model: immutable triangle meshes with per-face texture ids and
/// texel-space UVs, plus per-frame mesh instances placed in the world.
pub mod shapes;

use glam::{Vec2, Vec3};

use crate::math::Aabb;

/// Index into the texture atlas. Out-of-range ids degrade to the debug
/// texture at id 0 instead of failing.
pub type TextureId = usize;

/// Triangle face: three indices into the owning mesh's vertex array plus a
/// texture id and one UV per corner, in texel units of that texture.
#[derive(Debug, Clone, Copy)]
pub struct Face {
    pub indices: [usize; 3],
    pub texture: TextureId,
    pub uvs: [Vec2; 3],
}

/// Immutable mesh: a vertex arena referenced by faces through plain indices.
/// Built once, never mutated by the rendering core.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
    aabb: Aabb,
}

impl MeshData {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        let aabb = Aabb::from_points(&vertices);
        Self {
            vertices,
            faces,
            aabb,
        }
    }

    /// Local-space bounding box, computed once at construction.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        self.aabb
    }
}

/// One placement of a mesh for the current frame. The core borrows the mesh
/// data for the duration of frame processing and retains nothing afterwards.
#[derive(Debug, Clone, Copy)]
pub struct MeshInstance<'a> {
    pub mesh: &'a MeshData,
    pub offset: Vec3,
    /// Replaces every face's texture id at collection time, without touching
    /// the shared mesh data.
    pub texture_override: Option<TextureId>,
    /// Background geometry is depth-biased to sort behind everything else
    /// (ground planes, skydomes).
    pub background: bool,
}

impl<'a> MeshInstance<'a> {
    pub fn new(mesh: &'a MeshData, offset: Vec3) -> Self {
        Self {
            mesh,
            offset,
            texture_override: None,
            background: false,
        }
    }

    /// World-space bounding box of this placement.
    #[inline]
    pub fn world_aabb(&self) -> Aabb {
        self.mesh.aabb.translated(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_aabb_follows_instance_offset() {
        let mesh = shapes::box_mesh(Vec3::new(1.0, 2.0, 3.0), 1, 1, 1);
        let instance = MeshInstance::new(&mesh, Vec3::new(10.0, 0.0, -5.0));

        let aabb = instance.world_aabb();
        assert_eq!(aabb.center, Vec3::new(10.0, 0.0, -5.0));
        assert_eq!(aabb.half_extents, Vec3::new(1.0, 2.0, 3.0));
    }
}
