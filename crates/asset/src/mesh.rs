//! CPU-side mesh representation used by loaders.

use bytemuck::{Pod, Zeroable};

/// Vertex with position/normal, interleaved. Values are in object space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Byte stride of one vertex.
    pub const STRIDE: u64 = std::mem::size_of::<MeshVertex>() as u64;
    pub const POSITION_OFFSET: u64 = 0;
    pub const NORMAL_OFFSET: u64 = 12;

    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// Axis-aligned bounds of a mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Aabb {
    pub fn center(&self) -> [f32; 3] {
        [
            0.5 * (self.min[0] + self.max[0]),
            0.5 * (self.min[1] + self.max[1]),
            0.5 * (self.min[2] + self.max[2]),
        ]
    }
}

/// Non-indexed triangle list; every three vertices form one triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>) -> Self {
        Self { vertices }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Interleaved `px py pz nx ny nz` view over the vertices, no copy.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn to_interleaved(&self) -> Vec<f32> {
        self.as_floats().to_vec()
    }

    /// Raw bytes, ready for a vertex buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Returns `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Aabb> {
        let first = self.vertices.first()?;
        let init = Aabb {
            min: first.position,
            max: first.position,
        };
        Some(self.vertices.iter().fold(init, |mut acc, v| {
            for axis in 0..3 {
                acc.min[axis] = acc.min[axis].min(v.position[axis]);
                acc.max[axis] = acc.max[axis].max(v.position[axis]);
            }
            acc
        }))
    }
}
