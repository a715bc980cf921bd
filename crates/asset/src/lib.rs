//! Asset loading/parsers.
//! OBJ geometry loader producing GPU-ready, non-indexed triangle lists.

pub mod mesh;
pub mod obj;

pub use mesh::{Aabb, MeshData, MeshVertex};
