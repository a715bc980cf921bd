//! Core types: math re-exports, Transform, OrbitCamera, Scene, PointLight.

pub use glam::{EulerRot, Mat4, Quat, Vec3, vec3};

pub mod camera;
pub mod light;
pub mod scene;
pub mod transform;
