use crate::{Mat4, Vec3};

/// Default radians per pixel of mouse drag.
pub const ROTATE_SENSITIVITY: f32 = 0.005;
/// Default distance change per scroll step.
pub const ZOOM_SPEED: f32 = 0.5;
/// Closest the camera may get to its target.
pub const MIN_DISTANCE: f32 = 0.1;

/// Orbit camera circling a target point (right-handed, +Y up).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Radians around +Y; zero looks down -Z from +Z.
    pub yaw: f32,
    /// Radians above the XZ plane, kept within ±89°.
    pub pitch: f32,
    pub fov_y_rad: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl OrbitCamera {
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            distance: distance.max(MIN_DISTANCE),
            ..Self::default()
        }
    }

    /// Eye position on the sphere around `target`.
    #[inline]
    pub fn position(&self) -> Vec3 {
        let (sp, cp) = self.pitch.sin_cos();
        let (sy, cy) = self.yaw.sin_cos();
        self.target + self.distance * Vec3::new(cp * sy, sp, cp * cy)
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Depth maps to [0, 1], matching wgpu clip space.
    #[inline]
    pub fn proj(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_rad, aspect.max(1e-6), self.z_near, self.z_far)
    }

    #[inline]
    pub fn proj_view(&self, aspect: f32) -> Mat4 {
        self.proj(aspect) * self.view()
    }

    /// Orbit by a mouse delta in pixels.
    pub fn rotate(&mut self, delta_x: f32, delta_y: f32, sensitivity: f32) {
        self.yaw -= delta_x * sensitivity;
        self.pitch -= delta_y * sensitivity;

        let limit = 89f32.to_radians();
        self.pitch = self.pitch.clamp(-limit, limit);
    }

    pub fn zoom(&mut self, scroll_delta: f32, speed: f32) {
        self.distance = (self.distance - scroll_delta * speed).max(MIN_DISTANCE);
    }

    /// Re-target so a sphere of `radius` around `center` fits the view.
    pub fn frame(&mut self, center: Vec3, radius: f32) {
        self.target = center;
        let half_fov = 0.5 * self.fov_y_rad;
        self.distance = (radius / half_fov.sin()).max(MIN_DISTANCE);
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 5.0,
            yaw: 0.0,
            pitch: 0.0,
            fov_y_rad: 60f32.to_radians(),
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}
