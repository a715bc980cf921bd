use crate::Vec3;

/// Single point light driving the lit shader.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
}

impl PointLight {
    /// Radius of the XZ circle traced by [`PointLight::orbiting`].
    pub const ORBIT_RADIUS: f32 = 0.4;

    pub fn white(position: Vec3) -> Self {
        Self {
            position,
            color: Vec3::ONE,
        }
    }

    /// Same light, circling its rest position at time `t` (seconds).
    pub fn orbiting(&self, t: f32) -> Self {
        let (s, c) = t.sin_cos();
        Self {
            position: self.position + Self::ORBIT_RADIUS * Vec3::new(c, 0.0, s),
            ..*self
        }
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self::white(Vec3::new(1.2, 1.5, 1.0))
    }
}
