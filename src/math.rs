//! Minimal 3D vector math for the scene and the animations.

/// A point or direction in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len > 1e-6 {
            self.scale(1.0 / len)
        } else {
            self
        }
    }

    /// Linear interpolation between `a` and `b`; `t` is clamped to [0, 1].
    pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        Vec3::new(
            lerp(a.x, b.x, t),
            lerp(a.y, b.y, t),
            lerp(a.z, b.z, t),
        )
    }
}

/// Scalar linear interpolation.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Rotate `v` by intrinsic Euler angles (radians), X then Y then Z.
pub fn rotate_euler(v: Vec3, rot: Vec3) -> Vec3 {
    // X axis
    let (sx, cx) = rot.x.sin_cos();
    let v = Vec3::new(v.x, v.y * cx - v.z * sx, v.y * sx + v.z * cx);
    // Y axis
    let (sy, cy) = rot.y.sin_cos();
    let v = Vec3::new(v.x * cy + v.z * sy, v.y, -v.x * sy + v.z * cy);
    // Z axis
    let (sz, cz) = rot.z.sin_cos();
    Vec3::new(v.x * cz - v.y * sz, v.x * sz + v.y * cz, v.z)
}
