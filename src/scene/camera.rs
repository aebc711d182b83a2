//! Perspective camera and CPU projection.

use crate::math::Vec3;

/// A point projected into normalized device coordinates.
///
/// `ndc_x`/`ndc_y` are in [-1, 1] for on-screen points; `depth` is the
/// distance along the view axis, used for size attenuation.
#[derive(Debug, Clone, Copy)]
pub struct Projected {
    pub ndc_x: f32,
    pub ndc_y: f32,
    pub depth: f32,
}

/// Perspective camera on the +Z axis looking toward the origin.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 20.0),
            fov_y_deg: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Project a world-space point. Returns `None` for points behind the
    /// near plane or beyond the far plane.
    pub fn project(&self, p: Vec3, aspect: f32) -> Option<Projected> {
        let depth = self.position.z - p.z;
        if depth < self.near || depth > self.far {
            return None;
        }
        let tan_half = (self.fov_y_deg.to_radians() * 0.5).tan();
        let ndc_y = (p.y - self.position.y) / (depth * tan_half);
        let ndc_x = (p.x - self.position.x) / (depth * tan_half * aspect);
        Some(Projected { ndc_x, ndc_y, depth })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_to_center() {
        let cam = Camera::default();
        let p = cam.project(Vec3::ZERO, 16.0 / 9.0).unwrap();
        assert!(p.ndc_x.abs() < 1e-6);
        assert!(p.ndc_y.abs() < 1e-6);
        assert!((p.depth - 20.0).abs() < 1e-6);
    }

    #[test]
    fn point_behind_camera_is_culled() {
        let cam = Camera::default();
        assert!(cam.project(Vec3::new(0.0, 0.0, 25.0), 1.0).is_none());
    }

    #[test]
    fn closer_points_project_larger() {
        let cam = Camera::default();
        let far = cam.project(Vec3::new(1.0, 0.0, 0.0), 1.0).unwrap();
        let near = cam.project(Vec3::new(1.0, 0.0, 10.0), 1.0).unwrap();
        assert!(near.ndc_x > far.ndc_x);
    }
}
