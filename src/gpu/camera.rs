//! Fixed perspective camera looking at the particle set.

use glam::{Mat4, Vec3};

/// Camera on the +Z axis looking at the origin. The particle set rotates,
/// the camera doesn't.
pub struct Camera {
    /// Distance from the origin along +Z.
    pub distance: f32,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
}

impl Camera {
    /// 30 units out, 75° field of view.
    pub fn new() -> Self {
        Self {
            distance: 30.0,
            fov_y: 75.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), aspect, 0.1, 1000.0)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera_on_z_axis() {
        let camera = Camera::new();
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 30.0));
        // Origin lands 30 units in front of the camera
        let origin = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert!((origin.z + 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_distance_moves_eye_along_z() {
        let camera = Camera {
            distance: 12.0,
            ..Camera::new()
        };
        let origin = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 0.0, -12.0)).length() < 1e-4);
    }
}
