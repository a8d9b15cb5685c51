//! Camera and view management.

use glam::{Mat4, Vec3};

/// A snapshot of everything that places the camera in the scene.
///
/// Restoring a snapshot reproduces the camera exactly, bit for bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Field of view in radians.
    pub fov: f32,
}

/// A perspective camera for viewing the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Camera {
    /// Creates a camera at `position` looking at the origin.
    #[must_use]
    pub fn new(position: Vec3, fov_degrees: f32, aspect_ratio: f32) -> Self {
        let mut camera = Self {
            position,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_4,
            aspect_ratio,
            near: 0.1,
            far: 1000.0,
        };
        camera.set_fov_degrees(fov_degrees);
        camera
    }

    /// Sets the aspect ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Returns the projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Returns the camera's forward direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Returns the camera's right direction.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize()
    }

    /// Distance from the camera to its target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        (self.position - self.target).length()
    }

    /// Sets the field of view in radians.
    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov.clamp(0.1, std::f32::consts::PI - 0.1);
    }

    /// Returns FOV in degrees.
    #[must_use]
    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }

    /// Sets FOV from degrees.
    pub fn set_fov_degrees(&mut self, degrees: f32) {
        self.set_fov(degrees.to_radians());
    }

    /// Captures the current placement.
    #[must_use]
    pub fn transform(&self) -> CameraTransform {
        CameraTransform {
            position: self.position,
            target: self.target,
            up: self.up,
            fov: self.fov,
        }
    }

    /// Restores a placement captured with [`Camera::transform`].
    pub fn set_transform(&mut self, transform: CameraTransform) {
        self.position = transform.position;
        self.target = transform.target;
        self.up = transform.up;
        self.fov = transform.fov;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0), 50.0, 16.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_defaults() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.target, Vec3::ZERO);
        assert!((camera.fov_degrees() - 50.0).abs() < 1e-4);
        assert!((camera.distance() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_projection_is_perspective() {
        let camera = Camera::default();
        let proj = camera.projection_matrix();
        // Perspective matrix has non-zero w division
        assert!(proj.w_axis.z != 0.0);
    }

    #[test]
    fn test_set_fov_clamping() {
        let mut camera = Camera::default();
        camera.set_fov(0.0);
        assert!(camera.fov >= 0.1);

        camera.set_fov(std::f32::consts::PI);
        assert!(camera.fov < std::f32::consts::PI);
    }

    #[test]
    fn test_transform_roundtrip() {
        let mut camera = Camera::default();
        let saved = camera.transform();
        camera.position = Vec3::new(1.0, 2.0, 3.0);
        camera.set_fov_degrees(70.0);
        camera.set_transform(saved);
        assert_eq!(camera.transform(), saved);
    }
}
