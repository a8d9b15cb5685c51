//! Orbit-style camera rig.
//!
//! Rotation and zoom input accumulate into velocities that [`OrbitControls::update`]
//! applies once per frame. With damping enabled only a fraction of the pending
//! velocity is applied per update and the rest decays, so input never makes the
//! camera jump. Panning is not supported: the target stays fixed.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use herbview_core::OrbitOptions;

use crate::camera::{Camera, CameraTransform};

/// Keeps the polar angle away from the poles where the up vector degenerates.
const POLAR_EPSILON: f32 = 1e-6;

/// Velocities below this are treated as settled.
const SETTLE_EPSILON: f32 = 1e-6;

/// Zoom factor per wheel step at unit zoom speed.
const ZOOM_STEP: f32 = 0.95;

/// Interactive orbit rig around a fixed target.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    camera: Camera,
    saved: CameraTransform,
    options: OrbitOptions,
    /// Pending azimuthal rotation (radians).
    theta_velocity: f32,
    /// Pending polar rotation (radians).
    phi_velocity: f32,
    /// Pending zoom as a log-scale factor on the orbit radius.
    zoom_velocity: f32,
}

impl OrbitControls {
    /// Creates a rig from options and saves its initial placement.
    #[must_use]
    pub fn new(options: OrbitOptions, aspect_ratio: f32) -> Self {
        let camera = Camera::new(options.camera_position, options.fov_degrees, aspect_ratio);
        let saved = camera.transform();
        Self {
            camera,
            saved,
            options,
            theta_velocity: 0.0,
            phi_velocity: 0.0,
            zoom_velocity: 0.0,
        }
    }

    /// Returns the camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Returns the rig options.
    #[must_use]
    pub fn options(&self) -> &OrbitOptions {
        &self.options
    }

    /// Sets the viewport aspect ratio. Not part of the saved placement.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.camera.set_aspect_ratio(aspect_ratio);
    }

    /// Queues a rotation. Deltas are fractions of the viewport height, as
    /// produced by a pointer drag.
    pub fn rotate(&mut self, delta_x: f32, delta_y: f32) {
        self.theta_velocity -= TAU * delta_x * self.options.rotate_speed;
        self.phi_velocity -= TAU * delta_y * self.options.rotate_speed;
    }

    /// Queues a zoom. Positive steps move the camera toward the target.
    pub fn zoom(&mut self, steps: f32) {
        self.zoom_velocity += steps * self.options.zoom_speed * ZOOM_STEP.ln();
    }

    /// Panning is disabled on this rig; always returns `false`.
    pub fn pan(&mut self, _delta_x: f32, _delta_y: f32) -> bool {
        false
    }

    /// Returns whether no motion is pending.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.theta_velocity == 0.0 && self.phi_velocity == 0.0 && self.zoom_velocity == 0.0
    }

    /// Advances the rig by one frame. Returns whether the camera moved.
    pub fn update(&mut self) -> bool {
        if self.is_settled() {
            return false;
        }

        let fraction = if self.options.enable_damping {
            self.options.damping_factor
        } else {
            1.0
        };

        let offset = self.camera.position - self.camera.target;
        let radius = offset.length();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        theta += self.theta_velocity * fraction;
        phi = (phi + self.phi_velocity * fraction).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        let radius = (radius * (self.zoom_velocity * fraction).exp())
            .clamp(self.options.min_distance, self.options.max_distance);

        self.camera.position = self.camera.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );

        let decay = 1.0 - fraction;
        self.theta_velocity = settle(self.theta_velocity * decay);
        self.phi_velocity = settle(self.phi_velocity * decay);
        self.zoom_velocity = settle(self.zoom_velocity * decay);
        true
    }

    /// Saves the current placement as the one [`OrbitControls::reset`] returns to.
    pub fn save_state(&mut self) {
        self.saved = self.camera.transform();
    }

    /// Returns the placement `reset` restores.
    #[must_use]
    pub fn saved_state(&self) -> CameraTransform {
        self.saved
    }

    /// Restores the saved placement exactly and drops pending motion.
    pub fn reset(&mut self) {
        self.camera.set_transform(self.saved);
        self.theta_velocity = 0.0;
        self.phi_velocity = 0.0;
        self.zoom_velocity = 0.0;
    }
}

fn settle(value: f32) -> f32 {
    if value.abs() < SETTLE_EPSILON {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn controls() -> OrbitControls {
        OrbitControls::new(OrbitOptions::default(), 1.0)
    }

    fn run_until_settled(controls: &mut OrbitControls) -> usize {
        let mut frames = 0;
        while controls.update() {
            frames += 1;
            assert!(frames < 10_000, "rig never settled");
        }
        frames
    }

    #[test]
    fn test_update_without_input_is_noop() {
        let mut c = controls();
        let before = c.camera().transform();
        assert!(!c.update());
        assert_eq!(c.camera().transform(), before);
    }

    #[test]
    fn test_damped_rotation_is_gradual() {
        let mut c = controls();
        c.rotate(0.25, 0.0);
        let start = c.camera().position;
        c.update();
        let first_step = c.camera().position.distance(start);
        let total = TAU * 0.25 * 0.5;
        // Only the damping fraction of the rotation is applied on the first frame.
        assert!(first_step < 5.0 * total * 0.1);
        assert!(first_step > 0.0);
        run_until_settled(&mut c);
        assert!(c.is_settled());
    }

    #[test]
    fn test_undamped_rotation_applies_at_once() {
        let options = OrbitOptions {
            enable_damping: false,
            ..OrbitOptions::default()
        };
        let mut c = OrbitControls::new(options, 1.0);
        c.rotate(0.25, 0.0);
        assert!(c.update());
        assert!(c.is_settled());
        // A quarter turn at rotate speed 0.5 is an eighth of a revolution.
        let expected_theta = -TAU * 0.25 * 0.5;
        let p = c.camera().position;
        assert!((p.x.atan2(p.z) - expected_theta).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_preserves_radius() {
        let mut c = controls();
        c.rotate(0.3, 0.1);
        run_until_settled(&mut c);
        assert!((c.camera().distance() - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_clamped_to_range() {
        let mut c = controls();
        c.zoom(1_000.0);
        run_until_settled(&mut c);
        assert!((c.camera().distance() - 2.0).abs() < 1e-4);

        c.zoom(-1_000.0);
        run_until_settled(&mut c);
        assert!((c.camera().distance() - 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_polar_angle_clamped() {
        let mut c = controls();
        c.rotate(0.0, 10.0);
        run_until_settled(&mut c);
        let p = c.camera().position;
        assert!(p.is_finite());
        assert!(p.y.abs() <= 5.0);
    }

    #[test]
    fn test_pan_disabled() {
        let mut c = controls();
        assert!(!c.pan(1.0, 1.0));
        assert_eq!(c.camera().target, Vec3::ZERO);
    }

    #[test]
    fn test_reset_restores_exactly() {
        let mut c = controls();
        let initial = c.camera().transform();
        c.rotate(0.4, -0.2);
        c.zoom(3.0);
        for _ in 0..10 {
            c.update();
        }
        assert_ne!(c.camera().transform(), initial);
        c.reset();
        assert_eq!(c.camera().transform(), initial);
        assert!(c.is_settled());
    }

    #[test]
    fn test_save_state() {
        let mut c = controls();
        c.rotate(0.1, 0.0);
        run_until_settled(&mut c);
        c.save_state();
        let saved = c.camera().transform();
        c.zoom(2.0);
        run_until_settled(&mut c);
        c.reset();
        assert_eq!(c.camera().transform(), saved);
    }

    proptest! {
        #[test]
        fn prop_distance_stays_in_range(
            inputs in proptest::collection::vec((-2.0f32..2.0, -2.0f32..2.0, -20.0f32..20.0), 1..8)
        ) {
            let mut c = controls();
            for (dx, dy, steps) in inputs {
                c.rotate(dx, dy);
                c.zoom(steps);
                for _ in 0..30 {
                    c.update();
                }
                let d = c.camera().distance();
                prop_assert!((2.0 - 1e-3..=15.0 + 1e-3).contains(&d));
                prop_assert!(c.camera().position.is_finite());
            }
        }
    }
}
