//! Configuration options for herbview.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{HerbviewError, Result};

/// Global configuration options for a herbview session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Number of grid segments along each side of the displaced plane.
    pub grid_segments: u32,

    /// Side length of the displaced plane in world units.
    pub plane_size: f32,

    /// MIME types accepted by `load_image`.
    pub allowed_mime_types: Vec<String>,

    /// Orbit rig used by the depth visualizer.
    pub visualizer_orbit: OrbitOptions,

    /// Orbit rig used by the plant-model viewer.
    pub model_orbit: OrbitOptions,

    /// Largest dimension a plant model may have before it is scaled down.
    pub model_max_dimension: f32,

    /// Narration text is truncated to this many characters before speaking.
    pub narration_max_chars: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            grid_segments: 32,
            plane_size: 2.0,
            allowed_mime_types: vec![
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
                "image/png".to_string(),
            ],
            visualizer_orbit: OrbitOptions::default(),
            model_orbit: OrbitOptions {
                min_distance: 1.5,
                ..OrbitOptions::default()
            },
            model_max_dimension: 3.0,
            narration_max_chars: 900,
        }
    }
}

impl Options {
    /// Parses options from a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reads options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let options = Self::from_json_str(&text)?;
        log::info!("loaded options from {}", path.as_ref().display());
        Ok(options)
    }

    /// Serializes the options to pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every option against its accepted range.
    pub fn validate(&self) -> Result<()> {
        if !(1..=512).contains(&self.grid_segments) {
            return Err(HerbviewError::InvalidOption {
                name: "grid_segments",
                reason: format!("{} is outside 1..=512", self.grid_segments),
            });
        }
        if !(self.plane_size.is_finite() && self.plane_size > 0.0) {
            return Err(HerbviewError::InvalidOption {
                name: "plane_size",
                reason: format!("{} must be positive", self.plane_size),
            });
        }
        if self.allowed_mime_types.is_empty() {
            return Err(HerbviewError::InvalidOption {
                name: "allowed_mime_types",
                reason: "at least one MIME type is required".to_string(),
            });
        }
        if !(self.model_max_dimension.is_finite() && self.model_max_dimension > 0.0) {
            return Err(HerbviewError::InvalidOption {
                name: "model_max_dimension",
                reason: format!("{} must be positive", self.model_max_dimension),
            });
        }
        self.visualizer_orbit.validate("visualizer_orbit")?;
        self.model_orbit.validate("model_orbit")?;
        Ok(())
    }

    /// Returns whether `mime` is in the allow-list. Comparison ignores case
    /// and any `;`-separated parameters.
    #[must_use]
    pub fn accepts_mime(&self, mime: &str) -> bool {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        self.allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(essence))
    }
}

/// Settings of an orbit-style camera rig.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitOptions {
    /// Initial camera position; the rig orbits the origin.
    pub camera_position: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Closest zoom distance.
    pub min_distance: f32,
    /// Farthest zoom distance.
    pub max_distance: f32,
    /// Whether rotation and zoom velocities decay instead of stopping at once.
    pub enable_damping: bool,
    /// Fraction of velocity consumed per update when damping is enabled.
    pub damping_factor: f32,
    /// Rotation speed multiplier.
    pub rotate_speed: f32,
    /// Zoom speed multiplier.
    pub zoom_speed: f32,
}

impl Default for OrbitOptions {
    fn default() -> Self {
        Self {
            camera_position: Vec3::new(0.0, 0.0, 5.0),
            fov_degrees: 50.0,
            min_distance: 2.0,
            max_distance: 15.0,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 0.5,
            zoom_speed: 0.8,
        }
    }
}

impl OrbitOptions {
    fn validate(&self, name: &'static str) -> Result<()> {
        let invalid = |reason: String| Err(HerbviewError::InvalidOption { name, reason });

        if !(self.min_distance > 0.0 && self.min_distance < self.max_distance) {
            return invalid(format!(
                "distance range [{}, {}] is empty",
                self.min_distance, self.max_distance
            ));
        }
        if !(self.damping_factor > 0.0 && self.damping_factor <= 1.0) {
            return invalid(format!(
                "damping factor {} is outside (0, 1]",
                self.damping_factor
            ));
        }
        if !(self.fov_degrees > 1.0 && self.fov_degrees < 179.0) {
            return invalid(format!("fov {} is outside (1, 179)", self.fov_degrees));
        }
        if self.camera_position.length_squared() <= f32::EPSILON {
            return invalid("camera position coincides with the orbit target".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        let options = Options::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.grid_segments, 32);
        assert_eq!(options.visualizer_orbit.min_distance, 2.0);
        assert_eq!(options.model_orbit.min_distance, 1.5);
        assert_eq!(options.model_orbit.max_distance, 15.0);
    }

    #[test]
    fn test_accepts_mime() {
        let options = Options::default();
        assert!(options.accepts_mime("image/png"));
        assert!(options.accepts_mime("IMAGE/JPEG"));
        assert!(options.accepts_mime("image/jpeg; charset=binary"));
        assert!(!options.accepts_mime("image/gif"));
        assert!(!options.accepts_mime(""));
    }

    #[test]
    fn test_json_partial_override() {
        let options = Options::from_json_str(r#"{"grid_segments": 8}"#).unwrap();
        assert_eq!(options.grid_segments, 8);
        assert_eq!(options.plane_size, 2.0);
    }

    #[test]
    fn test_json_rejects_invalid() {
        let err = Options::from_json_str(r#"{"grid_segments": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            HerbviewError::InvalidOption {
                name: "grid_segments",
                ..
            }
        ));

        let err = Options::from_json_str(
            r#"{"visualizer_orbit": {"min_distance": 20.0, "max_distance": 15.0}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, HerbviewError::InvalidOption { .. }));
    }

    #[test]
    fn test_json_roundtrip() {
        let options = Options::default();
        let json = options.to_json_string().unwrap();
        assert_eq!(Options::from_json_str(&json).unwrap(), options);
    }
}
