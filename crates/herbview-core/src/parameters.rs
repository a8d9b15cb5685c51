//! Displacement parameters driving the depth visualizer.
//!
//! Three independent scalar controls, each with a declared range and a
//! default. Values are clamped on the way in so that nothing out of range
//! ever reaches the mesh or the light rig.

use serde::{Deserialize, Serialize};

/// Vertical translation applied per unit of `height` away from its midpoint.
pub const HEIGHT_OFFSET_SCALE: f32 = 0.02;

/// A closed range with a default value for one scalar control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    /// Smallest accepted value.
    pub min: f32,
    /// Largest accepted value.
    pub max: f32,
    /// Value used on reset and in place of non-finite input.
    pub default: f32,
}

impl ParameterRange {
    /// Clamps `value` into the range. NaN maps to the default.
    #[must_use]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Returns whether `value` lies inside the range.
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Range of the `height` control.
pub const HEIGHT_RANGE: ParameterRange = ParameterRange {
    min: 0.0,
    max: 100.0,
    default: 50.0,
};

/// Range of the `depth` control.
pub const DEPTH_RANGE: ParameterRange = ParameterRange {
    min: 0.0,
    max: 100.0,
    default: 50.0,
};

/// Range of the `lighting` control.
pub const LIGHTING_RANGE: ParameterRange = ParameterRange {
    min: 20.0,
    max: 150.0,
    default: 100.0,
};

/// The three user-facing controls of the depth visualizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplacementParameters {
    /// Vertical offset of the mesh group, in `[0, 100]`.
    pub height: f32,
    /// Amplitude of the procedural relief, in `[0, 100]`.
    pub depth: f32,
    /// Common multiplier on every light, in `[20, 150]`.
    pub lighting: f32,
}

impl Default for DisplacementParameters {
    fn default() -> Self {
        Self {
            height: HEIGHT_RANGE.default,
            depth: DEPTH_RANGE.default,
            lighting: LIGHTING_RANGE.default,
        }
    }
}

impl DisplacementParameters {
    /// Creates parameters from raw values, clamping each into its range.
    #[must_use]
    pub fn new(height: f32, depth: f32, lighting: f32) -> Self {
        Self {
            height,
            depth,
            lighting,
        }
        .clamped()
    }

    /// Returns a copy with every field clamped into its declared range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            height: HEIGHT_RANGE.clamp(self.height),
            depth: DEPTH_RANGE.clamp(self.depth),
            lighting: LIGHTING_RANGE.clamp(self.lighting),
        }
    }

    /// Returns whether every field already lies inside its range.
    #[must_use]
    pub fn is_in_range(&self) -> bool {
        HEIGHT_RANGE.contains(self.height)
            && DEPTH_RANGE.contains(self.depth)
            && LIGHTING_RANGE.contains(self.lighting)
    }

    /// Rigid vertical translation of the mesh group.
    #[must_use]
    pub fn height_offset(&self) -> f32 {
        (self.height - HEIGHT_RANGE.default) * HEIGHT_OFFSET_SCALE
    }

    /// Relief amplitude as a fraction in `[0, 1]`.
    #[must_use]
    pub fn depth_fraction(&self) -> f32 {
        self.depth / 100.0
    }

    /// Multiplier applied to every light's base intensity.
    #[must_use]
    pub fn light_multiplier(&self) -> f32 {
        self.lighting / 100.0
    }

    /// Reports which fields differ between `self` and `next`.
    #[must_use]
    pub fn changes_to(&self, next: &Self) -> ParameterChanges {
        ParameterChanges {
            height: self.height.to_bits() != next.height.to_bits(),
            depth: self.depth.to_bits() != next.depth.to_bits(),
            lighting: self.lighting.to_bits() != next.lighting.to_bits(),
        }
    }
}

/// Which fields changed in a parameter update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ParameterChanges {
    pub height: bool,
    pub depth: bool,
    pub lighting: bool,
}

impl ParameterChanges {
    /// Every field flagged as changed. Used when a scene is first built.
    pub const ALL: Self = Self {
        height: true,
        depth: true,
        lighting: true,
    };

    /// Returns whether anything changed.
    #[must_use]
    pub fn any(&self) -> bool {
        self.height || self.depth || self.lighting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults() {
        let p = DisplacementParameters::default();
        assert_eq!(p.height, 50.0);
        assert_eq!(p.depth, 50.0);
        assert_eq!(p.lighting, 100.0);
        assert!(p.is_in_range());
    }

    #[test]
    fn test_clamping_out_of_range() {
        let p = DisplacementParameters::new(500.0, -10.0, 9999.0);
        assert_eq!(p.height, 100.0);
        assert_eq!(p.depth, 0.0);
        assert_eq!(p.lighting, 150.0);
    }

    #[test]
    fn test_lighting_lower_bound() {
        let p = DisplacementParameters::new(50.0, 50.0, 0.0);
        assert_eq!(p.lighting, 20.0);
    }

    #[test]
    fn test_nan_maps_to_default() {
        let p = DisplacementParameters::new(f32::NAN, f32::NAN, f32::NAN);
        assert_eq!(p, DisplacementParameters::default());
    }

    #[test]
    fn test_height_offset() {
        assert_eq!(DisplacementParameters::default().height_offset(), 0.0);
        let p = DisplacementParameters::new(100.0, 50.0, 100.0);
        assert!((p.height_offset() - 1.0).abs() < 1e-6);
        let p = DisplacementParameters::new(0.0, 50.0, 100.0);
        assert!((p.height_offset() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_changes_to() {
        let a = DisplacementParameters::default();
        let b = DisplacementParameters { depth: 80.0, ..a };
        let changes = a.changes_to(&b);
        assert!(changes.depth);
        assert!(!changes.height);
        assert!(!changes.lighting);
        assert!(!a.changes_to(&a).any());
    }

    #[test]
    fn test_deserialize_partial() {
        let p: DisplacementParameters = serde_json::from_str(r#"{"depth": 10}"#).unwrap();
        assert_eq!(p.depth, 10.0);
        assert_eq!(p.height, 50.0);
        assert_eq!(p.lighting, 100.0);
    }

    proptest! {
        #[test]
        fn prop_clamped_is_in_range(h in -1e6f32..1e6, d in -1e6f32..1e6, l in -1e6f32..1e6) {
            let p = DisplacementParameters::new(h, d, l);
            prop_assert!(p.is_in_range());
        }

        #[test]
        fn prop_clamp_is_idempotent(h in -1e3f32..1e3, d in -1e3f32..1e3, l in -1e3f32..1e3) {
            let once = DisplacementParameters::new(h, d, l);
            prop_assert_eq!(once, once.clamped());
        }
    }
}
