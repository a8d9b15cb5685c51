//! Light rig shared by the depth visualizer and the plant-model viewer.
//!
//! Every light has a fixed base intensity. A single multiplier scales all of
//! them, so the ratios between lights never change.

use glam::Vec3;

/// Kind and placement of a light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Uniform light from every direction.
    Ambient,
    /// Parallel light shining from `position` toward the origin.
    Directional { position: Vec3 },
    /// Light radiating from `position`.
    Point { position: Vec3 },
}

/// One light of the rig.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Display name.
    pub name: &'static str,
    /// Kind and placement.
    pub kind: LightKind,
    /// Intensity at a multiplier of 1.
    pub base_intensity: f32,
    /// Current intensity.
    pub intensity: f32,
}

impl Light {
    fn new(name: &'static str, kind: LightKind, base_intensity: f32) -> Self {
        Self {
            name,
            kind,
            base_intensity,
            intensity: base_intensity,
        }
    }

    /// Position in `xyz` and intensity in `w`. Ambient lights sit at the origin.
    fn packed(&self) -> [f32; 4] {
        let position = match self.kind {
            LightKind::Ambient => Vec3::ZERO,
            LightKind::Directional { position } | LightKind::Point { position } => position,
        };
        position.extend(self.intensity).to_array()
    }
}

/// Which viewer a rig is tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RigVariant {
    /// Dimmer rig for the image-to-3D visualizer.
    #[default]
    Visualizer,
    /// Brighter rig for pre-authored plant models.
    PlantViewer,
}

/// The four-light rig: ambient, key, fill and a point light overhead.
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    variant: RigVariant,
    lights: [Light; 4],
    multiplier: f32,
}

impl LightRig {
    /// Creates the rig for `variant` at a multiplier of 1.
    #[must_use]
    pub fn new(variant: RigVariant) -> Self {
        let (ambient, key, fill) = match variant {
            RigVariant::Visualizer => (0.4, 0.8, 0.3),
            RigVariant::PlantViewer => (0.6, 1.2, 0.4),
        };
        Self {
            variant,
            lights: [
                Light::new("ambient", LightKind::Ambient, ambient),
                Light::new(
                    "key",
                    LightKind::Directional {
                        position: Vec3::new(5.0, 5.0, 5.0),
                    },
                    key,
                ),
                Light::new(
                    "fill",
                    LightKind::Directional {
                        position: Vec3::new(-5.0, -5.0, -5.0),
                    },
                    fill,
                ),
                Light::new(
                    "point",
                    LightKind::Point {
                        position: Vec3::new(0.0, 10.0, 0.0),
                    },
                    0.5,
                ),
            ],
            multiplier: 1.0,
        }
    }

    /// Returns the rig variant.
    #[must_use]
    pub fn variant(&self) -> RigVariant {
        self.variant
    }

    /// Sets every light to `base_intensity * multiplier`.
    ///
    /// Intensities are recomputed from the base values, never from the
    /// current ones, so repeated calls do not accumulate.
    pub fn set_multiplier(&mut self, multiplier: f32) {
        self.multiplier = multiplier;
        for light in &mut self.lights {
            light.intensity = light.base_intensity * multiplier;
        }
    }

    /// Returns the current multiplier.
    #[must_use]
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Returns the lights.
    #[must_use]
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Packs the rig for upload to a uniform buffer.
    ///
    /// Slots follow the rig order: ambient, key, fill, point.
    #[must_use]
    pub fn uniforms(&self) -> LightUniforms {
        let [ambient, key, fill, point] = &self.lights;
        LightUniforms {
            key: key.packed(),
            fill: fill.packed(),
            point: point.packed(),
            ambient: ambient.intensity,
            _padding: [0.0; 3],
        }
    }
}

/// GPU layout of the light rig: `xyz` is the position, `w` the intensity.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniforms {
    pub key: [f32; 4],
    pub fill: [f32; 4],
    pub point: [f32; 4],
    pub ambient: f32,
    pub _padding: [f32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intensities(rig: &LightRig) -> Vec<f32> {
        rig.lights().iter().map(|l| l.intensity).collect()
    }

    #[test]
    fn test_visualizer_base_intensities() {
        let rig = LightRig::new(RigVariant::Visualizer);
        assert_eq!(intensities(&rig), vec![0.4, 0.8, 0.3, 0.5]);
    }

    #[test]
    fn test_plant_viewer_base_intensities() {
        let rig = LightRig::new(RigVariant::PlantViewer);
        assert_eq!(intensities(&rig), vec![0.6, 1.2, 0.4, 0.5]);
    }

    #[test]
    fn test_multiplier_preserves_ratios() {
        let mut rig = LightRig::new(RigVariant::Visualizer);
        rig.set_multiplier(1.5);
        for light in rig.lights() {
            assert!((light.intensity / light.base_intensity - 1.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_multiplier_does_not_accumulate() {
        let mut rig = LightRig::new(RigVariant::Visualizer);
        rig.set_multiplier(0.5);
        let once = intensities(&rig);
        rig.set_multiplier(0.5);
        assert_eq!(intensities(&rig), once);
    }

    #[test]
    fn test_uniforms_layout() {
        let mut rig = LightRig::new(RigVariant::Visualizer);
        rig.set_multiplier(2.0);
        let u = rig.uniforms();
        assert_eq!(u.key, [5.0, 5.0, 5.0, 1.6]);
        assert_eq!(u.fill, [-5.0, -5.0, -5.0, 0.6]);
        assert_eq!(u.point, [0.0, 10.0, 0.0, 1.0]);
        assert_eq!(u.ambient, 0.8);
        assert_eq!(std::mem::size_of::<LightUniforms>(), 64);
    }

    #[test]
    fn test_uniform_slots_ignore_names() {
        let mut rig = LightRig::new(RigVariant::PlantViewer);
        let packed = rig.uniforms();
        rig.lights[1].name = "rim";
        rig.lights[2].name = "key";
        assert_eq!(rig.uniforms(), packed);
        assert_eq!(packed.key, [5.0, 5.0, 5.0, 1.2]);
        assert_eq!(packed.fill, [-5.0, -5.0, -5.0, 0.4]);
    }
}
