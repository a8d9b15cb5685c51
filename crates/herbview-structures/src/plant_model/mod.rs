//! Pre-authored plant models.
//!
//! A model is imported from a glTF/GLB asset, flattened into a single
//! triangle list in scene space, and fitted to the origin by a [`ModelFit`].

mod import;

use glam::{Mat4, Quat, Vec2, Vec3};
use herbview_render::MeshVertex;

/// Centers a bounding box at the origin and shrinks it to a maximum size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelFit {
    /// Center of the original bounding box.
    pub center: Vec3,
    /// Uniform scale applied around the center.
    pub scale: f32,
    /// Largest side of the original bounding box.
    pub max_dimension: f32,
}

impl ModelFit {
    /// Computes the fit for the box `[min, max]`.
    ///
    /// The model is scaled by `max_allowed / max_dimension` only when its
    /// largest side exceeds `max_allowed`; smaller models keep their size.
    #[must_use]
    pub fn from_bounds(min: Vec3, max: Vec3, max_allowed: f32) -> Self {
        let size = max - min;
        let max_dimension = size.max_element();
        let scale = if max_dimension > max_allowed && max_dimension > 0.0 {
            max_allowed / max_dimension
        } else {
            1.0
        };
        Self {
            center: (min + max) * 0.5,
            scale,
            max_dimension,
        }
    }

    /// Model-to-world transform: scale about the center, then move the
    /// center to the origin.
    #[must_use]
    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::IDENTITY,
            -self.center * self.scale,
        )
    }

    /// Applies the fit to a point.
    #[must_use]
    pub fn apply(&self, point: Vec3) -> Vec3 {
        (point - self.center) * self.scale
    }
}

/// A plant model flattened to scene space.
#[derive(Debug, Clone)]
pub struct PlantModel {
    name: String,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    indices: Vec<u32>,
    bounds: (Vec3, Vec3),
    fit: ModelFit,
}

impl PlantModel {
    /// Returns the asset name (its path or an identifier).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the vertex positions in scene space, before fitting.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Returns the vertex normals in scene space.
    #[must_use]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Returns the first UV set, or zeros where the asset has none.
    #[must_use]
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    /// Returns the triangle indices.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds in scene space, before fitting.
    #[must_use]
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.bounds
    }

    /// Returns the fit that centers and sizes the model.
    #[must_use]
    pub fn fit(&self) -> ModelFit {
        self.fit
    }

    /// Interleaves positions, normals and UVs for upload.
    #[must_use]
    pub fn vertex_data(&self) -> Vec<MeshVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((p, n), uv)| MeshVertex {
                position: p.to_array(),
                normal: n.to_array(),
                uv: uv.to_array(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_model_keeps_size() {
        let fit = ModelFit::from_bounds(Vec3::new(1.0, 1.0, 1.0), Vec3::new(2.0, 3.0, 2.0), 3.0);
        assert_eq!(fit.scale, 1.0);
        assert_eq!(fit.center, Vec3::new(1.5, 2.0, 1.5));
        assert_eq!(fit.apply(fit.center), Vec3::ZERO);
    }

    #[test]
    fn test_large_model_is_scaled_down() {
        let fit = ModelFit::from_bounds(Vec3::ZERO, Vec3::new(6.0, 2.0, 1.0), 3.0);
        assert_eq!(fit.max_dimension, 6.0);
        assert_eq!(fit.scale, 0.5);

        let min = fit.apply(Vec3::ZERO);
        let max = fit.apply(Vec3::new(6.0, 2.0, 1.0));
        assert!(((max - min).max_element() - 3.0).abs() < 1e-6);
        assert!(((min + max) * 0.5).length() < 1e-6);
    }

    #[test]
    fn test_transform_matches_apply() {
        let fit = ModelFit::from_bounds(Vec3::new(-2.0, 0.0, 4.0), Vec3::new(8.0, 1.0, 5.0), 3.0);
        let transform = fit.transform();
        for p in [Vec3::new(-2.0, 0.0, 4.0), Vec3::new(8.0, 1.0, 5.0), Vec3::ONE] {
            assert!((transform.transform_point3(p) - fit.apply(p)).length() < 1e-5);
        }
        assert!(transform.transform_point3(fit.center).length() < 1e-6);
    }

    #[test]
    fn test_degenerate_bounds() {
        let fit = ModelFit::from_bounds(Vec3::ONE, Vec3::ONE, 3.0);
        assert_eq!(fit.scale, 1.0);
        assert_eq!(fit.max_dimension, 0.0);
    }
}
