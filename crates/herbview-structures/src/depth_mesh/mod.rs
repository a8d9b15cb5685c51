//! Displaced image plane.
//!
//! A square grid of `segments × segments` quads centred on the origin in the
//! XY plane. The grid topology never changes after construction; only the z
//! coordinate of each vertex (and therefore the normals) follows the `depth`
//! control through [`displacement`].

mod geometry;

use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use herbview_render::MeshVertex;

/// Maximum relief of the plane at full depth.
pub const DISPLACEMENT_SCALE: f32 = 0.2;

/// Procedural relief at plane coordinates `(x, y)` in `[-1, 1]`.
///
/// `depth_fraction` is the `depth` control divided by 100.
#[must_use]
pub fn displacement(x: f32, y: f32, depth_fraction: f32) -> f32 {
    (x * PI).sin() * (y * PI).cos() * depth_fraction * DISPLACEMENT_SCALE
}

/// The textured, displaced plane of the depth visualizer.
#[derive(Debug, Clone)]
pub struct DepthMesh {
    segments: u32,
    size: f32,
    depth_fraction: f32,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    indices: Vec<u32>,
}

impl DepthMesh {
    /// Builds a flat grid of `segments × segments` quads with side `size`.
    ///
    /// Vertices are laid out row by row starting at the top-left corner, which
    /// carries UV `(0, 0)`.
    #[must_use]
    pub fn new(segments: u32, size: f32) -> Self {
        let segments = segments.max(1);
        let row = segments + 1;
        let half = size * 0.5;
        let step = size / segments as f32;

        let mut positions = Vec::with_capacity((row * row) as usize);
        let mut uvs = Vec::with_capacity((row * row) as usize);
        for iy in 0..row {
            let y = half - iy as f32 * step;
            for ix in 0..row {
                let x = ix as f32 * step - half;
                positions.push(Vec3::new(x, y, 0.0));
                uvs.push(Vec2::new(
                    ix as f32 / segments as f32,
                    iy as f32 / segments as f32,
                ));
            }
        }

        let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
        for iy in 0..segments {
            for ix in 0..segments {
                let a = ix + row * iy;
                let b = ix + row * (iy + 1);
                let c = ix + 1 + row * (iy + 1);
                let d = ix + 1 + row * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        let mut mesh = Self {
            segments,
            size,
            depth_fraction: 0.0,
            normals: vec![Vec3::Z; positions.len()],
            positions,
            uvs,
            indices,
        };
        mesh.compute_vertex_normals();
        mesh
    }

    /// Sets the relief amplitude and recomputes z and normals.
    ///
    /// Every z is derived from the vertex's plane coordinates alone, so the
    /// result depends only on `depth_fraction` and not on earlier calls.
    /// Returns `false` if the amplitude was already current.
    pub fn set_depth(&mut self, depth_fraction: f32) -> bool {
        if depth_fraction.to_bits() == self.depth_fraction.to_bits() {
            return false;
        }
        self.depth_fraction = depth_fraction;

        let half = self.size * 0.5;
        for p in &mut self.positions {
            p.z = displacement(p.x / half, p.y / half, depth_fraction);
        }
        self.compute_vertex_normals();
        log::debug!(
            "recomputed {} vertices at depth {:.2}",
            self.positions.len(),
            depth_fraction
        );
        true
    }

    /// Returns the current relief amplitude.
    #[must_use]
    pub fn depth_fraction(&self) -> f32 {
        self.depth_fraction
    }

    /// Number of grid segments per side.
    #[must_use]
    pub fn segments(&self) -> u32 {
        self.segments
    }

    /// Side length of the plane.
    #[must_use]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Returns the vertex positions.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Returns the vertex normals.
    #[must_use]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Returns the vertex UVs.
    #[must_use]
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    /// Returns the triangle indices.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Index of the vertex at grid column `ix` and row `iy` (row 0 is the top).
    #[must_use]
    pub fn vertex_index(&self, ix: u32, iy: u32) -> usize {
        (ix + (self.segments + 1) * iy) as usize
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

    /// Returns the axis-aligned bounding box in local coordinates.
    #[must_use]
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        self.positions.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), &p| (min.min(p), max.max(p)),
        )
    }
}
