//! glTF / GLB import.

use std::path::Path;

use glam::{Mat3, Mat4, Vec2, Vec3};
use gltf::mesh::Mode;
use herbview_core::AssetLoadError;

use super::{ModelFit, PlantModel};

impl PlantModel {
    /// Imports a `.gltf` or `.glb` file.
    ///
    /// External buffers are resolved relative to the file.
    pub fn import(path: &Path, max_allowed: f32) -> Result<Self, AssetLoadError> {
        let name = path.display().to_string();
        let (document, buffers, _images) =
            gltf::import(path).map_err(|e| AssetLoadError::Import {
                path: name.clone(),
                message: e.to_string(),
            })?;
        Self::from_document(name, &document, &buffers, max_allowed)
    }

    /// Imports a self-contained asset from memory (GLB, or glTF with
    /// embedded buffers).
    pub fn import_slice(
        name: &str,
        bytes: &[u8],
        max_allowed: f32,
    ) -> Result<Self, AssetLoadError> {
        let (document, buffers, _images) =
            gltf::import_slice(bytes).map_err(|e| AssetLoadError::Import {
                path: name.to_string(),
                message: e.to_string(),
            })?;
        Self::from_document(name.to_string(), &document, &buffers, max_allowed)
    }

    fn from_document(
        name: String,
        document: &gltf::Document,
        buffers: &[gltf::buffer::Data],
        max_allowed: f32,
    ) -> Result<Self, AssetLoadError> {
        let Some(scene) = document.default_scene().or_else(|| document.scenes().next()) else {
            return Err(AssetLoadError::EmptyAsset(name));
        };

        let mut builder = Builder::default();
        for node in scene.nodes() {
            builder
                .visit(&node, Mat4::IDENTITY, buffers)
                .map_err(|message| AssetLoadError::Import {
                    path: name.clone(),
                    message,
                })?;
        }

        if builder.indices.is_empty() {
            return Err(AssetLoadError::EmptyAsset(name));
        }

        let bounds = builder.positions.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), &p| (min.min(p), max.max(p)),
        );
        let fit = ModelFit::from_bounds(bounds.0, bounds.1, max_allowed);
        log::info!(
            "imported '{}': {} vertices, {} triangles, scale {:.3}",
            name,
            builder.positions.len(),
            builder.indices.len() / 3,
            fit.scale
        );

        Ok(Self {
            name,
            positions: builder.positions,
            normals: builder.normals,
            uvs: builder.uvs,
            indices: builder.indices,
            bounds,
            fit,
        })
    }
}

#[derive(Default)]
struct Builder {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    indices: Vec<u32>,
}

impl Builder {
    fn visit(
        &mut self,
        node: &gltf::Node,
        parent: Mat4,
        buffers: &[gltf::buffer::Data],
    ) -> Result<(), String> {
        let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

        if let Some(mesh) = node.mesh() {
            for primitive in mesh.primitives() {
                if primitive.mode() != Mode::Triangles {
                    log::debug!(
                        "skipping {:?} primitive of mesh {}",
                        primitive.mode(),
                        mesh.index()
                    );
                    continue;
                }
                self.append(&primitive, world, buffers)?;
            }
        }

        for child in node.children() {
            self.visit(&child, world, buffers)?;
        }
        Ok(())
    }

    fn append(
        &mut self,
        primitive: &gltf::Primitive,
        world: Mat4,
        buffers: &[gltf::buffer::Data],
    ) -> Result<(), String> {
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

        let Some(positions) = reader.read_positions() else {
            return Ok(());
        };
        let local: Vec<Vec3> = positions.map(Vec3::from).collect();
        let count = local.len();

        let mut indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..count as u32).collect(),
        };
        indices.truncate(indices.len() - indices.len() % 3);
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= count) {
            return Err(format!("index {bad} out of bounds for {count} vertices"));
        }

        let normals = reader
            .read_normals()
            .map(|n| n.map(Vec3::from).collect::<Vec<_>>())
            .filter(|n| n.len() == count)
            .unwrap_or_else(|| triangle_normals(&local, &indices));
        let uvs = reader
            .read_tex_coords(0)
            .map(|t| t.into_f32().map(Vec2::from).collect::<Vec<_>>())
            .filter(|t| t.len() == count)
            .unwrap_or_else(|| vec![Vec2::ZERO; count]);

        let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
        let base = self.positions.len() as u32;

        self.positions
            .extend(local.iter().map(|&p| world.transform_point3(p)));
        self.normals
            .extend(normals.iter().map(|&n| (normal_matrix * n).normalize_or_zero()));
        self.uvs.extend(uvs);
        self.indices.extend(indices.iter().map(|&i| base + i));
        Ok(())
    }
}

/// Area-weighted vertex normals for a primitive that carries none.
fn triangle_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let n = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }
    normals.iter().map(|n| n.normalize_or_zero()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One triangle spanning 4 × 2 units, on a node translated by +1 in x.
    const WIDE_TRIANGLE: &str = r#"{
        "asset": {"version": "2.0"},
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [{"mesh": 0, "translation": [1.0, 0.0, 0.0]}],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
        "buffers": [{
            "byteLength": 36,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAQAAAAAAAAAAAAAAAAAAAAEAAAAAA"
        }],
        "bufferViews": [{"buffer": 0, "byteOffset": 0, "byteLength": 36}],
        "accessors": [{
            "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
            "min": [0.0, 0.0, 0.0], "max": [4.0, 2.0, 0.0]
        }]
    }"#;

    /// A unit triangle with u16 indices on a scaled child node.
    const NESTED_TRIANGLE: &str = r#"{
        "asset": {"version": "2.0"},
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [
            {"children": [1], "translation": [0.0, 0.0, -1.0]},
            {"mesh": 0, "scale": [2.0, 2.0, 2.0]}
        ],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}],
        "buffers": [{
            "byteLength": 44,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA="
        }],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": 36},
            {"buffer": 0, "byteOffset": 36, "byteLength": 6}
        ],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
            },
            {"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}
        ]
    }"#;

    #[test]
    fn test_import_applies_node_transform_and_fit() {
        let model = PlantModel::import_slice("wide", WIDE_TRIANGLE.as_bytes(), 3.0).unwrap();
        assert_eq!(model.triangle_count(), 1);
        assert_eq!(model.bounds(), (Vec3::new(1.0, 0.0, 0.0), Vec3::new(5.0, 2.0, 0.0)));

        let fit = model.fit();
        assert_eq!(fit.center, Vec3::new(3.0, 1.0, 0.0));
        assert!((fit.scale - 0.75).abs() < 1e-6);

        for n in model.normals() {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
        assert!(model.uvs().iter().all(|uv| *uv == Vec2::ZERO));
    }

    #[test]
    fn test_import_walks_node_hierarchy() {
        let model = PlantModel::import_slice("nested", NESTED_TRIANGLE.as_bytes(), 3.0).unwrap();
        assert_eq!(model.indices(), &[0, 1, 2]);
        assert_eq!(model.positions()[1], Vec3::new(2.0, 0.0, -1.0));
        assert_eq!(model.positions()[2], Vec3::new(0.0, 2.0, -1.0));

        let fit = model.fit();
        assert_eq!(fit.scale, 1.0);
        assert_eq!(fit.center, Vec3::new(1.0, 1.0, -1.0));
        assert_eq!(model.vertex_data().len(), 3);
    }

    #[test]
    fn test_asset_without_scene_is_empty() {
        let err = PlantModel::import_slice("empty", br#"{"asset": {"version": "2.0"}}"#, 3.0)
            .unwrap_err();
        assert!(matches!(err, AssetLoadError::EmptyAsset(name) if name == "empty"));
    }

    #[test]
    fn test_garbage_is_import_error() {
        let err = PlantModel::import_slice("junk", b"not a model", 3.0).unwrap_err();
        assert!(matches!(err, AssetLoadError::Import { path, .. } if path == "junk"));
    }

    #[test]
    fn test_missing_file_is_import_error() {
        let err = PlantModel::import(Path::new("/nonexistent/plant.glb"), 3.0).unwrap_err();
        assert!(matches!(err, AssetLoadError::Import { .. }));
    }
}
