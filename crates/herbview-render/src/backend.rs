//! GPU resource backends.
//!
//! Viewers own their textures and mesh buffers through a [`GpuBackend`] so
//! that resource lifetimes can be checked without a graphics device. The
//! [`HeadlessBackend`] keeps everything in memory; the wgpu backend lives in
//! [`crate::wgpu_backend`].

use std::collections::HashMap;

use crate::error::{RenderError, RenderResult};
use crate::image_source::DecodedImage;
use crate::lighting::LightUniforms;

/// Handle to a texture owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub(crate) u64);

impl TextureId {
    /// Returns the raw handle value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Handle to a mesh (vertex + index buffers) owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) u64);

impl MeshId {
    /// Returns the raw handle value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Interleaved vertex layout shared by every mesh.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Creates, updates and releases GPU resources.
pub trait GpuBackend {
    /// Uploads a decoded image as a new texture.
    fn create_texture(&mut self, image: &DecodedImage) -> RenderResult<TextureId>;

    /// Releases a texture. Unknown handles are ignored.
    fn release_texture(&mut self, id: TextureId);

    /// Uploads a mesh.
    fn create_mesh(&mut self, vertices: &[MeshVertex], indices: &[u32]) -> RenderResult<MeshId>;

    /// Overwrites the vertices of a mesh. The vertex count must not change.
    fn update_mesh_vertices(&mut self, id: MeshId, vertices: &[MeshVertex]) -> RenderResult<()>;

    /// Releases a mesh. Unknown handles are ignored.
    fn release_mesh(&mut self, id: MeshId);

    /// Uploads the light rig.
    fn update_lights(&mut self, uniforms: &LightUniforms);

    /// Number of textures currently alive.
    fn live_textures(&self) -> usize;

    /// Number of meshes currently alive.
    fn live_meshes(&self) -> usize;
}

impl<B: GpuBackend + ?Sized> GpuBackend for Box<B> {
    fn create_texture(&mut self, image: &DecodedImage) -> RenderResult<TextureId> {
        (**self).create_texture(image)
    }
    fn release_texture(&mut self, id: TextureId) {
        (**self).release_texture(id);
    }
    fn create_mesh(&mut self, vertices: &[MeshVertex], indices: &[u32]) -> RenderResult<MeshId> {
        (**self).create_mesh(vertices, indices)
    }
    fn update_mesh_vertices(&mut self, id: MeshId, vertices: &[MeshVertex]) -> RenderResult<()> {
        (**self).update_mesh_vertices(id, vertices)
    }
    fn release_mesh(&mut self, id: MeshId) {
        (**self).release_mesh(id);
    }
    fn update_lights(&mut self, uniforms: &LightUniforms) {
        (**self).update_lights(uniforms);
    }
    fn live_textures(&self) -> usize {
        (**self).live_textures()
    }
    fn live_meshes(&self) -> usize {
        (**self).live_meshes()
    }
}

/// A texture held by the headless backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessTexture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// A mesh held by the headless backend.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

/// Keeps every resource in host memory.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u64,
    textures: HashMap<TextureId, HeadlessTexture>,
    meshes: HashMap<MeshId, HeadlessMesh>,
    lights: Option<LightUniforms>,
    textures_created: usize,
    textures_released: usize,
}

impl HeadlessBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Returns a live texture.
    #[must_use]
    pub fn texture(&self, id: TextureId) -> Option<&HeadlessTexture> {
        self.textures.get(&id)
    }

    /// Returns a live mesh.
    #[must_use]
    pub fn mesh(&self, id: MeshId) -> Option<&HeadlessMesh> {
        self.meshes.get(&id)
    }

    /// Returns the most recently uploaded light rig.
    #[must_use]
    pub fn lights(&self) -> Option<&LightUniforms> {
        self.lights.as_ref()
    }

    /// Total textures ever created.
    #[must_use]
    pub fn textures_created(&self) -> usize {
        self.textures_created
    }

    /// Total textures ever released.
    #[must_use]
    pub fn textures_released(&self) -> usize {
        self.textures_released
    }
}

impl GpuBackend for HeadlessBackend {
    fn create_texture(&mut self, image: &DecodedImage) -> RenderResult<TextureId> {
        if !image.has_consistent_size() {
            return Err(RenderError::TextureCreationFailed(format!(
                "{} bytes do not describe a {}x{} RGBA image",
                image.pixels.len(),
                image.width,
                image.height
            )));
        }
        let id = TextureId(self.allocate());
        self.textures.insert(
            id,
            HeadlessTexture {
                width: image.width,
                height: image.height,
                pixels: image.pixels.clone(),
            },
        );
        self.textures_created += 1;
        Ok(id)
    }

    fn release_texture(&mut self, id: TextureId) {
        if self.textures.remove(&id).is_some() {
            self.textures_released += 1;
        }
    }

    fn create_mesh(&mut self, vertices: &[MeshVertex], indices: &[u32]) -> RenderResult<MeshId> {
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(RenderError::BufferCreationFailed(format!(
                "index {bad} out of bounds for {} vertices",
                vertices.len()
            )));
        }
        let id = MeshId(self.allocate());
        self.meshes.insert(
            id,
            HeadlessMesh {
                vertices: vertices.to_vec(),
                indices: indices.to_vec(),
            },
        );
        Ok(id)
    }

    fn update_mesh_vertices(&mut self, id: MeshId, vertices: &[MeshVertex]) -> RenderResult<()> {
        let mesh = self.meshes.get_mut(&id).ok_or(RenderError::UnknownResource {
            kind: "mesh",
            id: id.0,
        })?;
        if mesh.vertices.len() != vertices.len() {
            return Err(RenderError::BufferCreationFailed(format!(
                "vertex count changed from {} to {}",
                mesh.vertices.len(),
                vertices.len()
            )));
        }
        mesh.vertices.copy_from_slice(vertices);
        Ok(())
    }

    fn release_mesh(&mut self, id: MeshId) {
        self.meshes.remove(&id);
    }

    fn update_lights(&mut self, uniforms: &LightUniforms) {
        self.lights = Some(*uniforms);
    }

    fn live_textures(&self) -> usize {
        self.textures.len()
    }

    fn live_meshes(&self) -> usize {
        self.meshes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u32, height: u32) -> DecodedImage {
        DecodedImage {
            width,
            height,
            pixels: vec![128; (width * height * 4) as usize],
        }
    }

    #[test]
    fn test_texture_lifecycle() {
        let mut backend = HeadlessBackend::new();
        let a = backend.create_texture(&image(2, 2)).unwrap();
        let b = backend.create_texture(&image(4, 1)).unwrap();
        assert_ne!(a, b);
        assert_eq!(backend.live_textures(), 2);

        backend.release_texture(a);
        backend.release_texture(a);
        assert_eq!(backend.live_textures(), 1);
        assert_eq!(backend.textures_released(), 1);
        assert_eq!(backend.texture(b).map(|t| t.width), Some(4));
    }

    #[test]
    fn test_texture_size_mismatch() {
        let mut backend = HeadlessBackend::new();
        let bad = DecodedImage {
            width: 2,
            height: 2,
            pixels: vec![0; 3],
        };
        assert!(backend.create_texture(&bad).is_err());
        assert_eq!(backend.live_textures(), 0);
    }

    #[test]
    fn test_mesh_update_keeps_count() {
        let mut backend = HeadlessBackend::new();
        let vertices = vec![MeshVertex::default(); 3];
        let id = backend.create_mesh(&vertices, &[0, 1, 2]).unwrap();

        let mut moved = vertices.clone();
        moved[0].position = [1.0, 0.0, 0.0];
        backend.update_mesh_vertices(id, &moved).unwrap();
        assert_eq!(backend.mesh(id).unwrap().vertices[0].position, [1.0, 0.0, 0.0]);

        assert!(backend.update_mesh_vertices(id, &moved[..2]).is_err());
        backend.release_mesh(id);
        assert_eq!(backend.live_meshes(), 0);
        assert!(matches!(
            backend.update_mesh_vertices(id, &moved),
            Err(RenderError::UnknownResource { kind: "mesh", .. })
        ));
    }

    #[test]
    fn test_mesh_rejects_bad_index() {
        let mut backend = HeadlessBackend::new();
        let vertices = vec![MeshVertex::default(); 3];
        assert!(backend.create_mesh(&vertices, &[0, 1, 3]).is_err());
    }

    #[test]
    fn test_vertex_layout_size() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
    }
}
