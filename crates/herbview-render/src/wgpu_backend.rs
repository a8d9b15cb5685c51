//! wgpu implementation of [`GpuBackend`].

use std::collections::HashMap;

use pollster::FutureExt;

use crate::backend::{GpuBackend, MeshId, MeshVertex, TextureId};
use crate::buffer::{create_index_buffer, create_uniform_buffer, create_vertex_buffer, update_buffer};
use crate::error::{RenderError, RenderResult};
use crate::image_source::DecodedImage;
use crate::lighting::LightUniforms;

/// A texture and its default view.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

/// Vertex and index buffers of one mesh.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub index_count: u32,
}

/// Owns textures and buffers on a wgpu device.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    next_id: u64,
    textures: HashMap<TextureId, GpuTexture>,
    meshes: HashMap<MeshId, GpuMesh>,
    light_buffer: Option<wgpu::Buffer>,
}

impl WgpuBackend {
    /// Wraps a device and queue owned by the host.
    #[must_use]
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            next_id: 0,
            textures: HashMap::new(),
            meshes: HashMap::new(),
            light_buffer: None,
        }
    }

    /// Creates a backend on a device without a surface.
    pub async fn new_headless() -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("herbview device (headless)"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
            })
            .await?;

        log::info!("created headless wgpu device");
        Ok(Self::new(device, queue))
    }

    /// Blocking variant of [`WgpuBackend::new_headless`].
    pub fn new_headless_blocking() -> RenderResult<Self> {
        Self::new_headless().block_on()
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Returns the device.
    #[must_use]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns the queue.
    #[must_use]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns a live texture.
    #[must_use]
    pub fn texture(&self, id: TextureId) -> Option<&GpuTexture> {
        self.textures.get(&id)
    }

    /// Returns a live mesh.
    #[must_use]
    pub fn mesh(&self, id: MeshId) -> Option<&GpuMesh> {
        self.meshes.get(&id)
    }

    /// Returns the light uniform buffer, once lights have been uploaded.
    #[must_use]
    pub fn light_buffer(&self) -> Option<&wgpu::Buffer> {
        self.light_buffer.as_ref()
    }
}

impl GpuBackend for WgpuBackend {
    fn create_texture(&mut self, image: &DecodedImage) -> RenderResult<TextureId> {
        if !image.has_consistent_size() {
            return Err(RenderError::TextureCreationFailed(format!(
                "{} bytes do not describe a {}x{} RGBA image",
                image.pixels.len(),
                image.width,
                image.height
            )));
        }
        let max = self.device.limits().max_texture_dimension_2d;
        if image.width > max || image.height > max {
            return Err(RenderError::TextureCreationFailed(format!(
                "{}x{} exceeds the device limit of {max}",
                image.width, image.height
            )));
        }

        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Source Image Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        // Rows are uploaded in authored order; UV (0, 0) samples the top-left pixel.
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.bytes_per_row()),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let id = TextureId(self.allocate());
        self.textures.insert(id, GpuTexture { texture, view });
        log::debug!("uploaded {}x{} texture {}", image.width, image.height, id.0);
        Ok(id)
    }

    fn release_texture(&mut self, id: TextureId) {
        if let Some(gpu) = self.textures.remove(&id) {
            gpu.texture.destroy();
            log::debug!("released texture {}", id.0);
        }
    }

    fn create_mesh(&mut self, vertices: &[MeshVertex], indices: &[u32]) -> RenderResult<MeshId> {
        let vertex_count = u32::try_from(vertices.len())
            .map_err(|_| RenderError::BufferCreationFailed("too many vertices".to_string()))?;
        let index_count = u32::try_from(indices.len())
            .map_err(|_| RenderError::BufferCreationFailed("too many indices".to_string()))?;

        let mesh = GpuMesh {
            vertex_buffer: create_vertex_buffer(&self.device, vertices, Some("Mesh Vertices")),
            index_buffer: create_index_buffer(&self.device, indices, Some("Mesh Indices")),
            vertex_count,
            index_count,
        };
        let id = MeshId(self.allocate());
        self.meshes.insert(id, mesh);
        Ok(id)
    }

    fn update_mesh_vertices(&mut self, id: MeshId, vertices: &[MeshVertex]) -> RenderResult<()> {
        let mesh = self.meshes.get(&id).ok_or(RenderError::UnknownResource {
            kind: "mesh",
            id: id.0,
        })?;
        if mesh.vertex_count as usize != vertices.len() {
            return Err(RenderError::BufferCreationFailed(format!(
                "vertex count changed from {} to {}",
                mesh.vertex_count,
                vertices.len()
            )));
        }
        update_buffer(&self.queue, &mesh.vertex_buffer, vertices);
        Ok(())
    }

    fn release_mesh(&mut self, id: MeshId) {
        if let Some(mesh) = self.meshes.remove(&id) {
            mesh.vertex_buffer.destroy();
            mesh.index_buffer.destroy();
        }
    }

    fn update_lights(&mut self, uniforms: &LightUniforms) {
        match &self.light_buffer {
            Some(buffer) => update_buffer(&self.queue, buffer, std::slice::from_ref(uniforms)),
            None => {
                self.light_buffer = Some(create_uniform_buffer(
                    &self.device,
                    uniforms,
                    Some("Light Uniforms"),
                ));
            }
        }
    }

    fn live_textures(&self) -> usize {
        self.textures.len()
    }

    fn live_meshes(&self) -> usize {
        self.meshes.len()
    }
}

impl Drop for WgpuBackend {
    fn drop(&mut self) {
        for (_, gpu) in self.textures.drain() {
            gpu.texture.destroy();
        }
        for (_, mesh) in self.meshes.drain() {
            mesh.vertex_buffer.destroy();
            mesh.index_buffer.destroy();
        }
        if let Some(buffer) = self.light_buffer.take() {
            buffer.destroy();
        }
    }
}
