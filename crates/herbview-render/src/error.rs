//! Rendering error types.

use thiserror::Error;

/// Errors that can occur while creating or updating GPU resources.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Buffer creation or update failed.
    #[error("buffer creation failed: {0}")]
    BufferCreationFailed(String),

    /// Texture creation failed.
    #[error("texture creation failed: {0}")]
    TextureCreationFailed(String),

    /// A resource handle does not refer to a live resource.
    #[error("unknown {kind} handle {id}")]
    UnknownResource { kind: &'static str, id: u64 },
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
