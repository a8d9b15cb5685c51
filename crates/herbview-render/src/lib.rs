//! Rendering backend for herbview.
//!
//! This crate provides:
//! - The orbit camera rig and the shared light rig
//! - Source image decoding
//! - GPU resource ownership behind [`GpuBackend`], with wgpu and headless
//!   implementations

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

pub mod backend;
pub mod buffer;
pub mod camera;
pub mod error;
pub mod image_source;
pub mod lighting;
pub mod orbit;
pub mod wgpu_backend;

pub use backend::{GpuBackend, HeadlessBackend, MeshId, MeshVertex, TextureId};
pub use camera::{Camera, CameraTransform};
pub use error::{RenderError, RenderResult};
pub use image_source::{DecodedImage, SourceImage};
pub use lighting::{Light, LightKind, LightRig, LightUniforms, RigVariant};
pub use orbit::OrbitControls;
pub use wgpu_backend::WgpuBackend;
