//! herbview: interactive 3D views for an Ayurvedic plant catalog.
//!
//! Two viewers are provided:
//!
//! - [`DepthMeshVisualizer`] turns a 2D image into a textured, displaced 3D
//!   plane controlled by `height`, `depth` and `lighting`.
//! - [`PlantModelViewer`] shows a plant's pre-authored glTF model, centered
//!   and fitted at the origin.
//!
//! # Quick Start
//!
//! ```no_run
//! use herbview::*;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let ctx = init()?;
//!     let mut viewer = DepthMeshVisualizer::new(&ctx, HeadlessBackend::new())?;
//!
//!     let image = SourceImage::from_path(std::path::Path::new("leaf.png"))?;
//!     viewer.load_image(image)?;
//!     viewer.set_depth(80.0)?;
//!
//!     let scene = viewer.scene();
//!     println!("group offset: {}", scene.group_translation.y);
//!     Ok(())
//! }
//! ```
//!
//! # Sessions
//!
//! Every viewer is built from an explicit [`Context`] and owns its GPU
//! resources through a [`GpuBackend`]. Image decoding and model import are
//! split into tickets that may run on a worker thread; the newest load always
//! wins.

// Graphics code intentionally uses casts for indices and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod init;
mod model_viewer;
mod visualizer;

pub use init::{init, init_logging, init_with_options_file, shutdown};
pub use model_viewer::{ImportedModel, ModelLoadTicket, ModelScene, ModelState, PlantModelViewer};
pub use visualizer::{
    DecodedImageLoad, DepthMeshVisualizer, DepthScene, ImageLoadTicket, LoadOutcome,
};

// Re-export core types
pub use herbview_core::{
    compose_narration, AssetLoadError, Category, CategoryFilter, Context, DisplacementParameters,
    HerbviewError, LoadError, NarrationPort, Narrator, Options, OrbitOptions, PlantCatalog,
    PlantRecord, Result, SilentNarration, ViewState, DEPTH_RANGE, HEIGHT_RANGE, LIGHTING_RANGE,
};
pub use herbview_core::{Mat4, Quat, Vec2, Vec3};

// Re-export render types
pub use herbview_render::{
    Camera, CameraTransform, DecodedImage, GpuBackend, HeadlessBackend, LightRig, LightUniforms,
    MeshId, MeshVertex, OrbitControls, RenderError, RenderResult, RigVariant, SourceImage,
    TextureId, WgpuBackend,
};

// Re-export structures
pub use herbview_structures::{DepthMesh, ModelFit, PlantModel};
