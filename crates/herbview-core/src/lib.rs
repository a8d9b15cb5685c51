//! Core abstractions for herbview.
//!
//! This crate provides the fundamental types used throughout herbview:
//! - [`DisplacementParameters`] and their declared ranges
//! - [`Options`] and the explicit session [`Context`]
//! - [`LoadTracker`] generations for superseding in-flight loads
//! - Validated [`PlantRecord`]s, the [`PlantCatalog`] and narration

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod catalog;
pub mod error;
pub mod generation;
pub mod narration;
pub mod options;
pub mod parameters;
pub mod plant;
pub mod state;
pub mod view_mode;

pub use catalog::{CategoryFilter, PlantCatalog};
pub use error::{AssetLoadError, HerbviewError, LoadError, Result};
pub use generation::{Generation, LoadTracker};
pub use narration::{compose_narration, NarrationPort, Narrator, SilentNarration};
pub use options::{OrbitOptions, Options};
pub use parameters::{
    DisplacementParameters, ParameterChanges, ParameterRange, DEPTH_RANGE, HEIGHT_RANGE,
    LIGHTING_RANGE,
};
pub use plant::{AyushApplication, Category, PlantData, PlantRecord};
pub use state::Context;
pub use view_mode::ViewState;

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3};
