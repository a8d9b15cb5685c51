//! Structure implementations for herbview.
//!
//! This crate provides the geometry behind the two viewers:
//! - The displaced image plane of the depth visualizer
//! - Pre-authored plant models imported from glTF

// Graphics code intentionally uses casts for indices and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

pub mod depth_mesh;
pub mod plant_model;

pub use depth_mesh::{displacement, DepthMesh, DISPLACEMENT_SCALE};
pub use plant_model::{ModelFit, PlantModel};
