//! Error types for herbview.

use thiserror::Error;

/// The main error type for configuration and catalog operations.
#[derive(Error, Debug)]
pub enum HerbviewError {
    /// A plant record failed validation.
    #[error("invalid plant record '{slug}': {reason}")]
    InvalidRecord { slug: String, reason: String },

    /// A plant with the given slug was not found.
    #[error("plant '{0}' not found")]
    UnknownPlant(String),

    /// A plant with the given slug is already in the catalog.
    #[error("plant '{0}' already exists")]
    DuplicatePlant(String),

    /// An option value is out of its accepted range.
    #[error("invalid option '{name}': {reason}")]
    InvalidOption { name: &'static str, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for herbview operations.
pub type Result<T> = std::result::Result<T, HerbviewError>;

/// Errors reported by an image load on a visualizer session.
///
/// None of these leave the session in a partially updated state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The declared MIME type is not in the allow-list.
    #[error("unsupported image format '{0}'")]
    UnsupportedFormat(String),

    /// The bytes could not be decoded into a texture.
    #[error("failed to decode image: {0}")]
    DecodeError(String),

    /// The session has already been disposed.
    #[error("visualizer session has been disposed")]
    Disposed,
}

/// Errors reported while loading a pre-authored plant model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetLoadError {
    /// The plant has no model asset in the lookup table.
    #[error("3D model not available for plant '{0}'")]
    NotAvailable(String),

    /// The asset file could not be imported.
    #[error("failed to import '{path}': {message}")]
    Import { path: String, message: String },

    /// The asset contains no mesh geometry.
    #[error("asset '{0}' contains no mesh geometry")]
    EmptyAsset(String),

    /// The viewer has already been disposed.
    #[error("model viewer has been disposed")]
    Disposed,
}
