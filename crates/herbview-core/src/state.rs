//! Session context.
//!
//! A [`Context`] is created once when the host starts, passed by reference to
//! every viewer it builds, and shut down when the host tears down. There is no
//! process-wide instance.

use crate::catalog::PlantCatalog;
use crate::error::Result;
use crate::options::Options;

/// Configuration and static data shared by the viewers of one host.
#[derive(Debug, Clone)]
pub struct Context {
    /// Whether the context is live.
    initialized: bool,

    /// Validated options.
    pub options: Options,

    /// The plant catalog, including the 3D asset lookup table.
    pub catalog: PlantCatalog,
}

impl Context {
    /// Creates a context with default options and the built-in catalog.
    pub fn new() -> Result<Self> {
        Self::with_options(Options::default(), PlantCatalog::builtin()?)
    }

    /// Creates a context from explicit options and catalog.
    pub fn with_options(options: Options, catalog: PlantCatalog) -> Result<Self> {
        options.validate()?;
        log::info!(
            "herbview context initialized ({} plants, {}x{} grid)",
            catalog.len(),
            options.grid_segments,
            options.grid_segments
        );
        Ok(Self {
            initialized: true,
            options,
            catalog,
        })
    }

    /// Returns whether the context is live.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Tears the context down. Viewers built from it keep their own copies of
    /// the options and are unaffected.
    pub fn shutdown(&mut self) {
        if self.initialized {
            self.initialized = false;
            log::info!("herbview context shut down");
        }
    }
}
