//! Initialization and lifecycle management for herbview.

use herbview_core::{Context, Options, PlantCatalog};

use crate::Result;

/// Installs the `env_logger` backend for the `log` facade.
///
/// Safe to call more than once; later calls are ignored. Filtering follows
/// `RUST_LOG` as usual.
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Creates a session context with default options and the built-in catalog.
///
/// The returned [`Context`] is passed to every viewer the host builds.
///
/// # Example
///
/// ```no_run
/// use herbview::*;
///
/// fn main() -> Result<()> {
///     let ctx = init()?;
///     assert!(ctx.catalog.get("neem").is_some());
///     Ok(())
/// }
/// ```
pub fn init() -> Result<Context> {
    init_logging();
    Context::new()
}

/// Creates a session context from an options file and the built-in catalog.
pub fn init_with_options_file(path: impl AsRef<std::path::Path>) -> Result<Context> {
    init_logging();
    let options = Options::from_path(path)?;
    Context::with_options(options, PlantCatalog::builtin()?)
}

/// Shuts a context down.
pub fn shutdown(ctx: &mut Context) {
    ctx.shutdown();
}
