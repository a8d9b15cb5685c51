//! Viewer for pre-authored plant models.
//!
//! The viewer looks a plant's asset up in the catalog, imports it, centers it
//! at the origin and scales it down if it is too large. Loads follow the same
//! ticket and generation scheme as the depth visualizer.

use std::path::{Path, PathBuf};

use glam::Mat4;
use herbview_core::{AssetLoadError, Context, Generation, LoadTracker, PlantCatalog};
use herbview_render::{Camera, GpuBackend, LightRig, MeshId, OrbitControls, RigVariant};
use herbview_structures::PlantModel;

use crate::visualizer::LoadOutcome;

const DEFAULT_ASPECT_RATIO: f32 = 16.0 / 9.0;

/// What the viewer is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModelState {
    /// No model to show ("3D model not available").
    #[default]
    Unavailable,
    /// An import is in flight.
    Loading,
    /// A model is installed.
    Ready,
    /// The last import failed.
    Failed(AssetLoadError),
}

impl ModelState {
    /// Message the host shows in place of the model, if any.
    ///
    /// A failed import shows the same placeholder as a plant without a model.
    #[must_use]
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Unavailable | Self::Failed(_) => Some("3D model not available"),
            Self::Loading => Some("Loading 3D model..."),
            Self::Ready => None,
        }
    }
}

/// An asset waiting to be imported.
///
/// Tickets are `Send`; import them on a worker and hand the result back with
/// [`PlantModelViewer::finish_load`].
#[derive(Debug, Clone)]
pub struct ModelLoadTicket {
    generation: Generation,
    slug: String,
    path: PathBuf,
    max_dimension: f32,
}

impl ModelLoadTicket {
    /// The load this ticket belongs to.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The plant being loaded.
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// The asset file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Imports the asset.
    #[must_use]
    pub fn import(self) -> ImportedModel {
        let result = PlantModel::import(&self.path, self.max_dimension);
        ImportedModel {
            generation: self.generation,
            slug: self.slug,
            result,
        }
    }
}

/// The result of importing a [`ModelLoadTicket`].
#[derive(Debug)]
pub struct ImportedModel {
    generation: Generation,
    slug: String,
    result: Result<PlantModel, AssetLoadError>,
}

impl ImportedModel {
    /// The load this result belongs to.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

/// Everything a renderer needs to draw the plant model.
#[derive(Debug, Clone, Copy)]
pub struct ModelScene<'a> {
    /// The installed model, if any.
    pub model: Option<&'a PlantModel>,
    /// Backend handle of the model mesh.
    pub mesh_id: Option<MeshId>,
    /// Fit transform that centers and sizes the model.
    pub transform: Mat4,
    /// The light rig.
    pub lights: &'a LightRig,
    /// The camera.
    pub camera: &'a Camera,
}

/// Shows one plant model at a time.
pub struct PlantModelViewer<B: GpuBackend> {
    backend: B,
    catalog: PlantCatalog,
    asset_root: PathBuf,
    max_dimension: f32,
    state: ModelState,
    slug: Option<String>,
    model: Option<PlantModel>,
    mesh_id: Option<MeshId>,
    lights: LightRig,
    orbit: OrbitControls,
    loads: LoadTracker,
    disposed: bool,
}

impl<B: GpuBackend> PlantModelViewer<B> {
    /// Creates a viewer. Asset paths from the catalog are resolved against
    /// `asset_root`.
    pub fn new(ctx: &Context, mut backend: B, asset_root: impl Into<PathBuf>) -> Self {
        let lights = LightRig::new(RigVariant::PlantViewer);
        backend.update_lights(&lights.uniforms());

        Self {
            backend,
            catalog: ctx.catalog.clone(),
            asset_root: asset_root.into(),
            max_dimension: ctx.options.model_max_dimension,
            state: ModelState::Unavailable,
            slug: None,
            model: None,
            mesh_id: None,
            lights,
            orbit: OrbitControls::new(ctx.options.model_orbit, DEFAULT_ASPECT_RATIO),
            loads: LoadTracker::new(),
            disposed: false,
        }
    }

    /// Starts loading the model of plant `slug`, superseding any load in
    /// flight.
    ///
    /// A plant without a model asset clears the current model and leaves the
    /// viewer [`ModelState::Unavailable`].
    pub fn begin_load(&mut self, slug: &str) -> Result<ModelLoadTicket, AssetLoadError> {
        if self.disposed {
            return Err(AssetLoadError::Disposed);
        }

        // Unknown plants show the same placeholder as plants without a model.
        let asset = match self.catalog.model_asset(slug) {
            Ok(asset) => asset.map(str::to_string),
            Err(e) => {
                log::warn!("model lookup failed: {e}");
                None
            }
        };
        let Some(asset) = asset else {
            self.loads.cancel();
            self.clear_model();
            self.slug = Some(slug.to_string());
            self.state = ModelState::Unavailable;
            log::info!("no 3D model for '{slug}'");
            return Err(AssetLoadError::NotAvailable(slug.to_string()));
        };

        let generation = self.loads.begin();
        self.slug = Some(slug.to_string());
        self.state = ModelState::Loading;
        Ok(ModelLoadTicket {
            generation,
            slug: slug.to_string(),
            path: self.asset_root.join(asset),
            max_dimension: self.max_dimension,
        })
    }

    /// Installs an imported model.
    ///
    /// Superseded results are dropped without touching the viewer. A failed
    /// import removes the previous model and shows the failure placeholder.
    pub fn finish_load(&mut self, imported: ImportedModel) -> Result<LoadOutcome, AssetLoadError> {
        if !self.loads.settle(imported.generation) {
            log::debug!(
                "dropping superseded model load {} for '{}'",
                imported.generation.value(),
                imported.slug
            );
            return Ok(LoadOutcome::Superseded);
        }

        let installed = imported.result.and_then(|model| {
            let mesh_id = self
                .backend
                .create_mesh(&model.vertex_data(), model.indices())
                .map_err(|e| AssetLoadError::Import {
                    path: model.name().to_string(),
                    message: e.to_string(),
                })?;
            Ok((model, mesh_id))
        });

        self.clear_model();
        match installed {
            Ok((model, mesh_id)) => {
                log::info!(
                    "showing model for '{}' ({} triangles)",
                    imported.slug,
                    model.triangle_count()
                );
                self.model = Some(model);
                self.mesh_id = Some(mesh_id);
                self.state = ModelState::Ready;
                Ok(LoadOutcome::Applied)
            }
            Err(e) => {
                log::warn!("model for '{}' failed to load: {e}", imported.slug);
                self.state = ModelState::Failed(e.clone());
                Err(e)
            }
        }
    }

    /// Loads the model of plant `slug` synchronously.
    pub fn load_plant(&mut self, slug: &str) -> Result<(), AssetLoadError> {
        let ticket = self.begin_load(slug)?;
        self.finish_load(ticket.import()).map(|_| ())
    }

    /// Whether an import is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loads.is_pending()
    }

    fn clear_model(&mut self) {
        if let Some(mesh_id) = self.mesh_id.take() {
            self.backend.release_mesh(mesh_id);
        }
        self.model = None;
    }

    /// Restores the initial camera placement.
    pub fn reset_camera(&mut self) {
        self.orbit.reset();
    }

    /// Releases the model. Idempotent; later loads fail with
    /// [`AssetLoadError::Disposed`].
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.loads.cancel();
        self.clear_model();
        self.state = ModelState::Unavailable;
        self.disposed = true;
        log::info!("plant model viewer disposed");
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> &ModelState {
        &self.state
    }

    /// The plant last requested, if any.
    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    /// The installed model, if any.
    #[must_use]
    pub fn model(&self) -> Option<&PlantModel> {
        self.model.as_ref()
    }

    /// The light rig.
    #[must_use]
    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    /// The orbit rig.
    #[must_use]
    pub fn orbit(&self) -> &OrbitControls {
        &self.orbit
    }

    /// The orbit rig, for feeding pointer input and ticking damping.
    pub fn orbit_mut(&mut self) -> &mut OrbitControls {
        &mut self.orbit
    }

    /// The GPU backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Snapshot of the scene for drawing.
    #[must_use]
    pub fn scene(&self) -> ModelScene<'_> {
        ModelScene {
            model: self.model.as_ref(),
            mesh_id: self.mesh_id,
            transform: self
                .model
                .as_ref()
                .map_or(Mat4::IDENTITY, |m| m.fit().transform()),
            lights: &self.lights,
            camera: self.orbit.camera(),
        }
    }
}

impl<B: GpuBackend> Drop for PlantModelViewer<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}
