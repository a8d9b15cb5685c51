//! The 2D-to-3D depth visualizer.
//!
//! A [`DepthMeshVisualizer`] turns one source image into a textured, displaced
//! plane. It owns its texture and mesh on a [`GpuBackend`] and keeps at most
//! one texture alive at any time.
//!
//! Image loads are split in two so decoding can leave the interaction thread:
//! [`DepthMeshVisualizer::begin_load`] validates the image and hands out an
//! [`ImageLoadTicket`], the ticket decodes anywhere, and
//! [`DepthMeshVisualizer::finish_load`] installs the result. A load started
//! later supersedes every earlier one.

use glam::{Mat4, Vec3};
use herbview_core::{
    Context, DisplacementParameters, Generation, LoadError, LoadTracker, Options,
    ParameterChanges, ViewState,
};
use herbview_render::{
    Camera, DecodedImage, GpuBackend, LightRig, MeshId, OrbitControls, RenderResult, RigVariant,
    SourceImage, TextureId,
};
use herbview_structures::DepthMesh;

/// Aspect ratio used until the host reports its viewport.
const DEFAULT_ASPECT_RATIO: f32 = 16.0 / 9.0;

/// What became of a finished load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result was installed.
    Applied,
    /// A newer load was started (or the session was disposed); the result was
    /// dropped without touching the session.
    Superseded,
}

/// A validated image waiting to be decoded.
///
/// Tickets are `Send`; decode them on a worker and hand the result back with
/// [`DepthMeshVisualizer::finish_load`].
#[derive(Debug, Clone)]
pub struct ImageLoadTicket {
    generation: Generation,
    image: SourceImage,
}

impl ImageLoadTicket {
    /// The load this ticket belongs to.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The image to decode.
    #[must_use]
    pub fn image(&self) -> &SourceImage {
        &self.image
    }

    /// Decodes the image.
    #[must_use]
    pub fn decode(self) -> DecodedImageLoad {
        DecodedImageLoad {
            generation: self.generation,
            result: self.image.decode(),
        }
    }
}

/// The result of decoding an [`ImageLoadTicket`].
#[derive(Debug)]
pub struct DecodedImageLoad {
    generation: Generation,
    result: Result<DecodedImage, LoadError>,
}

impl DecodedImageLoad {
    /// The load this result belongs to.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether decoding succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Everything a renderer needs to draw one frame of the visualizer.
#[derive(Debug, Clone, Copy)]
pub struct DepthScene<'a> {
    /// The displaced plane.
    pub mesh: &'a DepthMesh,
    /// Backend handle of the plane, absent after dispose.
    pub mesh_id: Option<MeshId>,
    /// Translation of the mesh group, driven by `height`.
    pub group_translation: Vec3,
    /// The current texture, if an image has been loaded.
    pub texture: Option<TextureId>,
    /// The light rig.
    pub lights: &'a LightRig,
    /// The camera.
    pub camera: &'a Camera,
    /// Which panels the host should show.
    pub view_state: ViewState,
}

impl DepthScene<'_> {
    /// Model matrix of the mesh group.
    #[must_use]
    pub fn group_transform(&self) -> Mat4 {
        Mat4::from_translation(self.group_translation)
    }
}

/// One interactive 2D-to-3D session.
pub struct DepthMeshVisualizer<B: GpuBackend> {
    backend: B,
    options: Options,
    mesh: DepthMesh,
    mesh_id: Option<MeshId>,
    texture: Option<TextureId>,
    image_size: Option<(u32, u32)>,
    parameters: DisplacementParameters,
    lights: LightRig,
    orbit: OrbitControls,
    loads: LoadTracker,
    view_state: ViewState,
    disposed: bool,
}

impl<B: GpuBackend> DepthMeshVisualizer<B> {
    /// Creates a session with default parameters and no image.
    ///
    /// The plane is uploaded immediately; the options are copied out of
    /// `ctx`.
    pub fn new(ctx: &Context, mut backend: B) -> RenderResult<Self> {
        let options = ctx.options.clone();
        let parameters = DisplacementParameters::default();

        let mut mesh = DepthMesh::new(options.grid_segments, options.plane_size);
        mesh.set_depth(parameters.depth_fraction());
        let mesh_id = backend.create_mesh(&mesh.vertex_data(), mesh.indices())?;

        let mut lights = LightRig::new(RigVariant::Visualizer);
        lights.set_multiplier(parameters.light_multiplier());
        backend.update_lights(&lights.uniforms());

        let orbit = OrbitControls::new(options.visualizer_orbit, DEFAULT_ASPECT_RATIO);

        log::info!(
            "depth visualizer created ({} vertices, {} triangles)",
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        Ok(Self {
            backend,
            options,
            mesh,
            mesh_id: Some(mesh_id),
            texture: None,
            image_size: None,
            parameters,
            lights,
            orbit,
            loads: LoadTracker::new(),
            view_state: ViewState::default(),
            disposed: false,
        })
    }

    // === Image loading ===

    /// Validates an image and starts a load, superseding any load in flight.
    ///
    /// A rejected MIME type leaves the session untouched.
    pub fn begin_load(&mut self, image: SourceImage) -> Result<ImageLoadTicket, LoadError> {
        if self.disposed {
            return Err(LoadError::Disposed);
        }
        if !self.options.accepts_mime(image.mime_type()) {
            log::warn!("rejected image with MIME type '{}'", image.mime_type());
            return Err(LoadError::UnsupportedFormat(image.mime_type().to_string()));
        }

        let generation = self.loads.begin();
        log::debug!(
            "load {} started ({} bytes, {})",
            generation.value(),
            image.bytes().len(),
            image.mime_type()
        );
        Ok(ImageLoadTicket { generation, image })
    }

    /// Installs a decoded image.
    ///
    /// Superseded results are dropped before any texture is created. A decode
    /// failure keeps the previous texture. On success the new texture is
    /// created first and the previous one released afterwards, and the view
    /// returns to [`ViewState::Source`].
    pub fn finish_load(&mut self, load: DecodedImageLoad) -> Result<LoadOutcome, LoadError> {
        if !self.loads.settle(load.generation) {
            log::debug!("dropping superseded load {}", load.generation.value());
            return Ok(LoadOutcome::Superseded);
        }

        let image = load.result.inspect_err(|e| {
            log::warn!("load {} failed: {e}", load.generation.value());
        })?;

        let texture = self.backend.create_texture(&image).map_err(|e| {
            log::warn!("load {} failed: {e}", load.generation.value());
            LoadError::DecodeError(e.to_string())
        })?;
        if let Some(previous) = self.texture.replace(texture) {
            self.backend.release_texture(previous);
        }
        self.image_size = Some((image.width, image.height));
        self.view_state = ViewState::Source;

        log::info!(
            "installed {}x{} image (load {})",
            image.width,
            image.height,
            load.generation.value()
        );
        Ok(LoadOutcome::Applied)
    }

    /// Loads an image synchronously.
    pub fn load_image(&mut self, image: SourceImage) -> Result<(), LoadError> {
        let ticket = self.begin_load(image)?;
        self.finish_load(ticket.decode()).map(|_| ())
    }

    /// Abandons the load in flight, if any. Its result will be dropped.
    pub fn cancel_load(&mut self) {
        self.loads.cancel();
    }

    /// Removes the current image and keeps the session.
    ///
    /// Any load in flight is abandoned, the texture is released and the view
    /// returns to [`ViewState::Source`]. Parameters and the mesh are kept.
    pub fn clear_image(&mut self) {
        self.loads.cancel();
        if let Some(texture) = self.texture.take() {
            self.backend.release_texture(texture);
            log::info!("image removed");
        }
        self.image_size = None;
        self.view_state = ViewState::Source;
    }

    /// Whether a load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loads.is_pending()
    }

    // === Parameters ===

    /// Applies new parameters, clamped into range.
    ///
    /// Only what changed is recomputed: the vertices for `depth`, the group
    /// translation for `height` and the lights for `lighting`. If the vertex
    /// upload fails, the previous parameters and mesh are kept.
    pub fn set_parameters(&mut self, parameters: DisplacementParameters) -> RenderResult<()> {
        let next = parameters.clamped();
        let changes = self.parameters.changes_to(&next);
        if changes.depth {
            self.displace(next.depth_fraction())?;
        }
        self.parameters = next;
        self.apply(changes);
        Ok(())
    }

    /// Sets `height`, keeping the other parameters.
    pub fn set_height(&mut self, height: f32) -> RenderResult<()> {
        self.set_parameters(DisplacementParameters {
            height,
            ..self.parameters
        })
    }

    /// Sets `depth`, keeping the other parameters.
    pub fn set_depth(&mut self, depth: f32) -> RenderResult<()> {
        self.set_parameters(DisplacementParameters {
            depth,
            ..self.parameters
        })
    }

    /// Sets `lighting`, keeping the other parameters.
    pub fn set_lighting(&mut self, lighting: f32) -> RenderResult<()> {
        self.set_parameters(DisplacementParameters {
            lighting,
            ..self.parameters
        })
    }

    /// Returns the current parameters.
    #[must_use]
    pub fn parameters(&self) -> DisplacementParameters {
        self.parameters
    }

    fn displace(&mut self, depth_fraction: f32) -> RenderResult<()> {
        let previous = self.mesh.depth_fraction();
        if !self.mesh.set_depth(depth_fraction) {
            return Ok(());
        }
        let Some(id) = self.mesh_id else {
            return Ok(());
        };
        self.backend
            .update_mesh_vertices(id, &self.mesh.vertex_data())
            .inspect_err(|e| {
                log::warn!("vertex upload failed, keeping depth {previous}: {e}");
                self.mesh.set_depth(previous);
            })
    }

    fn apply(&mut self, changes: ParameterChanges) {
        if changes.lighting {
            self.lights.set_multiplier(self.parameters.light_multiplier());
            if !self.disposed {
                self.backend.update_lights(&self.lights.uniforms());
            }
        }
        if changes.height {
            log::debug!("group offset {:.3}", self.parameters.height_offset());
        }
    }

    /// Restores default parameters and the initial camera placement.
    ///
    /// The image is kept.
    pub fn reset(&mut self) -> RenderResult<()> {
        self.orbit.reset();
        self.set_parameters(DisplacementParameters::default())
    }

    // === Lifecycle ===

    /// Releases the texture and the mesh.
    ///
    /// Idempotent. Any load in flight is abandoned and later loads fail with
    /// [`LoadError::Disposed`].
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.loads.cancel();
        if let Some(texture) = self.texture.take() {
            self.backend.release_texture(texture);
        }
        if let Some(mesh) = self.mesh_id.take() {
            self.backend.release_mesh(mesh);
        }
        self.image_size = None;
        self.disposed = true;
        log::info!("depth visualizer disposed");
    }

    /// Whether [`DepthMeshVisualizer::dispose`] has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // === Accessors ===

    /// The current texture, if any.
    #[must_use]
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    /// Size of the current image in pixels, if any.
    #[must_use]
    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image_size
    }

    /// The displaced plane.
    #[must_use]
    pub fn mesh(&self) -> &DepthMesh {
        &self.mesh
    }

    /// The light rig.
    #[must_use]
    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    /// The presentation mode.
    #[must_use]
    pub fn view_state(&self) -> ViewState {
        self.view_state
    }

    /// Switches the presentation mode.
    pub fn set_view_state(&mut self, view_state: ViewState) {
        self.view_state = view_state;
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
    pub fn scene(&self) -> DepthScene<'_> {
        DepthScene {
            mesh: &self.mesh,
            mesh_id: self.mesh_id,
            group_translation: Vec3::new(0.0, self.parameters.height_offset(), 0.0),
            texture: self.texture,
            lights: &self.lights,
            camera: self.orbit.camera(),
            view_state: self.view_state,
        }
    }
}

impl<B: GpuBackend> Drop for DepthMeshVisualizer<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}
