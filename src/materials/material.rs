//! Per-frame material synchronization.
//!
//! A [`Material`] mirrors one scene material into GPU-facing state: shader
//! sources and parameters on a shared [`SurfaceShader`], plus resolved
//! textures under one of two strategies. The direct-resource strategy
//! resolves shared [`TextureResourceHandle`]s through the registry with a
//! constant-color fallback; the handle-based strategy allocates
//! deduplicated texture handles and binds them through the
//! [`TextureBinder`](crate::textures::TextureBinder).

use std::sync::Arc;

use crate::registry::ResourceRegistry;
use crate::scene::SceneDelegate;
use crate::settings::RenderSettings;
use crate::textures::{
    NamedTextureHandle, TextureBinder, TextureKind, TextureResource, TextureResourceHandle,
};
use crate::tracking::{ChangeTracker, MaterialDirtyBits};
use crate::types::{BufferSource, BufferSpec, ScenePath, TextureKey};

use super::network::{FixedNetworkCompiler, NetworkCompiler};
use super::param::{MaterialParam, MaterialParamKind};
use super::surface::{LegacyTextureDescriptor, ShaderStage, SurfaceShader};

/// Material tag used when the network states no opinion.
pub const DEFAULT_MATERIAL_TAG: &str = "default";

/// One scene material, synchronized on demand.
pub struct Material {
    id: ScenePath,
    compiler: Arc<dyn NetworkCompiler>,
    surface_shader: Arc<SurfaceShader>,
    material_tag: String,
    has_displacement: bool,
    has_limit_surface_evaluation: bool,
    has_ptex: bool,
    initialized: bool,
    fallback_handles: Vec<Arc<TextureResourceHandle>>,
}

impl Material {
    /// Create an unsynchronized material for a scene path.
    pub fn new(id: impl Into<ScenePath>) -> Self {
        let id = id.into();
        log::debug!("Creating material {}", id);
        Self {
            id,
            compiler: Arc::new(FixedNetworkCompiler::default()),
            surface_shader: Arc::new(SurfaceShader::new()),
            // Empty until the first sync pushes a tag onto the shader.
            material_tag: String::new(),
            has_displacement: false,
            has_limit_surface_evaluation: false,
            has_ptex: false,
            initialized: false,
            fallback_handles: Vec::new(),
        }
    }

    /// Use the given network compiler from the next sync on.
    pub fn with_compiler(mut self, compiler: Arc<dyn NetworkCompiler>) -> Self {
        self.compiler = compiler;
        self
    }

    /// Replace the network compiler; the next sync recompiles with it.
    pub fn set_network_compiler(&mut self, compiler: Arc<dyn NetworkCompiler>) {
        self.compiler = compiler;
    }

    pub fn id(&self) -> &ScenePath {
        &self.id
    }

    pub fn surface_shader(&self) -> &Arc<SurfaceShader> {
        &self.surface_shader
    }

    /// Replace the surface shader this material writes into.
    pub fn set_surface_shader(&mut self, surface_shader: Arc<SurfaceShader>) {
        self.surface_shader = surface_shader;
    }

    /// Dirty bits a freshly inserted material starts with.
    pub fn initial_dirty_bits(&self) -> MaterialDirtyBits {
        MaterialDirtyBits::ALL_DIRTY
    }

    pub fn material_tag(&self) -> &str {
        &self.material_tag
    }

    /// Whether the synced network has a displacement source.
    pub fn has_displacement(&self) -> bool {
        self.has_displacement
    }

    /// Whether the synced network asks for limit-surface evaluation.
    pub fn has_limit_surface_evaluation(&self) -> bool {
        self.has_limit_surface_evaluation
    }

    /// Whether the synced network samples any ptex texture.
    pub fn has_ptex(&self) -> bool {
        self.has_ptex
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Drop memoized compiler state and force consumers of the surface
    /// shader to rebuild from it.
    pub fn reload(&mut self) {
        self.compiler.invalidate();
        self.surface_shader.reload();
    }

    /// Bring GPU-facing state up to date with the scene.
    ///
    /// Reads the dirty bits, rebuilds whatever they cover, reports batch
    /// and rprim invalidation to the tracker, and clears the bits. Data
    /// problems degrade to fallbacks and never abort the sync.
    pub fn sync(
        &mut self,
        scene: &dyn SceneDelegate,
        registry: &ResourceRegistry,
        settings: &RenderSettings,
        tracker: &ChangeTracker,
        dirty_bits: &mut MaterialDirtyBits,
    ) {
        if !dirty_bits.needs_sync() {
            *dirty_bits = MaterialDirtyBits::CLEAN;
            return;
        }

        let indirect_textures = settings.indirect_textures;
        let mut needs_rprim_update = false;

        let mut compiled = scene
            .material_network(&self.id)
            .filter(|network| network.is_valid())
            .map(|network| self.compiler.process_material_network(&self.id, &network))
            .unwrap_or_default();

        if compiled.has_no_sources() {
            let fallback = registry.fallback_shader();
            compiled.fragment_source = fallback.surface_source().to_string();
            compiled.geometry_source = String::new();
            compiled.metadata = fallback.metadata().clone();
        }

        // Capture what the surface shader held before this sync; the
        // rebatch decision below compares against it.
        let previous_fragment = self.surface_shader.source(ShaderStage::Fragment);
        let previous_geometry = self.surface_shader.source(ShaderStage::Geometry);

        self.surface_shader
            .set_source(ShaderStage::Fragment, compiled.fragment_source.clone());
        self.surface_shader
            .set_source(ShaderStage::Geometry, compiled.geometry_source.clone());

        let has_displacement = !compiled.geometry_source.is_empty();
        if has_displacement != self.has_displacement {
            self.has_displacement = has_displacement;
            needs_rprim_update = true;
        }

        let has_limit_surface_evaluation = compiled.limit_surface_evaluation();
        if has_limit_surface_evaluation != self.has_limit_surface_evaluation {
            self.has_limit_surface_evaluation = has_limit_surface_evaluation;
            needs_rprim_update = true;
        }

        let material_tag = if compiled.material_tag.is_empty() {
            DEFAULT_MATERIAL_TAG.to_string()
        } else {
            compiled.material_tag.clone()
        };
        let tag_changed = material_tag != self.material_tag;
        if tag_changed {
            self.surface_shader.set_material_tag(material_tag.clone());
            self.material_tag = material_tag;
            needs_rprim_update = true;
        }

        // Existing draw batches embed the old sources and bucket by the
        // old tag. Materials syncing for the first time have no batches.
        let sources_changed = previous_fragment.as_deref()
            != Some(compiled.fragment_source.as_str())
            || previous_geometry.as_deref() != Some(compiled.geometry_source.as_str());
        if self.initialized && (tag_changed || sources_changed) {
            tracker.mark_batches_dirty();
        }

        self.surface_shader.set_params(compiled.params.clone());
        self.surface_shader.set_enabled_primvar_filtering(true);

        self.fallback_handles.clear();

        let mut specs: Vec<BufferSpec> = Vec::new();
        let mut sources: Vec<BufferSource> = Vec::new();
        let mut legacy_textures: Vec<LegacyTextureDescriptor> = Vec::new();
        let mut has_ptex = false;

        for param in &compiled.params {
            match &param.kind {
                MaterialParamKind::Fallback | MaterialParamKind::PrimvarRedirect { .. } => {
                    specs.push(BufferSpec::new(
                        param.name.clone(),
                        param.fallback_value.tuple_type(),
                    ));
                    sources.push(BufferSource::from_value(
                        param.name.clone(),
                        &param.fallback_value,
                    ));
                }
                MaterialParamKind::Texture {
                    connection,
                    texture_kind,
                    ..
                } => {
                    if *texture_kind == TextureKind::Ptex {
                        has_ptex = true;
                    }
                    let use_indirect = indirect_textures
                        && texture_kind.is_indirect_capable()
                        && !connection.is_empty();
                    if use_indirect {
                        continue;
                    }
                    if let Some(handle) =
                        self.resolve_legacy_texture(scene, registry, param, connection)
                    {
                        legacy_textures.push(LegacyTextureDescriptor {
                            name: param.name.clone(),
                            kind: *texture_kind,
                            handle,
                        });
                    }
                }
            }
        }

        let mut named_textures: Vec<NamedTextureHandle> = Vec::new();
        if indirect_textures {
            let binder = TextureBinder::new(scene.context_caps());
            for descriptor in compiled.texture_descriptors() {
                if !descriptor.kind.is_indirect_capable() {
                    continue;
                }
                if let Some(handle) = registry.allocate_texture_handle(
                    descriptor.id,
                    descriptor.kind,
                    descriptor.sampler,
                    descriptor.memory_budget,
                    binder.uses_bindless_textures(),
                ) {
                    named_textures.push(NamedTextureHandle::new(
                        descriptor.name,
                        descriptor.kind,
                        handle,
                    ));
                }
            }
            binder.get_buffer_specs(&named_textures, &mut specs);
        }
        self.surface_shader.set_named_textures(named_textures);
        self.surface_shader.set_legacy_textures(legacy_textures);
        self.surface_shader.set_buffer_data(specs, sources);

        if has_ptex != self.has_ptex {
            self.has_ptex = has_ptex;
            needs_rprim_update = true;
        }

        if needs_rprim_update && self.initialized {
            tracker.mark_all_rprims_dirty(MaterialDirtyBits::MATERIAL_ID);
        }

        self.initialized = true;
        *dirty_bits = MaterialDirtyBits::CLEAN;
    }

    /// The direct-resource resolution chain for one texture param.
    ///
    /// Tries the shared resource cache, then a fresh load through the
    /// scene delegate; unresolvable 2D connections degrade to a private
    /// constant-color handle built from the param's fallback value, other
    /// kinds to nothing.
    fn resolve_legacy_texture(
        &mut self,
        scene: &dyn SceneDelegate,
        registry: &ResourceRegistry,
        param: &MaterialParam,
        connection: &ScenePath,
    ) -> Option<Arc<TextureResourceHandle>> {
        let mut resource: Option<Arc<TextureResource>> = None;
        let mut handle: Option<Arc<TextureResourceHandle>> = None;

        if !connection.is_empty() {
            let id = scene.texture_resource_id(connection);
            if id.is_valid() {
                resource = registry.find_texture_resource(TextureKey::for_resource(id));
                if resource.is_none() {
                    log::warn!("No texture resource found with path {}", connection);
                }
                let shared =
                    registry.texture_resource_handle(TextureResourceHandle::handle_key(connection));
                // Only a successful resolve repoints the shared handle;
                // siblings keep sampling the previous texture when the
                // resource is gone.
                if let Some(resource) = &resource {
                    shared.set_resource(Some(resource.clone()));
                }
                handle = Some(shared);
            }

            if resource.is_none() {
                if let Some(loaded) = scene.load_texture_resource(connection) {
                    let shared = handle.get_or_insert_with(|| {
                        registry
                            .texture_resource_handle(TextureResourceHandle::handle_key(connection))
                    });
                    shared.set_resource(Some(loaded.clone()));
                    resource = Some(loaded);
                }
            }
        }

        if resource.is_some() {
            return handle;
        }

        if !connection.is_empty() {
            log::warn!("Texture not found. Using fallback texture for: {}", connection);
        }
        if param.texture_kind() != Some(TextureKind::Image2d) {
            return None;
        }
        let fallback = Arc::new(TextureResource::constant_color(
            registry.backend().clone(),
            param.fallback_value.as_rgba(),
        ));
        let private = Arc::new(TextureResourceHandle::new(fallback));
        self.fallback_handles.push(private.clone());
        Some(private)
    }
}

impl std::fmt::Debug for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Material")
            .field("id", &self.id)
            .field("material_tag", &self.material_tag)
            .field("initialized", &self.initialized)
            .field("has_ptex", &self.has_ptex)
            .finish()
    }
}

impl Drop for Material {
    fn drop(&mut self) {
        log::debug!("Removing material {}", self.id);
    }
}

// Ensure Material is Send + Sync
static_assertions::assert_impl_all!(Material: Send, Sync);
