//! Shared resource registry for the material pipeline.
//!
//! The registry owns the process-wide caches that deduplicate texture
//! state across materials, plus the shared fallback surface shader. It is
//! constructed by the embedding renderer and passed into every sync call;
//! nothing here is ambient global state.

mod cache;

pub use cache::ResourceCache;

use std::sync::Arc;

use glam::DMat4;
use parking_lot::RwLock;

use crate::backend::{BindTarget, GpuBackend, GpuSamplerId, TextureDescriptor};
use crate::materials::FallbackShader;
use crate::textures::{
    FieldSamplerObject, FieldTextureObject, Image2dSamplerObject, Image2dTextureObject,
    PtexSamplerObject, PtexTextureObject, SamplerObject, TextureHandle, TextureKind,
    TextureObject, TextureResource, TextureResourceHandle,
};
use crate::types::{SamplerParameters, TextureId, TextureKey};

/// Deduplication key of an indirect texture handle.
///
/// Two materials asking for the same texture with identical sampler state,
/// memory budget, and bindless mode share one allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandleKey {
    pub id: TextureId,
    pub kind: TextureKind,
    pub sampler: SamplerParameters,
    pub memory_budget: u64,
    pub bindless: bool,
}

/// Shared caches and helpers used by all materials during the sync phase.
pub struct ResourceRegistry {
    backend: Arc<dyn GpuBackend>,
    texture_resources: ResourceCache<TextureKey, Arc<TextureResource>>,
    resource_handles: ResourceCache<TextureKey, Arc<TextureResourceHandle>>,
    texture_handles: ResourceCache<TextureHandleKey, Arc<TextureHandle>>,
    fallback_shader: RwLock<Option<Arc<FallbackShader>>>,
}

impl ResourceRegistry {
    pub fn new(backend: Arc<dyn GpuBackend>) -> Self {
        Self {
            backend,
            texture_resources: ResourceCache::new(),
            resource_handles: ResourceCache::new(),
            texture_handles: ResourceCache::new(),
            fallback_shader: RwLock::new(None),
        }
    }

    pub fn backend(&self) -> &Arc<dyn GpuBackend> {
        &self.backend
    }

    /// Look up a shared legacy texture resource.
    pub fn find_texture_resource(&self, key: TextureKey) -> Option<Arc<TextureResource>> {
        self.texture_resources.find(&key)
    }

    /// Publish a legacy texture resource under a key. The first insert
    /// wins; later inserts for the same key return the existing resource.
    pub fn insert_texture_resource(
        &self,
        key: TextureKey,
        resource: Arc<TextureResource>,
    ) -> Arc<TextureResource> {
        self.texture_resources.get_or_create(key, || resource)
    }

    /// The shared repointable handle for a connection's handle key,
    /// created empty on first request.
    pub fn texture_resource_handle(&self, key: TextureKey) -> Arc<TextureResourceHandle> {
        self.resource_handles
            .get_or_create(key, || Arc::new(TextureResourceHandle::empty()))
    }

    /// Allocate (or reuse) a texture handle for the indirect strategy.
    ///
    /// Returns `None` for kinds outside the indirect-capable set; callers
    /// are expected to have routed those through the legacy strategy
    /// already, so reaching this is a coding error.
    pub fn allocate_texture_handle(
        &self,
        id: TextureId,
        kind: TextureKind,
        sampler: SamplerParameters,
        memory_budget: u64,
        bindless: bool,
    ) -> Option<Arc<TextureHandle>> {
        if !kind.is_indirect_capable() {
            log::error!(
                "Texture kind {:?} cannot be allocated through the indirect strategy",
                kind
            );
            return None;
        }
        let key = TextureHandleKey {
            id,
            kind,
            sampler,
            memory_budget,
            bindless,
        };
        Some(
            self.texture_handles
                .get_or_create(key, || self.realize_texture_handle(id, kind, sampler, bindless)),
        )
    }

    /// Lazily loaded fallback surface shader, shared by all materials.
    pub fn fallback_shader(&self) -> Arc<FallbackShader> {
        if let Some(shader) = self.fallback_shader.read().as_ref() {
            return shader.clone();
        }
        let mut slot = self.fallback_shader.write();
        slot.get_or_insert_with(|| Arc::new(FallbackShader::load()))
            .clone()
    }

    /// Drop the fallback shader so the next request reloads it.
    pub fn reload_fallback_shader(&self) {
        *self.fallback_shader.write() = None;
    }

    /// Drop cache entries no material references anymore.
    pub fn garbage_collect(&self) {
        let before = self.texture_resources.len()
            + self.resource_handles.len()
            + self.texture_handles.len();
        self.texture_resources
            .retain(|_, resource| Arc::strong_count(resource) > 1);
        self.resource_handles
            .retain(|_, handle| Arc::strong_count(handle) > 1);
        self.texture_handles
            .retain(|_, handle| Arc::strong_count(handle) > 1);
        let after = self.texture_resources.len()
            + self.resource_handles.len()
            + self.texture_handles.len();
        log::debug!("ResourceRegistry: garbage collected {} entries", before - after);
    }

    /// Number of shared legacy resources currently cached.
    pub fn texture_resource_count(&self) -> usize {
        self.texture_resources.len()
    }

    /// Number of shared resource handles currently cached.
    pub fn resource_handle_count(&self) -> usize {
        self.resource_handles.len()
    }

    /// Number of indirect texture handles currently cached.
    pub fn texture_handle_count(&self) -> usize {
        self.texture_handles.len()
    }

    fn realize_texture_handle(
        &self,
        id: TextureId,
        kind: TextureKind,
        sampler: SamplerParameters,
        bindless: bool,
    ) -> Arc<TextureHandle> {
        let backend = self.backend.clone();
        let label = format!("texture:{:016x}", id.raw());
        // Texel contents arrive later through the device layer; allocation
        // establishes objects and bindless residency only.
        let (texture, sampler) = match kind {
            TextureKind::Image2d => {
                let texture = backend.create_texture(&TextureDescriptor {
                    label: Some(label),
                    target: BindTarget::Texture2d,
                    width: 1,
                    height: 1,
                    depth: 1,
                    constant_color: None,
                });
                let device_sampler = backend.create_sampler(&sampler);
                let bindless_handle = if bindless {
                    backend.texture_sampler_handle(texture, device_sampler)
                } else {
                    0
                };
                (
                    TextureObject::Image2d(Image2dTextureObject { texture }),
                    SamplerObject::Image2d(Image2dSamplerObject {
                        sampler: device_sampler,
                        bindless_handle,
                    }),
                )
            }
            TextureKind::Field => {
                let texture = backend.create_texture(&TextureDescriptor {
                    label: Some(label),
                    target: BindTarget::Texture3d,
                    width: 1,
                    height: 1,
                    depth: 1,
                    constant_color: None,
                });
                let device_sampler = backend.create_sampler(&sampler);
                let bindless_handle = if bindless {
                    backend.texture_sampler_handle(texture, device_sampler)
                } else {
                    0
                };
                (
                    TextureObject::Field(FieldTextureObject {
                        texture,
                        sampling_transform: DMat4::IDENTITY,
                    }),
                    SamplerObject::Field(FieldSamplerObject {
                        sampler: device_sampler,
                        bindless_handle,
                    }),
                )
            }
            TextureKind::Ptex => {
                let texels = backend.create_texture(&TextureDescriptor {
                    label: Some(format!("{label}:texels")),
                    target: BindTarget::Texture2dArray,
                    width: 1,
                    height: 1,
                    depth: 1,
                    constant_color: None,
                });
                let layout = backend.create_texture(&TextureDescriptor {
                    label: Some(format!("{label}:layout")),
                    target: BindTarget::BufferTexture,
                    width: 1,
                    height: 1,
                    depth: 1,
                    constant_color: None,
                });
                let (texels_bindless_handle, layout_bindless_handle) = if bindless {
                    (
                        backend.texture_sampler_handle(texels, GpuSamplerId::NULL),
                        backend.texture_sampler_handle(layout, GpuSamplerId::NULL),
                    )
                } else {
                    (0, 0)
                };
                (
                    TextureObject::Ptex(PtexTextureObject { texels, layout }),
                    SamplerObject::Ptex(PtexSamplerObject {
                        texels_bindless_handle,
                        layout_bindless_handle,
                    }),
                )
            }
            TextureKind::Udim => unreachable!("guarded by is_indirect_capable"),
        };
        Arc::new(TextureHandle::new(texture, sampler, backend))
    }
}

// Ensure ResourceRegistry is Send + Sync
static_assertions::assert_impl_all!(ResourceRegistry: Send, Sync);
