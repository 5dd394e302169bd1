//! Legacy texture resources and their repointable handles.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::backend::{BindTarget, GpuBackend, GpuSamplerId, GpuTextureId, TextureDescriptor};
use crate::types::{SamplerParameters, ScenePath, TextureKey};

use super::TextureKind;

/// A texture realized through the legacy direct-resource strategy.
///
/// Owns its device texture and sampler; both are destroyed when the
/// resource drops.
pub struct TextureResource {
    kind: TextureKind,
    texture: GpuTextureId,
    sampler: GpuSamplerId,
    sampler_parameters: SamplerParameters,
    memory_budget: u64,
    backend: Arc<dyn GpuBackend>,
}

impl TextureResource {
    /// Realize a resource of the given kind on the device.
    ///
    /// Texel contents are uploaded by the device layer; creation here only
    /// establishes the objects.
    pub fn new(
        backend: Arc<dyn GpuBackend>,
        kind: TextureKind,
        descriptor: &TextureDescriptor,
        sampler_parameters: SamplerParameters,
        memory_budget: u64,
    ) -> Self {
        let texture = backend.create_texture(descriptor);
        let sampler = backend.create_sampler(&sampler_parameters);
        Self {
            kind,
            texture,
            sampler,
            sampler_parameters,
            memory_budget,
            backend,
        }
    }

    /// Synthesize a 1x1 constant-color 2D resource, used as the fallback
    /// when a connection fails to resolve.
    pub fn constant_color(backend: Arc<dyn GpuBackend>, color: [f32; 4]) -> Self {
        let descriptor = TextureDescriptor::constant_1x1("fallback", color);
        Self::new(
            backend,
            TextureKind::Image2d,
            &descriptor,
            SamplerParameters::fallback(),
            0,
        )
    }

    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    pub fn texture(&self) -> GpuTextureId {
        self.texture
    }

    pub fn sampler(&self) -> GpuSamplerId {
        self.sampler
    }

    pub fn sampler_parameters(&self) -> SamplerParameters {
        self.sampler_parameters
    }

    pub fn memory_budget(&self) -> u64 {
        self.memory_budget
    }

    /// Unit binding target for this resource's kind.
    pub fn bind_target(&self) -> BindTarget {
        match self.kind {
            TextureKind::Image2d | TextureKind::Udim => BindTarget::Texture2d,
            TextureKind::Field => BindTarget::Texture3d,
            TextureKind::Ptex => BindTarget::Texture2dArray,
        }
    }
}

impl fmt::Debug for TextureResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureResource")
            .field("kind", &self.kind)
            .field("texture", &self.texture)
            .field("sampler", &self.sampler)
            .finish_non_exhaustive()
    }
}

impl Drop for TextureResource {
    fn drop(&mut self) {
        self.backend.destroy_texture(self.texture);
        self.backend.destroy_sampler(self.sampler);
    }
}

/// Repointable indirection over a [`TextureResource`].
///
/// Shared handles live in the registry, keyed by the connection path, and
/// are repointed whenever resolution finds a different resource; consumers
/// holding the handle observe the change without invalidation. Private
/// handles wrap synthesized fallback resources and belong to exactly one
/// material.
#[derive(Debug)]
pub struct TextureResourceHandle {
    resource: RwLock<Option<Arc<TextureResource>>>,
}

impl TextureResourceHandle {
    /// Handle not yet pointing at any resource.
    pub fn empty() -> Self {
        Self {
            resource: RwLock::new(None),
        }
    }

    pub fn new(resource: Arc<TextureResource>) -> Self {
        Self {
            resource: RwLock::new(Some(resource)),
        }
    }

    pub fn resource(&self) -> Option<Arc<TextureResource>> {
        self.resource.read().clone()
    }

    pub fn has_resource(&self) -> bool {
        self.resource.read().is_some()
    }

    /// Repoint the handle. All consumers observe the new resource.
    pub fn set_resource(&self, resource: Option<Arc<TextureResource>>) {
        *self.resource.write() = resource;
    }

    /// Registry key for the shared handle of a connection path.
    pub fn handle_key(connection: &ScenePath) -> TextureKey {
        TextureKey::for_handle(connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::NullBackend;

    fn create_test_backend() -> Arc<NullBackend> {
        Arc::new(NullBackend::new())
    }

    #[test]
    fn test_constant_color_resource() {
        let backend = create_test_backend();
        let resource = TextureResource::constant_color(backend.clone(), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(resource.kind(), TextureKind::Image2d);
        assert_eq!(
            resource.sampler_parameters(),
            SamplerParameters::fallback()
        );
        assert_eq!(resource.memory_budget(), 0);
        assert_eq!(backend.alive_textures(), 1);
    }

    #[test]
    fn test_resource_drop_destroys_device_objects() {
        let backend = create_test_backend();
        {
            let _resource = TextureResource::constant_color(backend.clone(), [0.0; 4]);
            assert_eq!(backend.alive_textures(), 1);
            assert_eq!(backend.alive_samplers(), 1);
        }
        assert_eq!(backend.alive_textures(), 0);
        assert_eq!(backend.alive_samplers(), 0);
    }

    #[test]
    fn test_handle_repointing() {
        let backend = create_test_backend();
        let handle = TextureResourceHandle::empty();
        assert!(!handle.has_resource());

        let resource = Arc::new(TextureResource::constant_color(backend.clone(), [0.0; 4]));
        handle.set_resource(Some(resource.clone()));
        assert!(Arc::ptr_eq(&handle.resource().unwrap(), &resource));

        handle.set_resource(None);
        assert!(!handle.has_resource());
    }

    #[test]
    fn test_handle_key_stable_per_path() {
        let path = ScenePath::new("/materials/wood/diffuseMap");
        assert_eq!(
            TextureResourceHandle::handle_key(&path),
            TextureResourceHandle::handle_key(&path)
        );
        assert_ne!(
            TextureResourceHandle::handle_key(&path),
            TextureResourceHandle::handle_key(&ScenePath::new("/materials/wood/normalMap"))
        );
    }
}
