//! Texture handles for the indirect strategy.

use std::fmt;
use std::sync::Arc;

use crate::backend::GpuBackend;

use super::{SamplerObject, TextureKind, TextureObject};

/// A texture+sampler allocation of the indirect strategy.
///
/// Handles are allocated and deduplicated by the resource registry; many
/// materials may share one handle. The underlying device objects are
/// destroyed when the last reference drops.
pub struct TextureHandle {
    texture: TextureObject,
    sampler: SamplerObject,
    backend: Arc<dyn GpuBackend>,
}

impl TextureHandle {
    pub(crate) fn new(
        texture: TextureObject,
        sampler: SamplerObject,
        backend: Arc<dyn GpuBackend>,
    ) -> Self {
        Self {
            texture,
            sampler,
            backend,
        }
    }

    pub fn texture_object(&self) -> &TextureObject {
        &self.texture
    }

    pub fn sampler_object(&self) -> &SamplerObject {
        &self.sampler
    }

    /// The kind this handle's objects were realized as.
    pub fn kind(&self) -> TextureKind {
        match self.texture {
            TextureObject::Image2d(_) => TextureKind::Image2d,
            TextureObject::Field(_) => TextureKind::Field,
            TextureObject::Ptex(_) => TextureKind::Ptex,
        }
    }
}

impl fmt::Debug for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureHandle")
            .field("texture", &self.texture)
            .field("sampler", &self.sampler)
            .finish_non_exhaustive()
    }
}

impl Drop for TextureHandle {
    fn drop(&mut self) {
        for id in self.texture.gpu_ids() {
            self.backend.destroy_texture(id);
        }
        for id in self.sampler.gpu_ids() {
            self.backend.destroy_sampler(id);
        }
    }
}

/// A binding name paired with a texture kind and a shared handle.
///
/// Produced fresh each sync; the handle behind it may be shared across
/// many materials.
#[derive(Debug, Clone)]
pub struct NamedTextureHandle {
    pub name: String,
    pub kind: TextureKind,
    pub handle: Arc<TextureHandle>,
}

impl NamedTextureHandle {
    pub fn new(name: impl Into<String>, kind: TextureKind, handle: Arc<TextureHandle>) -> Self {
        Self {
            name: name.into(),
            kind,
            handle,
        }
    }
}
