//! Texture objects, handles, resources, and the texture binder.
//!
//! Two texture-management strategies coexist:
//!
//! - **Indirect**: [`TextureHandle`]s allocated through the resource
//!   registry pair a [`TextureObject`] with a [`SamplerObject`]; the
//!   [`TextureBinder`] computes buffer layout/sources for them and drives
//!   unit binding during batch execution.
//! - **Legacy**: [`TextureResource`]s resolved per material parameter,
//!   reached through repointable [`TextureResourceHandle`]s.
//!
//! Which strategy a texture uses is decided per sync by the runtime
//! settings and the texture's kind; see [`TextureKind::is_indirect_capable`].

mod binder;
mod handle;
mod object;
mod resource;
mod units;

pub use binder::{ptex_layout_field_name, sampling_transform_field_name, TextureBinder};
pub use handle::{NamedTextureHandle, TextureHandle};
pub use object::{
    FieldSamplerObject, FieldTextureObject, Image2dSamplerObject, Image2dTextureObject,
    PtexSamplerObject, PtexTextureObject, SamplerObject, TextureObject,
};
pub use resource::{TextureResource, TextureResourceHandle};
pub use units::TextureUnitMap;

/// Kind of a texture referenced by a material parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// Plain 2D texture.
    Image2d,
    /// Volumetric field texture with a grid-to-world sampling transform.
    Field,
    /// Per-face ptex texture (texel array plus layout buffer).
    Ptex,
    /// Multi-tile UDIM texture.
    Udim,
}

impl TextureKind {
    /// Whether the handle-indirected strategy supports this kind.
    ///
    /// Kinds outside the supported set always resolve through the legacy
    /// strategy, regardless of the runtime flag.
    pub fn is_indirect_capable(self) -> bool {
        matches!(
            self,
            TextureKind::Image2d | TextureKind::Field | TextureKind::Ptex
        )
    }
}
