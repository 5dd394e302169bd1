//! Per-kind texture and sampler objects.
//!
//! Closed sums over the kinds the indirect strategy supports. The binder
//! pattern-matches these against the kind tag carried by
//! [`NamedTextureHandle`](super::NamedTextureHandle); a mismatch is a
//! coding error handled at the dispatch site, not here.

use glam::DMat4;

use crate::backend::{GpuSamplerId, GpuTextureId};

/// GPU state of a 2D texture.
#[derive(Debug, Clone)]
pub struct Image2dTextureObject {
    pub texture: GpuTextureId,
}

/// GPU state of a volumetric field texture.
#[derive(Debug, Clone)]
pub struct FieldTextureObject {
    pub texture: GpuTextureId,
    /// Grid-to-world transform of the field volume.
    pub sampling_transform: DMat4,
}

/// GPU state of a ptex texture: texel array plus layout buffer.
#[derive(Debug, Clone)]
pub struct PtexTextureObject {
    pub texels: GpuTextureId,
    pub layout: GpuTextureId,
}

/// A realized texture object of one of the dispatchable kinds.
#[derive(Debug, Clone)]
pub enum TextureObject {
    Image2d(Image2dTextureObject),
    Field(FieldTextureObject),
    Ptex(PtexTextureObject),
}

impl TextureObject {
    /// Device ids owned by this object, for destruction.
    pub(crate) fn gpu_ids(&self) -> Vec<GpuTextureId> {
        match self {
            TextureObject::Image2d(t) => vec![t.texture],
            TextureObject::Field(t) => vec![t.texture],
            TextureObject::Ptex(t) => vec![t.texels, t.layout],
        }
    }
}

/// Sampler state of a 2D texture.
#[derive(Debug, Clone)]
pub struct Image2dSamplerObject {
    pub sampler: GpuSamplerId,
    /// 64-bit bindless handle, zero when bindless is off or allocation
    /// failed.
    pub bindless_handle: u64,
}

/// Sampler state of a field texture.
#[derive(Debug, Clone)]
pub struct FieldSamplerObject {
    pub sampler: GpuSamplerId,
    pub bindless_handle: u64,
}

/// Sampler state of a ptex texture.
///
/// Ptex binds its textures directly and has no unit sampler; only the
/// bindless handles for the texel array and layout buffer live here.
#[derive(Debug, Clone)]
pub struct PtexSamplerObject {
    pub texels_bindless_handle: u64,
    pub layout_bindless_handle: u64,
}

/// A realized sampler object matching one texture kind.
#[derive(Debug, Clone)]
pub enum SamplerObject {
    Image2d(Image2dSamplerObject),
    Field(FieldSamplerObject),
    Ptex(PtexSamplerObject),
}

impl SamplerObject {
    /// Device sampler ids owned by this object, for destruction.
    pub(crate) fn gpu_ids(&self) -> Vec<GpuSamplerId> {
        match self {
            SamplerObject::Image2d(s) => vec![s.sampler],
            SamplerObject::Field(s) => vec![s.sampler],
            SamplerObject::Ptex(_) => Vec::new(),
        }
    }
}
