//! GPU device seam.
//!
//! The real GPU abstraction layer lives outside this crate; the pipeline
//! only needs the small surface below to realize texture and sampler
//! objects, query bindless handles, and drive texture unit binding during
//! batch execution. [`NullBackend`] implements it without a device for
//! tests and development.

pub mod null;

pub use null::{BindRecord, NullBackend};

use crate::types::SamplerParameters;

/// Identifier of a device texture object. Zero is the null texture; binding
/// it to a unit unbinds that unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GpuTextureId(pub(crate) u64);

impl GpuTextureId {
    pub const NULL: GpuTextureId = GpuTextureId(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Identifier of a device sampler object. Zero is the null sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GpuSamplerId(pub(crate) u64);

impl GpuSamplerId {
    pub const NULL: GpuSamplerId = GpuSamplerId(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Unit binding target of a texture object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindTarget {
    /// Plain 2D texture.
    Texture2d,
    /// Volumetric 3D texture.
    Texture3d,
    /// 2D array texture (ptex texels).
    Texture2dArray,
    /// Buffer-backed texture (ptex layout).
    BufferTexture,
}

/// Creation parameters for a device texture.
#[derive(Debug, Clone)]
pub struct TextureDescriptor {
    pub label: Option<String>,
    pub target: BindTarget,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    /// Single texel to fill the texture with, for synthesized constants.
    pub constant_color: Option<[f32; 4]>,
}

impl TextureDescriptor {
    /// Descriptor for a 1x1 2D texture holding one constant color.
    pub fn constant_1x1(label: impl Into<String>, color: [f32; 4]) -> Self {
        Self {
            label: Some(label.into()),
            target: BindTarget::Texture2d,
            width: 1,
            height: 1,
            depth: 1,
            constant_color: Some(color),
        }
    }
}

/// Device operations the material pipeline depends on.
///
/// Implementations hand out ids rather than owning objects; ownership and
/// destruction scheduling stay with the device layer. `texture_sampler_handle`
/// returns zero when bindless residency is unsupported or the allocation
/// failed, which callers must treat as an invalid handle.
pub trait GpuBackend: Send + Sync + 'static {
    /// Get the backend name.
    fn name(&self) -> &'static str;

    /// Create a texture object.
    fn create_texture(&self, descriptor: &TextureDescriptor) -> GpuTextureId;

    /// Destroy a texture object.
    fn destroy_texture(&self, texture: GpuTextureId);

    /// Create a sampler object.
    fn create_sampler(&self, parameters: &SamplerParameters) -> GpuSamplerId;

    /// Destroy a sampler object.
    fn destroy_sampler(&self, sampler: GpuSamplerId);

    /// 64-bit bindless handle for a texture+sampler pair, or zero.
    fn texture_sampler_handle(&self, texture: GpuTextureId, sampler: GpuSamplerId) -> u64;

    /// Bind a texture to a unit (null id unbinds).
    fn bind_texture(&self, unit: u32, target: BindTarget, texture: GpuTextureId);

    /// Bind a sampler to a unit (null id unbinds).
    fn bind_sampler(&self, unit: u32, sampler: GpuSamplerId);
}
