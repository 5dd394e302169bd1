//! Surface shader sink.
//!
//! [`SurfaceShader`] is the hand-off point between material sync and the
//! draw layer. Sync writes shading sources, the material tag, params,
//! buffer data, and resolved textures into it; draw batches read them
//! back. Interior mutability lets a material and its batches share one
//! instance behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::textures::{NamedTextureHandle, TextureKind, TextureResourceHandle};
use crate::types::{BufferSource, BufferSpec};

use super::param::MaterialParam;

/// Shader stage a source string is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Surface shading.
    Fragment,
    /// Displacement.
    Geometry,
}

/// A texture resolved through the direct-resource strategy, attached to
/// the surface shader for draw-time binding.
#[derive(Debug, Clone)]
pub struct LegacyTextureDescriptor {
    /// Parameter name the texture feeds.
    pub name: String,
    /// Kind of texture.
    pub kind: TextureKind,
    /// Repointable handle to the resolved resource.
    pub handle: Arc<TextureResourceHandle>,
}

#[derive(Debug, Default)]
struct SurfaceShaderState {
    sources: HashMap<ShaderStage, String>,
    material_tag: String,
    params: Vec<MaterialParam>,
    buffer_specs: Vec<BufferSpec>,
    buffer_sources: Vec<BufferSource>,
    named_textures: Vec<NamedTextureHandle>,
    legacy_textures: Vec<LegacyTextureDescriptor>,
    primvar_filtering_enabled: bool,
    generation: u64,
}

/// GPU-facing shading state of one material.
#[derive(Debug, Default)]
pub struct SurfaceShader {
    state: RwLock<SurfaceShaderState>,
}

impl SurfaceShader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the source for a stage, replacing the previous one.
    pub fn set_source(&self, stage: ShaderStage, source: impl Into<String>) {
        self.state.write().sources.insert(stage, source.into());
    }

    /// The source previously stored for a stage.
    pub fn source(&self, stage: ShaderStage) -> Option<String> {
        self.state.read().sources.get(&stage).cloned()
    }

    pub fn set_material_tag(&self, tag: impl Into<String>) {
        self.state.write().material_tag = tag.into();
    }

    pub fn material_tag(&self) -> String {
        self.state.read().material_tag.clone()
    }

    pub fn set_params(&self, params: Vec<MaterialParam>) {
        self.state.write().params = params;
    }

    pub fn params(&self) -> Vec<MaterialParam> {
        self.state.read().params.clone()
    }

    /// Store the aggregated parameter buffer layout and payloads.
    pub fn set_buffer_data(&self, specs: Vec<BufferSpec>, sources: Vec<BufferSource>) {
        let mut state = self.state.write();
        state.buffer_specs = specs;
        state.buffer_sources = sources;
    }

    pub fn buffer_specs(&self) -> Vec<BufferSpec> {
        self.state.read().buffer_specs.clone()
    }

    pub fn buffer_sources(&self) -> Vec<BufferSource> {
        self.state.read().buffer_sources.clone()
    }

    /// Attach the handles allocated by the indirect strategy.
    pub fn set_named_textures(&self, textures: Vec<NamedTextureHandle>) {
        self.state.write().named_textures = textures;
    }

    pub fn named_textures(&self) -> Vec<NamedTextureHandle> {
        self.state.read().named_textures.clone()
    }

    /// Attach the descriptors resolved by the direct-resource strategy.
    pub fn set_legacy_textures(&self, textures: Vec<LegacyTextureDescriptor>) {
        self.state.write().legacy_textures = textures;
    }

    pub fn legacy_textures(&self) -> Vec<LegacyTextureDescriptor> {
        self.state.read().legacy_textures.clone()
    }

    /// Restrict primvar uploads to the ones the params actually read.
    pub fn set_enabled_primvar_filtering(&self, enabled: bool) {
        self.state.write().primvar_filtering_enabled = enabled;
    }

    pub fn primvar_filtering_enabled(&self) -> bool {
        self.state.read().primvar_filtering_enabled
    }

    /// Tell consumers to drop anything derived from this shader and
    /// rebuild it.
    pub fn reload(&self) {
        let mut state = self.state.write();
        state.generation += 1;
        log::debug!("SurfaceShader: reload requested, generation {}", state.generation);
    }

    /// Bumped by every [`Self::reload`]; consumers compare against the
    /// value they last built from.
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }
}

// Ensure SurfaceShader is Send + Sync
static_assertions::assert_impl_all!(SurfaceShader: Send, Sync);
