//! Buffer layout, buffer sources, and unit binding for named textures.
//!
//! All four operations branch on one bindless capability captured at
//! construction, so a frame can never end up half bound. Kind dispatch is
//! a single exhaustive match; see [`dispatch`].

use crate::backend::{BindTarget, GpuBackend, GpuSamplerId, GpuTextureId};
use crate::caps::ContextCaps;
use crate::types::{BufferSource, BufferSpec, ElementType, TupleType, BINDLESS_HANDLE_TUPLE};

use super::object::{
    FieldSamplerObject, FieldTextureObject, Image2dSamplerObject, Image2dTextureObject,
    PtexSamplerObject, PtexTextureObject,
};
use super::{NamedTextureHandle, SamplerObject, TextureKind, TextureObject, TextureUnitMap};

/// Buffer field name of a field texture's sampling transform.
pub fn sampling_transform_field_name(base: &str) -> String {
    format!("{base}SamplingTransform")
}

/// Buffer field and binding name of a ptex layout buffer.
pub fn ptex_layout_field_name(base: &str) -> String {
    format!("{base}_layout")
}

/// Kind-specific arms of a texture operation.
///
/// One implementation per binder operation; [`dispatch`] routes each
/// handle to the arm matching its kind tag after checking that the held
/// objects agree with the tag.
trait KindOperation {
    fn image2d(&mut self, name: &str, texture: &Image2dTextureObject, sampler: &Image2dSamplerObject);
    fn field(&mut self, name: &str, texture: &FieldTextureObject, sampler: &FieldSamplerObject);
    fn ptex(&mut self, name: &str, texture: &PtexTextureObject, sampler: &PtexSamplerObject);
}

/// Route one named handle to the operation arm for its kind.
///
/// A kind tag that does not match the held texture/sampler objects is a
/// coding error: logged, the texture is skipped, processing continues.
/// The same applies to kinds the indirect strategy does not support.
fn dispatch(texture: &NamedTextureHandle, op: &mut impl KindOperation) {
    let object = texture.handle.texture_object();
    let sampler = texture.handle.sampler_object();
    match (texture.kind, object, sampler) {
        (TextureKind::Image2d, TextureObject::Image2d(t), SamplerObject::Image2d(s)) => {
            op.image2d(&texture.name, t, s);
        }
        (TextureKind::Field, TextureObject::Field(t), SamplerObject::Field(s)) => {
            op.field(&texture.name, t, s);
        }
        (TextureKind::Ptex, TextureObject::Ptex(t), SamplerObject::Ptex(s)) => {
            op.ptex(&texture.name, t, s);
        }
        (TextureKind::Udim, _, _) => {
            log::error!(
                "Unsupported texture kind Udim for binding {}",
                texture.name
            );
        }
        (kind, _, _) => {
            log::error!(
                "Texture objects do not match kind {:?} for binding {}",
                kind,
                texture.name
            );
        }
    }
}

struct ComputeSourcesOp<'a> {
    bindless: bool,
    sources: &'a mut Vec<BufferSource>,
}

impl KindOperation for ComputeSourcesOp<'_> {
    fn image2d(&mut self, name: &str, _: &Image2dTextureObject, sampler: &Image2dSamplerObject) {
        if self.bindless {
            self.sources
                .push(BufferSource::bindless_handle(name, sampler.bindless_handle));
        }
    }

    fn field(&mut self, name: &str, texture: &FieldTextureObject, sampler: &FieldSamplerObject) {
        // The sampling transform is uploaded whether or not bindless is on.
        self.sources.push(BufferSource::sampling_transform(
            sampling_transform_field_name(name),
            texture.sampling_transform,
        ));
        if self.bindless {
            self.sources
                .push(BufferSource::bindless_handle(name, sampler.bindless_handle));
        }
    }

    fn ptex(&mut self, name: &str, _: &PtexTextureObject, sampler: &PtexSamplerObject) {
        if self.bindless {
            self.sources.push(BufferSource::bindless_handle(
                name,
                sampler.texels_bindless_handle,
            ));
            self.sources.push(BufferSource::bindless_handle(
                ptex_layout_field_name(name),
                sampler.layout_bindless_handle,
            ));
        }
    }
}

struct BindOp<'a> {
    bind: bool,
    units: &'a TextureUnitMap,
    backend: &'a dyn GpuBackend,
}

impl BindOp<'_> {
    fn unit_for(&self, name: &str) -> Option<u32> {
        let unit = self.units.unit_for(name);
        if unit.is_none() {
            log::error!("No texture unit assigned for binding {}", name);
        }
        unit
    }

    fn bind_unit(
        &self,
        unit: u32,
        target: BindTarget,
        texture: GpuTextureId,
        sampler: Option<GpuSamplerId>,
    ) {
        let texture = if self.bind { texture } else { GpuTextureId::NULL };
        self.backend.bind_texture(unit, target, texture);
        if let Some(sampler) = sampler {
            let sampler = if self.bind { sampler } else { GpuSamplerId::NULL };
            self.backend.bind_sampler(unit, sampler);
        }
    }
}

impl KindOperation for BindOp<'_> {
    fn image2d(&mut self, name: &str, texture: &Image2dTextureObject, sampler: &Image2dSamplerObject) {
        let Some(unit) = self.unit_for(name) else {
            return;
        };
        self.bind_unit(
            unit,
            BindTarget::Texture2d,
            texture.texture,
            Some(sampler.sampler),
        );
    }

    fn field(&mut self, name: &str, texture: &FieldTextureObject, sampler: &FieldSamplerObject) {
        let Some(unit) = self.unit_for(name) else {
            return;
        };
        self.bind_unit(
            unit,
            BindTarget::Texture3d,
            texture.texture,
            Some(sampler.sampler),
        );
    }

    fn ptex(&mut self, name: &str, texture: &PtexTextureObject, _: &PtexSamplerObject) {
        if let Some(unit) = self.unit_for(name) {
            self.bind_unit(unit, BindTarget::Texture2dArray, texture.texels, None);
        }
        let layout_name = ptex_layout_field_name(name);
        if let Some(unit) = self.unit_for(&layout_name) {
            self.bind_unit(unit, BindTarget::BufferTexture, texture.layout, None);
        }
    }
}

/// Computes buffer layout and sources for named textures and binds or
/// unbinds their units for batch execution.
#[derive(Debug, Clone, Copy)]
pub struct TextureBinder {
    bindless: bool,
}

impl TextureBinder {
    /// Capture the bindless capability once for all operations.
    pub fn new(caps: ContextCaps) -> Self {
        Self {
            bindless: caps.bindless_textures,
        }
    }

    pub fn uses_bindless_textures(&self) -> bool {
        self.bindless
    }

    /// Append the buffer fields the handles require.
    ///
    /// 2D and field textures contribute a bindless handle field only when
    /// bindless is enabled; field textures always contribute their
    /// sampling transform; ptex contributes texel and layout handle fields
    /// only when bindless is enabled.
    pub fn get_buffer_specs(&self, textures: &[NamedTextureHandle], specs: &mut Vec<BufferSpec>) {
        for texture in textures {
            match texture.kind {
                TextureKind::Image2d => {
                    if self.bindless {
                        specs.push(BufferSpec::new(&texture.name, BINDLESS_HANDLE_TUPLE));
                    }
                }
                TextureKind::Field => {
                    if self.bindless {
                        specs.push(BufferSpec::new(&texture.name, BINDLESS_HANDLE_TUPLE));
                    }
                    specs.push(BufferSpec::new(
                        sampling_transform_field_name(&texture.name),
                        TupleType {
                            element: ElementType::DoubleMat4,
                            count: 1,
                        },
                    ));
                }
                TextureKind::Ptex => {
                    if self.bindless {
                        specs.push(BufferSpec::new(&texture.name, BINDLESS_HANDLE_TUPLE));
                        specs.push(BufferSpec::new(
                            ptex_layout_field_name(&texture.name),
                            BINDLESS_HANDLE_TUPLE,
                        ));
                    }
                }
                TextureKind::Udim => {
                    log::error!(
                        "Unsupported texture kind Udim for binding {}",
                        texture.name
                    );
                }
            }
        }
    }

    /// Append the value payloads mirroring [`Self::get_buffer_specs`].
    pub fn compute_buffer_sources(
        &self,
        textures: &[NamedTextureHandle],
        sources: &mut Vec<BufferSource>,
    ) {
        let mut op = ComputeSourcesOp {
            bindless: self.bindless,
            sources,
        };
        for texture in textures {
            dispatch(texture, &mut op);
        }
    }

    /// Bind each handle's device objects to its assigned units.
    ///
    /// A no-op under bindless: the 64-bit handles in the parameter buffer
    /// replace unit binding entirely.
    pub fn bind_resources(
        &self,
        textures: &[NamedTextureHandle],
        units: &TextureUnitMap,
        backend: &dyn GpuBackend,
    ) {
        self.bind_internal(textures, units, backend, true);
    }

    /// Unbind the units used by the handles (null texture and sampler).
    ///
    /// Must be paired with every [`Self::bind_resources`] call; also a
    /// no-op under bindless.
    pub fn unbind_resources(
        &self,
        textures: &[NamedTextureHandle],
        units: &TextureUnitMap,
        backend: &dyn GpuBackend,
    ) {
        self.bind_internal(textures, units, backend, false);
    }

    fn bind_internal(
        &self,
        textures: &[NamedTextureHandle],
        units: &TextureUnitMap,
        backend: &dyn GpuBackend,
        bind: bool,
    ) {
        if self.bindless {
            return;
        }
        let mut op = BindOp {
            bind,
            units,
            backend,
        };
        for texture in textures {
            dispatch(texture, &mut op);
        }
    }
}
