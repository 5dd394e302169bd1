//! Shading-network parameters.
//!
//! A [`MaterialParam`] is one input of a compiled network: a plain
//! constant, a primvar redirect, or a texture connection. Params are
//! produced by the network compiler each sync and consumed by the
//! material to build buffer layouts and resolve textures.

use crate::textures::TextureKind;
use crate::types::{ParamValue, SamplerParameters, ScenePath};

/// How a parameter obtains its value.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialParamKind {
    /// Constant value only.
    Fallback,
    /// Reads a primvar at shading time. Contributes its constant value to
    /// material buffers like a fallback param.
    PrimvarRedirect {
        /// Name of the primvar to read.
        primvar: String,
    },
    /// Samples a texture.
    Texture {
        /// Scene path of the texture connection; empty when unauthored.
        connection: ScenePath,
        /// Kind of texture sampled.
        texture_kind: TextureKind,
        /// Sampler state requested by the network.
        sampler: SamplerParameters,
        /// Requested GPU memory budget in bytes, zero for unbounded.
        memory_budget: u64,
    },
}

/// One input of a compiled shading network.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialParam {
    /// Field name in material buffers and shader code.
    pub name: String,

    /// How the value is obtained.
    pub kind: MaterialParamKind,

    /// Constant used directly by fallback and primvar params, and as the
    /// 1x1 fallback texel when a texture cannot be resolved.
    pub fallback_value: ParamValue,
}

impl MaterialParam {
    /// Create a constant-valued parameter.
    pub fn fallback(name: impl Into<String>, value: ParamValue) -> Self {
        Self {
            name: name.into(),
            kind: MaterialParamKind::Fallback,
            fallback_value: value,
        }
    }

    /// Create a primvar-redirect parameter.
    pub fn primvar_redirect(
        name: impl Into<String>,
        primvar: impl Into<String>,
        value: ParamValue,
    ) -> Self {
        Self {
            name: name.into(),
            kind: MaterialParamKind::PrimvarRedirect {
                primvar: primvar.into(),
            },
            fallback_value: value,
        }
    }

    /// Create a texture parameter with default sampler state and an
    /// unbounded memory budget.
    pub fn texture(
        name: impl Into<String>,
        connection: impl Into<ScenePath>,
        texture_kind: TextureKind,
        fallback_value: ParamValue,
    ) -> Self {
        Self {
            name: name.into(),
            kind: MaterialParamKind::Texture {
                connection: connection.into(),
                texture_kind,
                sampler: SamplerParameters::default(),
                memory_budget: 0,
            },
            fallback_value,
        }
    }

    /// Set the sampler state. No effect on non-texture params.
    pub fn with_sampler(mut self, sampler_parameters: SamplerParameters) -> Self {
        if let MaterialParamKind::Texture { sampler, .. } = &mut self.kind {
            *sampler = sampler_parameters;
        }
        self
    }

    /// Set the memory budget in bytes. No effect on non-texture params.
    pub fn with_memory_budget(mut self, budget: u64) -> Self {
        if let MaterialParamKind::Texture { memory_budget, .. } = &mut self.kind {
            *memory_budget = budget;
        }
        self
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.kind, MaterialParamKind::Fallback)
    }

    pub fn is_primvar_redirect(&self) -> bool {
        matches!(self.kind, MaterialParamKind::PrimvarRedirect { .. })
    }

    pub fn is_texture(&self) -> bool {
        matches!(self.kind, MaterialParamKind::Texture { .. })
    }

    /// Whether this is a ptex texture parameter.
    pub fn is_ptex(&self) -> bool {
        self.texture_kind() == Some(TextureKind::Ptex)
    }

    /// The texture connection path, for texture params.
    pub fn connection(&self) -> Option<&ScenePath> {
        match &self.kind {
            MaterialParamKind::Texture { connection, .. } => Some(connection),
            _ => None,
        }
    }

    /// The texture kind, for texture params.
    pub fn texture_kind(&self) -> Option<TextureKind> {
        match &self.kind {
            MaterialParamKind::Texture { texture_kind, .. } => Some(*texture_kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_predicates() {
        let constant = MaterialParam::fallback("roughness", ParamValue::Float(0.5));
        assert!(constant.is_fallback());
        assert!(!constant.is_texture());
        assert_eq!(constant.connection(), None);

        let primvar =
            MaterialParam::primvar_redirect("color", "displayColor", ParamValue::default());
        assert!(primvar.is_primvar_redirect());
        assert!(!primvar.is_ptex());

        let texture = MaterialParam::texture(
            "colorMap",
            "/materials/wood/diffuse",
            TextureKind::Image2d,
            ParamValue::Vec3([1.0, 0.0, 1.0]),
        );
        assert!(texture.is_texture());
        assert_eq!(texture.texture_kind(), Some(TextureKind::Image2d));
        assert_eq!(
            texture.connection().map(ScenePath::as_str),
            Some("/materials/wood/diffuse")
        );
    }

    #[test]
    fn test_texture_param_builders() {
        let param = MaterialParam::texture(
            "faces",
            "/materials/skin/faces",
            TextureKind::Ptex,
            ParamValue::default(),
        )
        .with_sampler(SamplerParameters::fallback())
        .with_memory_budget(64 * 1024 * 1024);

        assert!(param.is_ptex());
        match &param.kind {
            MaterialParamKind::Texture {
                sampler,
                memory_budget,
                ..
            } => {
                assert_eq!(*sampler, SamplerParameters::fallback());
                assert_eq!(*memory_budget, 64 * 1024 * 1024);
            }
            _ => panic!("expected a texture param"),
        }
    }

    #[test]
    fn test_builders_ignore_non_texture_params() {
        let param = MaterialParam::fallback("metallic", ParamValue::Float(0.0))
            .with_memory_budget(1024);
        assert_eq!(param.kind, MaterialParamKind::Fallback);
    }
}
