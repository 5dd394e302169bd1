//! Shading-network compilation interface.
//!
//! The scene describes a material as a [`MaterialNetworkMap`]: opaque node
//! graphs keyed by terminal. A [`NetworkCompiler`] turns that description
//! into the [`CompiledNetwork`] outputs the synchronizer consumes. Real
//! compilers live in the embedding renderer; the crate ships
//! [`FixedNetworkCompiler`] for tests and tooling.

use std::collections::HashMap;

use crate::textures::TextureKind;
use crate::types::{SamplerParameters, ScenePath, TextureId};

use super::param::{MaterialParam, MaterialParamKind};

/// Metadata key marking surfaces that evaluate the subdivision limit
/// surface.
pub const LIMIT_SURFACE_EVALUATION_KEY: &str = "limitSurfaceEvaluation";

/// Value of one metadata entry attached to a compiled network.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Bool(bool),
    String(String),
    Float(f64),
}

/// Scene-side description of a material: one node graph per terminal.
///
/// The graphs themselves are opaque to this crate; only compilers
/// interpret them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialNetworkMap {
    /// Paths of the terminal nodes (surface, displacement, volume).
    pub terminals: Vec<ScenePath>,

    /// Serialized node graph per terminal name.
    pub networks: HashMap<String, String>,
}

impl MaterialNetworkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether there is anything to compile. A map without terminals or
    /// without graphs compiles to nothing.
    pub fn is_valid(&self) -> bool {
        !self.terminals.is_empty() && !self.networks.is_empty()
    }

    /// Add a terminal node path.
    pub fn with_terminal(mut self, path: impl Into<ScenePath>) -> Self {
        self.terminals.push(path.into());
        self
    }

    /// Add a node graph under a terminal name.
    pub fn with_network(mut self, terminal: impl Into<String>, graph: impl Into<String>) -> Self {
        self.networks.insert(terminal.into(), graph.into());
        self
    }
}

/// Description of one texture a compiled network samples, used by the
/// handle-based allocation strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkTextureDescriptor {
    /// Parameter name the texture feeds.
    pub name: String,
    /// Stable identity of the texture.
    pub id: TextureId,
    /// Kind of texture.
    pub kind: TextureKind,
    /// Sampler state requested by the network.
    pub sampler: SamplerParameters,
    /// Requested GPU memory budget in bytes.
    pub memory_budget: u64,
}

/// Everything the synchronizer needs from a compiled network.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledNetwork {
    /// Fragment shading source. Empty when the network has no surface.
    pub fragment_source: String,

    /// Displacement source. Empty when the network has no displacement.
    pub geometry_source: String,

    /// Material tag routing drawn prims into render buckets. Empty means
    /// "no opinion"; the material substitutes its default tag.
    pub material_tag: String,

    /// Inputs of the network, in declaration order.
    pub params: Vec<MaterialParam>,

    /// Free-form metadata authored on the network.
    pub metadata: HashMap<String, MetadataValue>,
}

impl CompiledNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fragment shading source.
    pub fn with_fragment_source(mut self, source: impl Into<String>) -> Self {
        self.fragment_source = source.into();
        self
    }

    /// Set the displacement source.
    pub fn with_geometry_source(mut self, source: impl Into<String>) -> Self {
        self.geometry_source = source.into();
        self
    }

    /// Set the material tag.
    pub fn with_material_tag(mut self, tag: impl Into<String>) -> Self {
        self.material_tag = tag.into();
        self
    }

    /// Add a parameter.
    pub fn with_param(mut self, param: MaterialParam) -> Self {
        self.params.push(param);
        self
    }

    /// Add a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Whether the network produced no shading sources at all.
    pub fn has_no_sources(&self) -> bool {
        self.fragment_source.is_empty() && self.geometry_source.is_empty()
    }

    /// Whether the surface asks for limit-surface evaluation.
    pub fn limit_surface_evaluation(&self) -> bool {
        matches!(
            self.metadata.get(LIMIT_SURFACE_EVALUATION_KEY),
            Some(MetadataValue::Bool(true))
        )
    }

    /// Descriptors of the textures the network samples, in param order.
    ///
    /// Only authored connections contribute; params with an empty
    /// connection fall back through the direct-resource path instead.
    pub fn texture_descriptors(&self) -> Vec<NetworkTextureDescriptor> {
        self.params
            .iter()
            .filter_map(|param| match &param.kind {
                MaterialParamKind::Texture {
                    connection,
                    texture_kind,
                    sampler,
                    memory_budget,
                } if !connection.is_empty() => Some(NetworkTextureDescriptor {
                    name: param.name.clone(),
                    id: TextureId::from_path(connection),
                    kind: *texture_kind,
                    sampler: *sampler,
                    memory_budget: *memory_budget,
                }),
                _ => None,
            })
            .collect()
    }
}

/// Compiles a material network into GPU-facing outputs.
pub trait NetworkCompiler: Send + Sync {
    /// Produce shading sources, parameters, and metadata for a material's
    /// network. Called once per sync of a dirty material.
    fn process_material_network(
        &self,
        id: &ScenePath,
        network: &MaterialNetworkMap,
    ) -> CompiledNetwork;

    /// Drop any memoized compilation state.
    ///
    /// Called when a material is explicitly reloaded so the next sync
    /// recompiles from the scene. The default does nothing; stateless
    /// compilers can ignore it.
    fn invalidate(&self) {}
}

/// Compiler double returning preconfigured outputs for every network.
#[derive(Debug, Clone, Default)]
pub struct FixedNetworkCompiler {
    output: CompiledNetwork,
}

impl FixedNetworkCompiler {
    pub fn new(output: CompiledNetwork) -> Self {
        Self { output }
    }
}

impl NetworkCompiler for FixedNetworkCompiler {
    fn process_material_network(
        &self,
        _id: &ScenePath,
        _network: &MaterialNetworkMap,
    ) -> CompiledNetwork {
        self.output.clone()
    }
}
