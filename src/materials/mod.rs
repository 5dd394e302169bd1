//! Materials: params, network compilation interfaces, the surface shader
//! sink, the built-in fallback shader, and the per-frame synchronizer.

mod fallback;
mod material;
mod network;
mod param;
mod surface;

pub use fallback::FallbackShader;
pub use material::{Material, DEFAULT_MATERIAL_TAG};
pub use network::{
    CompiledNetwork, FixedNetworkCompiler, MaterialNetworkMap, MetadataValue, NetworkCompiler,
    NetworkTextureDescriptor, LIMIT_SURFACE_EVALUATION_KEY,
};
pub use param::{MaterialParam, MaterialParamKind};
pub use surface::{LegacyTextureDescriptor, ShaderStage, SurfaceShader};
