//! # Shadegraph
//!
//! Material synchronization and texture binding for a scene-graph renderer.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`Material`] - Per-frame synchronization of scene materials into
//!   GPU-facing state
//! - [`TextureBinder`] - Buffer layout and unit binding for named textures
//! - [`ResourceRegistry`] - Shared caches deduplicating texture state
//!   across materials
//! - Two texture strategies: legacy direct resources and handle-indirected
//!   allocation, selected by [`RenderSettings`] at runtime
//!
//! ## Example
//!
//! ```ignore
//! use shadegraph::{Material, RenderSettings, ResourceRegistry};
//!
//! let registry = ResourceRegistry::new(backend);
//! let settings = RenderSettings::from_env();
//!
//! let mut material = Material::new("/materials/wood");
//! let mut dirty_bits = material.initial_dirty_bits();
//! material.sync(&scene, &registry, &settings, &tracker, &mut dirty_bits);
//! ```

pub mod backend;
pub mod caps;
pub mod error;
pub mod materials;
pub mod registry;
pub mod scene;
pub mod settings;
pub mod textures;
pub mod tracking;
pub mod types;

// Re-export main types for convenience
pub use backend::{BindTarget, GpuBackend, NullBackend};
pub use caps::ContextCaps;
pub use error::{Error, Result};
pub use materials::{
    CompiledNetwork, FallbackShader, FixedNetworkCompiler, Material, MaterialNetworkMap,
    MaterialParam, MaterialParamKind, NetworkCompiler, ShaderStage, SurfaceShader,
};
pub use registry::ResourceRegistry;
pub use scene::{SceneDelegate, TestSceneDelegate};
pub use settings::RenderSettings;
pub use textures::{NamedTextureHandle, TextureBinder, TextureKind, TextureUnitMap};
pub use tracking::{ChangeTracker, MaterialDirtyBits};
pub use types::{ParamValue, SamplerParameters, ScenePath};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
