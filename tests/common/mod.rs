//! Common utilities for material pipeline integration tests.
//!
//! Builds the full stack (null backend, registry, scene double, tracker)
//! around a material so tests drive sync the way an embedding renderer
//! would.

use std::sync::Arc;

use shadegraph::{
    ChangeTracker, CompiledNetwork, ContextCaps, FixedNetworkCompiler, Material,
    MaterialNetworkMap, NullBackend, RenderSettings, ResourceRegistry, TestSceneDelegate,
};

/// Material path used by most tests.
pub const WOOD_MATERIAL: &str = "/materials/wood";

/// Connection path of the wood material's diffuse texture.
pub const WOOD_DIFFUSE: &str = "/materials/wood/diffuse";

/// Registry over a [`NullBackend`]; the backend is returned separately so
/// tests can inspect allocations and the bind log.
pub fn create_registry(bindless: bool) -> (Arc<NullBackend>, ResourceRegistry) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();
    let backend = if bindless {
        Arc::new(NullBackend::with_bindless())
    } else {
        Arc::new(NullBackend::new())
    };
    let registry = ResourceRegistry::new(backend.clone());
    (backend, registry)
}

/// A scene holding one valid network for `id`, reporting the given caps.
pub fn create_scene(id: &str, caps: ContextCaps) -> TestSceneDelegate {
    TestSceneDelegate::new()
        .with_network(
            id,
            MaterialNetworkMap::new()
                .with_terminal(format!("{id}/surface"))
                .with_network("surface", "preview_surface"),
        )
        .with_caps(caps)
}

/// A material whose compiler always returns `network`.
pub fn create_material(id: &str, network: CompiledNetwork) -> Material {
    Material::new(id).with_compiler(Arc::new(FixedNetworkCompiler::new(network)))
}

/// Run one full sync with all-dirty bits.
pub fn sync_material(
    material: &mut Material,
    scene: &TestSceneDelegate,
    registry: &ResourceRegistry,
    settings: &RenderSettings,
    tracker: &ChangeTracker,
) {
    let mut bits = material.initial_dirty_bits();
    material.sync(scene, registry, settings, tracker, &mut bits);
}
