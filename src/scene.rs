//! Scene-graph query interface.
//!
//! Material sync reads the scene through [`SceneDelegate`]; the embedding
//! renderer implements it over its own scene description. The crate ships
//! [`TestSceneDelegate`] so the pipeline can run against preloaded data.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::caps::ContextCaps;
use crate::materials::MaterialNetworkMap;
use crate::textures::TextureResource;
use crate::types::{ScenePath, TextureId};

/// Read access to the scene description during sync.
pub trait SceneDelegate: Send + Sync {
    /// The authored material network for a material prim, if any.
    fn material_network(&self, id: &ScenePath) -> Option<MaterialNetworkMap>;

    /// Stable identifier of the texture behind a connection path.
    /// [`TextureId::INVALID`] when the connection cannot be resolved.
    fn texture_resource_id(&self, path: &ScenePath) -> TextureId;

    /// Load the texture resource behind a connection path. May decode from
    /// disk; called only when the shared caches had nothing.
    fn load_texture_resource(&self, path: &ScenePath) -> Option<Arc<TextureResource>>;

    /// Capabilities of the rendering context.
    fn context_caps(&self) -> ContextCaps;
}

/// Scene double for tests: every answer is preloaded through the builder.
#[derive(Default)]
pub struct TestSceneDelegate {
    networks: HashMap<ScenePath, MaterialNetworkMap>,
    texture_ids: HashMap<ScenePath, TextureId>,
    texture_resources: HashMap<ScenePath, Arc<TextureResource>>,
    caps: ContextCaps,
    load_count: AtomicU64,
}

impl TestSceneDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload a material network under a material path.
    pub fn with_network(mut self, id: impl Into<ScenePath>, network: MaterialNetworkMap) -> Self {
        self.networks.insert(id.into(), network);
        self
    }

    /// Preload a texture id for a connection path.
    pub fn with_texture_id(mut self, path: impl Into<ScenePath>, id: TextureId) -> Self {
        self.texture_ids.insert(path.into(), id);
        self
    }

    /// Preload a loadable texture resource for a connection path.
    pub fn with_texture_resource(
        mut self,
        path: impl Into<ScenePath>,
        resource: Arc<TextureResource>,
    ) -> Self {
        self.texture_resources.insert(path.into(), resource);
        self
    }

    /// Set the reported context capabilities.
    pub fn with_caps(mut self, caps: ContextCaps) -> Self {
        self.caps = caps;
        self
    }

    /// How many fresh loads were requested so far.
    pub fn load_count(&self) -> u64 {
        self.load_count.load(Ordering::Relaxed)
    }
}

impl SceneDelegate for TestSceneDelegate {
    fn material_network(&self, id: &ScenePath) -> Option<MaterialNetworkMap> {
        self.networks.get(id).cloned()
    }

    fn texture_resource_id(&self, path: &ScenePath) -> TextureId {
        self.texture_ids
            .get(path)
            .copied()
            .unwrap_or(TextureId::INVALID)
    }

    fn load_texture_resource(&self, path: &ScenePath) -> Option<Arc<TextureResource>> {
        self.load_count.fetch_add(1, Ordering::Relaxed);
        self.texture_resources.get(path).cloned()
    }

    fn context_caps(&self) -> ContextCaps {
        self.caps
    }
}

// Ensure TestSceneDelegate is Send + Sync
static_assertions::assert_impl_all!(TestSceneDelegate: Send, Sync);
