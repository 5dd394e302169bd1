//! Scene paths and texture identity.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Path of an object in the scene graph.
///
/// An empty path means "nothing authored" and is used to represent a
/// missing texture connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScenePath(String);

impl ScenePath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScenePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScenePath {
    fn from(path: &str) -> Self {
        Self(path.to_owned())
    }
}

impl From<String> for ScenePath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

/// Stable local identifier of a texture, derived from its connection path.
///
/// The invalid id marks connections the scene could not resolve; it never
/// participates in cache lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(u64);

impl TextureId {
    pub const INVALID: TextureId = TextureId(u64::MAX);

    pub fn from_path(path: &ScenePath) -> Self {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        path.hash(&mut hasher);
        Self(hasher.finish())
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Global deduplication key for the shared registry caches.
///
/// Resource keys and handle keys are derived from different namespaces so
/// a resource and its handle never collide in a shared map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureKey(u64);

impl TextureKey {
    /// Key for the texture resource identified by a local id.
    pub fn for_resource(id: TextureId) -> Self {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        0u8.hash(&mut hasher);
        id.raw().hash(&mut hasher);
        Self(hasher.finish())
    }

    /// Key for the shared resource handle of a connection path.
    pub fn for_handle(path: &ScenePath) -> Self {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        1u8.hash(&mut hasher);
        path.hash(&mut hasher);
        Self(hasher.finish())
    }
}
