//! Rendering context capabilities.

/// Capabilities of the rendering context, queried once at startup and
/// carried by value from then on.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextCaps {
    /// Whether the context can expose textures as 64-bit bindless handles
    /// usable directly from buffers.
    pub bindless_textures: bool,
}

impl ContextCaps {
    pub fn new(bindless_textures: bool) -> Self {
        Self { bindless_textures }
    }
}
