//! Built-in fallback surface shader.
//!
//! Substituted when a material has no authored network or its network
//! compiles to no sources. Loaded once by the resource registry and
//! shared by every material that needs it.

use std::collections::HashMap;

use super::network::MetadataValue;

/// WGSL source of the fallback surface.
const FALLBACK_SURFACE_WGSL: &str = include_str!("../../shaders/fallback_surface.wgsl");

/// Entry point the draw layer expects in the fallback source.
const FALLBACK_ENTRY_POINT: &str = "fs_main";

/// The surface shading used when nothing else is available.
#[derive(Debug)]
pub struct FallbackShader {
    surface_source: String,
    metadata: HashMap<String, MetadataValue>,
    valid: bool,
}

impl FallbackShader {
    /// Load and validate the embedded fallback surface.
    ///
    /// Load failure is logged but not fatal; the shader is handed out
    /// anyway so rendering degrades visibly instead of stopping.
    pub fn load() -> Self {
        let surface_source = FALLBACK_SURFACE_WGSL.to_string();
        let valid = !surface_source.is_empty() && surface_source.contains(FALLBACK_ENTRY_POINT);
        if !valid {
            log::error!("Failed to load the fallback surface shader");
        }
        Self {
            surface_source,
            metadata: HashMap::new(),
            valid,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Fragment source of the fallback surface.
    pub fn surface_source(&self) -> &str {
        &self.surface_source
    }

    /// Metadata to install alongside the source.
    pub fn metadata(&self) -> &HashMap<String, MetadataValue> {
        &self.metadata
    }
}
