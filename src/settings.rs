//! Runtime settings for the material pipeline.

/// Environment variable selecting the indirect (handle-based) texture
/// strategy. Accepts `1` or `true`.
pub const INDIRECT_TEXTURES_ENV: &str = "SHADEGRAPH_INDIRECT_TEXTURES";

/// Process-wide pipeline settings, owned by the embedding renderer and
/// passed into every sync call.
///
/// `indirect_textures` selects between the legacy direct-resource texture
/// strategy and the handle-indirected one. Sync reads it once at entry, so
/// mutating it mid-frame only takes effect on the next sync.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderSettings {
    /// Use the handle-indirected texture system for the kinds that
    /// support it.
    pub indirect_textures: bool,
}

impl RenderSettings {
    pub fn new(indirect_textures: bool) -> Self {
        Self { indirect_textures }
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        let indirect_textures = std::env::var(INDIRECT_TEXTURES_ENV)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self { indirect_textures }
    }
}
