//! Sampler state descriptions.

/// Texture coordinate wrap mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    Clamp,
    Repeat,
    Mirror,
    Black,
}

/// Minification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapLinear,
}

/// Magnification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MagFilter {
    Nearest,
    Linear,
}

/// Sampler state authored on a texture parameter.
///
/// Hashable and comparable so it can participate in texture handle
/// deduplication keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerParameters {
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub wrap_r: WrapMode,
    pub min_filter: MinFilter,
    pub mag_filter: MagFilter,
}

impl SamplerParameters {
    /// Sampler state for synthesized 1x1 fallback textures.
    pub fn fallback() -> Self {
        Self {
            wrap_s: WrapMode::Clamp,
            wrap_t: WrapMode::Clamp,
            wrap_r: WrapMode::Clamp,
            min_filter: MinFilter::Nearest,
            mag_filter: MagFilter::Nearest,
        }
    }

    /// Set all three wrap modes.
    pub fn with_wrap_modes(mut self, s: WrapMode, t: WrapMode, r: WrapMode) -> Self {
        self.wrap_s = s;
        self.wrap_t = t;
        self.wrap_r = r;
        self
    }

    /// Set min and mag filters.
    pub fn with_filters(mut self, min: MinFilter, mag: MagFilter) -> Self {
        self.min_filter = min;
        self.mag_filter = mag;
        self
    }
}

impl Default for SamplerParameters {
    fn default() -> Self {
        Self {
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
            wrap_r: WrapMode::Repeat,
            min_filter: MinFilter::LinearMipmapLinear,
            mag_filter: MagFilter::Linear,
        }
    }
}
