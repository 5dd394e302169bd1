//! Error types surfaced to the embedding renderer.
//!
//! Data problems during a sync (missing assets, unresolvable connections)
//! are not errors at this level; they degrade to fallback resources and are
//! reported through `log`. This type covers hard limits the embedding code
//! must react to.

use thiserror::Error;

/// Pipeline error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Texture unit table exhausted (limit {0})")]
    TextureUnitsExhausted(u32),
}

pub type Result<T> = std::result::Result<T, Error>;
