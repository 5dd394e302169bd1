//! Shared value and layout primitives.
//!
//! These types describe material parameter values, the GPU buffer layout
//! they occupy, sampler state, and scene paths. They are deliberately
//! backend-agnostic; realizing them on a device goes through
//! [`crate::backend::GpuBackend`].

mod buffer;
mod path;
mod sampler;
mod value;

pub use buffer::{BufferSource, BufferSpec, ElementType, TupleType, BINDLESS_HANDLE_TUPLE};
pub use path::{ScenePath, TextureId, TextureKey};
pub use sampler::{MagFilter, MinFilter, SamplerParameters, WrapMode};
pub use value::ParamValue;
