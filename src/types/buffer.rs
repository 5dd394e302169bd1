//! Buffer layout specs and value sources.
//!
//! A [`BufferSpec`] names one field of an aggregated parameter buffer and
//! its layout; a [`BufferSource`] pairs the same name with the bytes to
//! upload. Material sync accumulates matched spec/source lists and hands
//! them to the surface shader for a later aggregate upload.

use glam::DMat4;

use super::ParamValue;

/// Element type of a buffer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Float,
    FloatVec2,
    FloatVec3,
    FloatVec4,
    Int32,
    /// Two-component 32-bit unsigned vector. Carries 64-bit bindless
    /// handles split across two components.
    UintVec2,
    /// 4x4 double-precision matrix.
    DoubleMat4,
}

impl ElementType {
    /// Size of one element in bytes.
    pub fn size_bytes(self) -> usize {
        match self {
            ElementType::Float => 4,
            ElementType::FloatVec2 => 8,
            ElementType::FloatVec3 => 12,
            ElementType::FloatVec4 => 16,
            ElementType::Int32 => 4,
            ElementType::UintVec2 => 8,
            ElementType::DoubleMat4 => 128,
        }
    }
}

/// Element type plus array arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TupleType {
    pub element: ElementType,
    pub count: usize,
}

impl TupleType {
    /// Total byte size of the field.
    pub fn size_bytes(self) -> usize {
        self.element.size_bytes() * self.count
    }
}

/// Layout of a bindless texture handle field (64-bit handle as uvec2).
pub const BINDLESS_HANDLE_TUPLE: TupleType = TupleType {
    element: ElementType::UintVec2,
    count: 1,
};

/// One named field of the aggregated parameter buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferSpec {
    pub name: String,
    pub tuple_type: TupleType,
}

impl BufferSpec {
    pub fn new(name: impl Into<String>, tuple_type: TupleType) -> Self {
        Self {
            name: name.into(),
            tuple_type,
        }
    }
}

/// A named value payload destined for the aggregated parameter buffer.
#[derive(Debug, Clone)]
pub struct BufferSource {
    name: String,
    tuple_type: TupleType,
    data: Vec<u8>,
}

impl BufferSource {
    /// Source holding a parameter value's bytes.
    pub fn from_value(name: impl Into<String>, value: &ParamValue) -> Self {
        Self {
            name: name.into(),
            tuple_type: value.tuple_type(),
            data: value.as_bytes(),
        }
    }

    /// Source holding a 64-bit bindless texture handle, passed as uvec2.
    ///
    /// A zero handle means the resource never allocated on the GPU. That is
    /// a coding error upstream; it is logged and the source is still
    /// produced so the aggregate layout stays consistent.
    pub fn bindless_handle(name: impl Into<String>, handle: u64) -> Self {
        let name = name.into();
        if handle == 0 {
            log::error!("Invalid texture handle: {}: {}", name, handle);
        }
        Self {
            name,
            tuple_type: BINDLESS_HANDLE_TUPLE,
            data: bytemuck::bytes_of(&handle).to_vec(),
        }
    }

    /// Source holding a field texture's grid-to-world sampling transform.
    pub fn sampling_transform(name: impl Into<String>, transform: DMat4) -> Self {
        Self {
            name: name.into(),
            tuple_type: TupleType {
                element: ElementType::DoubleMat4,
                count: 1,
            },
            data: bytemuck::bytes_of(&transform.to_cols_array()).to_vec(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tuple_type(&self) -> TupleType {
        self.tuple_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The spec this source fills.
    pub fn spec(&self) -> BufferSpec {
        BufferSpec::new(self.name.clone(), self.tuple_type)
    }
}
