//! Typed parameter values.

use glam::DMat4;

use super::{ElementType, TupleType};

/// A material parameter value.
///
/// Covers the value types a shading network can author on a parameter.
/// Every variant maps to exactly one buffer element type, so a value can
/// always describe its own GPU layout.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Int(i32),
    UintVec2([u32; 2]),
    Matrix4d(DMat4),
}

impl ParamValue {
    /// The buffer layout occupied by this value.
    pub fn tuple_type(&self) -> TupleType {
        let element = match self {
            ParamValue::Float(_) => ElementType::Float,
            ParamValue::Vec2(_) => ElementType::FloatVec2,
            ParamValue::Vec3(_) => ElementType::FloatVec3,
            ParamValue::Vec4(_) => ElementType::FloatVec4,
            ParamValue::Int(_) => ElementType::Int32,
            ParamValue::UintVec2(_) => ElementType::UintVec2,
            ParamValue::Matrix4d(_) => ElementType::DoubleMat4,
        };
        TupleType { element, count: 1 }
    }

    /// Raw bytes for buffer upload.
    pub fn as_bytes(&self) -> Vec<u8> {
        match self {
            ParamValue::Float(v) => bytemuck::bytes_of(v).to_vec(),
            ParamValue::Vec2(v) => bytemuck::bytes_of(v).to_vec(),
            ParamValue::Vec3(v) => bytemuck::bytes_of(v).to_vec(),
            ParamValue::Vec4(v) => bytemuck::bytes_of(v).to_vec(),
            ParamValue::Int(v) => bytemuck::bytes_of(v).to_vec(),
            ParamValue::UintVec2(v) => bytemuck::bytes_of(v).to_vec(),
            ParamValue::Matrix4d(m) => bytemuck::bytes_of(&m.to_cols_array()).to_vec(),
        }
    }

    /// The value's components widened to RGBA, used for 1x1 fallback texels.
    pub fn as_rgba(&self) -> [f32; 4] {
        match self {
            ParamValue::Float(v) => [*v, *v, *v, 1.0],
            ParamValue::Vec2(v) => [v[0], v[1], 0.0, 1.0],
            ParamValue::Vec3(v) => [v[0], v[1], v[2], 1.0],
            ParamValue::Vec4(v) => *v,
            ParamValue::Int(v) => {
                let f = *v as f32;
                [f, f, f, 1.0]
            }
            ParamValue::UintVec2(v) => [v[0] as f32, v[1] as f32, 0.0, 1.0],
            ParamValue::Matrix4d(_) => [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl Default for ParamValue {
    fn default() -> Self {
        ParamValue::Vec3([0.0, 0.0, 0.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_type_mapping() {
        assert_eq!(
            ParamValue::Float(1.0).tuple_type().element,
            ElementType::Float
        );
        assert_eq!(
            ParamValue::Vec3([0.0; 3]).tuple_type().element,
            ElementType::FloatVec3
        );
        assert_eq!(
            ParamValue::Matrix4d(DMat4::IDENTITY).tuple_type().element,
            ElementType::DoubleMat4
        );
    }

    #[test]
    fn test_byte_sizes_match_layout() {
        let cases = [
            ParamValue::Float(0.5),
            ParamValue::Vec2([1.0, 2.0]),
            ParamValue::Vec4([0.0; 4]),
            ParamValue::Int(-3),
            ParamValue::UintVec2([7, 9]),
            ParamValue::Matrix4d(DMat4::IDENTITY),
        ];
        for value in cases {
            assert_eq!(
                value.as_bytes().len(),
                value.tuple_type().size_bytes(),
                "size mismatch for {:?}",
                value
            );
        }
    }

    #[test]
    fn test_rgba_widening() {
        assert_eq!(ParamValue::Float(0.25).as_rgba(), [0.25, 0.25, 0.25, 1.0]);
        assert_eq!(
            ParamValue::Vec3([0.1, 0.2, 0.3]).as_rgba(),
            [0.1, 0.2, 0.3, 1.0]
        );
        assert_eq!(
            ParamValue::Vec4([0.1, 0.2, 0.3, 0.4]).as_rgba(),
            [0.1, 0.2, 0.3, 0.4]
        );
    }
}
