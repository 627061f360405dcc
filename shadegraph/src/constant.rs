//! Host constants lifted into the DAG.

use std::convert::TryFrom;

use crate::{
  error::{Error, Result},
  format::{ArraySize, PinFormat, PinSignature},
  types::{ToFormat, M22, M33, M44, V2, V3, V4},
};

/// Value of a constant node.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantValue {
  // scalars
  Int(i32),
  UInt(u32),
  Float(f32),
  Bool(bool),
  // vectors
  Int2([i32; 2]),
  UInt2([u32; 2]),
  Float2([f32; 2]),
  Bool2([bool; 2]),
  Int3([i32; 3]),
  UInt3([u32; 3]),
  Float3([f32; 3]),
  Bool3([bool; 3]),
  Int4([i32; 4]),
  UInt4([u32; 4]),
  Float4([f32; 4]),
  Bool4([bool; 4]),
  // matrices
  M22(M22),
  M33(M33),
  M44(M44),
  // arrays
  Array(Vec<ConstantValue>),
}

impl ConstantValue {
  /// Format of a single (non-array) value; [`None`] for arrays.
  fn element_format(&self) -> Option<PinFormat> {
    use ConstantValue::*;

    let fmt = match self {
      Int(_) => PinFormat::Integer,
      UInt(_) => PinFormat::UInteger,
      Float(_) => PinFormat::Float,
      Bool(_) => PinFormat::Bool,
      Int2(_) => PinFormat::Integerx2,
      UInt2(_) => PinFormat::UIntegerx2,
      Float2(_) => PinFormat::Floatx2,
      Bool2(_) => PinFormat::Boolx2,
      Int3(_) => PinFormat::Integerx3,
      UInt3(_) => PinFormat::UIntegerx3,
      Float3(_) => PinFormat::Floatx3,
      Bool3(_) => PinFormat::Boolx3,
      Int4(_) => PinFormat::Integerx4,
      UInt4(_) => PinFormat::UIntegerx4,
      Float4(_) => PinFormat::Floatx4,
      Bool4(_) => PinFormat::Boolx4,
      ConstantValue::M22(_) => PinFormat::Float2x2,
      ConstantValue::M33(_) => PinFormat::Float3x3,
      ConstantValue::M44(_) => PinFormat::Float4x4,
      Array(_) => return None,
    };

    Some(fmt)
  }

  /// Signature of the pin holding this value.
  ///
  /// Arrays must be non-empty, flat and homogeneous; anything else has no pin format and fails with
  /// [`Error::UnsupportedFormat`].
  pub fn signature(&self) -> Result<PinSignature> {
    match self {
      ConstantValue::Array(items) => {
        let first = items
          .first()
          .ok_or_else(|| Error::UnsupportedFormat("empty array".to_owned()))?;
        let format = first
          .element_format()
          .ok_or_else(|| Error::UnsupportedFormat("array of arrays".to_owned()))?;

        if let Some(odd) = items.iter().find(|item| item.element_format() != Some(format)) {
          return Err(Error::UnsupportedFormat(format!(
            "heterogeneous array mixing {:?} and {:?}",
            format, odd
          )));
        }

        let len = u32::try_from(items.len())
          .map_err(|_| Error::UnsupportedFormat(format!("array of {} items", items.len())))?;

        Ok(PinSignature::array(format, ArraySize::Fixed(len)))
      }

      value => match value.element_format() {
        Some(format) => Ok(PinSignature::value(format)),
        None => Err(Error::UnsupportedFormat(format!("{:?}", value))),
      },
    }
  }
}

/// Host values that can be lifted into constant nodes.
pub trait Fixed: ToFormat {
  fn to_constant(self) -> ConstantValue;
}

macro_rules! impl_Fixed {
  (vector $t:ty, $q:ident) => {
    impl Fixed for $t {
      fn to_constant(self) -> ConstantValue {
        ConstantValue::$q(self.0)
      }
    }

    impl From<$t> for ConstantValue {
      fn from(a: $t) -> Self {
        ConstantValue::$q(a.0)
      }
    }
  };

  ($t:ty, $q:ident) => {
    impl Fixed for $t {
      fn to_constant(self) -> ConstantValue {
        ConstantValue::$q(self)
      }
    }

    impl From<$t> for ConstantValue {
      fn from(a: $t) -> Self {
        ConstantValue::$q(a)
      }
    }
  };
}

impl_Fixed!(i32, Int);
impl_Fixed!(u32, UInt);
impl_Fixed!(f32, Float);
impl_Fixed!(bool, Bool);
impl_Fixed!(vector V2<i32>, Int2);
impl_Fixed!(vector V2<u32>, UInt2);
impl_Fixed!(vector V2<f32>, Float2);
impl_Fixed!(vector V2<bool>, Bool2);
impl_Fixed!(vector V3<i32>, Int3);
impl_Fixed!(vector V3<u32>, UInt3);
impl_Fixed!(vector V3<f32>, Float3);
impl_Fixed!(vector V3<bool>, Bool3);
impl_Fixed!(vector V4<i32>, Int4);
impl_Fixed!(vector V4<u32>, UInt4);
impl_Fixed!(vector V4<f32>, Float4);
impl_Fixed!(vector V4<bool>, Bool4);
impl_Fixed!(M22, M22);
impl_Fixed!(M33, M33);
impl_Fixed!(M44, M44);

impl<T> From<Vec<T>> for ConstantValue
where
  T: Fixed,
{
  fn from(items: Vec<T>) -> Self {
    ConstantValue::Array(items.into_iter().map(Fixed::to_constant).collect())
  }
}
