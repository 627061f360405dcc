//! Array reads and writes.

use crate::{
  binder::{Binder, Integerx1, PinArray, UIntegerx1},
  constant::{ConstantValue, Fixed},
  error::{built, Result},
  generator::{Arg, CodeGenerator, IntoOperand},
  operation::Operation,
  types::ToFormat,
};

/// Index of an array element.
///
/// Either a host literal, inserted as a `UInteger` constant, or an integer binder from the array’s generator.
#[derive(Clone, Debug)]
pub enum ArrayIndex<'a> {
  Literal(u32),
  Integer(&'a Integerx1),
  UInteger(&'a UIntegerx1),
}

impl<'a> ArrayIndex<'a> {
  fn into_arg(self) -> Arg {
    match self {
      ArrayIndex::Literal(i) => Arg::Fixed(ConstantValue::UInt(i)),
      ArrayIndex::Integer(b) => b.into(),
      ArrayIndex::UInteger(b) => b.into(),
    }
  }
}

impl<'a> From<u32> for ArrayIndex<'a> {
  fn from(i: u32) -> Self {
    ArrayIndex::Literal(i)
  }
}

impl<'a> From<&'a Integerx1> for ArrayIndex<'a> {
  fn from(b: &'a Integerx1) -> Self {
    ArrayIndex::Integer(b)
  }
}

impl<'a> From<&'a UIntegerx1> for ArrayIndex<'a> {
  fn from(b: &'a UIntegerx1) -> Self {
    ArrayIndex::UInteger(b)
  }
}

impl CodeGenerator {
  /// Read the element of `array` at `index`.
  ///
  /// # Errors
  ///
  /// [`Error::GeneratorMismatch`](crate::error::Error::GeneratorMismatch) if `array` or `index` come from another
  /// generator.
  pub fn index<'a, T>(&self, array: &PinArray<T>, index: impl Into<ArrayIndex<'a>>) -> Result<Binder<T>>
  where
    T: ToFormat,
  {
    let index: ArrayIndex = index.into();
    let pins = self.insert(
      Operation::Index,
      vec![array.into(), index.into_arg()],
      |_, _| Ok(()),
    )?;

    Ok(Binder::new(pins[0], self.clone()))
  }

  /// Replace the element of `array` at `index` with `value`.
  ///
  /// `array` is left untouched; the updated array is a new pin.
  pub fn write_index<'a, 'b, T>(
    &self,
    array: &PinArray<T>,
    index: impl Into<ArrayIndex<'a>>,
    value: impl IntoOperand<'b, T>,
  ) -> Result<PinArray<T>>
  where
    T: 'b + Fixed,
  {
    let index: ArrayIndex = index.into();
    let pins = self.insert(
      Operation::WriteIndex,
      vec![
        array.into(),
        index.into_arg(),
        value.into_operand().into_arg(),
      ],
      |_, _| Ok(()),
    )?;

    Ok(Binder::new(pins[0], self.clone()))
  }

  /// Number of elements of `array`.
  pub fn array_size<T>(&self, array: &PinArray<T>) -> Result<UIntegerx1> {
    self.insert_one(Operation::ArraySize, vec![array.into()])
  }
}

impl<T> Binder<[T]>
where
  T: ToFormat,
{
  /// Element at `index`.
  ///
  /// # Panics
  ///
  /// If `index` comes from another generator.
  pub fn at<'a>(&self, index: impl Into<ArrayIndex<'a>>) -> Binder<T> {
    built(self.generator().index(self, index))
  }

  /// Number of elements.
  pub fn size(&self) -> UIntegerx1 {
    built(self.generator().array_size(self))
  }
}

impl<T> Binder<[T]>
where
  T: Fixed,
{
  /// Copy of the array with the element at `index` replaced by `value`.
  ///
  /// # Panics
  ///
  /// If `index` or `value` come from another generator.
  pub fn with<'a, 'b>(&self, index: impl Into<ArrayIndex<'a>>, value: impl IntoOperand<'b, T>) -> Self
  where
    T: 'b,
  {
    built(self.generator().write_index(self, index, value))
  }
}
