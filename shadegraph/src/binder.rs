//! Typed handles to pins.
//!
//! A [`Binder<T>`] pairs a [`Pin`] with the [`CodeGenerator`] owning it, and types it with the host type `T` of the
//! value it carries. Binders are cheap to clone and never mutate the pin they point to: every operation on them
//! inserts a new node and returns a new binder.
//!
//! When the type of a pin is only known at runtime, [`ErasedBinder`] and [`AnyBinder`] stand in.

use std::{fmt, marker::PhantomData};

use crate::{
  error::{Error, Result},
  format::{PinFormat, PinSignature},
  generator::CodeGenerator,
  shader_code::Pin,
  types::{Typed, M22, M33, M44, V2, V3, V4},
};

/// Anything giving access to a pin and its generator.
pub trait PinBinder {
  fn pin(&self) -> Pin;

  fn generator(&self) -> &CodeGenerator;
}

/// A typed pin.
pub struct Binder<T>
where
  T: ?Sized,
{
  pin: Pin,
  generator: CodeGenerator,
  _phantom: PhantomData<T>,
}

impl<T> Binder<T>
where
  T: ?Sized,
{
  pub(crate) fn new(pin: Pin, generator: CodeGenerator) -> Self {
    Self {
      pin,
      generator,
      _phantom: PhantomData,
    }
  }

  pub fn pin(&self) -> Pin {
    self.pin
  }

  /// Generator the binder belongs to.
  pub fn generator(&self) -> &CodeGenerator {
    &self.generator
  }

  pub fn format(&self) -> PinFormat {
    self.pin.format()
  }

  pub fn signature(&self) -> PinSignature {
    self.pin.signature()
  }

  /// Forget the type of the binder.
  pub fn erased(&self) -> ErasedBinder {
    ErasedBinder::new(self.pin, self.generator.clone())
  }
}

impl<T> Clone for Binder<T>
where
  T: ?Sized,
{
  fn clone(&self) -> Self {
    Self::new(self.pin, self.generator.clone())
  }
}

impl<T> fmt::Debug for Binder<T>
where
  T: ?Sized,
{
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("Binder").field("pin", &self.pin).finish()
  }
}

impl<T> PinBinder for Binder<T>
where
  T: ?Sized,
{
  fn pin(&self) -> Pin {
    self.pin
  }

  fn generator(&self) -> &CodeGenerator {
    &self.generator
  }
}

pub type Floatx1 = Binder<f32>;
pub type Floatx2 = Binder<V2<f32>>;
pub type Floatx3 = Binder<V3<f32>>;
pub type Floatx4 = Binder<V4<f32>>;
pub type Integerx1 = Binder<i32>;
pub type Integerx2 = Binder<V2<i32>>;
pub type Integerx3 = Binder<V3<i32>>;
pub type Integerx4 = Binder<V4<i32>>;
pub type UIntegerx1 = Binder<u32>;
pub type UIntegerx2 = Binder<V2<u32>>;
pub type UIntegerx3 = Binder<V3<u32>>;
pub type UIntegerx4 = Binder<V4<u32>>;
pub type Boolx1 = Binder<bool>;
pub type Boolx2 = Binder<V2<bool>>;
pub type Boolx3 = Binder<V3<bool>>;
pub type Boolx4 = Binder<V4<bool>>;
pub type Float2x2 = Binder<M22>;
pub type Float3x3 = Binder<M33>;
pub type Float4x4 = Binder<M44>;

/// Array of `T`.
pub type PinArray<T> = Binder<[T]>;

/// A pin whose type is only known at runtime.
#[derive(Clone)]
pub struct ErasedBinder {
  pin: Pin,
  generator: CodeGenerator,
}

impl ErasedBinder {
  pub(crate) fn new(pin: Pin, generator: CodeGenerator) -> Self {
    Self { pin, generator }
  }

  pub fn pin(&self) -> Pin {
    self.pin
  }

  pub fn generator(&self) -> &CodeGenerator {
    &self.generator
  }

  pub fn format(&self) -> PinFormat {
    self.pin.format()
  }

  pub fn signature(&self) -> PinSignature {
    self.pin.signature()
  }

  /// Recover a typed binder.
  ///
  /// # Errors
  ///
  /// [`Error::FormatConflict`] if the pin doesn’t hold a `T`.
  pub fn downcast<T>(&self) -> Result<Binder<T>>
  where
    T: ?Sized + Typed,
  {
    if T::accepts(&self.pin.signature()) {
      Ok(Binder::new(self.pin, self.generator.clone()))
    } else {
      Err(Error::format_conflict(
        "downcast",
        format!("{:?} is not a {}", self.pin.signature(), std::any::type_name::<T>()),
      ))
    }
  }
}

impl fmt::Debug for ErasedBinder {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("ErasedBinder").field("pin", &self.pin).finish()
  }
}

impl PinBinder for ErasedBinder {
  fn pin(&self) -> Pin {
    self.pin
  }

  fn generator(&self) -> &CodeGenerator {
    &self.generator
  }
}

impl<T> From<Binder<T>> for ErasedBinder
where
  T: ?Sized,
{
  fn from(binder: Binder<T>) -> Self {
    ErasedBinder::new(binder.pin, binder.generator)
  }
}

type Constructor = fn(Pin, CodeGenerator) -> AnyBinder;

macro_rules! any_binder {
  ($($variant:ident => $format:ident),* $(,)?) => {
    /// A binder typed after the format of its pin.
    ///
    /// This is what [`CodeGenerator::create_from`] returns: one variant per value format, and [`AnyBinder::Array`] for
    /// arrays of values.
    #[derive(Clone, Debug)]
    pub enum AnyBinder {
      $(
        $variant($variant),
      )*
      Array(ErasedBinder),
    }

    impl AnyBinder {
      /// Pick the variant able to hold pins of signature `sig`.
      ///
      /// # Errors
      ///
      /// [`Error::NotSupportedFormat`] for resources, arrays of resources and undefined pins.
      pub(crate) fn constructor(sig: &PinSignature) -> Result<Constructor> {
        if sig.array.is_array() {
          return if sig.format.is_value() {
            Ok((|pin, gen| AnyBinder::Array(ErasedBinder::new(pin, gen))) as Constructor)
          } else {
            Err(Error::NotSupportedFormat(sig.format))
          };
        }

        match sig.format {
          $(
            PinFormat::$format => Ok((|pin, gen| AnyBinder::$variant(Binder::new(pin, gen))) as Constructor),
          )*

          PinFormat::Undefined
          | PinFormat::BufferTexture
          | PinFormat::Texture1D
          | PinFormat::Texture1DArray
          | PinFormat::Texture2D
          | PinFormat::Texture2DArray
          | PinFormat::TextureCube
          | PinFormat::Texture3D
          | PinFormat::Sampler
          | PinFormat::Interface => Err(Error::NotSupportedFormat(sig.format)),
        }
      }

      fn as_pin_binder(&self) -> &dyn PinBinder {
        match self {
          $(
            AnyBinder::$variant(b) => b,
          )*
          AnyBinder::Array(b) => b,
        }
      }
    }
  };
}

any_binder! {
  Integerx1 => Integer,
  Integerx2 => Integerx2,
  Integerx3 => Integerx3,
  Integerx4 => Integerx4,
  UIntegerx1 => UInteger,
  UIntegerx2 => UIntegerx2,
  UIntegerx3 => UIntegerx3,
  UIntegerx4 => UIntegerx4,
  Boolx1 => Bool,
  Boolx2 => Boolx2,
  Boolx3 => Boolx3,
  Boolx4 => Boolx4,
  Floatx1 => Float,
  Floatx2 => Floatx2,
  Floatx3 => Floatx3,
  Floatx4 => Floatx4,
  Float2x2 => Float2x2,
  Float3x3 => Float3x3,
  Float4x4 => Float4x4,
}

impl AnyBinder {
  pub(crate) fn new(pin: Pin, generator: CodeGenerator) -> Result<Self> {
    let ctor = Self::constructor(&pin.signature())?;
    Ok(ctor(pin, generator))
  }

  pub fn format(&self) -> PinFormat {
    self.pin().format()
  }

  /// Forget the type of the binder.
  pub fn erased(&self) -> ErasedBinder {
    ErasedBinder::new(self.pin(), self.generator().clone())
  }
}

impl PinBinder for AnyBinder {
  fn pin(&self) -> Pin {
    self.as_pin_binder().pin()
  }

  fn generator(&self) -> &CodeGenerator {
    self.as_pin_binder().generator()
  }
}
