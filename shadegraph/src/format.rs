//! Pin formats.
//!
//! A [`PinFormat`] tells what kind of value flows through a pin: a scalar, a vector, a matrix or an opaque resource.
//! Array arity is carried apart, in [`ArraySize`], and both are bundled with the texture element format in a
//! [`PinSignature`].

/// Format of the value carried by a pin.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum PinFormat {
  /// No format. Used for values whose type is not known.
  Undefined,

  Integer,
  Integerx2,
  Integerx3,
  Integerx4,

  UInteger,
  UIntegerx2,
  UIntegerx3,
  UIntegerx4,

  Bool,
  Boolx2,
  Boolx3,
  Boolx4,

  Float,
  Floatx2,
  Floatx3,
  Floatx4,

  Float2x2,
  Float3x3,
  Float4x4,

  BufferTexture,
  Texture1D,
  Texture1DArray,
  Texture2D,
  Texture2DArray,
  TextureCube,
  Texture3D,
  Sampler,
  Interface,
}

/// Scalar kind of a value format.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScalarKind {
  Integer,
  UInteger,
  Bool,
  Float,
}

impl PinFormat {
  /// Build the scalar or vector format of the given kind and width.
  ///
  /// # Return
  ///
  /// [`None`] if `width` is not in `1..=4`.
  pub fn vector(kind: ScalarKind, width: u8) -> Option<Self> {
    use PinFormat::*;

    let fmt = match (kind, width) {
      (ScalarKind::Integer, 1) => Integer,
      (ScalarKind::Integer, 2) => Integerx2,
      (ScalarKind::Integer, 3) => Integerx3,
      (ScalarKind::Integer, 4) => Integerx4,
      (ScalarKind::UInteger, 1) => UInteger,
      (ScalarKind::UInteger, 2) => UIntegerx2,
      (ScalarKind::UInteger, 3) => UIntegerx3,
      (ScalarKind::UInteger, 4) => UIntegerx4,
      (ScalarKind::Bool, 1) => Bool,
      (ScalarKind::Bool, 2) => Boolx2,
      (ScalarKind::Bool, 3) => Boolx3,
      (ScalarKind::Bool, 4) => Boolx4,
      (ScalarKind::Float, 1) => Float,
      (ScalarKind::Float, 2) => Floatx2,
      (ScalarKind::Float, 3) => Floatx3,
      (ScalarKind::Float, 4) => Floatx4,
      _ => return None,
    };

    Some(fmt)
  }

  /// Scalar kind of scalars, vectors and matrices.
  pub fn scalar_kind(self) -> Option<ScalarKind> {
    use PinFormat::*;

    match self {
      Integer | Integerx2 | Integerx3 | Integerx4 => Some(ScalarKind::Integer),
      UInteger | UIntegerx2 | UIntegerx3 | UIntegerx4 => Some(ScalarKind::UInteger),
      Bool | Boolx2 | Boolx3 | Boolx4 => Some(ScalarKind::Bool),
      Float | Floatx2 | Floatx3 | Floatx4 | Float2x2 | Float3x3 | Float4x4 => Some(ScalarKind::Float),
      _ => None,
    }
  }

  /// Number of components of a scalar (1) or a vector (2 to 4); [`None`] for anything else.
  pub fn width(self) -> Option<u8> {
    use PinFormat::*;

    match self {
      Integer | UInteger | Bool | Float => Some(1),
      Integerx2 | UIntegerx2 | Boolx2 | Floatx2 => Some(2),
      Integerx3 | UIntegerx3 | Boolx3 | Floatx3 => Some(3),
      Integerx4 | UIntegerx4 | Boolx4 | Floatx4 => Some(4),
      _ => None,
    }
  }

  /// Side of a square matrix format.
  pub fn matrix_dim(self) -> Option<u8> {
    match self {
      PinFormat::Float2x2 => Some(2),
      PinFormat::Float3x3 => Some(3),
      PinFormat::Float4x4 => Some(4),
      _ => None,
    }
  }

  /// Same kind as `self`, with a single component.
  pub fn scalar(self) -> Option<Self> {
    self.scalar_kind().and_then(|kind| Self::vector(kind, 1))
  }

  pub fn is_scalar(self) -> bool {
    self.width() == Some(1)
  }

  pub fn is_vector(self) -> bool {
    matches!(self.width(), Some(2..=4))
  }

  pub fn is_matrix(self) -> bool {
    self.matrix_dim().is_some()
  }

  /// Whether the format is a texture of any dimension.
  pub fn is_texture(self) -> bool {
    use PinFormat::*;

    matches!(
      self,
      BufferTexture | Texture1D | Texture1DArray | Texture2D | Texture2DArray | TextureCube | Texture3D
    )
  }

  /// Whether the format is an opaque resource (texture, sampler or interface).
  pub fn is_resource(self) -> bool {
    self.is_texture() || self == PinFormat::Sampler || self == PinFormat::Interface
  }

  /// Whether the format carries a computable value (scalar, vector or matrix).
  pub fn is_value(self) -> bool {
    self.scalar_kind().is_some()
  }
}

/// Array arity of a pin.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ArraySize {
  /// The pin is a single value.
  NotArray,

  /// The pin is an array of a fixed, positive size.
  Fixed(u32),

  /// The pin is an array whose size is only known when the shader runs.
  Dynamic,
}

impl ArraySize {
  pub fn is_array(self) -> bool {
    self != ArraySize::NotArray
  }
}

impl Default for ArraySize {
  fn default() -> Self {
    ArraySize::NotArray
  }
}

/// Everything there is to know about the value flowing through a pin.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PinSignature {
  /// Format of the value, or of each element for arrays.
  pub format: PinFormat,

  /// Array arity.
  pub array: ArraySize,

  /// Element format of textures; [`PinFormat::Undefined`] for everything else.
  pub texture_format: PinFormat,
}

impl PinSignature {
  /// Signature of a single, non-texture value.
  pub const fn value(format: PinFormat) -> Self {
    PinSignature {
      format,
      array: ArraySize::NotArray,
      texture_format: PinFormat::Undefined,
    }
  }

  /// Signature of an array of `format`.
  pub const fn array(format: PinFormat, array: ArraySize) -> Self {
    PinSignature {
      format,
      array,
      texture_format: PinFormat::Undefined,
    }
  }

  /// Signature of a texture whose elements are `texture_format`.
  pub const fn texture(format: PinFormat, texture_format: PinFormat) -> Self {
    PinSignature {
      format,
      array: ArraySize::NotArray,
      texture_format,
    }
  }

  /// Signature of one element of `self`.
  pub const fn element(self) -> Self {
    PinSignature {
      array: ArraySize::NotArray,
      ..self
    }
  }

  /// Whether this is a single scalar, vector or matrix value.
  pub fn is_plain_value(&self) -> bool {
    self.array == ArraySize::NotArray && self.format.is_value()
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn vector_formats() {
    assert_eq!(PinFormat::vector(ScalarKind::Float, 3), Some(PinFormat::Floatx3));
    assert_eq!(PinFormat::vector(ScalarKind::Bool, 1), Some(PinFormat::Bool));
    assert_eq!(PinFormat::vector(ScalarKind::UInteger, 5), None);
    assert_eq!(PinFormat::vector(ScalarKind::Integer, 0), None);
  }

  #[test]
  fn format_queries() {
    assert_eq!(PinFormat::Integerx3.width(), Some(3));
    assert_eq!(PinFormat::Float4x4.width(), None);
    assert_eq!(PinFormat::Float4x4.scalar_kind(), Some(ScalarKind::Float));
    assert_eq!(PinFormat::Boolx4.scalar(), Some(PinFormat::Bool));
    assert!(PinFormat::TextureCube.is_texture());
    assert!(PinFormat::Sampler.is_resource());
    assert!(!PinFormat::Sampler.is_texture());
    assert!(!PinFormat::Undefined.is_value());
  }

  #[test]
  fn signatures() {
    let sig = PinSignature::array(PinFormat::Float, ArraySize::Dynamic);
    assert!(!sig.is_plain_value());
    assert_eq!(sig.element(), PinSignature::value(PinFormat::Float));
  }
}
