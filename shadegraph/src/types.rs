//! Host types standing for shader values.
//!
//! Binders are typed with the host type of the value they carry: `f32`, `i32`, `u32`, `bool`, the vectors [`V2`],
//! [`V3`] and [`V4`], and the square matrices [`M22`], [`M33`] and [`M44`]. The same types are used as host constants,
//! lifted into the DAG by [`CodeGenerator::fixed`](crate::generator::CodeGenerator::fixed).
//!
//! This module also contains the traits mapping those types to [`PinFormat`]s and telling which operations apply to
//! which types.

use crate::format::{ArraySize, PinFormat, PinSignature};

macro_rules! make_vn {
  ($t:ident, $dim:expr) => {
    /// Scalar vectors.
    ///
    /// Scalar vectors come into three flavors, based on the dimension used:
    ///
    /// - Two dimensions (2D): [`V2<T>`].
    /// - Three dimensions (3D): [`V3<T>`].
    /// - Four dimensions (4D): [`V4<T>`].
    ///
    /// Each type implements the [`From`] trait for sized array. For instance, if you want to make a `V3<f32>` from
    /// constants, you can simply use the implementor `From<[f32; 3]> for V3<f32>`.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct $t<T>(pub [T; $dim]);

    impl<T> From<[T; $dim]> for $t<T> {
      fn from(a: [T; $dim]) -> Self {
        Self(a)
      }
    }
  };
}

make_vn!(V2, 2);
make_vn!(V3, 3);
make_vn!(V4, 4);

/// Matrix wrapper.
///
/// This type represents a matrix of a given dimension, deduced from the wrapped type. Matrices are stored
/// column-major.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix<T>(pub T);

impl<T, const M: usize, const N: usize> From<[[T; N]; M]> for Matrix<[[T; N]; M]> {
  fn from(a: [[T; N]; M]) -> Self {
    Matrix(a)
  }
}

pub type M22 = Matrix<[[f32; 2]; 2]>;
pub type M33 = Matrix<[[f32; 3]; 3]>;
pub type M44 = Matrix<[[f32; 4]; 4]>;

/// Map a host type to the [`PinFormat`] of the values it stands for.
///
/// This is the forward half of the type mapping; the backward half is
/// [`CodeGenerator::create_from`](crate::generator::CodeGenerator::create_from). Types with no pin format simply don’t
/// implement this trait.
pub trait ToFormat {
  /// Format of a value of this type.
  const FORMAT: PinFormat;

  /// Element format, for textures.
  const TEXTURE_FORMAT: PinFormat = PinFormat::Undefined;

  /// Signature of a single value of this type.
  fn signature() -> PinSignature {
    PinSignature {
      format: Self::FORMAT,
      array: ArraySize::NotArray,
      texture_format: Self::TEXTURE_FORMAT,
    }
  }
}

/// Types a binder can be typed with.
///
/// This is implemented for every [`ToFormat`] type and for slices of them, which stand for arrays.
pub trait Typed {
  /// Whether a pin with the given signature can be wrapped as this type.
  fn accepts(sig: &PinSignature) -> bool;
}

impl<T> Typed for [T]
where
  T: ToFormat,
{
  fn accepts(sig: &PinSignature) -> bool {
    sig.array.is_array() && sig.format == T::FORMAT && sig.texture_format == T::TEXTURE_FORMAT
  }
}

/// Implement [`ToFormat`] and [`Typed`] for a value type.
macro_rules! impl_ToFormat {
  ($t:ty, $f:ident) => {
    impl ToFormat for $t {
      const FORMAT: PinFormat = PinFormat::$f;
    }

    impl Typed for $t {
      fn accepts(sig: &PinSignature) -> bool {
        *sig == <$t as ToFormat>::signature()
      }
    }
  };
}

impl_ToFormat!(i32, Integer);
impl_ToFormat!(V2<i32>, Integerx2);
impl_ToFormat!(V3<i32>, Integerx3);
impl_ToFormat!(V4<i32>, Integerx4);
impl_ToFormat!(u32, UInteger);
impl_ToFormat!(V2<u32>, UIntegerx2);
impl_ToFormat!(V3<u32>, UIntegerx3);
impl_ToFormat!(V4<u32>, UIntegerx4);
impl_ToFormat!(bool, Bool);
impl_ToFormat!(V2<bool>, Boolx2);
impl_ToFormat!(V3<bool>, Boolx3);
impl_ToFormat!(V4<bool>, Boolx4);
impl_ToFormat!(f32, Float);
impl_ToFormat!(V2<f32>, Floatx2);
impl_ToFormat!(V3<f32>, Floatx3);
impl_ToFormat!(V4<f32>, Floatx4);
impl_ToFormat!(M22, Float2x2);
impl_ToFormat!(M33, Float3x3);
impl_ToFormat!(M44, Float4x4);

/// Types supporting `+`, `-` and `/` with themselves.
pub trait Arithmetic: ToFormat {}

/// Types supporting unary `-`.
pub trait Negative: ToFormat {}

/// Types supporting `*` with `Rhs`.
pub trait Multiply<Rhs>: ToFormat {
  type Output;
}

/// Types supporting the six comparisons, yielding one boolean per component.
pub trait Comparable: ToFormat {
  type Mask;
}

/// Boolean types supporting `&`, `|` and `!`.
pub trait Logical: ToFormat {}

/// Boolean vectors that can be reduced to a single boolean.
pub trait Reducible: Logical {}

/// Vectors supporting the dot product.
pub trait Dot: ToFormat {
  type Scalar;
}

impl Comparable for f32 {
  type Mask = bool;
}
impl Comparable for i32 {
  type Mask = bool;
}
impl Comparable for u32 {
  type Mask = bool;
}
impl Arithmetic for f32 {}
impl Arithmetic for i32 {}
impl Arithmetic for u32 {}
impl Multiply<f32> for f32 {
  type Output = f32;
}
impl Multiply<i32> for i32 {
  type Output = i32;
}
impl Multiply<u32> for u32 {
  type Output = u32;
}

macro_rules! impl_vector_traits {
  ($s:ty, $v:ident) => {
    impl Comparable for $v<$s> {
      type Mask = $v<bool>;
    }

    impl Arithmetic for $v<$s> {}

    impl Multiply<$v<$s>> for $v<$s> {
      type Output = $v<$s>;
    }

    impl Multiply<$s> for $v<$s> {
      type Output = $v<$s>;
    }

    impl Multiply<$v<$s>> for $s {
      type Output = $v<$s>;
    }

    impl Dot for $v<$s> {
      type Scalar = $s;
    }
  };
}

macro_rules! impl_vector_traits_all {
  ($s:ty) => {
    impl_vector_traits!($s, V2);
    impl_vector_traits!($s, V3);
    impl_vector_traits!($s, V4);
  };
}

impl_vector_traits_all!(f32);
impl_vector_traits_all!(i32);
impl_vector_traits_all!(u32);

impl Negative for f32 {}
impl Negative for V2<f32> {}
impl Negative for V3<f32> {}
impl Negative for V4<f32> {}
impl Negative for i32 {}
impl Negative for V2<i32> {}
impl Negative for V3<i32> {}
impl Negative for V4<i32> {}
impl Negative for M22 {}
impl Negative for M33 {}
impl Negative for M44 {}

impl Comparable for bool {
  type Mask = bool;
}
impl Comparable for V2<bool> {
  type Mask = V2<bool>;
}
impl Comparable for V3<bool> {
  type Mask = V3<bool>;
}
impl Comparable for V4<bool> {
  type Mask = V4<bool>;
}

impl Logical for bool {}
impl Logical for V2<bool> {}
impl Logical for V3<bool> {}
impl Logical for V4<bool> {}
impl Reducible for V2<bool> {}
impl Reducible for V3<bool> {}
impl Reducible for V4<bool> {}

macro_rules! impl_matrix_traits {
  ($m:ty, $v:ty) => {
    impl Arithmetic for $m {}

    impl Multiply<$m> for $m {
      type Output = $m;
    }

    impl Multiply<f32> for $m {
      type Output = $m;
    }

    impl Multiply<$m> for f32 {
      type Output = $m;
    }

    impl Multiply<$v> for $m {
      type Output = $v;
    }

    impl Multiply<$m> for $v {
      type Output = $v;
    }
  };
}

impl_matrix_traits!(M22, V2<f32>);
impl_matrix_traits!(M33, V3<f32>);
impl_matrix_traits!(M44, V4<f32>);
