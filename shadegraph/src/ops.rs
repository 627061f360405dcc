//! Operators on binders.
//!
//! The arithmetic and logical operators of [`std::ops`] are implemented for binders, owned or borrowed, and accept a
//! host constant on either side:
//!
//! ```
//! use shadegraph::prelude::*;
//!
//! let gen = CodeGenerator::new_vertex_shader();
//! let a = gen.fixed(V3([1f32, 2., 3.]));
//! let b = &a * 2. + V3([0., 0., 1.]);
//! let c = -(b / &a);
//! ```
//!
//! Operators cannot fail, so they panic when given binders from different generators. Use the builder methods of
//! [`CodeGenerator`](crate::generator::CodeGenerator) to get a [`Result`](crate::error::Result) instead.
//!
//! Comparisons, the dot product and boolean reductions are methods.

use std::ops;

use crate::{
  binder::{Binder, Boolx1},
  constant::Fixed,
  error::built,
  generator::IntoOperand,
  operation::CompareFunction,
  types::{Comparable, Dot, Reducible, Typed, M22, M33, M44, V2, V3, V4},
};

macro_rules! impl_binop {
  ($op:ident, $meth_name:ident, $gen:ident, $a:ty, $b:ty) => {
    impl_binop!($op, $meth_name, $gen, $a, $b, $a);
  };

  ($op:ident, $meth_name:ident, $gen:ident, $a:ty, $b:ty, $r:ty) => {
    // binder OP binder
    impl ops::$op<Binder<$b>> for Binder<$a> {
      type Output = Binder<$r>;

      fn $meth_name(self, rhs: Binder<$b>) -> Self::Output {
        built(self.generator().$gen(&self, &rhs))
      }
    }

    impl<'a> ops::$op<&'a Binder<$b>> for Binder<$a> {
      type Output = Binder<$r>;

      fn $meth_name(self, rhs: &'a Binder<$b>) -> Self::Output {
        built(self.generator().$gen(&self, rhs))
      }
    }

    impl<'a> ops::$op<Binder<$b>> for &'a Binder<$a> {
      type Output = Binder<$r>;

      fn $meth_name(self, rhs: Binder<$b>) -> Self::Output {
        built(self.generator().$gen(self, &rhs))
      }
    }

    impl<'a, 'b> ops::$op<&'b Binder<$b>> for &'a Binder<$a> {
      type Output = Binder<$r>;

      fn $meth_name(self, rhs: &'b Binder<$b>) -> Self::Output {
        built(self.generator().$gen(self, rhs))
      }
    }

    // binder OP host
    impl ops::$op<$b> for Binder<$a> {
      type Output = Binder<$r>;

      fn $meth_name(self, rhs: $b) -> Self::Output {
        built(self.generator().$gen(&self, rhs))
      }
    }

    impl<'a> ops::$op<$b> for &'a Binder<$a> {
      type Output = Binder<$r>;

      fn $meth_name(self, rhs: $b) -> Self::Output {
        built(self.generator().$gen(self, rhs))
      }
    }

    // host OP binder
    impl ops::$op<Binder<$b>> for $a {
      type Output = Binder<$r>;

      fn $meth_name(self, rhs: Binder<$b>) -> Self::Output {
        built(rhs.generator().$gen(self, &rhs))
      }
    }

    impl<'a> ops::$op<&'a Binder<$b>> for $a {
      type Output = Binder<$r>;

      fn $meth_name(self, rhs: &'a Binder<$b>) -> Self::Output {
        built(rhs.generator().$gen(self, rhs))
      }
    }
  };
}

macro_rules! impl_unop {
  ($op:ident, $meth_name:ident, $gen:ident, $t:ty) => {
    impl ops::$op for Binder<$t> {
      type Output = Self;

      fn $meth_name(self) -> Self::Output {
        built(self.generator().$gen(&self))
      }
    }

    impl<'a> ops::$op for &'a Binder<$t> {
      type Output = Binder<$t>;

      fn $meth_name(self) -> Self::Output {
        built(self.generator().$gen(self))
      }
    }
  };
}

/// `+`, `-` and `/`, between values of the same type.
macro_rules! impl_arith {
  ($($t:ty),*) => {
    $(
      impl_binop!(Add, add, add, $t, $t);
      impl_binop!(Sub, sub, sub, $t, $t);
      impl_binop!(Div, div, div, $t, $t);
    )*
  };
}

impl_arith!(i32, V2<i32>, V3<i32>, V4<i32>);
impl_arith!(u32, V2<u32>, V3<u32>, V4<u32>);
impl_arith!(f32, V2<f32>, V3<f32>, V4<f32>);
impl_arith!(M22, M33, M44);

/// `*` between a scalar type and its vectors.
macro_rules! impl_mul_vectors {
  ($s:ty) => {
    impl_binop!(Mul, mul, mul, $s, $s);
    impl_binop!(Mul, mul, mul, V2<$s>, V2<$s>);
    impl_binop!(Mul, mul, mul, V2<$s>, $s);
    impl_binop!(Mul, mul, mul, $s, V2<$s>, V2<$s>);
    impl_binop!(Mul, mul, mul, V3<$s>, V3<$s>);
    impl_binop!(Mul, mul, mul, V3<$s>, $s);
    impl_binop!(Mul, mul, mul, $s, V3<$s>, V3<$s>);
    impl_binop!(Mul, mul, mul, V4<$s>, V4<$s>);
    impl_binop!(Mul, mul, mul, V4<$s>, $s);
    impl_binop!(Mul, mul, mul, $s, V4<$s>, V4<$s>);
  };
}

impl_mul_vectors!(i32);
impl_mul_vectors!(u32);
impl_mul_vectors!(f32);

/// `*` involving a matrix.
macro_rules! impl_mul_matrix {
  ($m:ty, $v:ty) => {
    impl_binop!(Mul, mul, mul, $m, $m);
    impl_binop!(Mul, mul, mul, $m, f32);
    impl_binop!(Mul, mul, mul, f32, $m, $m);
    impl_binop!(Mul, mul, mul, $m, $v, $v);
    impl_binop!(Mul, mul, mul, $v, $m, $v);
  };
}

impl_mul_matrix!(M22, V2<f32>);
impl_mul_matrix!(M33, V3<f32>);
impl_mul_matrix!(M44, V4<f32>);

impl_unop!(Neg, neg, neg, i32);
impl_unop!(Neg, neg, neg, V2<i32>);
impl_unop!(Neg, neg, neg, V3<i32>);
impl_unop!(Neg, neg, neg, V4<i32>);
impl_unop!(Neg, neg, neg, f32);
impl_unop!(Neg, neg, neg, V2<f32>);
impl_unop!(Neg, neg, neg, V3<f32>);
impl_unop!(Neg, neg, neg, V4<f32>);
impl_unop!(Neg, neg, neg, M22);
impl_unop!(Neg, neg, neg, M33);
impl_unop!(Neg, neg, neg, M44);

// boolean operators
impl_binop!(BitAnd, bitand, and, bool, bool);
impl_binop!(BitAnd, bitand, and, V2<bool>, V2<bool>);
impl_binop!(BitAnd, bitand, and, V3<bool>, V3<bool>);
impl_binop!(BitAnd, bitand, and, V4<bool>, V4<bool>);
impl_binop!(BitOr, bitor, or, bool, bool);
impl_binop!(BitOr, bitor, or, V2<bool>, V2<bool>);
impl_binop!(BitOr, bitor, or, V3<bool>, V3<bool>);
impl_binop!(BitOr, bitor, or, V4<bool>, V4<bool>);
impl_unop!(Not, not, not, bool);
impl_unop!(Not, not, not, V2<bool>);
impl_unop!(Not, not, not, V3<bool>);
impl_unop!(Not, not, not, V4<bool>);

/// Componentwise comparisons.
///
/// # Panics
///
/// If `rhs` comes from another generator.
impl<T> Binder<T>
where
  T: Comparable + Fixed,
  T::Mask: Typed,
{
  fn compare<'a>(&self, f: CompareFunction, rhs: impl IntoOperand<'a, T>) -> Binder<T::Mask>
  where
    T: 'a,
  {
    built(self.generator().compare(f, self, rhs))
  }

  pub fn lt<'a>(&self, rhs: impl IntoOperand<'a, T>) -> Binder<T::Mask>
  where
    T: 'a,
  {
    self.compare(CompareFunction::Less, rhs)
  }

  pub fn lte<'a>(&self, rhs: impl IntoOperand<'a, T>) -> Binder<T::Mask>
  where
    T: 'a,
  {
    self.compare(CompareFunction::LessEqual, rhs)
  }

  pub fn eq<'a>(&self, rhs: impl IntoOperand<'a, T>) -> Binder<T::Mask>
  where
    T: 'a,
  {
    self.compare(CompareFunction::Equal, rhs)
  }

  pub fn neq<'a>(&self, rhs: impl IntoOperand<'a, T>) -> Binder<T::Mask>
  where
    T: 'a,
  {
    self.compare(CompareFunction::NotEqual, rhs)
  }

  pub fn gte<'a>(&self, rhs: impl IntoOperand<'a, T>) -> Binder<T::Mask>
  where
    T: 'a,
  {
    self.compare(CompareFunction::GreaterEqual, rhs)
  }

  pub fn gt<'a>(&self, rhs: impl IntoOperand<'a, T>) -> Binder<T::Mask>
  where
    T: 'a,
  {
    self.compare(CompareFunction::Greater, rhs)
  }
}

impl<T> Binder<T>
where
  T: Dot + Fixed,
  T::Scalar: Typed,
{
  /// Dot product.
  pub fn dot<'a>(&self, rhs: impl IntoOperand<'a, T>) -> Binder<T::Scalar>
  where
    T: 'a,
  {
    built(self.generator().dot(self, rhs))
  }
}

impl<T> Binder<T>
where
  T: Reducible,
{
  /// Whether all components are true.
  pub fn all(&self) -> Boolx1 {
    built(self.generator().all(self))
  }

  /// Whether any component is true.
  pub fn any(&self) -> Boolx1 {
    built(self.generator().any(self))
  }

  /// Whether no component is true.
  pub fn none(&self) -> Boolx1 {
    built(self.generator().none(self))
  }
}
