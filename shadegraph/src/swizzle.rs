//! Swizzling.
//!
//! Swizzling reads components out of a vector (`.zyx`, `.xx`) or replaces some of them (`.xy = …`). There is a single
//! mechanism behind it, the [`Swizzlable`] trait, keyed by the selectors of the mask. The named accessors (`v.xy()`,
//! `v.with_xy(&value)`) are generated on top of it.

use std::str::FromStr;

use crate::{
  binder::Binder,
  error::{Error, Result},
  types::{Typed, V2, V3, V4},
};

/// Select a channel to extract from into a swizzled expession.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SwizzleSelector {
  /// Select the `.x` (or `.r`) channel.
  X,

  /// Select the `.y` (or `.g`) channel.
  Y,

  /// Select the `.z` (or `.b`) channel.
  Z,

  /// Select the `.w` (or `.a`) channel.
  W,
}

impl SwizzleSelector {
  /// Index of the selected component.
  pub fn index(self) -> u8 {
    match self {
      SwizzleSelector::X => 0,
      SwizzleSelector::Y => 1,
      SwizzleSelector::Z => 2,
      SwizzleSelector::W => 3,
    }
  }

  fn from_char(c: char) -> Option<Self> {
    match c.to_ascii_lowercase() {
      'x' | 'r' => Some(SwizzleSelector::X),
      'y' | 'g' => Some(SwizzleSelector::Y),
      'z' | 'b' => Some(SwizzleSelector::Z),
      'w' | 'a' => Some(SwizzleSelector::W),
      _ => None,
    }
  }
}

/// Swizzle mask.
///
/// The number of selectors gives the width of the value read through the mask (or written through it). Selectors
/// can be repeated or omitted when reading.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Swizzle {
  /// Select one channel.
  D1(SwizzleSelector),

  /// Select two channels.
  D2(SwizzleSelector, SwizzleSelector),

  /// Select three channels.
  D3(SwizzleSelector, SwizzleSelector, SwizzleSelector),

  /// Select four channels.
  D4(
    SwizzleSelector,
    SwizzleSelector,
    SwizzleSelector,
    SwizzleSelector,
  ),
}

impl Swizzle {
  /// Number of selected channels.
  pub fn len(&self) -> u8 {
    match self {
      Swizzle::D1(..) => 1,
      Swizzle::D2(..) => 2,
      Swizzle::D3(..) => 3,
      Swizzle::D4(..) => 4,
    }
  }

  /// Selected channels, in order.
  pub fn selectors(&self) -> Vec<SwizzleSelector> {
    match *self {
      Swizzle::D1(x) => vec![x],
      Swizzle::D2(x, y) => vec![x, y],
      Swizzle::D3(x, y, z) => vec![x, y, z],
      Swizzle::D4(x, y, z, w) => vec![x, y, z, w],
    }
  }

  /// Highest component index the mask reads or writes.
  pub fn max_index(&self) -> u8 {
    self
      .selectors()
      .into_iter()
      .map(SwizzleSelector::index)
      .max()
      .unwrap_or(0)
  }

  /// Whether a channel is selected more than once.
  pub fn has_repeats(&self) -> bool {
    let sels = self.selectors();
    sels
      .iter()
      .enumerate()
      .any(|(i, s)| sels[i + 1..].contains(s))
  }
}

impl From<SwizzleSelector> for Swizzle {
  fn from(x: SwizzleSelector) -> Self {
    Swizzle::D1(x)
  }
}

impl From<[SwizzleSelector; 2]> for Swizzle {
  fn from([x, y]: [SwizzleSelector; 2]) -> Self {
    Swizzle::D2(x, y)
  }
}

impl From<[SwizzleSelector; 3]> for Swizzle {
  fn from([x, y, z]: [SwizzleSelector; 3]) -> Self {
    Swizzle::D3(x, y, z)
  }
}

impl From<[SwizzleSelector; 4]> for Swizzle {
  fn from([x, y, z, w]: [SwizzleSelector; 4]) -> Self {
    Swizzle::D4(x, y, z, w)
  }
}

/// Parse masks such as `"xy"`, `"ZYX"` or `"rgba"`.
impl FromStr for Swizzle {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let sels = s
      .chars()
      .map(SwizzleSelector::from_char)
      .collect::<Option<Vec<_>>>()
      .ok_or_else(|| Error::InvalidSwizzle(s.to_owned()))?;

    match sels[..] {
      [x] => Ok(Swizzle::D1(x)),
      [x, y] => Ok(Swizzle::D2(x, y)),
      [x, y, z] => Ok(Swizzle::D3(x, y, z)),
      [x, y, z, w] => Ok(Swizzle::D4(x, y, z, w)),
      _ => Err(Error::InvalidSwizzle(s.to_owned())),
    }
  }
}

/// Interface to implement to swizzle a binder.
///
/// If you plan to use your implementor with the [`sw!`](sw) macro, `S` must be one of the following types:
///
/// - [`SwizzleSelector`]: to implement `sw!(.x)`.
/// - [[`SwizzleSelector`]; 2]: to implement `sw!(.xx)`.
/// - [[`SwizzleSelector`]; 3]: to implement `sw!(.xxx)`.
/// - [[`SwizzleSelector`]; 4]: to implement `sw!(.xxxx)`.
pub trait Swizzlable<S> {
  type Output;

  /// Read the components selected by `sw`.
  fn swizzle(&self, sw: S) -> Result<Self::Output>;

  /// Replace the components selected by `sw` with `value`.
  ///
  /// The binder is left untouched; the updated vector is returned as a new binder.
  fn with_swizzle(&self, sw: S, value: &Self::Output) -> Result<Self>
  where
    Self: Sized;
}

macro_rules! impl_Swizzlable {
  ($v:ident, $sel:ty, $out:ty) => {
    impl<T> Swizzlable<$sel> for Binder<$v<T>>
    where
      $out: Typed,
    {
      type Output = Binder<$out>;

      fn swizzle(&self, sw: $sel) -> Result<Self::Output> {
        self.generator().swizzle(self, Swizzle::from(sw))
      }

      fn with_swizzle(&self, sw: $sel, value: &Self::Output) -> Result<Self> {
        self.generator().write_swizzle(self, Swizzle::from(sw), value)
      }
    }
  };
}

// 2D
impl_Swizzlable!(V2, SwizzleSelector, T);
impl_Swizzlable!(V2, [SwizzleSelector; 2], V2<T>);

// 3D
impl_Swizzlable!(V3, SwizzleSelector, T);
impl_Swizzlable!(V3, [SwizzleSelector; 2], V2<T>);
impl_Swizzlable!(V3, [SwizzleSelector; 3], V3<T>);

// 4D
impl_Swizzlable!(V4, SwizzleSelector, T);
impl_Swizzlable!(V4, [SwizzleSelector; 2], V2<T>);
impl_Swizzlable!(V4, [SwizzleSelector; 3], V3<T>);
impl_Swizzlable!(V4, [SwizzleSelector; 4], V4<T>);

// named accessors: v.x(), v.zyx(), v.with_xy(&value), …
#[cfg(feature = "swizzle")]
shadegraph_swizzle::swizzles!(V2, 2);
#[cfg(feature = "swizzle")]
shadegraph_swizzle::swizzles!(V3, 3);
#[cfg(feature = "swizzle")]
shadegraph_swizzle::swizzles!(V4, 4);

/// Swizzle macro.
///
/// This macro allows to swizzle binders to yield binders reorganizing the vector components. For instance,
/// `sw!(color, .rgbr)` will take a 4D color and will output a 4D color for which the alpha channel is overridden with
/// the red channel.
///
/// The macro evaluates to a [`Result`](crate::error::Result). Have a look at [`Swizzlable`] for a comprehensive list
/// of what you can swizzle.
#[macro_export]
macro_rules! sw {
  ($e:expr, . $a:tt) => {
    $crate::swizzle::Swizzlable::swizzle(&$e, $crate::sw_extract!($a))
  };

  ($e:expr, . $a:tt . $b:tt) => {
    $crate::swizzle::Swizzlable::swizzle(&$e, [$crate::sw_extract!($a), $crate::sw_extract!($b)])
  };

  ($e:expr, . $a:tt . $b:tt . $c:tt) => {
    $crate::swizzle::Swizzlable::swizzle(
      &$e,
      [
        $crate::sw_extract!($a),
        $crate::sw_extract!($b),
        $crate::sw_extract!($c),
      ],
    )
  };

  ($e:expr, . $a:tt . $b:tt . $c:tt . $d:tt) => {
    $crate::swizzle::Swizzlable::swizzle(
      &$e,
      [
        $crate::sw_extract!($a),
        $crate::sw_extract!($b),
        $crate::sw_extract!($c),
        $crate::sw_extract!($d),
      ],
    )
  };
}

#[doc(hidden)]
#[macro_export]
macro_rules! sw_extract {
  (x) => {
    $crate::swizzle::SwizzleSelector::X
  };

  (r) => {
    $crate::swizzle::SwizzleSelector::X
  };

  (y) => {
    $crate::swizzle::SwizzleSelector::Y
  };

  (g) => {
    $crate::swizzle::SwizzleSelector::Y
  };

  (z) => {
    $crate::swizzle::SwizzleSelector::Z
  };

  (b) => {
    $crate::swizzle::SwizzleSelector::Z
  };

  (w) => {
    $crate::swizzle::SwizzleSelector::W
  };

  (a) => {
    $crate::swizzle::SwizzleSelector::W
  };
}
