//! Operations bound into the DAG.
//!
//! An [`Operation`] describes what a node computes. Binding an operation checks its input signatures and yields the
//! signatures of its outputs, see [`Operation::bind`]; the [`CodeGenerator`](crate::generator::CodeGenerator) only
//! inserts a node once that check passed.

use std::{fmt, rc::Rc};

use crate::{
  error::{Error, Result},
  format::{ArraySize, PinFormat, PinSignature, ScalarKind},
  swizzle::Swizzle,
};

/// Comparison performed by [`Operation::Compare`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CompareFunction {
  Less,
  LessEqual,
  Equal,
  NotEqual,
  GreaterEqual,
  Greater,
}

/// How [`Operation::Expand`] fills the components missing from its input.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ExpandType {
  /// Missing components are zeros.
  AddZeros,

  /// Missing components are ones.
  AddOnes,

  /// Missing components are zeros, except `w`, which is one.
  AddOnesAtW,
}

/// Identifier of a loop within a session.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct LoopId(pub(crate) u32);

/// Operation kinds unknown to the crate.
///
/// Implement this trait to add operations without touching the generator, then bind them with
/// [`CodeGenerator::execute`](crate::generator::CodeGenerator::execute).
pub trait CustomOperation: fmt::Debug {
  /// Name of the operation, used in diagnostics.
  fn name(&self) -> &str;

  /// Check the input signatures and return the output ones.
  fn bind(&self, inputs: &[PinSignature]) -> Result<Vec<PinSignature>>;
}

/// Operation computed by a node.
#[derive(Clone, Debug)]
pub enum Operation {
  Add,
  Sub,
  Mul,
  Div,
  Neg,
  Dot,
  Compare(CompareFunction),
  And,
  Or,
  Not,
  /// Whether all components of a boolean vector are true.
  All,
  /// Whether any component of a boolean vector is true.
  Any,
  /// Whether no component of a boolean vector is true.
  NoneOf,
  /// Extract components from a vector.
  Swizzle(Swizzle),
  /// Replace components of a vector; inputs are the vector and the new components.
  WriteSwizzle(Swizzle),
  /// Read an array element; inputs are the array and the index.
  Index,
  /// Replace an array element; inputs are the array, the index and the new element.
  WriteIndex,
  ArraySize,
  /// Select between two values; inputs are the condition, the value if true and the value if false.
  Branch,
  /// Concatenate scalars and vectors into a vector.
  Compound,
  /// Widen a scalar or vector to the given format.
  Expand(ExpandType, PinFormat),
  /// Entry of a counted loop; inputs are the iteration count and the initial values.
  LoopEnter(LoopId),
  /// Exit of a counted loop; inputs are the values at the end of an iteration.
  LoopExit(LoopId),
  /// Entry of a conditional loop; inputs are the initial values.
  WhileEnter(LoopId),
  /// Exit of a conditional loop; inputs are the condition to loop again and the values at the end of an iteration.
  WhileExit(LoopId),
  /// Sample a texture; inputs are the texture, the sampler, the address and an optional offset.
  Sample,
  /// Fetch a texel; inputs are the texture, the position and an optional offset.
  Load,
  Custom(Rc<dyn CustomOperation>),
}

impl Operation {
  /// Name of the operation, used in diagnostics.
  pub fn name(&self) -> &str {
    match self {
      Operation::Add => "add",
      Operation::Sub => "sub",
      Operation::Mul => "mul",
      Operation::Div => "div",
      Operation::Neg => "neg",
      Operation::Dot => "dot",
      Operation::Compare(_) => "compare",
      Operation::And => "and",
      Operation::Or => "or",
      Operation::Not => "not",
      Operation::All => "all",
      Operation::Any => "any",
      Operation::NoneOf => "none",
      Operation::Swizzle(_) => "swizzle",
      Operation::WriteSwizzle(_) => "write swizzle",
      Operation::Index => "index",
      Operation::WriteIndex => "write index",
      Operation::ArraySize => "array size",
      Operation::Branch => "branch",
      Operation::Compound => "compound",
      Operation::Expand(..) => "expand",
      Operation::LoopEnter(_) => "loop enter",
      Operation::LoopExit(_) => "loop exit",
      Operation::WhileEnter(_) => "while enter",
      Operation::WhileExit(_) => "while exit",
      Operation::Sample => "sample",
      Operation::Load => "load",
      Operation::Custom(op) => op.name(),
    }
  }

  /// Check `inputs` against what the operation expects.
  ///
  /// # Return
  ///
  /// The signatures of the outputs, in order. Most operations have exactly one output.
  ///
  /// # Errors
  ///
  /// [`Error::FormatConflict`] if the input count or any input signature doesn’t fit the operation.
  pub fn bind(&self, inputs: &[PinSignature]) -> Result<Vec<PinSignature>> {
    let check = Check {
      op: self.name(),
      inputs,
    };

    match self {
      Operation::Add | Operation::Sub | Operation::Div => {
        let (a, b) = check.pair()?;
        check.same(a, b)?;
        check.numeric(a)?;
        Ok(vec![PinSignature::value(a)])
      }

      Operation::Mul => {
        let (a, b) = check.pair()?;
        check.numeric(a)?;
        check.numeric(b)?;
        Ok(vec![PinSignature::value(check.product(a, b)?)])
      }

      Operation::Neg => {
        let a = check.single()?;

        match a.scalar_kind() {
          Some(ScalarKind::Float) | Some(ScalarKind::Integer) => Ok(vec![PinSignature::value(a)]),
          _ => Err(check.conflict(format!("cannot negate {:?}", a))),
        }
      }

      Operation::Dot => {
        let (a, b) = check.pair()?;
        check.same(a, b)?;
        check.numeric(a)?;

        match (a.is_vector(), a.scalar()) {
          (true, Some(scalar)) => Ok(vec![PinSignature::value(scalar)]),
          _ => Err(check.conflict(format!("dot product of {:?}", a))),
        }
      }

      Operation::Compare(_) => {
        let (a, b) = check.pair()?;
        check.same(a, b)?;

        match a.width().and_then(|w| PinFormat::vector(ScalarKind::Bool, w)) {
          Some(mask) => Ok(vec![PinSignature::value(mask)]),
          None => Err(check.conflict(format!("cannot compare {:?}", a))),
        }
      }

      Operation::And | Operation::Or => {
        let (a, b) = check.pair()?;
        check.same(a, b)?;
        check.boolean(a)?;
        Ok(vec![PinSignature::value(a)])
      }

      Operation::Not => {
        let a = check.single()?;
        check.boolean(a)?;
        Ok(vec![PinSignature::value(a)])
      }

      Operation::All | Operation::Any | Operation::NoneOf => {
        let a = check.single()?;
        check.boolean(a)?;
        Ok(vec![PinSignature::value(PinFormat::Bool)])
      }

      Operation::Swizzle(sw) => {
        let a = check.single()?;
        let (kind, width) = check.vector(a)?;
        check.selects(sw, width)?;

        PinFormat::vector(kind, sw.len())
          .map(|fmt| vec![PinSignature::value(fmt)])
          .ok_or_else(|| check.conflict(format!("{:?} on {:?}", sw, a)))
      }

      Operation::WriteSwizzle(sw) => {
        let (target, value) = check.pair()?;
        let (kind, width) = check.vector(target)?;
        check.selects(sw, width)?;

        if sw.has_repeats() {
          return Err(check.conflict(format!("{:?} writes a component twice", sw)));
        }

        if PinFormat::vector(kind, sw.len()) != Some(value) {
          return Err(check.conflict(format!(
            "{:?} expects {} components of {:?}, got {:?}",
            sw,
            sw.len(),
            kind,
            value
          )));
        }

        Ok(vec![PinSignature::value(target)])
      }

      Operation::Index => {
        check.arity(2)?;
        let array = check.array(inputs[0])?;
        check.index(inputs[1])?;
        Ok(vec![array.element()])
      }

      Operation::WriteIndex => {
        check.arity(3)?;
        let array = check.array(inputs[0])?;
        check.index(inputs[1])?;

        if inputs[2] != array.element() {
          return Err(check.conflict(format!(
            "cannot store {:?} into an array of {:?}",
            inputs[2], array.format
          )));
        }

        Ok(vec![array])
      }

      Operation::ArraySize => {
        check.arity(1)?;
        check.array(inputs[0])?;
        Ok(vec![PinSignature::value(PinFormat::UInteger)])
      }

      Operation::Branch => {
        check.arity(3)?;

        if inputs[0] != PinSignature::value(PinFormat::Bool) {
          return Err(check.conflict(format!("condition must be a Bool, got {:?}", inputs[0])));
        }

        if inputs[1] != inputs[2] {
          return Err(check.conflict(format!("branches differ: {:?} and {:?}", inputs[1], inputs[2])));
        }

        Ok(vec![inputs[1]])
      }

      Operation::Compound => {
        if inputs.is_empty() {
          return Err(check.conflict("nothing to compound"));
        }

        let mut kind = None;
        let mut total = 0u8;

        for input in inputs {
          let (k, w) = check.vector(check.plain(*input)?)?;

          if *kind.get_or_insert(k) != k {
            return Err(check.conflict(format!("cannot mix {:?} and {:?} components", kind, k)));
          }

          total = total.saturating_add(w);
        }

        match kind.and_then(|k| PinFormat::vector(k, total)) {
          Some(fmt) if total > 1 => Ok(vec![PinSignature::value(fmt)]),
          _ => Err(check.conflict(format!("cannot build a vector of {} components", total))),
        }
      }

      Operation::Expand(_, target) => {
        let a = check.single()?;
        let (kind, width) = check.vector(a)?;

        match (target.scalar_kind(), target.width()) {
          (Some(k), Some(w)) if k == kind && w >= width => Ok(vec![PinSignature::value(*target)]),
          _ => Err(check.conflict(format!("cannot expand {:?} to {:?}", a, target))),
        }
      }

      Operation::LoopEnter(_) => {
        if inputs.len() < 2 {
          return Err(check.conflict("a loop needs a count and at least one value"));
        }

        if inputs[0] != PinSignature::value(PinFormat::UInteger) {
          return Err(check.conflict(format!("loop count must be a UInteger, got {:?}", inputs[0])));
        }

        let mut outputs = Vec::with_capacity(inputs.len());
        outputs.push(PinSignature::value(PinFormat::UInteger));
        outputs.extend_from_slice(&inputs[1..]);
        Ok(outputs)
      }

      Operation::WhileEnter(_) => {
        if inputs.is_empty() {
          return Err(check.conflict("a loop needs at least one value"));
        }

        Ok(inputs.to_vec())
      }

      // the first input links the exit to the enter node
      Operation::LoopExit(_) => {
        if inputs.len() < 2 {
          return Err(check.conflict("a loop exit needs the iteration index and at least one value"));
        }

        if inputs[0] != PinSignature::value(PinFormat::UInteger) {
          return Err(check.conflict(format!("iteration index must be a UInteger, got {:?}", inputs[0])));
        }

        Ok(inputs[1..].to_vec())
      }

      Operation::WhileExit(_) => {
        if inputs.len() < 3 {
          return Err(check.conflict("a loop exit needs the first loop value, a condition and at least one value"));
        }

        if inputs[1] != PinSignature::value(PinFormat::Bool) {
          return Err(check.conflict(format!("loop condition must be a Bool, got {:?}", inputs[1])));
        }

        if inputs[0] != inputs[2] {
          return Err(check.conflict(format!(
            "first loop value mismatch: {:?} and {:?}",
            inputs[0], inputs[2]
          )));
        }

        Ok(inputs[2..].to_vec())
      }

      Operation::Sample => {
        if inputs.len() != 3 && inputs.len() != 4 {
          return Err(check.conflict(format!("expected 3 or 4 inputs, got {}", inputs.len())));
        }

        let texture = check.texture(inputs[0])?;

        if inputs[1] != PinSignature::value(PinFormat::Sampler) {
          return Err(check.conflict(format!("expected a sampler, got {:?}", inputs[1])));
        }

        let address = sample_address_width(texture.format)
          .and_then(|w| PinFormat::vector(ScalarKind::Float, w))
          .ok_or_else(|| check.conflict(format!("{:?} cannot be sampled", texture.format)))?;
        check.expect(inputs[2], address)?;
        check.offset(texture.format, inputs.get(3))?;

        Ok(vec![PinSignature::value(texture.texture_format)])
      }

      Operation::Load => {
        if inputs.len() != 2 && inputs.len() != 3 {
          return Err(check.conflict(format!("expected 2 or 3 inputs, got {}", inputs.len())));
        }

        let texture = check.texture(inputs[0])?;
        let position = load_position_width(texture.format)
          .and_then(|w| PinFormat::vector(ScalarKind::Integer, w))
          .ok_or_else(|| check.conflict(format!("{:?} cannot be loaded from", texture.format)))?;
        check.expect(inputs[1], position)?;
        check.offset(texture.format, inputs.get(2))?;

        Ok(vec![PinSignature::value(texture.texture_format)])
      }

      Operation::Custom(op) => op.bind(inputs),
    }
  }
}

/// Width of the floating-point address used to sample a texture.
fn sample_address_width(texture: PinFormat) -> Option<u8> {
  match texture {
    PinFormat::Texture1D => Some(1),
    PinFormat::Texture1DArray | PinFormat::Texture2D => Some(2),
    PinFormat::Texture2DArray | PinFormat::TextureCube | PinFormat::Texture3D => Some(3),
    _ => None,
  }
}

/// Width of the integer position used to load a texel; the last component is the mip level, except for buffers.
fn load_position_width(texture: PinFormat) -> Option<u8> {
  match texture {
    PinFormat::BufferTexture => Some(1),
    PinFormat::Texture1D => Some(2),
    PinFormat::Texture1DArray | PinFormat::Texture2D => Some(3),
    PinFormat::Texture2DArray | PinFormat::Texture3D => Some(4),
    _ => None,
  }
}

/// Width of the integer texel offset accepted by sampling and loading.
fn offset_width(texture: PinFormat) -> Option<u8> {
  match texture {
    PinFormat::Texture1D | PinFormat::Texture1DArray => Some(1),
    PinFormat::Texture2D | PinFormat::Texture2DArray => Some(2),
    PinFormat::Texture3D => Some(3),
    _ => None,
  }
}

/// Input checks shared by the built-in operations.
struct Check<'a> {
  op: &'a str,
  inputs: &'a [PinSignature],
}

impl<'a> Check<'a> {
  fn conflict(&self, detail: impl Into<String>) -> Error {
    Error::format_conflict(self.op, detail)
  }

  fn arity(&self, n: usize) -> Result<()> {
    if self.inputs.len() == n {
      Ok(())
    } else {
      Err(self.conflict(format!("expected {} inputs, got {}", n, self.inputs.len())))
    }
  }

  /// A single, non-array value.
  fn plain(&self, sig: PinSignature) -> Result<PinFormat> {
    if sig.is_plain_value() {
      Ok(sig.format)
    } else {
      Err(self.conflict(format!("expected a single value, got {:?}", sig)))
    }
  }

  fn single(&self) -> Result<PinFormat> {
    self.arity(1)?;
    self.plain(self.inputs[0])
  }

  fn pair(&self) -> Result<(PinFormat, PinFormat)> {
    self.arity(2)?;
    Ok((self.plain(self.inputs[0])?, self.plain(self.inputs[1])?))
  }

  fn same(&self, a: PinFormat, b: PinFormat) -> Result<()> {
    if a == b {
      Ok(())
    } else {
      Err(self.conflict(format!("{:?} and {:?} differ", a, b)))
    }
  }

  fn expect(&self, sig: PinSignature, format: PinFormat) -> Result<()> {
    if sig == PinSignature::value(format) {
      Ok(())
    } else {
      Err(self.conflict(format!("expected {:?}, got {:?}", format, sig)))
    }
  }

  fn numeric(&self, a: PinFormat) -> Result<()> {
    match a.scalar_kind() {
      Some(ScalarKind::Bool) | None => Err(self.conflict(format!("{:?} is not numeric", a))),
      _ => Ok(()),
    }
  }

  fn boolean(&self, a: PinFormat) -> Result<()> {
    if a.scalar_kind() == Some(ScalarKind::Bool) {
      Ok(())
    } else {
      Err(self.conflict(format!("{:?} is not boolean", a)))
    }
  }

  /// Scalar kind and width of a scalar or vector.
  fn vector(&self, a: PinFormat) -> Result<(ScalarKind, u8)> {
    match (a.scalar_kind(), a.width()) {
      (Some(kind), Some(width)) => Ok((kind, width)),
      _ => Err(self.conflict(format!("expected a scalar or a vector, got {:?}", a))),
    }
  }

  fn selects(&self, sw: &Swizzle, width: u8) -> Result<()> {
    if sw.max_index() < width {
      Ok(())
    } else {
      Err(self.conflict(format!("{:?} out of a {}-component value", sw, width)))
    }
  }

  fn array(&self, sig: PinSignature) -> Result<PinSignature> {
    if sig.array != ArraySize::NotArray {
      Ok(sig)
    } else {
      Err(self.conflict(format!("expected an array, got {:?}", sig)))
    }
  }

  fn index(&self, sig: PinSignature) -> Result<()> {
    if sig == PinSignature::value(PinFormat::Integer) || sig == PinSignature::value(PinFormat::UInteger) {
      Ok(())
    } else {
      Err(self.conflict(format!("expected an Integer or UInteger index, got {:?}", sig)))
    }
  }

  fn texture(&self, sig: PinSignature) -> Result<PinSignature> {
    if sig.array == ArraySize::NotArray && sig.format.is_texture() && sig.texture_format.is_value() {
      Ok(sig)
    } else {
      Err(self.conflict(format!("expected a texture, got {:?}", sig)))
    }
  }

  fn offset(&self, texture: PinFormat, offset: Option<&PinSignature>) -> Result<()> {
    match offset {
      None => Ok(()),
      Some(sig) => {
        let fmt = offset_width(texture)
          .and_then(|w| PinFormat::vector(ScalarKind::Integer, w))
          .ok_or_else(|| self.conflict(format!("{:?} takes no offset", texture)))?;
        self.expect(*sig, fmt)
      }
    }
  }

  /// Format of `a * b`.
  fn product(&self, a: PinFormat, b: PinFormat) -> Result<PinFormat> {
    if a == b {
      return Ok(a);
    }

    if a.scalar_kind() == b.scalar_kind() {
      if a.is_scalar() && (b.is_vector() || b.is_matrix()) {
        return Ok(b);
      }

      if b.is_scalar() && (a.is_vector() || a.is_matrix()) {
        return Ok(a);
      }

      if a.is_vector() && a.width() == b.matrix_dim() {
        return Ok(a);
      }

      if b.is_vector() && b.width() == a.matrix_dim() {
        return Ok(b);
      }
    }

    Err(self.conflict(format!("cannot multiply {:?} by {:?}", a, b)))
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::swizzle::SwizzleSelector::*;

  fn v(format: PinFormat) -> PinSignature {
    PinSignature::value(format)
  }

  fn is_conflict<T>(r: Result<T>) -> bool {
    matches!(r, Err(Error::FormatConflict { .. }))
  }

  #[test]
  fn arithmetic() {
    let f4 = v(PinFormat::Floatx4);

    assert_eq!(Operation::Add.bind(&[f4, f4]), Ok(vec![f4]));
    assert!(is_conflict(Operation::Sub.bind(&[f4, v(PinFormat::Floatx3)])));
    assert!(is_conflict(Operation::Div.bind(&[v(PinFormat::Bool), v(PinFormat::Bool)])));
    assert!(is_conflict(Operation::Add.bind(&[f4])));
  }

  #[test]
  fn multiply() {
    let f = v(PinFormat::Float);
    let f4 = v(PinFormat::Floatx4);
    let m44 = v(PinFormat::Float4x4);
    let m33 = v(PinFormat::Float3x3);

    assert_eq!(Operation::Mul.bind(&[f4, m44]), Ok(vec![f4]));
    assert_eq!(Operation::Mul.bind(&[m44, f4]), Ok(vec![f4]));
    assert_eq!(Operation::Mul.bind(&[f, m44]), Ok(vec![m44]));
    assert_eq!(Operation::Mul.bind(&[f4, f]), Ok(vec![f4]));
    assert!(is_conflict(Operation::Mul.bind(&[f4, m33])));
    assert!(is_conflict(Operation::Mul.bind(&[f4, v(PinFormat::Integer)])));
  }

  #[test]
  fn compare_and_reduce() {
    let f3 = v(PinFormat::Floatx3);

    assert_eq!(
      Operation::Compare(CompareFunction::Less).bind(&[f3, f3]),
      Ok(vec![v(PinFormat::Boolx3)])
    );
    assert!(is_conflict(
      Operation::Compare(CompareFunction::Equal).bind(&[v(PinFormat::Float4x4), v(PinFormat::Float4x4)])
    ));
    assert_eq!(Operation::Any.bind(&[v(PinFormat::Boolx3)]), Ok(vec![v(PinFormat::Bool)]));
    assert!(is_conflict(Operation::All.bind(&[f3])));
  }

  #[test]
  fn swizzles() {
    let f2 = v(PinFormat::Floatx2);
    let f4 = v(PinFormat::Floatx4);

    assert_eq!(
      Operation::Swizzle(Swizzle::D3(Z, Y, X)).bind(&[f4]),
      Ok(vec![v(PinFormat::Floatx3)])
    );
    assert_eq!(Operation::Swizzle(Swizzle::D2(X, X)).bind(&[f2]), Ok(vec![f2]));
    assert!(is_conflict(Operation::Swizzle(Swizzle::D1(Z)).bind(&[f2])));

    assert_eq!(Operation::WriteSwizzle(Swizzle::D2(W, X)).bind(&[f4, f2]), Ok(vec![f4]));
    assert!(is_conflict(Operation::WriteSwizzle(Swizzle::D2(X, X)).bind(&[f4, f2])));
    assert!(is_conflict(Operation::WriteSwizzle(Swizzle::D1(X)).bind(&[f4, f2])));
  }

  #[test]
  fn arrays() {
    let arr = PinSignature::array(PinFormat::Floatx2, ArraySize::Dynamic);
    let u = v(PinFormat::UInteger);
    let i = v(PinFormat::Integer);
    let f2 = v(PinFormat::Floatx2);

    assert_eq!(Operation::Index.bind(&[arr, u]), Ok(vec![f2]));
    assert_eq!(Operation::Index.bind(&[arr, i]), Ok(vec![f2]));
    assert!(is_conflict(Operation::Index.bind(&[f2, u])));
    assert!(is_conflict(Operation::Index.bind(&[arr, v(PinFormat::Float)])));
    assert_eq!(Operation::WriteIndex.bind(&[arr, u, f2]), Ok(vec![arr]));
    assert!(is_conflict(Operation::WriteIndex.bind(&[arr, u, v(PinFormat::Floatx3)])));
    assert_eq!(Operation::ArraySize.bind(&[arr]), Ok(vec![u]));
  }

  #[test]
  fn compound_and_expand() {
    let f = v(PinFormat::Float);
    let f2 = v(PinFormat::Floatx2);

    assert_eq!(Operation::Compound.bind(&[f2, f, f]), Ok(vec![v(PinFormat::Floatx4)]));
    assert!(is_conflict(Operation::Compound.bind(&[f2, f2, f])));
    assert!(is_conflict(Operation::Compound.bind(&[f, v(PinFormat::Integer)])));
    assert!(is_conflict(Operation::Compound.bind(&[f])));

    assert_eq!(
      Operation::Expand(ExpandType::AddOnesAtW, PinFormat::Floatx4).bind(&[f2]),
      Ok(vec![v(PinFormat::Floatx4)])
    );
    assert!(is_conflict(
      Operation::Expand(ExpandType::AddZeros, PinFormat::Floatx2).bind(&[v(PinFormat::Floatx3)])
    ));
    assert!(is_conflict(
      Operation::Expand(ExpandType::AddZeros, PinFormat::Integerx4).bind(&[f2])
    ));
  }

  #[test]
  fn loops() {
    let u = v(PinFormat::UInteger);
    let f = v(PinFormat::Float);
    let id = LoopId(0);

    assert_eq!(Operation::LoopEnter(id).bind(&[u, f, f]), Ok(vec![u, f, f]));
    assert!(is_conflict(Operation::LoopEnter(id).bind(&[f, f])));
    assert!(is_conflict(Operation::LoopEnter(id).bind(&[u])));
    assert_eq!(Operation::LoopExit(id).bind(&[u, f, u]), Ok(vec![f, u]));
    assert!(is_conflict(Operation::LoopExit(id).bind(&[f, u])));
    assert!(is_conflict(Operation::LoopExit(id).bind(&[u])));

    let b = v(PinFormat::Bool);
    assert_eq!(Operation::WhileEnter(id).bind(&[f, u]), Ok(vec![f, u]));
    assert_eq!(Operation::WhileExit(id).bind(&[f, b, f, u]), Ok(vec![f, u]));
    assert!(is_conflict(Operation::WhileExit(id).bind(&[b, f])));
    assert!(is_conflict(Operation::WhileExit(id).bind(&[f, f, f])));
    assert!(is_conflict(Operation::WhileExit(id).bind(&[u, b, f])));
  }

  #[test]
  fn textures() {
    let tex = PinSignature::texture(PinFormat::Texture2D, PinFormat::Floatx4);
    let cube = PinSignature::texture(PinFormat::TextureCube, PinFormat::Floatx4);
    let sampler = v(PinFormat::Sampler);

    assert_eq!(
      Operation::Sample.bind(&[tex, sampler, v(PinFormat::Floatx2)]),
      Ok(vec![v(PinFormat::Floatx4)])
    );
    assert_eq!(
      Operation::Sample.bind(&[tex, sampler, v(PinFormat::Floatx2), v(PinFormat::Integerx2)]),
      Ok(vec![v(PinFormat::Floatx4)])
    );
    assert!(is_conflict(Operation::Sample.bind(&[tex, sampler, v(PinFormat::Floatx3)])));
    assert!(is_conflict(
      Operation::Sample.bind(&[cube, sampler, v(PinFormat::Floatx3), v(PinFormat::Integerx3)])
    ));
    assert_eq!(
      Operation::Load.bind(&[tex, v(PinFormat::Integerx3)]),
      Ok(vec![v(PinFormat::Floatx4)])
    );
    assert!(is_conflict(Operation::Load.bind(&[cube, v(PinFormat::Integerx4)])));
  }
}
