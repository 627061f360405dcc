//! Loops.
//!
//! A DAG has no cycles, so a loop is expressed as a pair of nodes: an enter node, taking the initial loop values, and
//! an exit node, taking the values at the end of an iteration. The enter node outputs are the values at the start of
//! an iteration; the exit node outputs are the values once the loop is done.
//!
//! The exit node also consumes the first output of the enter node (the iteration index of a counted loop, the first
//! value of a conditional loop), so walking the inputs of an exit node always reaches its enter node, even when every
//! value was replaced in the loop body.
//!
//! Between [`CodeGenerator::begin_loop`] and [`CodeGenerator::end_loop`], the loop is _open_: the values can be read
//! and replaced through the loop controller, and operations built meanwhile are part of the loop body. Loops nest,
//! and only the innermost open loop can be updated or ended.
//!
//! ```
//! use shadegraph::prelude::*;
//!
//! let gen = CodeGenerator::new_pixel_shader();
//! let count = gen.constant::<u32>("count").unwrap();
//! let sum = gen.fixed(0u32);
//!
//! let mut l = gen.begin_loop(&count, &sum).unwrap();
//! let next = l.value() + l.iteration_index().unwrap();
//! l.set_value(&next).unwrap();
//! let sum = gen.end_loop(l).unwrap();
//!
//! gen.output(PinComponent::USER0, &sum).unwrap();
//! ```

use std::marker::PhantomData;

use smallvec::SmallVec;

use crate::{
  binder::{Binder, Boolx1, ErasedBinder, PinBinder, UIntegerx1},
  error::{Error, Result},
  generator::{Arg, CodeGenerator},
  operation::{LoopId, Operation},
  shader_code::Pin,
};

/// How a loop decides to stop.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LoopKind {
  /// Runs a given number of iterations.
  Counted,

  /// Runs until a condition, evaluated at the end of each iteration, is false.
  Conditional,
}

/// An open loop, with an arbitrary number of values.
#[derive(Debug)]
pub struct Loop {
  generator: CodeGenerator,
  id: LoopId,
  kind: LoopKind,
  /// First output of the enter node, consumed by the exit node so that the exit depends on the enter.
  enter: Pin,
  index: Option<Pin>,
  values: Vec<Pin>,
}

impl Loop {
  pub fn id(&self) -> LoopId {
    self.id
  }

  pub fn kind(&self) -> LoopKind {
    self.kind
  }

  pub fn generator(&self) -> &CodeGenerator {
    &self.generator
  }

  /// Number of loop values.
  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// Index of the current iteration, starting at zero.
  ///
  /// # Errors
  ///
  /// [`Error::InvalidLoopState`] for conditional loops, which don’t count iterations.
  pub fn iteration_index(&self) -> Result<UIntegerx1> {
    self
      .index
      .map(|pin| Binder::new(pin, self.generator.clone()))
      .ok_or_else(|| Error::invalid_loop_state("conditional loops have no iteration index"))
  }

  fn slot(&self, slot: usize) -> Result<Pin> {
    self.values.get(slot).copied().ok_or_else(|| {
      Error::invalid_loop_state(format!("slot {} out of a {}-value loop", slot, self.values.len()))
    })
  }

  /// Current value of `slot`.
  pub fn get(&self, slot: usize) -> Result<ErasedBinder> {
    let pin = self.slot(slot)?;
    Ok(ErasedBinder::new(pin, self.generator.clone()))
  }

  /// Replace the value of `slot` for the next iteration.
  ///
  /// # Errors
  ///
  /// - [`Error::GeneratorMismatch`] if `value` comes from another generator.
  /// - [`Error::InvalidLoopState`] if the loop is not the innermost open loop, or if `slot` is out of range.
  /// - [`Error::FormatConflict`] if `value` doesn’t have the signature of the slot.
  pub fn set(&mut self, slot: usize, value: &dyn PinBinder) -> Result<()> {
    let pin = value.pin();
    self.generator.check_pin(pin)?;

    if self.generator.innermost_loop() != Some(self.id) {
      return Err(Error::invalid_loop_state(format!(
        "{:?} is not the innermost open loop",
        self.id
      )));
    }

    let current = self.slot(slot)?;

    if current.signature() != pin.signature() {
      return Err(Error::format_conflict(
        "loop value",
        format!(
          "slot {} holds {:?}, got {:?}",
          slot,
          current.signature(),
          pin.signature()
        ),
      ));
    }

    self.values[slot] = pin;
    Ok(())
  }

  fn values(&self) -> impl Iterator<Item = Arg> + '_ {
    self.values.iter().copied().map(Arg::Pin)
  }
}

/// Types driving an open loop.
///
/// Implementors decide what [`CodeGenerator::end_loop`] and [`CodeGenerator::end_while`] return.
pub trait LoopController {
  /// Values once the loop is done.
  type Exit;

  fn into_loop(self) -> Loop;

  /// Wrap the exit node outputs.
  fn exit(generator: &CodeGenerator, pins: &[Pin]) -> Self::Exit;
}

impl LoopController for Loop {
  type Exit = Vec<ErasedBinder>;

  fn into_loop(self) -> Loop {
    self
  }

  fn exit(generator: &CodeGenerator, pins: &[Pin]) -> Self::Exit {
    pins
      .iter()
      .map(|pin| ErasedBinder::new(*pin, generator.clone()))
      .collect()
  }
}

/// An open loop with a single value of type `T`.
#[derive(Debug)]
pub struct Loop1<T>
where
  T: ?Sized,
{
  inner: Loop,
  _phantom: PhantomData<T>,
}

impl<T> Loop1<T>
where
  T: ?Sized,
{
  pub fn iteration_index(&self) -> Result<UIntegerx1> {
    self.inner.iteration_index()
  }

  /// Current value.
  pub fn value(&self) -> Binder<T> {
    Binder::new(self.inner.values[0], self.inner.generator.clone())
  }

  /// Replace the value for the next iteration.
  pub fn set_value(&mut self, value: &Binder<T>) -> Result<()> {
    self.inner.set(0, value)
  }
}

impl<T> LoopController for Loop1<T>
where
  T: ?Sized,
{
  type Exit = Binder<T>;

  fn into_loop(self) -> Loop {
    self.inner
  }

  fn exit(generator: &CodeGenerator, pins: &[Pin]) -> Self::Exit {
    Binder::new(pins[0], generator.clone())
  }
}

/// An open loop with two values of types `T` and `U`.
#[derive(Debug)]
pub struct Loop2<T, U>
where
  T: ?Sized,
  U: ?Sized,
{
  inner: Loop,
  _phantom: PhantomData<(Box<T>, Box<U>)>,
}

impl<T, U> Loop2<T, U>
where
  T: ?Sized,
  U: ?Sized,
{
  pub fn iteration_index(&self) -> Result<UIntegerx1> {
    self.inner.iteration_index()
  }

  pub fn value1(&self) -> Binder<T> {
    Binder::new(self.inner.values[0], self.inner.generator.clone())
  }

  pub fn value2(&self) -> Binder<U> {
    Binder::new(self.inner.values[1], self.inner.generator.clone())
  }

  pub fn set_value1(&mut self, value: &Binder<T>) -> Result<()> {
    self.inner.set(0, value)
  }

  pub fn set_value2(&mut self, value: &Binder<U>) -> Result<()> {
    self.inner.set(1, value)
  }
}

impl<T, U> LoopController for Loop2<T, U>
where
  T: ?Sized,
  U: ?Sized,
{
  type Exit = (Binder<T>, Binder<U>);

  fn into_loop(self) -> Loop {
    self.inner
  }

  fn exit(generator: &CodeGenerator, pins: &[Pin]) -> Self::Exit {
    (
      Binder::new(pins[0], generator.clone()),
      Binder::new(pins[1], generator.clone()),
    )
  }
}

impl CodeGenerator {
  /// Open a loop running `count` iterations over `values`.
  ///
  /// # Errors
  ///
  /// - [`Error::NullArgument`] if `values` is empty.
  /// - [`Error::GeneratorMismatch`] if `count` or a value comes from another generator.
  pub fn begin_loop_with(&self, count: &UIntegerx1, values: &[&dyn PinBinder]) -> Result<Loop> {
    if values.is_empty() {
      return Err(Error::NullArgument("loop values"));
    }

    let id = self.next_loop_id();
    let args = std::iter::once(Arg::from(count))
      .chain(values.iter().map(|value| Arg::from(*value)))
      .collect();
    let pins = self.insert(Operation::LoopEnter(id), args, |_, _| Ok(()))?;
    self.open_loop(id);

    Ok(Loop {
      generator: self.clone(),
      id,
      kind: LoopKind::Counted,
      enter: pins[0],
      index: Some(pins[0]),
      values: pins[1..].to_vec(),
    })
  }

  /// Open a loop running `count` iterations over a single value.
  pub fn begin_loop<T>(&self, count: &UIntegerx1, value: &Binder<T>) -> Result<Loop1<T>>
  where
    T: ?Sized,
  {
    Ok(Loop1 {
      inner: self.begin_loop_with(count, &[value])?,
      _phantom: PhantomData,
    })
  }

  /// Open a loop running `count` iterations over two values.
  pub fn begin_loop2<T, U>(&self, count: &UIntegerx1, a: &Binder<T>, b: &Binder<U>) -> Result<Loop2<T, U>>
  where
    T: ?Sized,
    U: ?Sized,
  {
    Ok(Loop2 {
      inner: self.begin_loop_with(count, &[a, b])?,
      _phantom: PhantomData,
    })
  }

  /// Open a loop running while a condition holds.
  ///
  /// The body runs at least once; the condition is given when ending the loop.
  pub fn begin_while(&self, values: &[&dyn PinBinder]) -> Result<Loop> {
    if values.is_empty() {
      return Err(Error::NullArgument("loop values"));
    }

    let id = self.next_loop_id();
    let args = values.iter().map(|value| Arg::from(*value)).collect();
    let pins = self.insert(Operation::WhileEnter(id), args, |_, _| Ok(()))?;
    self.open_loop(id);

    Ok(Loop {
      generator: self.clone(),
      id,
      kind: LoopKind::Conditional,
      enter: pins[0],
      index: None,
      values: pins.to_vec(),
    })
  }

  fn end(&self, l: &Loop, kind: LoopKind, op: Operation, args: Vec<Arg>) -> Result<SmallVec<[Pin; 1]>> {
    if l.generator != *self {
      return Err(Error::GeneratorMismatch);
    }

    if l.kind != kind {
      return Err(Error::invalid_loop_state(format!(
        "{:?} is a {:?} loop",
        l.id, l.kind
      )));
    }

    if self.innermost_loop() != Some(l.id) {
      return Err(Error::invalid_loop_state(format!(
        "{:?} ended while an inner loop is open",
        l.id
      )));
    }

    let pins = self.insert(op, args, |_, _| Ok(()))?;
    self.close_loop(l.id);

    Ok(pins)
  }

  /// Close a counted loop.
  ///
  /// # Errors
  ///
  /// [`Error::InvalidLoopState`] if the loop is conditional or not the innermost open loop.
  pub fn end_loop<L>(&self, controller: L) -> Result<L::Exit>
  where
    L: LoopController,
  {
    let l = controller.into_loop();
    let args = std::iter::once(Arg::Pin(l.enter)).chain(l.values()).collect();
    let pins = self.end(&l, LoopKind::Counted, Operation::LoopExit(l.id), args)?;

    Ok(L::exit(self, &pins))
  }

  /// Close a conditional loop, which runs again as long as `cond` is true.
  ///
  /// # Errors
  ///
  /// [`Error::InvalidLoopState`] if the loop is counted or not the innermost open loop.
  pub fn end_while<L>(&self, controller: L, cond: &Boolx1) -> Result<L::Exit>
  where
    L: LoopController,
  {
    let l = controller.into_loop();
    let args = vec![Arg::Pin(l.enter), Arg::from(cond)]
      .into_iter()
      .chain(l.values())
      .collect();
    let pins = self.end(&l, LoopKind::Conditional, Operation::WhileExit(l.id), args)?;

    Ok(L::exit(self, &pins))
  }
}
