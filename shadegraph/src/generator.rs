//! Code generation sessions.
//!
//! A [`CodeGenerator`] owns the [`ShaderCode`] of one shader stage while it’s being described. It’s a cheap,
//! reference-counted handle: every [`Binder`] keeps a clone of the generator it was created by, so that operators can
//! append nodes to the right DAG.
//!
//! Every builder method checks its operands before touching the DAG. A call that fails leaves the DAG untouched.

use std::{
  any::type_name,
  cell::{Cell, Ref, RefCell},
  fmt,
  rc::Rc,
  sync::atomic::{AtomicU64, Ordering},
};

use smallvec::SmallVec;

use crate::{
  binder::{AnyBinder, Binder, Boolx1, ErasedBinder, PinArray, PinBinder},
  constant::{ConstantValue, Fixed},
  error::{Error, Result},
  format::{ArraySize, PinFormat, PinSignature},
  operation::{CompareFunction, CustomOperation, ExpandType, LoopId, Operation},
  shader_code::{Constant, NodeKind, Pin, SessionId, ShaderCode, MAX_OUTPUTS},
  stage::{BindingStage, PinComponent},
  swizzle::Swizzle,
  types::{
    Arithmetic, Comparable, Dot, Logical, Multiply, Negative, Reducible, ToFormat, Typed, M22, M33, M44, V2, V3, V4,
  },
};

static NEXT_SESSION: AtomicU64 = AtomicU64::new(0);

struct Session {
  id: SessionId,
  code: RefCell<ShaderCode>,
  /// Open loops, innermost last.
  loops: RefCell<Vec<LoopId>>,
  next_loop: Cell<u32>,
}

/// Operand of a builder call, once resolved.
pub(crate) enum Arg {
  Pin(Pin),
  Fixed(ConstantValue),
}

impl Arg {
  fn signature(&self) -> Result<PinSignature> {
    match self {
      Arg::Pin(pin) => Ok(pin.signature()),
      Arg::Fixed(value) => value.signature(),
    }
  }
}

impl<B> From<&B> for Arg
where
  B: PinBinder + ?Sized,
{
  fn from(binder: &B) -> Self {
    Arg::Pin(binder.pin())
  }
}

/// Operand of an arithmetic, comparison or logical builder call.
#[derive(Debug)]
pub enum Operand<'a, T> {
  /// A value already in the DAG.
  Binder(&'a Binder<T>),

  /// A host value, inserted as a constant node along with the operation.
  Fixed(T),
}

impl<'a, T> Operand<'a, T>
where
  T: Fixed,
{
  pub(crate) fn into_arg(self) -> Arg {
    match self {
      Operand::Binder(binder) => Arg::Pin(binder.pin()),
      Operand::Fixed(value) => Arg::Fixed(value.to_constant()),
    }
  }
}

/// Types usable as operands: references to binders and host values.
pub trait IntoOperand<'a, T> {
  fn into_operand(self) -> Operand<'a, T>;
}

impl<'a, T> IntoOperand<'a, T> for &'a Binder<T> {
  fn into_operand(self) -> Operand<'a, T> {
    Operand::Binder(self)
  }
}

/// One part of [`CodeGenerator::compound_of`].
#[derive(Clone)]
pub enum CompoundPart<'a> {
  Binder(&'a dyn PinBinder),
  Fixed(ConstantValue),
}

impl<'a, B> From<&'a B> for CompoundPart<'a>
where
  B: PinBinder,
{
  fn from(binder: &'a B) -> Self {
    CompoundPart::Binder(binder)
  }
}

impl<'a> From<ConstantValue> for CompoundPart<'a> {
  fn from(value: ConstantValue) -> Self {
    CompoundPart::Fixed(value)
  }
}

macro_rules! impl_host_operand {
  ($($t:ty),*) => {
    $(
      impl<'a> IntoOperand<'a, $t> for $t {
        fn into_operand(self) -> Operand<'a, $t> {
          Operand::Fixed(self)
        }
      }

      impl<'a> From<$t> for CompoundPart<'a> {
        fn from(value: $t) -> Self {
          CompoundPart::Fixed(value.to_constant())
        }
      }
    )*
  };
}

impl_host_operand!(
  i32, V2<i32>, V3<i32>, V4<i32>, u32, V2<u32>, V3<u32>, V4<u32>, bool, V2<bool>, V3<bool>, V4<bool>, f32, V2<f32>,
  V3<f32>, V4<f32>, M22, M33, M44
);

/// Check that `outputs` is a single pin wrapping as `R`.
fn single_output<R>(op: &str, outputs: &[PinSignature]) -> Result<()>
where
  R: ?Sized + Typed,
{
  match outputs {
    [sig] if R::accepts(sig) => Ok(()),
    _ => Err(Error::format_conflict(
      op,
      format!("{:?} cannot be bound as {}", outputs, type_name::<R>()),
    )),
  }
}

/// Shader DAG builder.
///
/// Create one per shader stage, describe the shader through it and the binders it hands out, then
/// [`finish`](CodeGenerator::finish) it to get the [`ShaderCode`].
#[derive(Clone)]
pub struct CodeGenerator {
  session: Rc<Session>,
}

impl fmt::Debug for CodeGenerator {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("CodeGenerator")
      .field("session", &self.session.id)
      .field("stage", &self.stage())
      .finish()
  }
}

impl PartialEq for CodeGenerator {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.session, &other.session)
  }
}

impl Eq for CodeGenerator {}

impl CodeGenerator {
  /// Start a new session for `stage`.
  pub fn new(stage: BindingStage) -> Self {
    let id = SessionId(NEXT_SESSION.fetch_add(1, Ordering::Relaxed));
    log::debug!("starting {:?} session {:?}", stage, id);

    CodeGenerator {
      session: Rc::new(Session {
        id,
        code: RefCell::new(ShaderCode::new(id, stage)),
        loops: RefCell::new(Vec::new()),
        next_loop: Cell::new(0),
      }),
    }
  }

  pub fn new_vertex_shader() -> Self {
    Self::new(BindingStage::VertexShader)
  }

  pub fn new_geometry_shader() -> Self {
    Self::new(BindingStage::GeometryShader)
  }

  pub fn new_pixel_shader() -> Self {
    Self::new(BindingStage::PixelShader)
  }

  /// Describe a whole stage with a closure and return its DAG.
  ///
  /// ```
  /// use shadegraph::prelude::*;
  ///
  /// let code = CodeGenerator::build(BindingStage::PixelShader, |gen| {
  ///   let color = gen.input::<V4<f32>>(PinComponent::COLOUR)?;
  ///   gen.output(PinComponent::RENDER_TARGET0, &color)
  /// })
  /// .unwrap();
  ///
  /// assert_eq!(code.output(PinComponent::RENDER_TARGET0), code.input(PinComponent::COLOUR));
  /// ```
  pub fn build(stage: BindingStage, f: impl FnOnce(&CodeGenerator) -> Result<()>) -> Result<ShaderCode> {
    let gen = Self::new(stage);
    f(&gen)?;
    gen.finish()
  }

  pub fn session_id(&self) -> SessionId {
    self.session.id
  }

  pub fn stage(&self) -> BindingStage {
    self.session.code.borrow().stage()
  }

  /// Borrow the DAG built so far.
  ///
  /// The DAG cannot grow while the returned guard is alive; drop it before calling any other builder method.
  pub fn shader_code(&self) -> Ref<'_, ShaderCode> {
    self.session.code.borrow()
  }

  /// End the session.
  ///
  /// # Errors
  ///
  /// [`Error::InvalidLoopState`] if a loop is still open.
  pub fn finish(self) -> Result<ShaderCode> {
    let open = self.session.loops.borrow().len();

    if open > 0 {
      log::warn!("{:?}: finishing with {} open loop(s)", self.session.id, open);
      return Err(Error::invalid_loop_state(format!("{} loop(s) still open", open)));
    }

    let code = match Rc::try_unwrap(self.session) {
      Ok(session) => session.code.into_inner(),
      Err(session) => session.code.clone().into_inner(),
    };

    log::debug!("{:?}: finished with {} nodes", code.session(), code.nodes().len());
    Ok(code)
  }

  /// Format mapped to the host type `T`.
  pub fn format_of<T>() -> PinFormat
  where
    T: ToFormat,
  {
    T::FORMAT
  }

  pub(crate) fn check_pin(&self, pin: Pin) -> Result<()> {
    if pin.session() == self.session.id {
      Ok(())
    } else {
      Err(Error::GeneratorMismatch)
    }
  }

  /// Bind `op` to `args` and insert it, along with the constants of `args`.
  ///
  /// `check` is handed the operation name and output signatures and can reject them; nothing is inserted then.
  pub(crate) fn insert(
    &self,
    op: Operation,
    args: Vec<Arg>,
    check: impl FnOnce(&str, &[PinSignature]) -> Result<()>,
  ) -> Result<SmallVec<[Pin; 1]>> {
    for arg in &args {
      if let Arg::Pin(pin) = arg {
        self.check_pin(*pin)?;
      }
    }

    let sigs = args.iter().map(Arg::signature).collect::<Result<Vec<_>>>()?;
    let outputs = op.bind(&sigs)?;

    if outputs.len() > MAX_OUTPUTS {
      return Err(Error::format_conflict(
        op.name(),
        format!("{} outputs, at most {} per node", outputs.len(), MAX_OUTPUTS),
      ));
    }

    check(op.name(), &outputs)?;

    let mut code = self.session.code.borrow_mut();
    let inputs = args
      .into_iter()
      .zip(sigs)
      .map(|(arg, sig)| match arg {
        Arg::Pin(pin) => pin,
        Arg::Fixed(value) => code.push_constant(Constant::Fixed(value), sig),
      })
      .collect::<SmallVec<[Pin; 3]>>();

    Ok(code.push(NodeKind::Operation(op), &inputs, &outputs))
  }

  /// Insert an operation with a single output of type `R`.
  pub(crate) fn insert_one<R>(&self, op: Operation, args: Vec<Arg>) -> Result<Binder<R>>
  where
    R: ?Sized + Typed,
  {
    let pins = self.insert(op, args, single_output::<R>)?;
    Ok(Binder::new(pins[0], self.clone()))
  }

  /// Insert an operation whose single output has the signature of its first input.
  fn insert_same<T>(&self, op: Operation, args: Vec<Arg>) -> Result<Binder<T>>
  where
    T: ?Sized,
  {
    let pins = self.insert(op, args, |op, outputs| match outputs {
      [_] => Ok(()),
      _ => Err(Error::format_conflict(op, "expected a single output")),
    })?;

    Ok(Binder::new(pins[0], self.clone()))
  }

  /// Identifier the next loop will get.
  pub(crate) fn next_loop_id(&self) -> LoopId {
    LoopId(self.session.next_loop.get())
  }

  pub(crate) fn open_loop(&self, id: LoopId) {
    self.session.next_loop.set(id.0 + 1);
    self.session.loops.borrow_mut().push(id);
    log::debug!("{:?}: opened {:?}", self.session.id, id);
  }

  pub(crate) fn innermost_loop(&self) -> Option<LoopId> {
    self.session.loops.borrow().last().copied()
  }

  pub(crate) fn close_loop(&self, id: LoopId) {
    let mut loops = self.session.loops.borrow_mut();

    if loops.last() == Some(&id) {
      loops.pop();
      log::debug!("{:?}: closed {:?}", self.session.id, id);
    }
  }

  /// Lift a host value into a constant node.
  pub fn fixed<T>(&self, value: T) -> Binder<T>
  where
    T: Fixed,
  {
    let pin = self
      .session
      .code
      .borrow_mut()
      .push_constant(Constant::Fixed(value.to_constant()), T::signature());
    Binder::new(pin, self.clone())
  }

  /// Lift a host array into a constant node.
  ///
  /// # Errors
  ///
  /// [`Error::UnsupportedFormat`] if `values` is empty.
  pub fn fixed_array<T>(&self, values: &[T]) -> Result<PinArray<T>>
  where
    T: Clone + Fixed,
  {
    let value = ConstantValue::Array(values.iter().cloned().map(Fixed::to_constant).collect());
    let sig = value.signature()?;
    let pin = self.session.code.borrow_mut().push_constant(Constant::Fixed(value), sig);

    Ok(Binder::new(pin, self.clone()))
  }

  /// Lift a value whose type is only known at runtime.
  ///
  /// # Errors
  ///
  /// [`Error::UnsupportedFormat`] for empty, nested or heterogeneous arrays.
  pub fn fixed_value(&self, value: ConstantValue) -> Result<AnyBinder> {
    let sig = value.signature()?;
    let ctor = AnyBinder::constructor(&sig)?;
    let pin = self.session.code.borrow_mut().push_constant(Constant::Fixed(value), sig);

    Ok(ctor(pin, self.clone()))
  }

  fn named(&self, name: &str, sig: PinSignature) -> Result<Pin> {
    self.session.code.borrow_mut().declare_constant(name, sig)
  }

  /// Declare a named constant, provided when the shader runs.
  ///
  /// # Errors
  ///
  /// - [`Error::NullArgument`] if `name` is empty.
  /// - [`Error::DuplicateConstant`] if `name` is already declared.
  pub fn constant<T>(&self, name: &str) -> Result<Binder<T>>
  where
    T: ToFormat,
  {
    let pin = self.named(name, T::signature())?;
    Ok(Binder::new(pin, self.clone()))
  }

  /// Declare a named constant array whose size is only known when the shader runs.
  pub fn constant_array<T>(&self, name: &str) -> Result<PinArray<T>>
  where
    T: ToFormat,
  {
    let sig = PinSignature {
      array: ArraySize::Dynamic,
      ..T::signature()
    };
    let pin = self.named(name, sig)?;

    Ok(Binder::new(pin, self.clone()))
  }

  /// Declare a named constant array of `size` elements.
  ///
  /// # Errors
  ///
  /// Same as [`CodeGenerator::constant`], plus [`Error::UnsupportedFormat`] if `size` is zero.
  pub fn constant_array_sized<T>(&self, name: &str, size: u32) -> Result<PinArray<T>>
  where
    T: ToFormat,
  {
    if size == 0 {
      return Err(Error::UnsupportedFormat("array of 0 items".to_owned()));
    }

    let sig = PinSignature {
      array: ArraySize::Fixed(size),
      ..T::signature()
    };
    let pin = self.named(name, sig)?;

    Ok(Binder::new(pin, self.clone()))
  }

  /// Read the input `component`.
  ///
  /// Reading the same component twice returns the same pin.
  ///
  /// # Errors
  ///
  /// - [`Error::InvalidComponent`] if `component` is not a single component.
  /// - [`Error::FormatConflict`] if `component` was already read as another type.
  pub fn input<T>(&self, component: PinComponent) -> Result<Binder<T>>
  where
    T: ToFormat,
  {
    let pin = self
      .session
      .code
      .borrow_mut()
      .declare_input(component, T::signature())?;
    Ok(Binder::new(pin, self.clone()))
  }

  /// Write `value` to the output `component`.
  ///
  /// Writing a component twice keeps the last value.
  ///
  /// # Errors
  ///
  /// - [`Error::GeneratorMismatch`] if `value` comes from another generator.
  /// - [`Error::InvalidComponent`] if `component` is not a single component.
  pub fn output<B>(&self, component: PinComponent, value: &B) -> Result<()>
  where
    B: ?Sized + PinBinder,
  {
    let pin = value.pin();
    self.check_pin(pin)?;

    let previous = self.session.code.borrow_mut().link_output(component, pin)?;

    if let Some(previous) = previous {
      log::debug!(
        "{:?}: output {:?} overwritten ({:?} replaced by {:?})",
        self.session.id,
        component,
        previous.node(),
        pin.node()
      );
    }

    Ok(())
  }

  /// Wrap `pin` in the binder matching its format.
  ///
  /// # Errors
  ///
  /// - [`Error::GeneratorMismatch`] if `pin` comes from another generator.
  /// - [`Error::NotSupportedFormat`] for resources and undefined pins.
  pub fn create_from(&self, pin: Pin) -> Result<AnyBinder> {
    self.check_pin(pin)?;
    AnyBinder::new(pin, self.clone())
  }

  pub fn add<'a, 'b, T>(&self, a: impl IntoOperand<'a, T>, b: impl IntoOperand<'b, T>) -> Result<Binder<T>>
  where
    T: 'a + 'b + Arithmetic + Fixed + Typed,
  {
    self.binary(Operation::Add, a, b)
  }

  pub fn sub<'a, 'b, T>(&self, a: impl IntoOperand<'a, T>, b: impl IntoOperand<'b, T>) -> Result<Binder<T>>
  where
    T: 'a + 'b + Arithmetic + Fixed + Typed,
  {
    self.binary(Operation::Sub, a, b)
  }

  pub fn div<'a, 'b, T>(&self, a: impl IntoOperand<'a, T>, b: impl IntoOperand<'b, T>) -> Result<Binder<T>>
  where
    T: 'a + 'b + Arithmetic + Fixed + Typed,
  {
    self.binary(Operation::Div, a, b)
  }

  /// Componentwise product, or matrix product when a matrix is involved.
  pub fn mul<'a, 'b, A, B>(&self, a: impl IntoOperand<'a, A>, b: impl IntoOperand<'b, B>) -> Result<Binder<A::Output>>
  where
    A: 'a + Multiply<B> + Fixed,
    B: 'b + Fixed,
    A::Output: Typed,
  {
    self.insert_one(
      Operation::Mul,
      vec![a.into_operand().into_arg(), b.into_operand().into_arg()],
    )
  }

  pub fn neg<T>(&self, a: &Binder<T>) -> Result<Binder<T>>
  where
    T: Negative + Typed,
  {
    self.insert_one(Operation::Neg, vec![a.into()])
  }

  pub fn dot<'a, 'b, T>(&self, a: impl IntoOperand<'a, T>, b: impl IntoOperand<'b, T>) -> Result<Binder<T::Scalar>>
  where
    T: 'a + 'b + Dot + Fixed,
    T::Scalar: Typed,
  {
    self.binary(Operation::Dot, a, b)
  }

  /// Componentwise comparison.
  pub fn compare<'a, 'b, T>(
    &self,
    f: CompareFunction,
    a: impl IntoOperand<'a, T>,
    b: impl IntoOperand<'b, T>,
  ) -> Result<Binder<T::Mask>>
  where
    T: 'a + 'b + Comparable + Fixed,
    T::Mask: Typed,
  {
    self.binary(Operation::Compare(f), a, b)
  }

  pub fn and<'a, 'b, T>(&self, a: impl IntoOperand<'a, T>, b: impl IntoOperand<'b, T>) -> Result<Binder<T>>
  where
    T: 'a + 'b + Logical + Fixed + Typed,
  {
    self.binary(Operation::And, a, b)
  }

  pub fn or<'a, 'b, T>(&self, a: impl IntoOperand<'a, T>, b: impl IntoOperand<'b, T>) -> Result<Binder<T>>
  where
    T: 'a + 'b + Logical + Fixed + Typed,
  {
    self.binary(Operation::Or, a, b)
  }

  pub fn not<T>(&self, a: &Binder<T>) -> Result<Binder<T>>
  where
    T: Logical + Typed,
  {
    self.insert_one(Operation::Not, vec![a.into()])
  }

  /// Whether all components of `a` are true.
  pub fn all<T>(&self, a: &Binder<T>) -> Result<Boolx1>
  where
    T: Reducible,
  {
    self.insert_one(Operation::All, vec![a.into()])
  }

  /// Whether any component of `a` is true.
  pub fn any<T>(&self, a: &Binder<T>) -> Result<Boolx1>
  where
    T: Reducible,
  {
    self.insert_one(Operation::Any, vec![a.into()])
  }

  /// Whether no component of `a` is true.
  pub fn none<T>(&self, a: &Binder<T>) -> Result<Boolx1>
  where
    T: Reducible,
  {
    self.insert_one(Operation::NoneOf, vec![a.into()])
  }

  fn binary<'a, 'b, T, R>(
    &self,
    op: Operation,
    a: impl IntoOperand<'a, T>,
    b: impl IntoOperand<'b, T>,
  ) -> Result<Binder<R>>
  where
    T: 'a + 'b + Fixed,
    R: ?Sized + Typed,
  {
    self.insert_one(op, vec![a.into_operand().into_arg(), b.into_operand().into_arg()])
  }

  /// Read the components of `value` selected by `sw`, as an `R`.
  ///
  /// # Errors
  ///
  /// [`Error::FormatConflict`] if `value` is not a scalar or vector, if `sw` selects components `value` doesn’t have,
  /// or if the result is not an `R`.
  pub fn swizzle<T, R>(&self, value: &Binder<T>, sw: Swizzle) -> Result<Binder<R>>
  where
    T: ?Sized,
    R: ?Sized + Typed,
  {
    self.insert_one(Operation::Swizzle(sw), vec![value.into()])
  }

  /// Replace the components of `target` selected by `sw` with `value`.
  ///
  /// `target` is left untouched; the updated vector is a new pin.
  ///
  /// # Errors
  ///
  /// [`Error::FormatConflict`] if `sw` repeats a component, selects components `target` doesn’t have, or if `value`
  /// doesn’t have one component of the right kind per selector.
  pub fn write_swizzle<T, V>(&self, target: &Binder<T>, sw: Swizzle, value: &Binder<V>) -> Result<Binder<T>>
  where
    T: ?Sized,
    V: ?Sized,
  {
    self.insert_same(Operation::WriteSwizzle(sw), vec![target.into(), value.into()])
  }

  /// Select `if_true` or `if_false` depending on `cond`.
  pub fn branch<T>(&self, cond: &Boolx1, if_true: &Binder<T>, if_false: &Binder<T>) -> Result<Binder<T>>
  where
    T: ?Sized,
  {
    self.insert_same(Operation::Branch, vec![cond.into(), if_true.into(), if_false.into()])
  }

  /// Concatenate scalars and vectors into a vector.
  ///
  /// # Errors
  ///
  /// - [`Error::NullArgument`] if `parts` is empty.
  /// - [`Error::GeneratorMismatch`] if a part comes from another generator.
  /// - [`Error::FormatConflict`] if the parts mix component kinds, or don’t add up to a `T`.
  pub fn compound<T>(&self, parts: &[&dyn PinBinder]) -> Result<Binder<T>>
  where
    T: ?Sized + Typed,
  {
    if parts.is_empty() {
      return Err(Error::NullArgument("compound parts"));
    }

    self.insert_one(Operation::Compound, parts.iter().map(|part| Arg::from(*part)).collect())
  }

  /// Concatenate scalars, vectors and host constants into a vector.
  ///
  /// The generator is the one of the binders among `parts`.
  ///
  /// # Errors
  ///
  /// - [`Error::NullArgument`] if `parts` holds no binder.
  /// - [`Error::MixedGenerators`] if the binders come from different generators.
  /// - [`Error::FormatConflict`] as with [`CodeGenerator::compound`].
  pub fn compound_of<T>(parts: &[CompoundPart<'_>]) -> Result<Binder<T>>
  where
    T: ?Sized + Typed,
  {
    let mut binders = parts.iter().filter_map(|part| match part {
      CompoundPart::Binder(binder) => Some(*binder),
      CompoundPart::Fixed(_) => None,
    });

    let gen = binders
      .next()
      .map(|binder| binder.generator())
      .ok_or(Error::NullArgument("compound binder"))?;

    if binders.any(|binder| binder.generator() != gen) {
      return Err(Error::MixedGenerators);
    }

    let args = parts
      .iter()
      .map(|part| match part {
        CompoundPart::Binder(binder) => Arg::from(*binder),
        CompoundPart::Fixed(value) => Arg::Fixed(value.clone()),
      })
      .collect();

    gen.insert_one(Operation::Compound, args)
  }

  /// Widen `value` to a `T`, filling the missing components according to `rule`.
  pub fn expand<T, B>(&self, value: &B, rule: ExpandType) -> Result<Binder<T>>
  where
    T: ToFormat + Typed,
    B: ?Sized + PinBinder,
  {
    self.insert_one(Operation::Expand(rule, T::FORMAT), vec![value.into()])
  }

  /// Bind a custom operation built with [`Default`].
  pub fn execute<O>(&self, inputs: &[&dyn PinBinder]) -> Result<Vec<AnyBinder>>
  where
    O: CustomOperation + Default + 'static,
  {
    self.execute_with(O::default(), inputs)
  }

  /// Bind a custom operation.
  ///
  /// # Errors
  ///
  /// - [`Error::GeneratorMismatch`] if an input comes from another generator.
  /// - Whatever [`CustomOperation::bind`] fails with.
  /// - [`Error::FormatConflict`] if the operation has more than [`MAX_OUTPUTS`] outputs.
  /// - [`Error::NotSupportedFormat`] if an output has no binder type.
  pub fn execute_with<O>(&self, op: O, inputs: &[&dyn PinBinder]) -> Result<Vec<AnyBinder>>
  where
    O: CustomOperation + 'static,
  {
    let args = inputs.iter().map(|input| Arg::from(*input)).collect();
    let pins = self.insert(Operation::Custom(Rc::new(op)), args, |_, outputs| {
      outputs
        .iter()
        .try_for_each(|sig| AnyBinder::constructor(sig).map(|_| ()))
    })?;

    pins
      .into_iter()
      .map(|pin| AnyBinder::new(pin, self.clone()))
      .collect()
  }

  /// Erased view of a pin of this generator.
  pub fn erased(&self, pin: Pin) -> Result<ErasedBinder> {
    self.check_pin(pin)?;
    Ok(ErasedBinder::new(pin, self.clone()))
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::shader_code::{Node, NodeId};

  fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
  }

  #[test]
  fn sessions_are_distinct() {
    let a = CodeGenerator::new_vertex_shader();
    let b = CodeGenerator::new_vertex_shader();

    assert_ne!(a.session_id(), b.session_id());
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
  }

  #[test]
  fn binary_input_order() {
    init_logger();

    let gen = CodeGenerator::new_pixel_shader();
    let a = gen.fixed(1f32);
    let b = gen.fixed(2f32);
    let diff = gen.sub(&b, &a).unwrap();

    let code = gen.shader_code();
    assert_eq!(code.producer(diff.pin()).unwrap().inputs(), &[b.pin(), a.pin()]);
  }

  #[test]
  fn host_constants_on_either_side() {
    let gen = CodeGenerator::new_pixel_shader();
    let a = gen.fixed(V2([1f32, 2.]));
    let before = gen.shader_code().nodes().len();

    let left = gen.mul(2f32, &a).unwrap();
    let right = gen.add(&a, V2([3f32, 4.])).unwrap();

    let code = gen.shader_code();
    assert_eq!(code.nodes().len(), before + 4);

    let left = code.producer(left.pin()).unwrap();
    assert!(matches!(
      code.producer(left.inputs()[0]).unwrap().kind(),
      NodeKind::Constant(Constant::Fixed(ConstantValue::Float(_)))
    ));
    assert_eq!(left.inputs()[1], a.pin());

    let right = code.producer(right.pin()).unwrap();
    assert_eq!(right.inputs()[0], a.pin());
    assert!(matches!(
      code.producer(right.inputs()[1]).unwrap().kind(),
      NodeKind::Constant(Constant::Fixed(ConstantValue::Float2(_)))
    ));
  }

  #[test]
  fn generator_mismatch_is_atomic() {
    let gen = CodeGenerator::new_vertex_shader();
    let other = CodeGenerator::new_vertex_shader();
    let a = gen.fixed(1i32);
    let b = other.fixed(2i32);
    let before = gen.shader_code().nodes().len();

    assert_eq!(gen.add(&a, &b).err(), Some(Error::GeneratorMismatch));
    assert_eq!(gen.mul(&b, 3i32).err(), Some(Error::GeneratorMismatch));
    assert_eq!(gen.shader_code().nodes().len(), before);
  }

  #[test]
  fn inputs_and_outputs() {
    let gen = CodeGenerator::new_vertex_shader();
    let p = gen.input::<V4<f32>>(PinComponent::POSITION).unwrap();
    let again = gen.input::<V4<f32>>(PinComponent::POSITION).unwrap();

    assert_eq!(p.pin(), again.pin());
    assert!(matches!(
      gen.input::<V3<f32>>(PinComponent::POSITION),
      Err(Error::FormatConflict { .. })
    ));
    assert_eq!(
      gen.input::<f32>(PinComponent::empty()).err(),
      Some(Error::InvalidComponent(PinComponent::empty()))
    );

    gen.output(PinComponent::POSITION, &p).unwrap();

    let code = gen.finish().unwrap();
    assert_eq!(code.output(PinComponent::POSITION), Some(p.pin()));
    assert_eq!(code.output_node().inputs(), &[p.pin()]);
    assert_eq!(code.sorted_operations(), vec![NodeId::INPUT, NodeId::OUTPUT]);
  }

  #[test]
  fn finish_with_and_without_live_binders() {
    let gen = CodeGenerator::new_pixel_shader();
    let kept = gen.fixed(1f32);
    let shared = gen.finish().unwrap();

    assert_eq!(shared.producer(kept.pin()).map(Node::id), Some(kept.pin().node()));
    assert_eq!(shared.nodes().len(), 3);

    let gen = CodeGenerator::new_pixel_shader();
    let node = gen.fixed(1f32).pin().node();
    let unique = gen.finish().unwrap();

    assert!(unique.node(node).is_some());
    assert_eq!(unique.nodes().len(), 3);
  }

  #[test]
  fn output_last_write_wins() {
    init_logger();

    let gen = CodeGenerator::new_pixel_shader();
    let a = gen.fixed(0.25f32);
    let b = gen.fixed(0.75f32);

    gen.output(PinComponent::DEPTH, &a).unwrap();
    gen.output(PinComponent::DEPTH, &b).unwrap();

    let code = gen.shader_code();
    assert_eq!(code.output(PinComponent::DEPTH), Some(b.pin()));
    assert_eq!(code.output_node().inputs(), &[b.pin()]);
  }

  #[test]
  fn create_from_integer_vectors() {
    let gen = CodeGenerator::new_vertex_shader();
    let v = gen.fixed(V2([1i32, 2]));
    let w = gen.fixed(V4([1i32, 2, 3, 4]));

    assert!(matches!(gen.create_from(v.pin()), Ok(AnyBinder::Integerx2(_))));
    assert!(matches!(gen.create_from(w.pin()), Ok(AnyBinder::Integerx4(_))));
  }

  #[test]
  fn create_from_errors() {
    let gen = CodeGenerator::new_vertex_shader();
    let other = CodeGenerator::new_vertex_shader();
    let foreign = other.fixed(1u32);
    let sampler = gen.create_sampler("s").unwrap();

    assert_eq!(gen.create_from(foreign.pin()).err(), Some(Error::GeneratorMismatch));
    assert_eq!(
      gen.create_from(sampler.pin()).err(),
      Some(Error::NotSupportedFormat(PinFormat::Sampler))
    );
  }

  #[test]
  fn fixed_values() {
    let gen = CodeGenerator::new_vertex_shader();

    assert!(matches!(
      gen.fixed_value(ConstantValue::Float3([0.; 3])),
      Ok(AnyBinder::Floatx3(_))
    ));
    assert!(matches!(
      gen.fixed_value(ConstantValue::from(vec![1u32, 2])),
      Ok(AnyBinder::Array(_))
    ));
    assert!(matches!(
      gen.fixed_value(ConstantValue::Array(Vec::new())),
      Err(Error::UnsupportedFormat(_))
    ));
    assert!(matches!(
      gen.fixed_array::<f32>(&[]),
      Err(Error::UnsupportedFormat(_))
    ));
  }

  #[test]
  fn named_constants() {
    let gen = CodeGenerator::new_vertex_shader();
    let m = gen.constant::<M44>("world").unwrap();

    assert_eq!(gen.constant::<M44>("world").err(), Some(Error::DuplicateConstant("world".to_owned())));
    assert_eq!(gen.constant::<f32>("").err(), Some(Error::NullArgument("constant name")));
    assert!(matches!(
      gen.constant_array_sized::<f32>("weights", 0),
      Err(Error::UnsupportedFormat(_))
    ));

    let lights = gen.constant_array::<V4<f32>>("lights").unwrap();
    assert_eq!(lights.signature().array, ArraySize::Dynamic);

    let code = gen.shader_code();
    assert_eq!(code.constant("world"), Some(m.pin()));
    assert_eq!(code.parameters().len(), 2);
  }

  #[test]
  fn compound_from_parts() {
    let gen = CodeGenerator::new_vertex_shader();
    let xy = gen.fixed(V2([1f32, 2.]));
    let z = gen.fixed(3f32);

    let v = gen.compound::<V3<f32>>(&[&xy, &z]).unwrap();
    assert_eq!(v.format(), PinFormat::Floatx3);

    let v4 = CodeGenerator::compound_of::<V4<f32>>(&[(&v).into(), 1f32.into()]).unwrap();
    assert_eq!(v4.format(), PinFormat::Floatx4);

    assert!(matches!(
      gen.compound::<V4<f32>>(&[&xy, &z]),
      Err(Error::FormatConflict { .. })
    ));
    assert_eq!(gen.compound::<V2<f32>>(&[]).err(), Some(Error::NullArgument("compound parts")));
  }

  #[test]
  fn compound_mixed_generators() {
    let a = CodeGenerator::new_vertex_shader();
    let b = CodeGenerator::new_vertex_shader();
    let x = a.fixed(1f32);
    let y = b.fixed(2f32);

    assert_eq!(
      CodeGenerator::compound_of::<V2<f32>>(&[(&x).into(), (&y).into()]).err(),
      Some(Error::MixedGenerators)
    );
    assert_eq!(
      CodeGenerator::compound_of::<V2<f32>>(&[1f32.into(), 2f32.into()]).err(),
      Some(Error::NullArgument("compound binder"))
    );
    assert_eq!(b.compound::<V2<f32>>(&[&x, &y]).err(), Some(Error::GeneratorMismatch));
  }

  #[test]
  fn expand_to_position() {
    let gen = CodeGenerator::new_vertex_shader();
    let p = gen.input::<V3<f32>>(PinComponent::POSITION).unwrap();
    let p4 = gen.expand::<V4<f32>, _>(&p, ExpandType::AddOnesAtW).unwrap();

    assert_eq!(p4.format(), PinFormat::Floatx4);

    let code = gen.shader_code();
    assert!(matches!(
      code.producer(p4.pin()).unwrap().operation(),
      Some(Operation::Expand(ExpandType::AddOnesAtW, PinFormat::Floatx4))
    ));
  }

  #[derive(Debug, Default)]
  struct SinCos;

  impl CustomOperation for SinCos {
    fn name(&self) -> &str {
      "sincos"
    }

    fn bind(&self, inputs: &[PinSignature]) -> Result<Vec<PinSignature>> {
      match inputs {
        [sig] if sig.format == PinFormat::Float => Ok(vec![*sig, *sig]),
        _ => Err(Error::format_conflict(self.name(), "expected a single Float")),
      }
    }
  }

  #[derive(Debug, Default)]
  struct Opaque;

  impl CustomOperation for Opaque {
    fn name(&self) -> &str {
      "opaque"
    }

    fn bind(&self, _: &[PinSignature]) -> Result<Vec<PinSignature>> {
      Ok(vec![PinSignature::value(PinFormat::Undefined)])
    }
  }

  #[test]
  fn custom_operations() {
    let gen = CodeGenerator::new_pixel_shader();
    let angle = gen.fixed(0.5f32);
    let outputs = gen.execute::<SinCos>(&[&angle]).unwrap();

    assert_eq!(outputs.len(), 2);
    assert!(matches!(outputs[0], AnyBinder::Floatx1(_)));
    assert_eq!(outputs[1].pin().slot(), 1);

    let before = gen.shader_code().nodes().len();
    assert_eq!(
      gen.execute::<Opaque>(&[&angle]).err(),
      Some(Error::NotSupportedFormat(PinFormat::Undefined))
    );
    assert!(matches!(
      gen.execute::<SinCos>(&[&angle, &angle]),
      Err(Error::FormatConflict { .. })
    ));
    assert_eq!(gen.shader_code().nodes().len(), before);
  }

  #[derive(Debug)]
  struct Splat(usize);

  impl CustomOperation for Splat {
    fn name(&self) -> &str {
      "splat"
    }

    fn bind(&self, inputs: &[PinSignature]) -> Result<Vec<PinSignature>> {
      Ok(vec![inputs[0]; self.0])
    }
  }

  #[test]
  fn output_count_is_bounded() {
    let gen = CodeGenerator::new_pixel_shader();
    let x = gen.fixed(1f32);

    let outputs = gen.execute_with(Splat(MAX_OUTPUTS), &[&x]).unwrap();
    assert_eq!(outputs.last().map(|b| b.pin().slot()), Some(MAX_OUTPUTS - 1));

    let before = gen.shader_code().nodes().len();
    assert!(matches!(
      gen.execute_with(Splat(MAX_OUTPUTS + 1), &[&x]),
      Err(Error::FormatConflict { .. })
    ));
    assert_eq!(gen.shader_code().nodes().len(), before);
  }

  #[test]
  fn build_closure() {
    let code = CodeGenerator::build(BindingStage::PixelShader, |gen| {
      let uv = gen.input::<V2<f32>>(PinComponent::TEX_COORD0)?;
      let rg = gen.compound::<V4<f32>>(&[&uv, &uv])?;
      gen.output(PinComponent::RENDER_TARGET0, &rg)
    })
    .unwrap();

    assert_eq!(code.stage(), BindingStage::PixelShader);
    assert_eq!(code.output_components(), PinComponent::RENDER_TARGET0);
  }
}
