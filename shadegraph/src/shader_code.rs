//! The DAG built by a [`CodeGenerator`](crate::generator::CodeGenerator).
//!
//! A [`ShaderCode`] is a list of [`Node`]s. Each node consumes [`Pin`]s produced by earlier nodes and produces new
//! pins; those edges are the whole dependency graph. Two nodes are always present: the input node, whose outputs are
//! the semantic components read by the stage, and the output node, whose inputs are the values written by the stage.
//!
//! Nodes are stored in insertion order, which follows the order in which the shader was described. Since a node can
//! only consume pins that already exist, that order is also a valid evaluation order.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::{
  constant::ConstantValue,
  error::{Error, Result},
  format::{ArraySize, PinFormat, PinSignature},
  operation::Operation,
  stage::{BindingStage, PinComponent},
};

/// Identifier of a code generation session.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SessionId(pub(crate) u64);

/// Identifier of a node within a [`ShaderCode`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(u32);

impl NodeId {
  /// The input node.
  pub const INPUT: NodeId = NodeId(0);

  /// The output node.
  pub const OUTPUT: NodeId = NodeId(1);

  /// Position of the node in [`ShaderCode::nodes`].
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// Most output pins a single node can have.
pub const MAX_OUTPUTS: usize = u16::MAX as usize + 1;

/// A value flowing through the DAG.
///
/// A pin is one output slot of one node. Pins are immutable: changing a value, even partially, produces a new pin.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Pin {
  session: SessionId,
  node: NodeId,
  slot: u16,
  signature: PinSignature,
}

impl Pin {
  /// Session the pin was created in.
  pub fn session(&self) -> SessionId {
    self.session
  }

  /// Node producing the pin.
  pub fn node(&self) -> NodeId {
    self.node
  }

  /// Output slot of the producing node.
  pub fn slot(&self) -> usize {
    self.slot as usize
  }

  pub fn signature(&self) -> PinSignature {
    self.signature
  }

  pub fn format(&self) -> PinFormat {
    self.signature.format
  }

  pub fn array(&self) -> ArraySize {
    self.signature.array
  }

  pub fn texture_format(&self) -> PinFormat {
    self.signature.texture_format
  }
}

/// Constant node payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
  /// A value known while building the DAG.
  Fixed(ConstantValue),

  /// A named parameter, provided when the shader runs.
  Named(String),
}

/// What a node is.
#[derive(Clone, Debug)]
pub enum NodeKind {
  /// The input node.
  Input,

  /// The output node.
  Output,

  Constant(Constant),

  Operation(Operation),
}

/// A node of the DAG.
#[derive(Clone, Debug)]
pub struct Node {
  id: NodeId,
  kind: NodeKind,
  inputs: SmallVec<[Pin; 3]>,
  outputs: SmallVec<[Pin; 1]>,
}

impl Node {
  pub fn id(&self) -> NodeId {
    self.id
  }

  pub fn kind(&self) -> &NodeKind {
    &self.kind
  }

  /// Operation computed by the node, if it’s an operation node.
  pub fn operation(&self) -> Option<&Operation> {
    match &self.kind {
      NodeKind::Operation(op) => Some(op),
      _ => None,
    }
  }

  /// Pins consumed by the node, in order.
  pub fn inputs(&self) -> &[Pin] {
    &self.inputs
  }

  /// Pins produced by the node, in order.
  pub fn outputs(&self) -> &[Pin] {
    &self.outputs
  }
}

/// Description of a named constant.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParameterDescription {
  pub name: String,
  pub signature: PinSignature,
}

/// A shader DAG.
#[derive(Clone, Debug)]
pub struct ShaderCode {
  session: SessionId,
  stage: BindingStage,
  nodes: Vec<Node>,
  inputs: BTreeMap<PinComponent, Pin>,
  outputs: BTreeMap<PinComponent, Pin>,
  constants: BTreeMap<String, Pin>,
}

impl ShaderCode {
  pub(crate) fn new(session: SessionId, stage: BindingStage) -> Self {
    let io = |id, kind| Node {
      id,
      kind,
      inputs: SmallVec::new(),
      outputs: SmallVec::new(),
    };

    ShaderCode {
      session,
      stage,
      nodes: vec![
        io(NodeId::INPUT, NodeKind::Input),
        io(NodeId::OUTPUT, NodeKind::Output),
      ],
      inputs: BTreeMap::new(),
      outputs: BTreeMap::new(),
      constants: BTreeMap::new(),
    }
  }

  fn pin(&self, node: NodeId, slot: usize, signature: PinSignature) -> Pin {
    Pin {
      session: self.session,
      node,
      slot: slot as u16,
      signature,
    }
  }

  /// Append a node and mint its output pins.
  pub(crate) fn push(
    &mut self,
    kind: NodeKind,
    inputs: &[Pin],
    outputs: &[PinSignature],
  ) -> SmallVec<[Pin; 1]> {
    let id = NodeId(self.nodes.len() as u32);
    let outputs = outputs
      .iter()
      .enumerate()
      .map(|(slot, sig)| self.pin(id, slot, *sig))
      .collect::<SmallVec<[Pin; 1]>>();

    log::trace!(
      "{:?}: {:?} = {:?} {:?}",
      self.session,
      id,
      kind,
      inputs.iter().map(|p| (p.node, p.slot)).collect::<Vec<_>>()
    );

    self.nodes.push(Node {
      id,
      kind,
      inputs: inputs.iter().copied().collect(),
      outputs: outputs.clone(),
    });

    outputs
  }

  pub(crate) fn push_constant(&mut self, constant: Constant, signature: PinSignature) -> Pin {
    let pins = self.push(NodeKind::Constant(constant), &[], &[signature]);
    pins[0]
  }

  /// Declare a named constant.
  pub(crate) fn declare_constant(&mut self, name: &str, signature: PinSignature) -> Result<Pin> {
    if name.is_empty() {
      return Err(Error::NullArgument("constant name"));
    }

    if self.constants.contains_key(name) {
      return Err(Error::DuplicateConstant(name.to_owned()));
    }

    let pin = self.push_constant(Constant::Named(name.to_owned()), signature);
    self.constants.insert(name.to_owned(), pin);
    Ok(pin)
  }

  /// Declare that the stage reads `component` with the given signature.
  pub(crate) fn declare_input(&mut self, component: PinComponent, signature: PinSignature) -> Result<Pin> {
    if !component.is_single() {
      return Err(Error::InvalidComponent(component));
    }

    if let Some(pin) = self.inputs.get(&component) {
      if pin.signature == signature {
        return Ok(*pin);
      }

      return Err(Error::format_conflict(
        "input",
        format!(
          "{:?} already declared as {:?}, now requested as {:?}",
          component, pin.signature, signature
        ),
      ));
    }

    let input = &mut self.nodes[NodeId::INPUT.index()];
    let slot = input.outputs.len();
    let pin = Pin {
      session: self.session,
      node: NodeId::INPUT,
      slot: slot as u16,
      signature,
    };

    input.outputs.push(pin);
    self.inputs.insert(component, pin);
    log::trace!("{:?}: input {:?} = {:?}", self.session, component, signature);

    Ok(pin)
  }

  /// Link `pin` to the output `component`, returning the previously linked pin.
  pub(crate) fn link_output(&mut self, component: PinComponent, pin: Pin) -> Result<Option<Pin>> {
    if !component.is_single() {
      return Err(Error::InvalidComponent(component));
    }

    let previous = self.outputs.insert(component, pin);
    self.nodes[NodeId::OUTPUT.index()].inputs = self.outputs.values().copied().collect();

    Ok(previous)
  }

  pub fn session(&self) -> SessionId {
    self.session
  }

  pub fn stage(&self) -> BindingStage {
    self.stage
  }

  /// All nodes, in insertion order.
  pub fn nodes(&self) -> &[Node] {
    &self.nodes
  }

  pub fn node(&self, id: NodeId) -> Option<&Node> {
    self.nodes.get(id.index())
  }

  /// Node producing `pin`, if the pin belongs to this DAG.
  pub fn producer(&self, pin: Pin) -> Option<&Node> {
    if pin.session == self.session {
      self.node(pin.node)
    } else {
      None
    }
  }

  /// Nodes consuming `pin`.
  pub fn consumers(&self, pin: Pin) -> impl Iterator<Item = &Node> {
    self
      .nodes
      .iter()
      .filter(move |node| node.inputs.contains(&pin))
  }

  pub fn input_node(&self) -> &Node {
    &self.nodes[NodeId::INPUT.index()]
  }

  pub fn output_node(&self) -> &Node {
    &self.nodes[NodeId::OUTPUT.index()]
  }

  /// Pin read from the input `component`.
  pub fn input(&self, component: PinComponent) -> Option<Pin> {
    self.inputs.get(&component).copied()
  }

  /// Pin linked to the output `component`.
  pub fn output(&self, component: PinComponent) -> Option<Pin> {
    self.outputs.get(&component).copied()
  }

  /// All components read by the stage.
  pub fn input_components(&self) -> PinComponent {
    self.inputs.keys().fold(PinComponent::empty(), |a, c| a | *c)
  }

  /// All components written by the stage.
  pub fn output_components(&self) -> PinComponent {
    self.outputs.keys().fold(PinComponent::empty(), |a, c| a | *c)
  }

  /// Pin of the named constant `name`.
  pub fn constant(&self, name: &str) -> Option<Pin> {
    self.constants.get(name).copied()
  }

  /// Named constants, sorted by name.
  pub fn parameters(&self) -> Vec<ParameterDescription> {
    self
      .constants
      .iter()
      .map(|(name, pin)| ParameterDescription {
        name: name.clone(),
        signature: pin.signature,
      })
      .collect()
  }

  /// Nodes the outputs depend on, dependencies first, ending with the output node.
  ///
  /// Nodes whose results are never written out are left out.
  pub fn sorted_operations(&self) -> Vec<NodeId> {
    let mut reached = vec![false; self.nodes.len()];
    let mut stack = self
      .output_node()
      .inputs
      .iter()
      .map(Pin::node)
      .collect::<Vec<_>>();

    while let Some(id) = stack.pop() {
      if reached[id.index()] {
        continue;
      }

      reached[id.index()] = true;
      stack.extend(self.nodes[id.index()].inputs.iter().map(Pin::node));
    }

    // a node only consumes pins of nodes inserted before it, so the insertion order is a topological order
    let mut sorted = self
      .nodes
      .iter()
      .filter(|node| reached[node.id.index()] && node.id != NodeId::OUTPUT)
      .map(Node::id)
      .collect::<Vec<_>>();
    sorted.push(NodeId::OUTPUT);

    sorted
  }

  /// Follow `pin` through loops that carry it unchanged.
  ///
  /// If `pin` is a loop exit value that was never written inside the loop, this returns the value the loop was entered
  /// with (recursively, for nested loops). Otherwise, `pin` is returned as-is.
  pub fn passthrough_source(&self, pin: Pin) -> Pin {
    let mut pin = pin;

    while let Some(source) = self.loop_source(pin) {
      pin = source;
    }

    pin
  }

  fn loop_source(&self, pin: Pin) -> Option<Pin> {
    let exit = self.producer(pin)?;

    // exit input carrying the slot, and the enter output slot it must be read from to pass through
    let (id, carried, slot) = match exit.operation()? {
      Operation::LoopExit(id) => (*id, *exit.inputs.get(pin.slot() + 1)?, pin.slot() + 1),
      Operation::WhileExit(id) => (*id, *exit.inputs.get(pin.slot() + 2)?, pin.slot()),
      _ => return None,
    };

    if carried.slot() != slot {
      return None;
    }

    let enter = self.producer(carried)?;

    match enter.operation()? {
      Operation::LoopEnter(enter_id) | Operation::WhileEnter(enter_id) if *enter_id == id => {
        enter.inputs.get(slot).copied()
      }
      _ => None,
    }
  }
}
