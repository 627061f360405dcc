//! Errors raised while building a shader DAG.
//!
//! Every error is a usage error detected synchronously at the call that triggers it. Nothing is recovered internally: a
//! failing builder call leaves the DAG exactly as it was before the call.

use crate::{format::PinFormat, stage::PinComponent};
use thiserror::Error;

/// Errors that can occur while describing a shader.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
  /// Operands of a single operation belong to different [`CodeGenerator`](crate::generator::CodeGenerator) sessions.
  #[error("operands belong to different code generators")]
  GeneratorMismatch,

  /// Binders handed to a generator-less combinator come from different sessions.
  #[error("binders from different code generators were mixed")]
  MixedGenerators,

  /// A pin was used where its format is structurally incompatible with what the operation expects.
  #[error("format conflict in {operation}: {detail}")]
  FormatConflict { operation: String, detail: String },

  /// A host value has a shape that cannot be expressed as a pin format.
  #[error("unsupported value shape: {0}")]
  UnsupportedFormat(String),

  /// A pin format has no typed binder.
  #[error("pin format {0:?} has no typed binder")]
  NotSupportedFormat(PinFormat),

  /// A loop builder was used outside of its open period, or loops were closed out of order.
  #[error("invalid loop state: {0}")]
  InvalidLoopState(String),

  /// A required argument is empty.
  #[error("missing required argument: {0}")]
  NullArgument(&'static str),

  /// A named constant was declared twice in the same session.
  #[error("a constant named {0:?} already exists")]
  DuplicateConstant(String),

  /// A component set was passed where a single component is required.
  #[error("{0:?} is not a single pin component")]
  InvalidComponent(PinComponent),

  /// A swizzle mask could not be parsed.
  #[error("invalid swizzle mask {0:?}")]
  InvalidSwizzle(String),
}

impl Error {
  pub(crate) fn format_conflict(operation: impl Into<String>, detail: impl Into<String>) -> Self {
    Error::FormatConflict {
      operation: operation.into(),
      detail: detail.into(),
    }
  }

  pub(crate) fn invalid_loop_state(reason: impl Into<String>) -> Self {
    Error::InvalidLoopState(reason.into())
  }
}

/// Result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unwrap the result of a builder call made on behalf of an operator or a generated accessor.
///
/// Those entry points cannot return a [`Result`], so misuse (mixing sessions, most of the time) panics with the error
/// message instead.
#[track_caller]
pub(crate) fn built<T>(r: Result<T>) -> T {
  match r {
    Ok(t) => t,
    Err(e) => panic!("{}", e),
  }
}
