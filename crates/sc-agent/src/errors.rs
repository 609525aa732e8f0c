//! Error helpers for the protocol layer
//!
//! Wraps sc-core `ExError` with constructors for the protocol's failure modes.

use sc_core::errors::{ExError, ExErrorKind, StoreError};
use sc_core::{Addr, ElementType, KeynodeEntry};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// More parameters than the registry has ordinal relations for
pub fn invalid_parameters(given: usize, max: usize) -> ExError {
    ExError::new(ExErrorKind::InvalidParameters)
        .with_op("create_command")
        .with_message(format!(
            "{} parameters given, at most {} supported",
            given,
            max.saturating_sub(1)
        ))
}

/// An assumed-infallible store mutation failed
pub fn fatal_invariant(op: &str, step: &str, err: StoreError) -> ExError {
    let source = ExError::from(err);
    ExError::new(ExErrorKind::FatalInvariant)
        .with_op(op.to_string())
        .with_message(format!("store rejected {}", step))
        .with_source(source)
}

/// A structural assumption about the graph does not hold
pub fn broken_invariant(op: &str, element: Addr, message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::FatalInvariant)
        .with_op(op.to_string())
        .with_element(element)
        .with_message(message)
}

/// The element carrying a keynode identifier is not the kind of node the
/// protocol needs there
pub fn missing_keynode(entry: &KeynodeEntry, actual: Option<ElementType>) -> ExError {
    let actual = actual.map_or_else(|| "nothing".to_string(), |ty| ty.to_string());
    ExError::new(ExErrorKind::KeynodeMissing)
        .with_op("initialize")
        .with_element(entry.addr)
        .with_message(format!(
            "keynode '{}' must be a {}, found {}",
            entry.idtf, entry.expected, actual
        ))
}

pub fn config_error(message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::ConfigInvalid)
        .with_op("load_config")
        .with_message(message)
}

pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
