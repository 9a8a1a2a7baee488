//! Error types returned by the simulation engine.

use crate::engine::Phase;
use thiserror::Error;

/// A configuration field is outside its allowed range.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {field}: number must be in the range {range}, but is {value}")]
pub struct ConfigError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Allowed range, formatted for display.
    pub range: String,
    /// Rejected value, formatted for display.
    pub value: String,
}

/// An operation was invoked in a phase that forbids it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {op} while the simulation is {phase:?}")]
pub struct InvalidStateError {
    pub op: &'static str,
    pub phase: Phase,
}

/// Statistics were requested before any successful initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("simulation has not been initialized")]
pub struct NotInitializedError;

/// Any error produced by the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    InvalidState(#[from] InvalidStateError),
    #[error(transparent)]
    NotInitialized(#[from] NotInitializedError),
}
