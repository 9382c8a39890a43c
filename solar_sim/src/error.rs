//! Error types for the solar system core

use std::path::PathBuf;

use thiserror::Error;

/// Result type for simulation operations
pub type SimResult<T> = Result<T, SimError>;

/// Errors surfaced by the registry, integrator, persistence and configuration layers
#[derive(Error, Debug)]
pub enum SimError {
    /// Rejected edit; the previous value is kept
    #[error("invalid {what}: {reason}")]
    InvalidParameter { what: String, reason: String },

    /// Adding would exceed the configured body count
    #[error("maximum number of bodies in the system reached ({max})")]
    CapacityExceeded { max: usize },

    /// Two bodies occupy the same point; the step was abandoned
    #[error("bodies {first} and {second} are at zero separation")]
    DivergentState { first: usize, second: usize },

    #[error("could not access system file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse system file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row parsed but carries values the registry would reject
    #[error("row {row} of {path} is malformed: {reason}")]
    MalformedRow {
        path: PathBuf,
        row: usize,
        reason: String,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl SimError {
    pub fn invalid(what: impl Into<String>, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// True for the file-level failures (unreadable, unwritable or malformed system file)
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            SimError::Io { .. } | SimError::Csv { .. } | SimError::MalformedRow { .. }
        )
    }

    /// Failures that end the current run rather than just rejecting one edit
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(self, SimError::DivergentState { .. })
    }
}

impl From<serde_yaml::Error> for SimError {
    fn from(err: serde_yaml::Error) -> Self {
        SimError::Config(err.to_string())
    }
}
