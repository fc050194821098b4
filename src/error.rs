//! Error types.
//!
//! Only the I/O-facing layers (import, stores, configuration, shared state)
//! return errors. Scheduling itself is total: infeasibility shows up as
//! violations and conflicts, and parameter problems as a
//! [`ValidationResult`](crate::validation::ValidationResult).

use thiserror::Error;

/// Timetable import failure.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid timetable JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing or empty required field '{0}'")]
    MissingField(&'static str),

    #[error("timetable JSON must be an object")]
    NotAnObject,
}

/// Timetable store failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("timetable '{0}' not found")]
    NotFound(String),

    #[error("invalid timetable id '{0}'")]
    InvalidId(String),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration load or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Shared state failure.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("timetable state lock poisoned")]
    Poisoned,

    #[error("{kind} '{id}' not found")]
    UnknownEntity { kind: &'static str, id: String },
}

impl<T> From<std::sync::PoisonError<T>> for StateError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        StateError::Poisoned
    }
}
