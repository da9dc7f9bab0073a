//! Errores específicos del core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errores del driver y de la construcción del plan. Es serializable porque
/// viaja embebido en los eventos `StepFailed`.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CoreEngineError {
    #[error("pipeline already completed")]
    PipelineCompleted,
    #[error("pipeline has failed previously (stop-on-failure invariant)")]
    PipelineHasFailed,
    #[error("unknown step '{0}'")]
    UnknownStep(String),
    #[error("no steps selected")]
    EmptySelection,
    #[error("missing configuration: {0}")]
    MissingConfig(String),
    #[error("invalid configuration at '{path}': {reason}")]
    InvalidConfig { path: String, reason: String },
    #[error("step '{step}' failed: {reason}")]
    StepFailed { step: String, reason: String },
    #[error("runner: {0}")]
    Runner(String),
    #[error("attachment {path}: {reason}")]
    Attachment { path: String, reason: String },
    #[error("event log: {0}")]
    EventLog(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl CoreEngineError {
    /// Errores detectados antes de invocar cualquier step.
    pub fn is_config_error(&self) -> bool {
        matches!(self,
                 Self::UnknownStep(_) | Self::EmptySelection | Self::MissingConfig(_) | Self::InvalidConfig { .. })
    }

    pub fn invalid_config(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidConfig { path: path.into(),
                              reason: reason.to_string() }
    }
}

impl From<StoreError> for CoreEngineError {
    fn from(err: StoreError) -> Self {
        Self::EventLog(err.to_string())
    }
}

/// Errores en la frontera de los stores (artifacts y runs).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StoreError {
    #[error("artifact not found: {0}")]
    ArtifactNotFound(String),
    #[error("run not found: {0}")]
    RunNotFound(String),
    #[error("invalid artifact reference '{0}'")]
    InvalidReference(String),
    #[error("io: {0}")]
    Io(String),
    #[error("corrupt store entry: {0}")]
    Corrupt(String),
}
