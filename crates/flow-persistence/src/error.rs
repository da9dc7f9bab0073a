//! Errores de persistencia.
//! Mapea errores de IO / serde a variantes propias y éstas a `StoreError`,
//! el error de frontera que exponen los traits del core.

use flow_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("run not found: {0}")]
    RunNotFound(String),
    #[error("invalid artifact name '{0}'")]
    InvalidName(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("corrupt entry: {0}")]
    Corrupt(String),
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound(what) => Self::ArtifactNotFound(what),
            PersistenceError::RunNotFound(id) => Self::RunNotFound(id),
            PersistenceError::InvalidName(name) => Self::InvalidReference(name),
            PersistenceError::Io(e) => Self::Io(e.to_string()),
            PersistenceError::Serde(e) => Self::Corrupt(e.to_string()),
            PersistenceError::Corrupt(msg) => Self::Corrupt(msg),
        }
    }
}
