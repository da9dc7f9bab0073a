use flow_core::{CoreEngineError, StoreError};
use thiserror::Error;

/// Códigos de salida del binario.
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML in {path}: {reason}")]
    ConfigParse { path: String, reason: String },
    #[error("invalid override '{0}': expected key.path=value")]
    Override(String),
    #[error(transparent)]
    Engine(#[from] CoreEngineError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// 2 para errores de configuración (nada se ejecutó), 1 para el resto.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ConfigRead { .. } | Self::ConfigParse { .. } | Self::Override(_) => EXIT_CONFIG,
            Self::Engine(e) if e.is_config_error() => EXIT_CONFIG,
            _ => EXIT_FAILURE,
        }
    }
}
