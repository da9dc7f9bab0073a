//! Steps nativos. Cada uno decodifica sus params desde el mapa plano de la
//! invocación a un struct tipado, abre un run en el tracker y devuelve un
//! `StepRunResult`.

pub mod basic_cleaning;
pub mod download;

use serde::de::DeserializeOwned;
use serde_json::Value;

use flow_core::Params;

pub use basic_cleaning::{clean_table, BasicCleaningParams, BasicCleaningStep, CleaningError};
pub use download::{DownloadError, DownloadParams, DownloadStep};

/// Decodifica los params de la invocación al tipo del step.
pub(crate) fn decode_params<T: DeserializeOwned>(params: &Params) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(params.clone().into_iter().collect()))
}
