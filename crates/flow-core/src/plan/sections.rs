//! Secciones tipadas del árbol de configuración. Cada step activo
//! deserializa únicamente las secciones que necesita.
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::step::ALL_STEPS;

fn default_steps() -> String {
    ALL_STEPS.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainSection {
    pub project_name: String,
    pub experiment_name: String,
    #[serde(default = "default_steps")]
    pub steps: String,
    /// Base de los componentes (`<repo>/<step>`); requerido por el runner mlflow.
    #[serde(default)]
    pub components_repository: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EtlSection {
    pub sample: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BasicCleaningSection {
    pub filter_column: String,
    pub filter_value: f64,
    pub output_artifact: String,
    pub output_type: String,
    pub output_description: String,
}

/// Sólo el nombre del artifact limpio, que consumen data_check y data_split.
#[derive(Debug, Clone, Deserialize)]
pub struct CleanedArtifactSection {
    pub output_artifact: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataCheckSection {
    pub ref_artifact: String,
    pub kl_threshold: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSplitSection {
    pub test_size: f64,
    pub random_seed: i64,
    pub stratify_by: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelingSection {
    pub random_forest: Map<String, Value>,
    pub max_tfidf_features: u64,
    pub output_artifact: String,
    pub output_type: String,
    pub output_description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelOutputSection {
    pub output_artifact: String,
}
