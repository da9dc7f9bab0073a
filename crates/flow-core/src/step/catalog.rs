use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreEngineError;

/// Catálogo fijo de steps. El orden de declaración es el orden de ejecución;
/// `Ord` deriva de él.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Download,
    BasicCleaning,
    DataCheck,
    DataSplit,
    TrainRandomForest,
    /// Requiere un modelo promovido a `prod`; sólo se ejecuta si se pide
    /// explícitamente.
    TestRegressionModel,
}

impl Step {
    pub const CATALOG: [Step; 6] = [Step::Download,
                                    Step::BasicCleaning,
                                    Step::DataCheck,
                                    Step::DataSplit,
                                    Step::TrainRandomForest,
                                    Step::TestRegressionModel];

    /// Conjunto ejecutado con `steps: all`.
    pub const DEFAULT: [Step; 5] = [Step::Download,
                                    Step::BasicCleaning,
                                    Step::DataCheck,
                                    Step::DataSplit,
                                    Step::TrainRandomForest];

    pub fn id(self) -> &'static str {
        match self {
            Step::Download => "download",
            Step::BasicCleaning => "basic_cleaning",
            Step::DataCheck => "data_check",
            Step::DataSplit => "data_split",
            Step::TrainRandomForest => "train_random_forest",
            Step::TestRegressionModel => "test_regression_model",
        }
    }

    /// Posición en el catálogo.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_default(self) -> bool {
        Self::DEFAULT.contains(&self)
    }
}

impl FromStr for Step {
    type Err = CoreEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::CATALOG.into_iter()
                     .find(|step| step.id() == s)
                     .ok_or_else(|| CoreEngineError::UnknownStep(s.to_string()))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
