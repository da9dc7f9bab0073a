//! flow-adapters
//!
//! Implementaciones concretas sobre los contratos de `flow-core`:
//! - `table`: tabla CSV en memoria (columnas en orden, celdas como texto).
//! - `steps`: steps nativos (`download`, `basic_cleaning`).
//! - `runners`: `MlflowRunner` (proceso externo `mlflow run`) y
//!   `LocalRunner` (steps nativos en el mismo proceso).

pub mod runners;
pub mod steps;
pub mod table;

pub use runners::{LocalRunner, MlflowRunner};
pub use steps::{clean_table, BasicCleaningParams, BasicCleaningStep, CleaningError, DownloadError, DownloadParams,
                DownloadStep};
pub use table::{Table, TableError};
