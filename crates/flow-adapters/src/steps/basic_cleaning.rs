//! BasicCleaningStep
//!
//! Limpieza de un CSV tabular en tres etapas fijas:
//! 1. elimina filas duplicadas (conserva la primera aparición),
//! 2. elimina filas con algún valor faltante,
//! 3. conserva las filas con `filter_column >= filter_value`.
//!
//! Las celdas se leen como texto y `filter_column` se interpreta como número
//! sólo en las filas que sobreviven a las etapas 1 y 2. Un valor no numérico
//! en una fila ya descartada no produce error; pandas, que infiere el tipo de
//! la columna al leer el archivo completo, sí fallaría en ese caso.
//!
//! El resultado se escribe en el scratch dir con el nombre del artifact de
//! salida y se publica en el store. Todo ocurre dentro de un run
//! `basic_cleaning` del tracker.
use std::collections::HashSet;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use flow_core::{ArtifactRef, ArtifactVersion, LocalStep, NewArtifact, Params, RunStatus, Step, StepEnv, StepRunResult,
                StoreError};

use super::decode_params;
use crate::table::{Table, TableError};

/// Tokens que cuentan como valor faltante además de la celda vacía.
pub const NA_TOKENS: &[&str] = &["#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
                                 "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null"];

pub fn is_missing(field: &str) -> bool {
    field.is_empty() || NA_TOKENS.contains(&field)
}

#[derive(Debug, Error)]
pub enum CleaningError {
    #[error("invalid params: {0}")]
    Params(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("filter column '{0}' not found in input")]
    MissingColumn(String),
    #[error("value '{value}' in column '{column}' (row {row} after cleaning) is not numeric")]
    NonNumeric { column: String, value: String, row: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicCleaningParams {
    pub input_artifact: String,
    pub filter_column: String,
    pub filter_value: f64,
    pub output_artifact: String,
    pub output_type: String,
    pub output_description: String,
}

/// Aplica las tres etapas de limpieza. No toca IO.
pub fn clean_table(table: Table, filter_column: &str, threshold: f64) -> Result<Table, CleaningError> {
    let idx = table.column_index(filter_column)
                   .ok_or_else(|| CleaningError::MissingColumn(filter_column.to_string()))?;
    let Table { headers, rows } = table;

    let mut seen = HashSet::new();
    let deduped = rows.into_iter().filter(|row| seen.insert(row.clone()));
    let complete: Vec<Vec<String>> = deduped.filter(|row| !row.iter().any(|f| is_missing(f))).collect();

    let mut kept = Vec::with_capacity(complete.len());
    for (row_no, row) in complete.into_iter().enumerate() {
        let raw = row[idx].trim();
        let value: f64 = raw.parse().map_err(|_| CleaningError::NonNumeric { column: filter_column.to_string(),
                                                                               value: raw.to_string(),
                                                                               row: row_no + 1 })?;
        if value >= threshold {
            kept.push(row);
        }
    }
    Ok(Table::new(headers, kept))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BasicCleaningStep;

impl BasicCleaningStep {
    fn execute(&self, p: &BasicCleaningParams, run_id: Uuid, env: &mut StepEnv<'_>) -> Result<ArtifactVersion, CleaningError> {
        let reference: ArtifactRef = p.input_artifact.parse()?;
        let (input, path) = env.store.fetch(&reference)?;
        env.tracker.use_artifact(run_id, &input)?;
        info!("basic_cleaning:read artifact={} path={}", input.id(), path.display());

        let table = Table::read_path(&path)?;
        let rows_in = table.len();
        let cleaned = clean_table(table, &p.filter_column, p.filter_value)?;
        info!("basic_cleaning:cleaned rows_in={rows_in} rows_out={} filter={}>={}",
              cleaned.len(),
              p.filter_column,
              p.filter_value);

        let out_path = env.ctx.scratch_dir.join(&p.output_artifact);
        cleaned.write_path(&out_path)?;
        let output = env.store.publish(NewArtifact { name: &p.output_artifact,
                                                     kind: &p.output_type,
                                                     description: &p.output_description,
                                                     source: &out_path })?;
        env.tracker.log_artifact(run_id, &output)?;
        Ok(output)
    }
}

impl LocalStep for BasicCleaningStep {
    fn step(&self) -> Step {
        Step::BasicCleaning
    }

    fn run(&self, params: &Params, env: &mut StepEnv<'_>) -> StepRunResult {
        let p: BasicCleaningParams = match decode_params(params) {
            Ok(p) => p,
            Err(e) => return StepRunResult::failure(self.name(), CleaningError::Params(e)),
        };
        let run_id = match env.tracker.start_run(self.name(), &env.ctx.tracker, params) {
            Ok(id) => id,
            Err(e) => return StepRunResult::failure(self.name(), e),
        };
        let outcome = self.execute(&p, run_id, env);
        let status = if outcome.is_ok() { RunStatus::Finished } else { RunStatus::Failed };
        if let Err(e) = env.tracker.finish_run(run_id, status) {
            warn!("basic_cleaning:finish_run_failed run_id={run_id} err={e}");
        }
        match outcome {
            Ok(output) => {
                info!("basic_cleaning:ok run_id={run_id} output={}", output.id());
                StepRunResult::Success { run_id: Some(run_id.to_string()) }
            }
            Err(e) => StepRunResult::failure(self.name(), e),
        }
    }
}
