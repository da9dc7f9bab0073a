//! DownloadStep: registra un archivo de muestra local como artifact.
//!
//! Busca `<data_dir>/<sample>` y lo publica con el nombre, tipo y
//! descripción recibidos, dentro de un run `download`.
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use flow_core::{ArtifactVersion, LocalStep, NewArtifact, Params, RunStatus, Step, StepEnv, StepRunResult, StoreError};

use super::decode_params;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid params: {0}")]
    Params(#[from] serde_json::Error),
    #[error("sample '{sample}' not found in {dir}")]
    SampleNotFound { sample: String, dir: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadParams {
    pub sample: String,
    pub artifact_name: String,
    pub artifact_type: String,
    pub artifact_description: String,
}

#[derive(Debug, Clone)]
pub struct DownloadStep {
    data_dir: PathBuf,
}

impl DownloadStep {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn sample_path(&self, sample: &str) -> Result<PathBuf, DownloadError> {
        let not_found = || DownloadError::SampleNotFound { sample: sample.to_string(),
                                                           dir: self.data_dir.display().to_string() };
        // sólo nombres de archivo: nada de rutas que salgan del directorio
        let file_name = Path::new(sample).file_name().filter(|n| *n == sample).ok_or_else(not_found)?;
        let path = self.data_dir.join(file_name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(not_found())
        }
    }

    fn execute(&self, p: &DownloadParams, run_id: Uuid, env: &mut StepEnv<'_>) -> Result<ArtifactVersion, DownloadError> {
        let source = self.sample_path(&p.sample)?;
        info!("download:source path={}", source.display());
        let version = env.store.publish(NewArtifact { name: &p.artifact_name,
                                                      kind: &p.artifact_type,
                                                      description: &p.artifact_description,
                                                      source: &source })?;
        env.tracker.log_artifact(run_id, &version)?;
        Ok(version)
    }
}

impl LocalStep for DownloadStep {
    fn step(&self) -> Step {
        Step::Download
    }

    fn run(&self, params: &Params, env: &mut StepEnv<'_>) -> StepRunResult {
        let p: DownloadParams = match decode_params(params) {
            Ok(p) => p,
            Err(e) => return StepRunResult::failure(self.name(), DownloadError::Params(e)),
        };
        let run_id = match env.tracker.start_run(self.name(), &env.ctx.tracker, params) {
            Ok(id) => id,
            Err(e) => return StepRunResult::failure(self.name(), e),
        };
        let outcome = self.execute(&p, run_id, env);
        let status = if outcome.is_ok() { RunStatus::Finished } else { RunStatus::Failed };
        if let Err(e) = env.tracker.finish_run(run_id, status) {
            warn!("download:finish_run_failed run_id={run_id} err={e}");
        }
        match outcome {
            Ok(version) => {
                info!("download:ok run_id={run_id} artifact={}", version.id());
                StepRunResult::Success { run_id: Some(run_id.to_string()) }
            }
            Err(e) => StepRunResult::failure(self.name(), e),
        }
    }
}
