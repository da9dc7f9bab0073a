use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::model::{ArtifactVersion, TrackerContext};
use crate::step::Params;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}

/// Registro de una ejecución de step: params, linaje y estado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: Uuid,
    pub job_type: String,
    pub project: String,
    pub group: String,
    pub config: Params,
    pub inputs: Vec<String>,  // ids `name:v<N>` usados
    pub outputs: Vec<String>, // ids `name:v<N>` publicados
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunRecord {
    pub fn start(job_type: &str, ctx: &TrackerContext, config: &Params) -> Self {
        Self { id: Uuid::new_v4(),
               job_type: job_type.to_string(),
               project: ctx.project.clone(),
               group: ctx.group.clone(),
               config: config.clone(),
               inputs: Vec::new(),
               outputs: Vec::new(),
               status: RunStatus::Running,
               started_at: Utc::now(),
               finished_at: None }
    }

    pub fn record_input(&mut self, artifact: &ArtifactVersion) {
        let id = artifact.id();
        if !self.inputs.contains(&id) {
            self.inputs.push(id);
        }
    }

    pub fn record_output(&mut self, artifact: &ArtifactVersion) {
        let id = artifact.id();
        if !self.outputs.contains(&id) {
            self.outputs.push(id);
        }
    }

    pub fn finish(&mut self, status: RunStatus) {
        self.status = status;
        self.finished_at = Some(Utc::now());
    }
}

/// Tracker de runs agrupados por proyecto/grupo.
pub trait RunTracker {
    fn start_run(&mut self, job_type: &str, ctx: &TrackerContext, config: &Params) -> Result<Uuid, StoreError>;
    fn use_artifact(&mut self, run_id: Uuid, artifact: &ArtifactVersion) -> Result<(), StoreError>;
    fn log_artifact(&mut self, run_id: Uuid, artifact: &ArtifactVersion) -> Result<(), StoreError>;
    fn finish_run(&mut self, run_id: Uuid, status: RunStatus) -> Result<(), StoreError>;
    fn run(&self, run_id: Uuid) -> Option<RunRecord>;
}

#[derive(Debug, Default)]
pub struct InMemoryRunTracker {
    pub inner: HashMap<Uuid, RunRecord>,
}

impl InMemoryRunTracker {
    fn record_mut(&mut self, run_id: Uuid) -> Result<&mut RunRecord, StoreError> {
        self.inner.get_mut(&run_id).ok_or_else(|| StoreError::RunNotFound(run_id.to_string()))
    }
}

impl RunTracker for InMemoryRunTracker {
    fn start_run(&mut self, job_type: &str, ctx: &TrackerContext, config: &Params) -> Result<Uuid, StoreError> {
        let record = RunRecord::start(job_type, ctx, config);
        let id = record.id;
        self.inner.insert(id, record);
        Ok(id)
    }

    fn use_artifact(&mut self, run_id: Uuid, artifact: &ArtifactVersion) -> Result<(), StoreError> {
        self.record_mut(run_id)?.record_input(artifact);
        Ok(())
    }

    fn log_artifact(&mut self, run_id: Uuid, artifact: &ArtifactVersion) -> Result<(), StoreError> {
        self.record_mut(run_id)?.record_output(artifact);
        Ok(())
    }

    fn finish_run(&mut self, run_id: Uuid, status: RunStatus) -> Result<(), StoreError> {
        self.record_mut(run_id)?.finish(status);
        Ok(())
    }

    fn run(&self, run_id: Uuid) -> Option<RunRecord> {
        self.inner.get(&run_id).cloned()
    }
}
