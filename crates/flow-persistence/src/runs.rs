//! `FsRunTracker`: un archivo JSON por run en `runs/<project>/<run_id>.json`.
//! El registro se reescribe completo en cada cambio (inputs, outputs,
//! cierre), de modo que el disco siempre refleja el último estado conocido.
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use uuid::Uuid;

use flow_core::{ArtifactVersion, Params, RunRecord, RunStatus, RunTracker, StoreError, TrackerContext};

use crate::config::StoreConfig;
use crate::error::PersistenceError;

const DEFAULT_PROJECT_DIR: &str = "default";

#[derive(Debug)]
pub struct FsRunTracker {
    root: PathBuf,
    cache: HashMap<Uuid, RunRecord>,
}

impl FsRunTracker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(),
               cache: HashMap::new() }
    }

    pub fn from_config(cfg: &StoreConfig) -> Self {
        Self::new(cfg.runs_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directorio del proyecto bajo la raíz. Los separadores se reemplazan
    /// por `_`; `.` y `..` se rechazan.
    fn project_dir(&self, project: &str) -> Result<PathBuf, PersistenceError> {
        let dir = if project.trim().is_empty() {
            DEFAULT_PROJECT_DIR.to_string()
        } else {
            project.replace(['/', '\\'], "_")
        };
        if dir == "." || dir == ".." {
            return Err(PersistenceError::InvalidName(project.to_string()));
        }
        Ok(self.root.join(dir))
    }

    fn record_path(&self, project: &str, run_id: Uuid) -> Result<PathBuf, PersistenceError> {
        Ok(self.project_dir(project)?.join(format!("{run_id}.json")))
    }

    fn persist(&self, record: &RunRecord) -> Result<(), PersistenceError> {
        let path = self.record_path(&record.project, record.id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_vec_pretty(record)?)?;
        debug!("run:persist id={} status={:?}", record.id, record.status);
        Ok(())
    }

    fn update<F>(&mut self, run_id: Uuid, apply: F) -> Result<(), PersistenceError>
        where F: FnOnce(&mut RunRecord)
    {
        let record = self.cache
                         .get_mut(&run_id)
                         .ok_or_else(|| PersistenceError::RunNotFound(run_id.to_string()))?;
        apply(record);
        let snapshot = record.clone();
        self.persist(&snapshot)
    }

    /// Lee un run directamente del disco (p. ej. de una ejecución anterior).
    pub fn load(&self, project: &str, run_id: Uuid) -> Result<RunRecord, PersistenceError> {
        let path = self.record_path(project, run_id)?;
        if !path.is_file() {
            return Err(PersistenceError::RunNotFound(run_id.to_string()));
        }
        Ok(serde_json::from_slice(&fs::read(path)?)?)
    }

    /// Todos los runs persistidos de un proyecto, ordenados por inicio.
    pub fn list_project(&self, project: &str) -> Result<Vec<RunRecord>, PersistenceError> {
        let dir = self.project_dir(project)?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                out.push(serde_json::from_slice::<RunRecord>(&fs::read(&path)?)?);
            }
        }
        out.sort_by_key(|r| r.started_at);
        Ok(out)
    }
}

impl RunTracker for FsRunTracker {
    fn start_run(&mut self, job_type: &str, ctx: &TrackerContext, config: &Params) -> Result<Uuid, StoreError> {
        let record = RunRecord::start(job_type, ctx, config);
        let id = record.id;
        self.persist(&record)?;
        self.cache.insert(id, record);
        Ok(id)
    }

    fn use_artifact(&mut self, run_id: Uuid, artifact: &ArtifactVersion) -> Result<(), StoreError> {
        Ok(self.update(run_id, |r| r.record_input(artifact))?)
    }

    fn log_artifact(&mut self, run_id: Uuid, artifact: &ArtifactVersion) -> Result<(), StoreError> {
        Ok(self.update(run_id, |r| r.record_output(artifact))?)
    }

    fn finish_run(&mut self, run_id: Uuid, status: RunStatus) -> Result<(), StoreError> {
        Ok(self.update(run_id, |r| r.finish(status))?)
    }

    fn run(&self, run_id: Uuid) -> Option<RunRecord> {
        self.cache.get(&run_id).cloned()
    }
}
