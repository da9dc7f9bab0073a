//! `JsonlEventStore`: log append-only de eventos en
//! `pipelines/<pipeline_id>.jsonl` (un `PipelineEvent` por línea).
//!
//! Un evento que no pudo escribirse se reporta como error: el driver
//! reconstruye su estado desde este archivo y no puede avanzar sin él.
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use chrono::Utc;
use log::{debug, error, warn};
use uuid::Uuid;

use flow_core::{EventStore, PipelineEvent, PipelineEventKind, StoreError};

use crate::config::StoreConfig;
use crate::error::PersistenceError;

#[derive(Debug, Clone)]
pub struct JsonlEventStore {
    dir: PathBuf,
}

impl JsonlEventStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(cfg: &StoreConfig) -> Self {
        Self::new(cfg.pipelines_dir())
    }

    pub fn path_for(&self, pipeline_id: Uuid) -> PathBuf {
        self.dir.join(format!("{pipeline_id}.jsonl"))
    }

    fn write_line(&self, event: &PipelineEvent) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        let mut file = OpenOptions::new().create(true)
                                         .append(true)
                                         .open(self.path_for(event.pipeline_id))?;
        let mut line = serde_json::to_string(event)?;
        line.push('\n');
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    fn read_all(&self, pipeline_id: Uuid) -> Result<Vec<PipelineEvent>, PersistenceError> {
        let path = self.path_for(pipeline_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(fs::File::open(&path)?);
        let mut events = Vec::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<PipelineEvent>(&line) {
                Ok(ev) => events.push(ev),
                Err(e) => warn!("list:skip_line pipeline_id={pipeline_id} line={} err={e}", lineno + 1),
            }
        }
        events.sort_by_key(|e| e.seq);
        Ok(events)
    }
}

impl EventStore for JsonlEventStore {
    fn append_kind(&mut self, pipeline_id: Uuid, kind: PipelineEventKind) -> Result<PipelineEvent, StoreError> {
        debug!("append_kind:start pipeline_id={pipeline_id} kind={}", kind.variant_name());
        let seq = self.read_all(pipeline_id)?.last().map(|e| e.seq + 1).unwrap_or(0);
        let ev = PipelineEvent { seq,
                                 pipeline_id,
                                 kind,
                                 ts: Utc::now() };
        if let Err(e) = self.write_line(&ev) {
            error!("append_kind:failed pipeline_id={pipeline_id} seq={seq} err={e}");
            return Err(e.into());
        }
        Ok(ev)
    }

    fn list(&self, pipeline_id: Uuid) -> Vec<PipelineEvent> {
        match self.read_all(pipeline_id) {
            Ok(events) => events,
            Err(e) => {
                error!("list:failed pipeline_id={pipeline_id} err={e}");
                Vec::new()
            }
        }
    }
}
