use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::errors::StoreError;

use super::{PipelineEvent, PipelineEventKind};

/// Almacenamiento de eventos append-only.
pub trait EventStore {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    /// Si el evento no quedó registrado debe devolver error: el driver
    /// reconstruye su estado sólo desde `list`.
    fn append_kind(&mut self, pipeline_id: Uuid, kind: PipelineEventKind) -> Result<PipelineEvent, StoreError>;
    /// Lista eventos de un pipeline (orden ascendente por seq).
    fn list(&self, pipeline_id: Uuid) -> Vec<PipelineEvent>;
}

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    pub inner: HashMap<Uuid, Vec<PipelineEvent>>,
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, pipeline_id: Uuid, kind: PipelineEventKind) -> Result<PipelineEvent, StoreError> {
        let events = self.inner.entry(pipeline_id).or_default();
        let ev = PipelineEvent { seq: events.len() as u64,
                                 pipeline_id,
                                 kind,
                                 ts: Utc::now() };
        events.push(ev.clone());
        Ok(ev)
    }

    fn list(&self, pipeline_id: Uuid) -> Vec<PipelineEvent> {
        self.inner.get(&pipeline_id).cloned().unwrap_or_default()
    }
}
