//! Tipos de evento del pipeline y estructura `PipelineEvent`.
//!
//! Rol en el flujo:
//! - Cada ejecución del `PipelineDriver` emite eventos a un `EventStore`
//!   append-only.
//! - Estos eventos permiten reconstruir el estado del pipeline (replay)
//!   sin depender de estructuras mutables.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreEngineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PipelineEventKind {
    /// Primer evento de un `pipeline_id`: fija el hash del plan y los steps
    /// activos en orden de ejecución.
    PipelineInitialized { definition_hash: String, steps: Vec<String> },
    /// Un step comenzó su ejecución. No implica éxito.
    StepStarted { step_index: usize, step_id: String },
    /// Un step terminó correctamente.
    StepFinished {
        step_index: usize,
        step_id: String,
        run_id: Option<String>,
        fingerprint: String,
    },
    /// Un step falló. El pipeline no continúa (stop-on-failure).
    StepFailed {
        step_index: usize,
        step_id: String,
        error: CoreEngineError,
        fingerprint: String,
    },
    /// Cierre con fingerprint agregado de los steps.
    PipelineCompleted { pipeline_fingerprint: String },
}

impl PipelineEventKind {
    /// Nombre estable de la variante (logs y persistencia).
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::PipelineInitialized { .. } => "PipelineInitialized",
            Self::StepStarted { .. } => "StepStarted",
            Self::StepFinished { .. } => "StepFinished",
            Self::StepFailed { .. } => "StepFailed",
            Self::PipelineCompleted { .. } => "PipelineCompleted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineEvent {
    pub seq: u64, // asignado por el EventStore (orden append)
    pub pipeline_id: Uuid,
    pub kind: PipelineEventKind,
    pub ts: DateTime<Utc>, // metadato (no entra en fingerprint)
}
