//! Estado reconstruido de un pipeline (`PipelineInstance`) a partir de sus
//! eventos. El replay es lineal: consume eventos en orden y actualiza los
//! slots de cada step.
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::event::{PipelineEvent, PipelineEventKind};
use crate::plan::PipelinePlan;
use crate::step::StepStatus;

#[derive(Debug, Clone)]
pub struct PipelineInstance {
    pub id: Uuid,
    pub steps: Vec<StepSlot>,
    pub cursor: usize,
    pub completed: bool,
    pub failed: bool,
}

/// Estado de un step en la instancia.
#[derive(Debug, Clone)]
pub struct StepSlot {
    pub step_id: String,
    pub status: StepStatus,
    pub run_id: Option<String>,
    pub fingerprint: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Trait para reconstruir (`replay`) el estado de un pipeline.
pub trait PipelineRepository {
    fn load(&self, pipeline_id: Uuid, events: &[PipelineEvent], plan: &PipelinePlan) -> PipelineInstance;
}

#[derive(Debug, Default)]
pub struct InMemoryPipelineRepository;

impl InMemoryPipelineRepository {
    pub fn new() -> Self {
        Self
    }
}

impl PipelineRepository for InMemoryPipelineRepository {
    fn load(&self, pipeline_id: Uuid, events: &[PipelineEvent], plan: &PipelinePlan) -> PipelineInstance {
        let mut steps: Vec<StepSlot> = plan.invocations
                                           .iter()
                                           .map(|inv| StepSlot { step_id: inv.step.id().to_string(),
                                                                 status: StepStatus::Pending,
                                                                 run_id: None,
                                                                 fingerprint: None,
                                                                 started_at: None,
                                                                 finished_at: None })
                                           .collect();
        let mut completed = false;
        for ev in events {
            match &ev.kind {
                PipelineEventKind::PipelineInitialized { .. } => {}
                PipelineEventKind::StepStarted { step_index, .. } => {
                    if let Some(slot) = steps.get_mut(*step_index) {
                        slot.status = StepStatus::Running;
                        slot.started_at = Some(ev.ts);
                    }
                }
                PipelineEventKind::StepFinished { step_index,
                                                  run_id,
                                                  fingerprint,
                                                  .. } => {
                    if let Some(slot) = steps.get_mut(*step_index) {
                        slot.status = StepStatus::FinishedOk;
                        slot.run_id = run_id.clone();
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.finished_at = Some(ev.ts);
                    }
                }
                PipelineEventKind::StepFailed { step_index, fingerprint, .. } => {
                    if let Some(slot) = steps.get_mut(*step_index) {
                        slot.status = StepStatus::Failed;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.finished_at = Some(ev.ts);
                    }
                }
                PipelineEventKind::PipelineCompleted { .. } => completed = true,
            }
        }
        let failed = steps.iter().any(|s| s.status == StepStatus::Failed);
        let cursor = steps.iter()
                          .position(|s| s.status == StepStatus::Pending)
                          .unwrap_or(steps.len());
        PipelineInstance { id: pipeline_id,
                           steps,
                           cursor,
                           completed,
                           failed }
    }
}
