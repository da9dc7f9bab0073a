//! Core PipelineDriver implementation

use std::fs;

use log::{error, info};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::constants::ENGINE_VERSION;
use crate::errors::CoreEngineError;
use crate::event::{EventStore, InMemoryEventStore, PipelineEvent, PipelineEventKind};
use crate::hashing::hash_value;
use crate::model::{ExecutionContext, StepFingerprintInput};
use crate::plan::PipelinePlan;
use crate::repo::{InMemoryPipelineRepository, PipelineInstance, PipelineRepository};
use crate::runner::Runner;
use crate::step::{StepInvocation, StepRunResult};

/// Driver secuencial del pipeline.
///
/// Invoca cada step del plan en orden, bloqueando hasta que el runner
/// devuelve, y se detiene en el primer fallo (sin reintentos ni rollback).
/// El progreso se registra como eventos; el estado se obtiene por replay.
#[derive(Debug)]
pub struct PipelineDriver<E, R>
    where E: EventStore,
          R: PipelineRepository
{
    event_store: E,
    repository: R,
    default_pipeline_id: Option<Uuid>,
}

impl PipelineDriver<InMemoryEventStore, InMemoryPipelineRepository> {
    /// Driver con stores en memoria.
    pub fn in_memory() -> Self {
        Self::new_with_stores(InMemoryEventStore::default(), InMemoryPipelineRepository::new())
    }
}

impl<E, R> PipelineDriver<E, R>
    where E: EventStore,
          R: PipelineRepository
{
    pub fn new_with_stores(event_store: E, repository: R) -> Self {
        Self { event_store,
               repository,
               default_pipeline_id: None }
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    /// Id del último pipeline ejecutado por este driver.
    pub fn default_pipeline_id(&self) -> Option<Uuid> {
        self.default_pipeline_id
    }

    pub fn events_for(&self, pipeline_id: Uuid) -> Vec<PipelineEvent> {
        self.event_store.list(pipeline_id)
    }

    /// Estado reconstruido de un pipeline.
    pub fn instance(&self, pipeline_id: Uuid, plan: &PipelinePlan) -> PipelineInstance {
        let events = self.event_store.list(pipeline_id);
        self.repository.load(pipeline_id, &events, plan)
    }

    /// Ejecuta el plan completo con un id nuevo y retorna ese id.
    pub fn run(&mut self, plan: &PipelinePlan, runner: &mut dyn Runner, ctx: &ExecutionContext) -> Result<Uuid, CoreEngineError> {
        self.run_pipeline(Uuid::new_v4(), plan, runner, ctx)
    }

    /// Ejecuta un pipeline específico hasta su finalización o primer fallo.
    pub fn run_pipeline(&mut self,
                        pipeline_id: Uuid,
                        plan: &PipelinePlan,
                        runner: &mut dyn Runner,
                        ctx: &ExecutionContext)
                        -> Result<Uuid, CoreEngineError> {
        info!("pipeline:start pipeline_id={pipeline_id} runner={} steps={:?}",
              runner.name(),
              plan.step_ids());
        loop {
            match self.next_with(pipeline_id, plan, runner, ctx) {
                Ok(()) => continue,
                Err(CoreEngineError::PipelineCompleted) => {
                    info!("pipeline:completed pipeline_id={pipeline_id}");
                    return Ok(pipeline_id);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Ensure a PipelineInitialized event exists and return the current
    /// events (including the possibly newly appended one).
    fn load_or_init(&mut self, pipeline_id: Uuid, plan: &PipelinePlan) -> Result<Vec<PipelineEvent>, CoreEngineError> {
        let mut events = self.event_store.list(pipeline_id);
        let has_init = events.iter()
                             .any(|e| matches!(e.kind, PipelineEventKind::PipelineInitialized { .. }));
        if !has_init {
            let ev = self.event_store
                         .append_kind(pipeline_id,
                                      PipelineEventKind::PipelineInitialized { definition_hash: plan.definition_hash.clone(),
                                                                               steps: plan.step_ids() })?;
            events.push(ev);
        }
        self.default_pipeline_id = Some(pipeline_id);
        Ok(events)
    }

    /// Ejecuta el siguiente step pendiente del pipeline.
    pub fn next_with(&mut self,
                     pipeline_id: Uuid,
                     plan: &PipelinePlan,
                     runner: &mut dyn Runner,
                     ctx: &ExecutionContext)
                     -> Result<(), CoreEngineError> {
        let events = self.load_or_init(pipeline_id, plan)?;
        let instance = self.repository.load(pipeline_id, &events, plan);

        if instance.completed {
            return Err(CoreEngineError::PipelineCompleted);
        }
        if instance.failed {
            return Err(CoreEngineError::PipelineHasFailed);
        }

        let cursor = instance.cursor;
        let Some(invocation) = plan.invocations.get(cursor) else {
            // plan vacío o todos los steps terminados sin evento de cierre
            self.complete_pipeline(pipeline_id, plan)?;
            return Err(CoreEngineError::PipelineCompleted);
        };
        let step_id = invocation.step.id();

        self.event_store.append_kind(pipeline_id,
                                     PipelineEventKind::StepStarted { step_index: cursor,
                                                                      step_id: step_id.to_string() })?;
        info!("step:start pipeline_id={pipeline_id} step={step_id} index={cursor}");

        let result = match write_attachments(invocation) {
            Ok(()) => runner.invoke(invocation, ctx),
            Err(error) => StepRunResult::Failure { error },
        };

        match result {
            StepRunResult::Success { run_id } => self.handle_step_success(pipeline_id, cursor, invocation, run_id, plan),
            StepRunResult::Failure { error } => self.handle_step_failure(pipeline_id, cursor, invocation, error, plan),
        }
    }

    fn handle_step_success(&mut self,
                           pipeline_id: Uuid,
                           cursor: usize,
                           invocation: &StepInvocation,
                           run_id: Option<String>,
                           plan: &PipelinePlan)
                           -> Result<(), CoreEngineError> {
        let fingerprint = step_fingerprint(cursor, invocation, plan)?;
        info!("step:finished pipeline_id={pipeline_id} step={} run_id={}",
              invocation.step,
              run_id.as_deref().unwrap_or("-"));
        self.event_store.append_kind(pipeline_id,
                                     PipelineEventKind::StepFinished { step_index: cursor,
                                                                       step_id: invocation.step.id().to_string(),
                                                                       run_id,
                                                                       fingerprint })?;
        if cursor + 1 == plan.len() {
            self.complete_pipeline(pipeline_id, plan)?;
        }
        Ok(())
    }

    fn handle_step_failure(&mut self,
                           pipeline_id: Uuid,
                           cursor: usize,
                           invocation: &StepInvocation,
                           error: CoreEngineError,
                           plan: &PipelinePlan)
                           -> Result<(), CoreEngineError> {
        error!("step:failed pipeline_id={pipeline_id} step={} error={error}", invocation.step);
        let fingerprint = step_fingerprint(cursor, invocation, plan)?;
        self.event_store.append_kind(pipeline_id,
                                     PipelineEventKind::StepFailed { step_index: cursor,
                                                                     step_id: invocation.step.id().to_string(),
                                                                     error: error.clone(),
                                                                     fingerprint })?;
        Err(error)
    }

    fn complete_pipeline(&mut self, pipeline_id: Uuid, plan: &PipelinePlan) -> Result<(), CoreEngineError> {
        let step_fps: Vec<Value> = self.event_store
                                       .list(pipeline_id)
                                       .into_iter()
                                       .filter_map(|e| match e.kind {
                                           PipelineEventKind::StepFinished { fingerprint, .. } => Some(Value::String(fingerprint)),
                                           _ => None,
                                       })
                                       .collect();
        let mut fp = Map::new();
        fp.insert("engine_version".into(), Value::from(ENGINE_VERSION));
        fp.insert("definition_hash".into(), Value::from(plan.definition_hash.as_str()));
        fp.insert("step_fingerprints".into(), Value::Array(step_fps));
        let pipeline_fingerprint = hash_value(&Value::Object(fp));
        self.event_store
            .append_kind(pipeline_id, PipelineEventKind::PipelineCompleted { pipeline_fingerprint })?;
        Ok(())
    }

    /// Variante compacta de eventos (útil en tests y logs).
    pub fn event_variants(&self, pipeline_id: Uuid) -> Vec<&'static str> {
        self.event_store
            .list(pipeline_id)
            .iter()
            .map(|e| match e.kind {
                PipelineEventKind::PipelineInitialized { .. } => "I",
                PipelineEventKind::StepStarted { .. } => "S",
                PipelineEventKind::StepFinished { .. } => "F",
                PipelineEventKind::StepFailed { .. } => "X",
                PipelineEventKind::PipelineCompleted { .. } => "C",
            })
            .collect()
    }

    pub fn pipeline_fingerprint(&self, pipeline_id: Uuid) -> Option<String> {
        self.event_store.list(pipeline_id).into_iter().rev().find_map(|e| match e.kind {
                                                                   PipelineEventKind::PipelineCompleted { pipeline_fingerprint } => {
                                                                       Some(pipeline_fingerprint)
                                                                   }
                                                                   _ => None,
                                                               })
    }
}

fn step_fingerprint(cursor: usize, invocation: &StepInvocation, plan: &PipelinePlan) -> Result<String, CoreEngineError> {
    let params = Value::Object(invocation.params.clone().into_iter().collect());
    let input = StepFingerprintInput { engine_version: ENGINE_VERSION,
                                       definition_hash: &plan.definition_hash,
                                       step_index: cursor,
                                       step_id: invocation.step.id(),
                                       params: &params };
    let value = serde_json::to_value(&input).map_err(|e| CoreEngineError::Internal(format!("fingerprint input: {e}")))?;
    Ok(hash_value(&value))
}

/// Materializa los archivos que el step necesita antes de invocarlo.
fn write_attachments(invocation: &StepInvocation) -> Result<(), CoreEngineError> {
    for attachment in &invocation.attachments {
        let attachment_error = |reason: String| CoreEngineError::Attachment { path: attachment.path.display().to_string(),
                                                                              reason };
        let body = serde_json::to_vec_pretty(&attachment.contents).map_err(|e| attachment_error(e.to_string()))?;
        fs::write(&attachment.path, body).map_err(|e| attachment_error(e.to_string()))?;
    }
    Ok(())
}
