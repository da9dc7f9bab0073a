//! flow-core: driver secuencial de pipelines de datos/ML.
//!
//! Catálogo fijo de steps, selección de steps activos, construcción del plan
//! a partir de la configuración y ejecución bloqueante a través de un
//! `Runner`. Los colaboradores externos (store de artifacts, tracker de
//! runs) se modelan como traits en `tracking`.
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod model;
pub mod plan;
pub mod repo;
pub mod runner;
pub mod step;
pub mod tracking;

pub use engine::PipelineDriver;
pub use errors::{CoreEngineError, StoreError};
pub use event::{EventStore, InMemoryEventStore, PipelineEvent, PipelineEventKind};
pub use model::{ArtifactRef, ArtifactVersion, ConfigTree, ExecutionContext, NewArtifact, TrackerContext};
pub use plan::{build_plan, PipelinePlan};
pub use repo::{InMemoryPipelineRepository, PipelineInstance, PipelineRepository};
pub use runner::Runner;
pub use step::{ActiveSteps, LocalStep, Params, Step, StepEnv, StepInvocation, StepRunResult, StepStatus};
pub use tracking::{ArtifactStore, InMemoryRunTracker, RunRecord, RunStatus, RunTracker};
