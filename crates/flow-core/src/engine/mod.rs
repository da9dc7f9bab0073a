//! Driver del pipeline: ejecución secuencial y bloqueante de un
//! `PipelinePlan` a través de un `Runner`, registrando eventos.

pub mod core;

pub use core::PipelineDriver;

pub use crate::event::{EventStore, InMemoryEventStore, PipelineEvent, PipelineEventKind};
pub use crate::repo::{InMemoryPipelineRepository, PipelineRepository};
