pub mod types;
pub use types::{InMemoryPipelineRepository, PipelineInstance, PipelineRepository, StepSlot};
