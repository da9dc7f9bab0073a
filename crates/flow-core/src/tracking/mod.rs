//! Contratos de los colaboradores externos: store de artifacts y tracker de
//! runs. El core sólo define los traits (y un tracker en memoria); las
//! implementaciones persistentes viven en `flow-persistence`.

mod store;
mod tracker;

pub use store::ArtifactStore;
pub use tracker::{InMemoryRunTracker, RunRecord, RunStatus, RunTracker};
