//! flow-persistence
//!
//! Implementaciones en sistema de archivos de los contratos de `flow-core`:
//! - `artifacts`: `FsArtifactStore` (versiones `v<N>`, alias, deduplicación
//!   por digest).
//! - `runs`: `FsRunTracker` (un JSON por run, agrupado por proyecto).
//! - `events`: `JsonlEventStore` (un archivo JSON-lines por pipeline).
//! - `config`: carga de configuración desde .env.
//!
//! Layout bajo `PIPEFLOW_HOME`:
//! ```text
//! artifacts/<name>/manifest.json
//! artifacts/<name>/v<N>/<name>
//! runs/<project>/<run_id>.json
//! pipelines/<pipeline_id>.jsonl
//! ```

pub mod artifacts;
pub mod config;
pub mod error;
pub mod events;
pub mod runs;

pub use artifacts::FsArtifactStore;
pub use config::{init_dotenv, StoreConfig};
pub use error::PersistenceError;
pub use events::JsonlEventStore;
pub use runs::FsRunTracker;
