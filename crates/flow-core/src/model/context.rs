use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Agrupación de runs en el tracker (proyecto + grupo de experimento).
///
/// Se pasa explícitamente a cada invocación; el proceso del driver nunca
/// modifica su propio entorno. Sólo los procesos hijos reciben las
/// variables `WANDB_PROJECT` / `WANDB_RUN_GROUP`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerContext {
    pub project: String,
    pub group: String,
}

impl TrackerContext {
    pub const PROJECT_ENV: &'static str = "WANDB_PROJECT";
    pub const GROUP_ENV: &'static str = "WANDB_RUN_GROUP";

    pub fn new(project: impl Into<String>, group: impl Into<String>) -> Self {
        Self { project: project.into(),
               group: group.into() }
    }

    /// Pares (variable, valor) a exportar hacia un proceso hijo.
    pub fn env_pairs(&self) -> [(&'static str, &str); 2] {
        [(Self::PROJECT_ENV, self.project.as_str()), (Self::GROUP_ENV, self.group.as_str())]
    }

    /// Lectura del lado del step: reconstruye el contexto heredado del driver.
    pub fn from_env() -> Option<Self> {
        let project = std::env::var(Self::PROJECT_ENV).ok()?;
        let group = std::env::var(Self::GROUP_ENV).unwrap_or_default();
        Some(Self { project, group })
    }
}

/// Contexto de ejecución entregado a cada `Runner::invoke`.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub tracker: TrackerContext,
    pub scratch_dir: PathBuf, // vive lo que dura la invocación del pipeline
}

impl ExecutionContext {
    pub fn new(tracker: TrackerContext, scratch_dir: impl Into<PathBuf>) -> Self {
        Self { tracker,
               scratch_dir: scratch_dir.into() }
    }
}
