use crate::model::ExecutionContext;
use crate::tracking::{ArtifactStore, RunTracker};

use super::{Params, Step, StepRunResult};

/// Recursos que un step local recibe: el store de artifacts, el tracker de
/// runs y el contexto de la invocación.
pub struct StepEnv<'a> {
    pub store: &'a mut dyn ArtifactStore,
    pub tracker: &'a mut dyn RunTracker,
    pub ctx: &'a ExecutionContext,
}

/// Step ejecutado dentro del proceso (sin plataforma externa).
pub trait LocalStep {
    /// Entrada del catálogo que implementa.
    fn step(&self) -> Step;

    /// Nombre amigable; por defecto el id del catálogo.
    fn name(&self) -> &str {
        self.step().id()
    }

    /// Ejecuta el step con sus params. Los errores se devuelven como
    /// `StepRunResult::Failure`, nunca como panic.
    fn run(&self, params: &Params, env: &mut StepEnv<'_>) -> StepRunResult;
}
