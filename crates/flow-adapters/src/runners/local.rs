//! LocalRunner: despacha cada invocación al step nativo registrado para su
//! id, sobre un store de artifacts y un tracker propios.
use log::{debug, error};

use flow_core::{ArtifactStore, CoreEngineError, ExecutionContext, LocalStep, RunTracker, Runner, Step, StepEnv,
                StepInvocation, StepRunResult};

use crate::steps::{BasicCleaningStep, DownloadStep};

pub struct LocalRunner<S: ArtifactStore, T: RunTracker> {
    store: S,
    tracker: T,
    steps: Vec<Box<dyn LocalStep>>,
}

impl<S: ArtifactStore, T: RunTracker> LocalRunner<S, T> {
    pub fn new(store: S, tracker: T) -> Self {
        Self { store,
               tracker,
               steps: Vec::new() }
    }

    /// Runner con los steps nativos disponibles (`download`, `basic_cleaning`).
    pub fn with_native_steps(store: S, tracker: T, download: DownloadStep) -> Self {
        Self::new(store, tracker).register(download).register(BasicCleaningStep)
    }

    /// Registra un step; uno posterior con el mismo id reemplaza al anterior.
    pub fn register(mut self, step: impl LocalStep + 'static) -> Self {
        self.steps.retain(|s| s.step() != step.step());
        self.steps.push(Box::new(step));
        self
    }

    pub fn supports(&self, step: Step) -> bool {
        self.steps.iter().any(|s| s.step() == step)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn into_parts(self) -> (S, T) {
        (self.store, self.tracker)
    }
}

impl<S: ArtifactStore, T: RunTracker> Runner for LocalRunner<S, T> {
    fn name(&self) -> &str {
        "local"
    }

    fn invoke(&mut self, invocation: &StepInvocation, ctx: &ExecutionContext) -> StepRunResult {
        let Some(step) = self.steps.iter().find(|s| s.step() == invocation.step) else {
            error!("local:unsupported step={}", invocation.step);
            return StepRunResult::Failure { error: CoreEngineError::Runner(format!("step '{}' has no native implementation; use the mlflow runner",
                                                                                   invocation.step)) };
        };
        debug!("local:dispatch step={} impl={}", invocation.step, step.name());
        let mut env = StepEnv { store: &mut self.store,
                                tracker: &mut self.tracker,
                                ctx };
        step.run(&invocation.params, &mut env)
    }
}
