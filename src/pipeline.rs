//! Ejecución de un pipeline completo (`go`) y de steps nativos sueltos.
//!
//! `go` resuelve la selección de steps, construye el plan entero (cualquier
//! error de configuración aparece aquí, antes de invocar nada) y lo ejecuta
//! dentro de un directorio temporal que se borra al terminar, haya éxito o
//! no.
use std::path::{Path, PathBuf};

use log::{info, warn};
use uuid::Uuid;

use flow_adapters::{DownloadStep, LocalRunner, MlflowRunner};
use flow_core::plan::sections::MainSection;
use flow_core::{build_plan, ActiveSteps, ConfigTree, CoreEngineError, ExecutionContext, InMemoryPipelineRepository,
                LocalStep, Params, PipelineDriver, Runner, StepEnv, StepRunResult, TrackerContext};
use flow_persistence::{FsArtifactStore, FsRunTracker, JsonlEventStore, StoreConfig};

use crate::errors::AppError;

const SCRATCH_PREFIX: &str = "pipeflow-";
/// Proyecto usado por un step suelto cuando no hay `WANDB_PROJECT`.
const STANDALONE_PROJECT: &str = "pipeflow";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RunnerKind {
    /// `mlflow run` por step sobre `main.components_repository`.
    Mlflow,
    /// Steps nativos en proceso (sólo `download` y `basic_cleaning`).
    Local,
}

#[derive(Debug, Clone)]
pub struct GoOptions {
    pub runner: RunnerKind,
    pub store: StoreConfig,
    /// Directorio de muestras para `download` con el runner local.
    pub data_dir: Option<PathBuf>,
}

/// Ejecuta los steps activos de `config` y devuelve el id del pipeline.
pub fn go(config: &ConfigTree, opts: &GoOptions) -> Result<Uuid, AppError> {
    let main: MainSection = config.section("main")?;
    let active = ActiveSteps::parse(&main.steps)?;
    for step in active.manual_steps() {
        warn!("step '{step}' is not part of the default set; it expects a model promoted to 'prod'");
    }

    let scratch = tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir()?;
    let plan = build_plan(config, &active, scratch.path())?;
    let mut runner = build_runner(&main, opts)?;
    let ctx = ExecutionContext::new(TrackerContext::new(main.project_name, main.experiment_name), scratch.path());

    let mut driver = PipelineDriver::new_with_stores(JsonlEventStore::from_config(&opts.store),
                                                     InMemoryPipelineRepository::new());
    info!("go:start runner={} steps={:?} project={} group={}",
          runner.name(),
          plan.step_ids(),
          ctx.tracker.project,
          ctx.tracker.group);
    let pipeline_id = driver.run(&plan, runner.as_mut(), &ctx)?;
    info!("go:done pipeline_id={pipeline_id} fingerprint={}",
          driver.pipeline_fingerprint(pipeline_id).unwrap_or_default());
    Ok(pipeline_id)
}

fn build_runner(main: &MainSection, opts: &GoOptions) -> Result<Box<dyn Runner>, AppError> {
    match opts.runner {
        RunnerKind::Mlflow => {
            let repository = main.components_repository
                                 .clone()
                                 .ok_or_else(|| CoreEngineError::MissingConfig("main.components_repository".into()))?;
            Ok(Box::new(MlflowRunner::new(repository)))
        }
        RunnerKind::Local => {
            let data_dir = opts.data_dir
                               .clone()
                               .or_else(|| default_data_dir(main.components_repository.as_deref()))
                               .ok_or_else(|| {
                                   CoreEngineError::MissingConfig("--data-dir (or a local main.components_repository)".into())
                               })?;
            Ok(Box::new(LocalRunner::with_native_steps(FsArtifactStore::from_config(&opts.store),
                                                       FsRunTracker::from_config(&opts.store),
                                                       DownloadStep::new(data_dir))))
        }
    }
}

/// `<components_repository>/get_data/data` cuando el repositorio es local.
fn default_data_dir(repository: Option<&str>) -> Option<PathBuf> {
    let repo = repository?;
    if MlflowRunner::new(repo).is_remote() {
        return None;
    }
    Some(Path::new(repo).join("get_data").join("data"))
}

/// Ejecuta un step nativo fuera de un pipeline y devuelve el id del run.
///
/// El contexto del tracker se toma de `WANDB_PROJECT` / `WANDB_RUN_GROUP`
/// si existen (así se comporta igual que lanzado por `mlflow run`).
pub fn run_local_step(step: &dyn LocalStep, params: &Params, store: &StoreConfig) -> Result<Option<String>, AppError> {
    let tracker_ctx = TrackerContext::from_env().unwrap_or_else(|| TrackerContext::new(STANDALONE_PROJECT, ""));
    let scratch = tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir()?;
    let ctx = ExecutionContext::new(tracker_ctx, scratch.path());
    let mut artifacts = FsArtifactStore::from_config(store);
    let mut tracker = FsRunTracker::from_config(store);
    let mut env = StepEnv { store: &mut artifacts,
                            tracker: &mut tracker,
                            ctx: &ctx };
    match step.run(params, &mut env) {
        StepRunResult::Success { run_id } => Ok(run_id),
        StepRunResult::Failure { error } => Err(error.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_defaults_only_for_local_repositories() {
        assert_eq!(default_data_dir(Some("/srv/components")),
                   Some(PathBuf::from("/srv/components/get_data/data")));
        assert_eq!(default_data_dir(Some("https://github.com/org/components")), None);
        assert_eq!(default_data_dir(None), None);
    }
}
