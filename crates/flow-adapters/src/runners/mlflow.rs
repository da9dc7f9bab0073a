//! MlflowRunner: cada step es un proyecto MLflow bajo el repositorio de
//! componentes y se ejecuta con `mlflow run` como proceso hijo bloqueante.
//!
//! El contexto del tracker se exporta sólo al hijo (`WANDB_PROJECT`,
//! `WANDB_RUN_GROUP`); el entorno del driver no se toca.
use std::ffi::OsString;
use std::process::Command;

use log::{debug, error, info};

use flow_core::{CoreEngineError, ExecutionContext, Runner, Step, StepInvocation, StepRunResult};

pub const DEFAULT_PROGRAM: &str = "mlflow";
pub const DEFAULT_VERSION: &str = "main";
pub const ENTRY_POINT: &str = "main";

const REMOTE_PREFIXES: &[&str] = &["http://", "https://", "git@", "git+", "git://", "ssh://"];

#[derive(Debug, Clone)]
pub struct MlflowRunner {
    repository: String,
    version: String,
    program: OsString,
}

impl MlflowRunner {
    pub fn new(repository: impl Into<String>) -> Self {
        Self { repository: repository.into().trim_end_matches('/').to_string(),
               version: DEFAULT_VERSION.to_string(),
               program: OsString::from(DEFAULT_PROGRAM) }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Ejecutable a invocar en lugar de `mlflow` (wrappers, tests).
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Repositorio remoto (URL o git): sólo entonces se fija `-v <version>`.
    pub fn is_remote(&self) -> bool {
        REMOTE_PREFIXES.iter().any(|p| self.repository.starts_with(p)) || self.repository.ends_with(".git")
    }

    /// Subdirectorio del componente dentro del repositorio.
    pub fn component_dir(step: Step) -> &'static str {
        match step {
            Step::Download => "get_data",
            other => other.id(),
        }
    }

    pub fn component_uri(&self, step: Step) -> String {
        format!("{}/{}", self.repository, Self::component_dir(step))
    }

    /// Argumentos de `mlflow run` para una invocación, en orden.
    pub fn args(&self, invocation: &StepInvocation) -> Vec<String> {
        let mut args = vec!["run".to_string(),
                            self.component_uri(invocation.step),
                            "-e".to_string(),
                            ENTRY_POINT.to_string()];
        if self.is_remote() {
            args.push("-v".to_string());
            args.push(self.version.clone());
        }
        for (key, value) in invocation.rendered_params() {
            args.push("-P".to_string());
            args.push(format!("{key}={value}"));
        }
        args
    }

    pub fn command(&self, invocation: &StepInvocation, ctx: &ExecutionContext) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args(invocation));
        for (key, value) in ctx.tracker.env_pairs() {
            cmd.env(key, value);
        }
        cmd
    }
}

impl Runner for MlflowRunner {
    fn name(&self) -> &str {
        "mlflow"
    }

    fn invoke(&mut self, invocation: &StepInvocation, ctx: &ExecutionContext) -> StepRunResult {
        let step_id = invocation.step.id();
        let mut cmd = self.command(invocation, ctx);
        debug!("mlflow:spawn step={step_id} args={:?}", self.args(invocation));
        match cmd.status() {
            Ok(status) if status.success() => {
                info!("mlflow:ok step={step_id}");
                StepRunResult::Success { run_id: None }
            }
            Ok(status) => {
                error!("mlflow:failed step={step_id} status={status}");
                StepRunResult::failure(step_id, format!("`mlflow run` exited with {status}"))
            }
            Err(e) => StepRunResult::Failure { error: CoreEngineError::Runner(format!("cannot spawn {}: {e}",
                                                                                       self.program.to_string_lossy())) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_core::Params;
    use serde_json::json;

    fn invocation() -> StepInvocation {
        let mut params = Params::new();
        params.insert("sample".into(), json!("sample1.csv"));
        params.insert("artifact_name".into(), json!("sample.csv"));
        StepInvocation::new(Step::Download, params)
    }

    #[test]
    fn local_repository_omits_version() {
        let runner = MlflowRunner::new("/opt/components/");
        assert_eq!(runner.args(&invocation()),
                   vec!["run",
                        "/opt/components/get_data",
                        "-e",
                        "main",
                        "-P",
                        "sample=sample1.csv",
                        "-P",
                        "artifact_name=sample.csv"]);
    }

    #[test]
    fn remote_repository_pins_version() {
        let runner = MlflowRunner::new("https://github.com/org/components").with_version("1.0.0");
        let args = runner.args(&invocation());
        assert_eq!(&args[..6],
                   &["run", "https://github.com/org/components/get_data", "-e", "main", "-v", "1.0.0"]);
    }

    #[test]
    fn tracker_context_goes_to_the_child_only() {
        let runner = MlflowRunner::new("/c");
        let ctx = ExecutionContext::new(flow_core::TrackerContext::new("nyc", "dev"), "/tmp");
        let cmd = runner.command(&invocation(), &ctx);
        let envs: Vec<_> = cmd.get_envs()
                              .map(|(k, v)| (k.to_string_lossy().into_owned(), v.map(|v| v.to_string_lossy().into_owned())))
                              .collect();
        assert!(envs.contains(&("WANDB_PROJECT".into(), Some("nyc".into()))));
        assert!(envs.contains(&("WANDB_RUN_GROUP".into(), Some("dev".into()))));
    }
}
