//! Estado de salida del proceso hijo -> StepRunResult. Usa `true`/`false`
//! como sustitutos de `mlflow`.
#![cfg(unix)]

use flow_adapters::MlflowRunner;
use flow_core::{CoreEngineError, ExecutionContext, Params, Runner, Step, StepInvocation, StepRunResult, TrackerContext};

fn ctx() -> ExecutionContext {
    ExecutionContext::new(TrackerContext::new("p", "g"), std::env::temp_dir())
}

#[test]
fn zero_exit_is_success() {
    let mut runner = MlflowRunner::new("/components").with_program("true");
    let result = runner.invoke(&StepInvocation::new(Step::DataCheck, Params::new()), &ctx());
    assert!(result.is_success());
}

#[test]
fn non_zero_exit_is_a_step_failure() {
    let mut runner = MlflowRunner::new("/components").with_program("false");
    let result = runner.invoke(&StepInvocation::new(Step::DataCheck, Params::new()), &ctx());
    assert!(matches!(result, StepRunResult::Failure { error: CoreEngineError::StepFailed { ref step, .. } } if step == "data_check"));
}

#[test]
fn spawn_failure_is_a_runner_error() {
    let mut runner = MlflowRunner::new("/components").with_program("/nonexistent/mlflow-binary");
    let result = runner.invoke(&StepInvocation::new(Step::DataSplit, Params::new()), &ctx());
    assert!(matches!(result, StepRunResult::Failure { error: CoreEngineError::Runner(_) }));
}
