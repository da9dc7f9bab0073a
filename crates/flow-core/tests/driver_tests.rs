//! Driver end-to-end con un runner en memoria: orden, adjuntos y fallos.

use flow_core::{build_plan, ActiveSteps, ConfigTree, CoreEngineError, ExecutionContext, PipelineDriver,
                PipelineEventKind, Runner, Step, StepInvocation, StepRunResult, StepStatus, TrackerContext};
use serde_json::json;

struct RecordingRunner {
    seen: Vec<(Step, bool)>, // (step, rf_config existía al invocar)
    fail_on: Option<Step>,
}

impl Runner for RecordingRunner {
    fn name(&self) -> &str {
        "recording"
    }

    fn invoke(&mut self, invocation: &StepInvocation, _ctx: &ExecutionContext) -> StepRunResult {
        let rf_exists = invocation.attachments.iter().all(|a| a.path.exists());
        self.seen.push((invocation.step, rf_exists));
        if self.fail_on == Some(invocation.step) {
            return StepRunResult::failure(invocation.step.id(), "exit status 1");
        }
        StepRunResult::Success { run_id: None }
    }
}

fn config(steps: &str) -> ConfigTree {
    ConfigTree::new(json!({
        "main": {"project_name": "p", "experiment_name": "e", "steps": steps},
        "etl": {"sample": "sample1.csv"},
        "basic_cleaning": {"filter_column": "price", "filter_value": 10, "output_artifact": "clean.csv",
                           "output_type": "clean", "output_description": "d"},
        "data_check": {"ref_artifact": "clean.csv:reference", "kl_threshold": 0.2},
        "data_split": {"test_size": 0.2, "random_seed": 42, "stratify_by": "none"},
        "modeling": {"random_forest": {"max_depth": 15}, "max_tfidf_features": 5, "output_artifact": "rf",
                     "output_type": "model_export", "output_description": "d"}
    })).unwrap()
}

#[test]
fn rf_config_is_written_before_training_runs() {
    let scratch = tempfile::tempdir().unwrap();
    let plan = build_plan(&config("all"), &ActiveSteps::all(), scratch.path()).unwrap();
    let ctx = ExecutionContext::new(TrackerContext::new("p", "e"), scratch.path());
    let mut runner = RecordingRunner { seen: vec![], fail_on: None };

    PipelineDriver::in_memory().run(&plan, &mut runner, &ctx).unwrap();

    assert_eq!(runner.seen.last(), Some(&(Step::TrainRandomForest, true)));
    let written: serde_json::Value =
        serde_json::from_slice(&std::fs::read(scratch.path().join("rf_config.json")).unwrap()).unwrap();
    assert_eq!(written, json!({"max_depth": 15}));
}

#[test]
fn later_steps_never_run_after_a_failure() {
    let scratch = tempfile::tempdir().unwrap();
    let plan = build_plan(&config("all"), &ActiveSteps::all(), scratch.path()).unwrap();
    let ctx = ExecutionContext::new(TrackerContext::new("p", "e"), scratch.path());
    let mut runner = RecordingRunner { seen: vec![], fail_on: Some(Step::DataCheck) };
    let mut driver = PipelineDriver::in_memory();

    let err = driver.run(&plan, &mut runner, &ctx).unwrap_err();

    assert!(matches!(err, CoreEngineError::StepFailed { .. }));
    let steps: Vec<Step> = runner.seen.iter().map(|(s, _)| *s).collect();
    assert_eq!(steps, vec![Step::Download, Step::BasicCleaning, Step::DataCheck]);

    let id = driver.default_pipeline_id().unwrap();
    let instance = driver.instance(id, &plan);
    let statuses: Vec<StepStatus> = instance.steps.iter().map(|s| s.status).collect();
    assert_eq!(statuses,
               vec![StepStatus::FinishedOk, StepStatus::FinishedOk, StepStatus::Failed, StepStatus::Pending, StepStatus::Pending]);
    assert!(driver.events_for(id)
                  .iter()
                  .any(|e| matches!(&e.kind, PipelineEventKind::StepFailed { step_id, .. } if step_id == "data_check")));
}

#[test]
fn initialized_event_lists_active_steps() {
    let scratch = tempfile::tempdir().unwrap();
    let active = ActiveSteps::parse("data_split,basic_cleaning").unwrap();
    let plan = build_plan(&config("data_split,basic_cleaning"), &active, scratch.path()).unwrap();
    let ctx = ExecutionContext::new(TrackerContext::new("p", "e"), scratch.path());
    let mut driver = PipelineDriver::in_memory();

    let id = driver.run(&plan, &mut RecordingRunner { seen: vec![], fail_on: None }, &ctx).unwrap();

    let first = &driver.events_for(id)[0];
    assert_eq!(first.kind,
               PipelineEventKind::PipelineInitialized { definition_hash: plan.definition_hash.clone(),
                                                        steps: vec!["basic_cleaning".into(), "data_split".into()] });
}
