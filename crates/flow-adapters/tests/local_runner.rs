//! LocalRunner sobre el store y tracker en disco: download + basic_cleaning.

use std::fs;

use flow_adapters::{DownloadStep, LocalRunner};
use flow_core::{build_plan, ActiveSteps, ArtifactRef, ArtifactStore, ConfigTree, CoreEngineError, ExecutionContext,
                PipelineDriver, RunStatus, RunTracker, Runner, Step, StepInvocation, StepRunResult, TrackerContext};
use flow_persistence::{FsArtifactStore, FsRunTracker};
use serde_json::json;

fn config(filter_value: f64) -> ConfigTree {
    ConfigTree::new(json!({
        "main": {"project_name": "nyc_airbnb", "experiment_name": "dev", "steps": "download,basic_cleaning"},
        "etl": {"sample": "sample1.csv"},
        "basic_cleaning": {"filter_column": "price", "filter_value": filter_value,
                           "output_artifact": "clean_sample.csv", "output_type": "clean_sample",
                           "output_description": "Data with outliers and null values removed"}
    })).unwrap()
}

struct Fixture {
    home: tempfile::TempDir,
    data: tempfile::TempDir,
    scratch: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let data = tempfile::tempdir().unwrap();
        fs::write(data.path().join("sample1.csv"), "id,price\n1,50\n1,50\n2,\n3,5\n4,200\n").unwrap();
        Self { home: tempfile::tempdir().unwrap(),
               data,
               scratch: tempfile::tempdir().unwrap() }
    }

    fn runner(&self) -> LocalRunner<FsArtifactStore, FsRunTracker> {
        LocalRunner::with_native_steps(FsArtifactStore::new(self.home.path().join("artifacts")),
                                       FsRunTracker::new(self.home.path().join("runs")),
                                       DownloadStep::new(self.data.path()))
    }

    fn ctx(&self) -> ExecutionContext {
        ExecutionContext::new(TrackerContext::new("nyc_airbnb", "dev"), self.scratch.path())
    }
}

#[test]
fn download_then_clean_publishes_both_artifacts() {
    let fx = Fixture::new();
    let plan = build_plan(&config(10.0), &ActiveSteps::parse("basic_cleaning,download").unwrap(), fx.scratch.path()).unwrap();
    let mut runner = fx.runner();

    PipelineDriver::in_memory().run(&plan, &mut runner, &fx.ctx()).unwrap();

    let (store, _tracker) = runner.into_parts();
    let (raw, _) = store.fetch(&ArtifactRef::latest("sample.csv")).unwrap();
    assert_eq!(raw.kind, "raw_data");
    let (clean, path) = store.fetch(&"clean_sample.csv:latest".parse().unwrap()).unwrap();
    assert_eq!(clean.kind, "clean_sample");
    assert_eq!(fs::read_to_string(path).unwrap(), "id,price\n1,50\n4,200\n");
}

#[test]
fn cleaning_run_records_lineage() {
    let fx = Fixture::new();
    let plan = build_plan(&config(10.0), &ActiveSteps::parse("download,basic_cleaning").unwrap(), fx.scratch.path()).unwrap();
    let mut runner = fx.runner();
    let mut driver = PipelineDriver::in_memory();
    let id = driver.run(&plan, &mut runner, &fx.ctx()).unwrap();

    let instance = driver.instance(id, &plan);
    let run_id = instance.steps[1].run_id.clone().unwrap().parse().unwrap();
    let record = runner.tracker().run(run_id).unwrap();
    assert_eq!(record.job_type, "basic_cleaning");
    assert_eq!(record.status, RunStatus::Finished);
    assert_eq!(record.inputs, vec!["sample.csv:v0".to_string()]);
    assert_eq!(record.outputs, vec!["clean_sample.csv:v0".to_string()]);
    assert_eq!(record.config.get("filter_value"), Some(&json!(10.0)));
}

#[test]
fn rerunning_identical_pipeline_does_not_add_versions() {
    let fx = Fixture::new();
    let plan = build_plan(&config(10.0), &ActiveSteps::parse("download,basic_cleaning").unwrap(), fx.scratch.path()).unwrap();
    let mut runner = fx.runner();
    PipelineDriver::in_memory().run(&plan, &mut runner, &fx.ctx()).unwrap();
    PipelineDriver::in_memory().run(&plan, &mut runner, &fx.ctx()).unwrap();

    assert_eq!(runner.store().versions("sample.csv").unwrap().len(), 1);
    assert_eq!(runner.store().versions("clean_sample.csv").unwrap().len(), 1);
}

#[test]
fn unsupported_step_fails_with_runner_error() {
    let fx = Fixture::new();
    let mut runner = fx.runner();
    let result = runner.invoke(&StepInvocation::new(Step::DataSplit, Default::default()), &fx.ctx());
    assert!(matches!(result, StepRunResult::Failure { error: CoreEngineError::Runner(_) }));
}

#[test]
fn missing_input_artifact_fails_the_step_and_the_run() {
    let fx = Fixture::new();
    let plan = build_plan(&config(10.0), &ActiveSteps::parse("basic_cleaning").unwrap(), fx.scratch.path()).unwrap();
    let mut runner = fx.runner();
    let mut driver = PipelineDriver::in_memory();

    let err = driver.run(&plan, &mut runner, &fx.ctx()).unwrap_err();

    assert!(matches!(err, CoreEngineError::StepFailed { ref step, .. } if step == "basic_cleaning"));
    let runs = runner.tracker().list_project("nyc_airbnb").unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, RunStatus::Failed);
}
