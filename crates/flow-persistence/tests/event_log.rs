//! Paridad del log JSONL con el store en memoria: seq, replay y reapertura.

use flow_core::{ActiveSteps, ConfigTree, CoreEngineError, EventStore, ExecutionContext, InMemoryPipelineRepository,
                PipelineDriver, PipelineEventKind, Runner, StepInvocation, StepRunResult, StoreError, TrackerContext};
use flow_persistence::JsonlEventStore;
use serde_json::json;
use uuid::Uuid;

struct OkRunner;

impl Runner for OkRunner {
    fn name(&self) -> &str {
        "ok"
    }

    fn invoke(&mut self, _invocation: &StepInvocation, _ctx: &ExecutionContext) -> StepRunResult {
        StepRunResult::Success { run_id: None }
    }
}

struct CountingRunner {
    calls: usize,
}

impl Runner for CountingRunner {
    fn name(&self) -> &str {
        "counting"
    }

    fn invoke(&mut self, _invocation: &StepInvocation, _ctx: &ExecutionContext) -> StepRunResult {
        self.calls += 1;
        StepRunResult::Success { run_id: None }
    }
}

#[test]
fn seq_is_contiguous_and_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let id = Uuid::new_v4();
    {
        let mut store = JsonlEventStore::new(dir.path());
        store.append_kind(id, PipelineEventKind::StepStarted { step_index: 0, step_id: "download".into() })
             .unwrap();
        store.append_kind(id, PipelineEventKind::StepStarted { step_index: 1, step_id: "basic_cleaning".into() })
             .unwrap();
    }
    let mut store = JsonlEventStore::new(dir.path());
    let third = store.append_kind(id, PipelineEventKind::PipelineCompleted { pipeline_fingerprint: "fp".into() })
                       .unwrap();

    assert_eq!(third.seq, 2);
    let seqs: Vec<u64> = store.list(id).iter().map(|e| e.seq).collect();
    assert_eq!(seqs, vec![0, 1, 2]);
    assert!(store.list(Uuid::new_v4()).is_empty());
}

#[test]
fn driver_over_jsonl_matches_in_memory_fingerprint() {
    let dir = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let config = ConfigTree::new(json!({
        "main": {"project_name": "p", "experiment_name": "e", "steps": "download,basic_cleaning"},
        "etl": {"sample": "sample1.csv"},
        "basic_cleaning": {"filter_column": "price", "filter_value": 10, "output_artifact": "clean.csv",
                           "output_type": "clean", "output_description": "d"}
    })).unwrap();
    let active = ActiveSteps::parse("download,basic_cleaning").unwrap();
    let plan = flow_core::build_plan(&config, &active, scratch.path()).unwrap();
    let ctx = ExecutionContext::new(TrackerContext::new("p", "e"), scratch.path());

    let mut on_disk = PipelineDriver::new_with_stores(JsonlEventStore::new(dir.path()), InMemoryPipelineRepository::new());
    let disk_id = on_disk.run(&plan, &mut OkRunner, &ctx).unwrap();
    let mut in_memory = PipelineDriver::in_memory();
    let mem_id = in_memory.run(&plan, &mut OkRunner, &ctx).unwrap();

    assert_eq!(on_disk.event_variants(disk_id), in_memory.event_variants(mem_id));
    assert_eq!(on_disk.pipeline_fingerprint(disk_id), in_memory.pipeline_fingerprint(mem_id));
    assert!(dir.path().join(format!("{disk_id}.jsonl")).is_file());
}

#[test]
fn unwritable_event_log_stops_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    // un archivo regular donde debería ir el directorio de logs
    let blocked = dir.path().join("pipelines");
    std::fs::write(&blocked, b"not a directory").unwrap();

    let mut store = JsonlEventStore::new(&blocked);
    let err = store.append_kind(Uuid::new_v4(), PipelineEventKind::StepStarted { step_index: 0, step_id: "download".into() })
                   .unwrap_err();
    assert!(matches!(err, StoreError::Io(_)), "{err:?}");

    let config = ConfigTree::new(json!({
        "main": {"project_name": "p", "experiment_name": "e", "steps": "download"},
        "etl": {"sample": "sample1.csv"}
    })).unwrap();
    let active = ActiveSteps::parse("download").unwrap();
    let plan = flow_core::build_plan(&config, &active, scratch.path()).unwrap();
    let ctx = ExecutionContext::new(TrackerContext::new("p", "e"), scratch.path());

    let mut driver = PipelineDriver::new_with_stores(JsonlEventStore::new(&blocked), InMemoryPipelineRepository::new());
    let mut runner = CountingRunner { calls: 0 };
    let result = driver.run(&plan, &mut runner, &ctx);

    assert!(matches!(result, Err(CoreEngineError::EventLog(_))), "{result:?}");
    assert_eq!(runner.calls, 0);
    assert!(blocked.is_file());
}
