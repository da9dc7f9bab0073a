use std::path::Path;

use log::debug;
use serde_json::{json, Value};

use crate::constants::RF_CONFIG_FILE;
use crate::errors::CoreEngineError;
use crate::model::{ArtifactRef, ConfigTree, PROD};
use crate::step::{ActiveSteps, Attachment, Params, Step, StepInvocation};

use super::sections::{BasicCleaningSection, CleanedArtifactSection, DataCheckSection, DataSplitSection, EtlSection,
                      ModelOutputSection, ModelingSection};
use super::PipelinePlan;

/// Artifacts con nombre fijo producidos por los componentes externos.
const RAW_SAMPLE: &str = "sample.csv";
const TRAIN_DATA: &str = "train.csv";
const VALIDATION_DATA: &str = "validation.csv";
const TEST_DATA: &str = "test.csv";

/// Construye el plan completo para los steps activos.
pub fn build_plan(config: &ConfigTree, active: &ActiveSteps, scratch_dir: &Path) -> Result<PipelinePlan, CoreEngineError> {
    if active.is_empty() {
        return Err(CoreEngineError::EmptySelection);
    }
    let invocations = active.iter()
                            .map(|step| build_invocation(step, config, scratch_dir))
                            .collect::<Result<Vec<_>, _>>()?;
    let plan = PipelinePlan::new(invocations);
    debug!("plan:built steps={:?} definition_hash={}", plan.step_ids(), plan.definition_hash);
    Ok(plan)
}

fn params<const N: usize>(pairs: [(&str, Value); N]) -> Params {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn latest(name: &str) -> Value {
    Value::String(ArtifactRef::latest(name).to_string())
}

/// Params (y adjuntos) de un step a partir de la configuración.
pub fn build_invocation(step: Step, config: &ConfigTree, scratch_dir: &Path) -> Result<StepInvocation, CoreEngineError> {
    let invocation = match step {
        Step::Download => {
            let etl: EtlSection = config.section("etl")?;
            StepInvocation::new(step,
                                params([("sample", json!(etl.sample)),
                                        ("artifact_name", json!(RAW_SAMPLE)),
                                        ("artifact_type", json!("raw_data")),
                                        ("artifact_description", json!("Raw file as downloaded"))]))
        }
        Step::BasicCleaning => {
            let bc: BasicCleaningSection = config.section("basic_cleaning")?;
            StepInvocation::new(step,
                                params([("input_artifact", latest(RAW_SAMPLE)),
                                        ("filter_column", json!(bc.filter_column)),
                                        ("filter_value", json!(bc.filter_value)),
                                        ("output_artifact", json!(bc.output_artifact)),
                                        ("output_type", json!(bc.output_type)),
                                        ("output_description", json!(bc.output_description))]))
        }
        Step::DataCheck => {
            let cleaned: CleanedArtifactSection = config.section("basic_cleaning")?;
            let dc: DataCheckSection = config.section("data_check")?;
            StepInvocation::new(step,
                                params([("input_artifact", latest(&cleaned.output_artifact)),
                                        ("ref_artifact", json!(dc.ref_artifact)),
                                        ("kl_threshold", json!(dc.kl_threshold))]))
        }
        Step::DataSplit => {
            let cleaned: CleanedArtifactSection = config.section("basic_cleaning")?;
            let ds: DataSplitSection = config.section("data_split")?;
            StepInvocation::new(step,
                                params([("input_artifact", latest(&cleaned.output_artifact)),
                                        ("test_size", json!(ds.test_size)),
                                        ("random_seed", json!(ds.random_seed)),
                                        ("stratify_by", json!(ds.stratify_by))]))
        }
        Step::TrainRandomForest => {
            let modeling: ModelingSection = config.section("modeling")?;
            let rf_config = scratch_dir.join(RF_CONFIG_FILE);
            StepInvocation::new(step,
                                params([("train_data", latest(TRAIN_DATA)),
                                        ("validation_data", latest(VALIDATION_DATA)),
                                        ("rf_config", json!(rf_config.to_string_lossy())),
                                        ("max_tfidf_features", json!(modeling.max_tfidf_features)),
                                        ("output_artifact", json!(modeling.output_artifact)),
                                        ("output_type", json!(modeling.output_type)),
                                        ("output_description", json!(modeling.output_description))]))
                .with_attachment(Attachment { path: rf_config,
                                              contents: Value::Object(modeling.random_forest) })
        }
        Step::TestRegressionModel => {
            let model: ModelOutputSection = config.section("modeling")?;
            StepInvocation::new(step,
                                params([("mlflow_model",
                                         Value::String(ArtifactRef::new(model.output_artifact, PROD).to_string())),
                                        ("test_data", latest(TEST_DATA))]))
        }
    };
    Ok(invocation)
}
