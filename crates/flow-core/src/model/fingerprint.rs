use serde::Serialize;
use serde_json::Value;

/// Insumos para calcular el fingerprint de un step.
/// NO es el fingerprint final (string hash) sino el modelo previo a canonicalizar.
#[derive(Serialize)]
pub struct StepFingerprintInput<'a> {
    pub engine_version: &'a str,
    pub definition_hash: &'a str,
    pub step_index: usize,
    pub step_id: &'a str,
    pub params: &'a Value,
}
