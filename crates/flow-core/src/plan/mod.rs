//! Plan de ejecución: una `StepInvocation` por step activo, en orden de
//! catálogo, construida por completo antes de invocar nada. Así cualquier
//! error de configuración aparece al arrancar.

mod builder;
pub mod sections;

pub use builder::{build_invocation, build_plan};

use serde_json::{json, Map, Value};

use crate::hashing::hash_value;
use crate::step::{Step, StepInvocation};

#[derive(Debug, Clone, PartialEq)]
pub struct PipelinePlan {
    pub invocations: Vec<StepInvocation>,
    pub definition_hash: String,
}

impl PipelinePlan {
    /// Calcula el `definition_hash` sobre ids + params de cada invocación.
    pub fn new(invocations: Vec<StepInvocation>) -> Self {
        let shape: Vec<Value> = invocations.iter()
                                           .map(|inv| {
                                               let params: Map<String, Value> = inv.params.clone().into_iter().collect();
                                               json!({ "step": inv.step.id(), "params": params })
                                           })
                                           .collect();
        let definition_hash = hash_value(&Value::Array(shape));
        Self { invocations,
               definition_hash }
    }

    pub fn len(&self) -> usize {
        self.invocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invocations.is_empty()
    }

    pub fn step_ids(&self) -> Vec<String> {
        self.invocations.iter().map(|inv| inv.step.id().to_string()).collect()
    }

    pub fn get(&self, step: Step) -> Option<&StepInvocation> {
        self.invocations.iter().find(|inv| inv.step == step)
    }
}
