use crate::errors::CoreEngineError;

/// Resultado de invocar un step a través de un `Runner`.
#[derive(Debug, Clone, PartialEq)]
pub enum StepRunResult {
    /// `run_id` es `None` cuando el runner no conoce el id del run remoto.
    Success { run_id: Option<String> },
    Failure { error: CoreEngineError },
}

impl StepRunResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn failure(step: &str, reason: impl ToString) -> Self {
        Self::Failure { error: CoreEngineError::StepFailed { step: step.to_string(),
                                                             reason: reason.to_string() } }
    }
}
