//! Capacidad de invocación de steps.
//!
//! El driver no conoce la plataforma que ejecuta los steps: sólo entrega un
//! `StepInvocation` y espera, bloqueando, un `StepRunResult`.

use crate::model::ExecutionContext;
use crate::step::{StepInvocation, StepRunResult};

pub trait Runner {
    /// Nombre corto para logs.
    fn name(&self) -> &str;

    /// Ejecuta el step hasta completarlo. No reintenta.
    fn invoke(&mut self, invocation: &StepInvocation, ctx: &ExecutionContext) -> StepRunResult;
}
