//! Definiciones relacionadas a Steps.
//!
//! El catálogo de steps es fijo y ordenado. Este módulo define:
//! - `Step`: el catálogo y su orden canónico.
//! - `ActiveSteps`: el subconjunto seleccionado para una invocación.
//! - `StepInvocation` y `Params`: lo que se entrega a un `Runner`.
//! - `StepRunResult`: éxito/fallo de una invocación.
//! - `LocalStep`: contrato para steps ejecutados dentro del proceso.

pub mod catalog;
pub mod definition;
pub mod invocation;
mod run_result;
pub mod selection;
mod status;

pub use catalog::Step;
pub use definition::{LocalStep, StepEnv};
pub use invocation::{render_param, Attachment, Params, StepInvocation};
pub use run_result::StepRunResult;
pub use selection::{ActiveSteps, ALL_STEPS};
pub use status::StepStatus;
