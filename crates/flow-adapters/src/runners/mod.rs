//! Implementaciones de `Runner`.

pub mod local;
pub mod mlflow;

pub use local::LocalRunner;
pub use mlflow::MlflowRunner;
