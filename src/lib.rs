//! pipeflow
//!
//! Orquestador de pipelines de datos/ML guiado por configuración:
//! - `config`: carga del YAML y overrides `clave.ruta=valor`.
//! - `pipeline`: arma el plan de steps activos y lo ejecuta con el runner
//!   elegido; también ejecuta steps nativos sueltos.
//! - `commands`: operaciones sobre el store de artifacts (listar, promover).
//! - `errors`: error de aplicación y su código de salida.

pub mod commands;
pub mod config;
pub mod errors;
pub mod pipeline;

pub use config::{apply_overrides, load_config, parse_config, Override, DEFAULT_CONFIG_FILE};
pub use errors::AppError;
pub use pipeline::{go, run_local_step, GoOptions, RunnerKind};
