//! Carga de configuración del store desde variables de entorno.
//! Usa la convención `PIPEFLOW_HOME`; sin ella se usa `.pipeflow` relativo
//! al directorio de trabajo.

use std::env;
use std::path::{Path, PathBuf};

use dotenvy::dotenv;
use once_cell::sync::Lazy;

pub const HOME_ENV: &str = "PIPEFLOW_HOME";
pub const DEFAULT_HOME: &str = ".pipeflow";

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub home: PathBuf,
}

impl StoreConfig {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let home = env::var(HOME_ENV).ok()
                                     .filter(|v| !v.trim().is_empty())
                                     .unwrap_or_else(|| DEFAULT_HOME.to_string());
        Self::new(home)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.home.join("artifacts")
    }

    pub fn runs_dir(&self) -> PathBuf {
        self.home.join("runs")
    }

    pub fn pipelines_dir(&self) -> PathBuf {
        self.home.join("pipelines")
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
