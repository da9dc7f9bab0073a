//! Referencias y versiones de artifacts.
//!
//! Un artifact es un archivo con nombre y versionado que vive en un
//! `ArtifactStore`. Los steps se pasan datos únicamente a través de
//! referencias `name:tag`:
//! - `tag` puede ser un alias (`latest`, `prod`, ...) o una versión `v<N>`.
//! - Una referencia sin `:` equivale a `name:latest`.
//! - El split se hace en el último `:` para tolerar nombres con `:`.
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// Alias que siempre apunta a la versión más reciente.
pub const LATEST: &str = "latest";
/// Alias asignado manualmente al modelo promovido a producción.
pub const PROD: &str = "prod";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub name: String,
    pub version: String,
}

impl ArtifactRef {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self { name: name.into(),
               version: version.into() }
    }

    pub fn latest(name: impl Into<String>) -> Self {
        Self::new(name, LATEST)
    }

    /// Índice numérico cuando la versión tiene la forma `v<N>`.
    pub fn version_index(&self) -> Option<u32> {
        self.version.strip_prefix('v').and_then(|n| n.parse().ok())
    }
}

impl FromStr for ArtifactRef {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, version) = s.rsplit_once(':').unwrap_or((s, LATEST));
        if name.trim().is_empty() || version.trim().is_empty() {
            return Err(StoreError::InvalidReference(s.to_string()));
        }
        Ok(Self::new(name, version))
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

/// Versión concreta almacenada de un artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactVersion {
    pub name: String,
    pub version: u32,
    pub digest: String, // blake3 del contenido
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub aliases: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ArtifactVersion {
    /// Identificador estable `name:v<N>` usado en el linaje de runs.
    pub fn id(&self) -> String {
        format!("{}:v{}", self.name, self.version)
    }

    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| a == alias)
    }
}

/// Insumos para publicar un artifact nuevo.
#[derive(Debug, Clone, Copy)]
pub struct NewArtifact<'a> {
    pub name: &'a str,
    pub kind: &'a str,
    pub description: &'a str,
    pub source: &'a Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_tag() {
        let r: ArtifactRef = "clean_sample.csv:prod".parse().unwrap();
        assert_eq!(r, ArtifactRef::new("clean_sample.csv", "prod"));
        assert_eq!(r.to_string(), "clean_sample.csv:prod");
    }

    #[test]
    fn bare_name_means_latest() {
        let r: ArtifactRef = "sample.csv".parse().unwrap();
        assert_eq!(r.version, LATEST);
    }

    #[test]
    fn splits_on_last_colon() {
        let r: ArtifactRef = "team:model:v3".parse().unwrap();
        assert_eq!(r.name, "team:model");
        assert_eq!(r.version_index(), Some(3));
    }

    #[test]
    fn rejects_empty_parts() {
        assert!(":latest".parse::<ArtifactRef>().is_err());
        assert!("sample.csv:".parse::<ArtifactRef>().is_err());
    }
}
