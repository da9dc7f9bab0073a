//! `FsArtifactStore`: artifacts versionados en disco.
//!
//! Cada nombre tiene un directorio con `manifest.json` (lista de versiones y
//! alias) y un subdirectorio `v<N>/` por versión con una copia del archivo
//! publicado. El manifest se reescribe completo vía archivo temporal +
//! `rename` para no dejarlo a medio escribir.
//!
//! Reglas:
//! - Las versiones empiezan en `v0` y son crecientes.
//! - Publicar un archivo con el mismo digest que `latest` devuelve la versión
//!   existente sin copiar nada.
//! - `latest` se mueve a cada versión nueva; el resto de alias sólo cambia
//!   con `add_alias`.
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use flow_core::hashing::hash_reader;
use flow_core::model::LATEST;
use flow_core::{ArtifactRef, ArtifactStore, ArtifactVersion, NewArtifact, StoreError};

use crate::config::StoreConfig;
use crate::error::PersistenceError;

const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Manifest {
    name: String,
    versions: Vec<ArtifactVersion>,
}

impl Manifest {
    fn empty(name: &str) -> Self {
        Self { name: name.to_string(),
               versions: Vec::new() }
    }

    fn latest(&self) -> Option<&ArtifactVersion> {
        self.versions.iter().find(|v| v.has_alias(LATEST))
    }

    fn position(&self, reference: &ArtifactRef) -> Option<usize> {
        match reference.version_index() {
            Some(n) => self.versions.iter().position(|v| v.version == n),
            None => self.versions.iter().position(|v| v.has_alias(&reference.version)),
        }
    }

    fn next_version(&self) -> u32 {
        self.versions.iter().map(|v| v.version + 1).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(cfg: &StoreConfig) -> Self {
        Self::new(cfg.artifacts_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn artifact_dir(&self, name: &str) -> Result<PathBuf, PersistenceError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    fn version_path(&self, name: &str, version: u32) -> Result<PathBuf, PersistenceError> {
        Ok(self.artifact_dir(name)?.join(format!("v{version}")).join(name))
    }

    fn load_manifest(&self, name: &str) -> Result<Option<Manifest>, PersistenceError> {
        let path = self.artifact_dir(name)?.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let manifest: Manifest = serde_json::from_slice(&fs::read(&path)?)?;
        if manifest.name != name {
            return Err(PersistenceError::Corrupt(format!("{} declares name '{}'", path.display(), manifest.name)));
        }
        Ok(Some(manifest))
    }

    fn save_manifest(&self, manifest: &Manifest) -> Result<(), PersistenceError> {
        let dir = self.artifact_dir(&manifest.name)?;
        fs::create_dir_all(&dir)?;
        let tmp = dir.join(format!("{MANIFEST_FILE}.tmp"));
        fs::write(&tmp, serde_json::to_vec_pretty(manifest)?)?;
        fs::rename(&tmp, dir.join(MANIFEST_FILE))?;
        Ok(())
    }

    fn require_manifest(&self, name: &str) -> Result<Manifest, PersistenceError> {
        self.load_manifest(name)?.ok_or_else(|| PersistenceError::NotFound(name.to_string()))
    }

    fn publish_inner(&self, artifact: NewArtifact<'_>) -> Result<ArtifactVersion, PersistenceError> {
        let digest = hash_reader(File::open(artifact.source)?)?;
        let mut manifest = self.load_manifest(artifact.name)?
                               .unwrap_or_else(|| Manifest::empty(artifact.name));
        if let Some(latest) = manifest.latest() {
            if latest.digest == digest {
                debug!("publish:dedup artifact={} digest={digest}", latest.id());
                return Ok(latest.clone());
            }
        }
        let version = manifest.next_version();
        let target = self.version_path(artifact.name, version)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(artifact.source, &target)?;
        for existing in manifest.versions.iter_mut() {
            existing.aliases.retain(|a| a != LATEST);
        }
        let created = ArtifactVersion { name: artifact.name.to_string(),
                                        version,
                                        digest,
                                        kind: artifact.kind.to_string(),
                                        description: artifact.description.to_string(),
                                        aliases: vec![LATEST.to_string()],
                                        created_at: Utc::now() };
        manifest.versions.push(created.clone());
        self.save_manifest(&manifest)?;
        info!("publish:ok artifact={} type={}", created.id(), created.kind);
        Ok(created)
    }

    fn add_alias_inner(&self, reference: &ArtifactRef, alias: &str) -> Result<ArtifactVersion, PersistenceError> {
        if alias.trim().is_empty() || alias.contains(':') {
            return Err(PersistenceError::InvalidName(alias.to_string()));
        }
        let mut manifest = self.require_manifest(&reference.name)?;
        let idx = manifest.position(reference)
                          .ok_or_else(|| PersistenceError::NotFound(reference.to_string()))?;
        for (i, version) in manifest.versions.iter_mut().enumerate() {
            if i == idx {
                if !version.has_alias(alias) {
                    version.aliases.push(alias.to_string());
                }
            } else {
                version.aliases.retain(|a| a != alias);
            }
        }
        self.save_manifest(&manifest)?;
        let updated = manifest.versions[idx].clone();
        info!("alias:ok artifact={} alias={alias}", updated.id());
        Ok(updated)
    }
}

fn validate_name(name: &str) -> Result<(), PersistenceError> {
    let invalid = name.trim().is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\\');
    if invalid {
        return Err(PersistenceError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl ArtifactStore for FsArtifactStore {
    fn resolve(&self, reference: &ArtifactRef) -> Result<ArtifactVersion, StoreError> {
        let manifest = self.require_manifest(&reference.name)?;
        let idx = manifest.position(reference)
                          .ok_or_else(|| StoreError::ArtifactNotFound(reference.to_string()))?;
        Ok(manifest.versions[idx].clone())
    }

    fn local_path(&self, version: &ArtifactVersion) -> Result<PathBuf, StoreError> {
        let path = self.version_path(&version.name, version.version)?;
        if !path.is_file() {
            return Err(StoreError::ArtifactNotFound(format!("{} (missing file {})", version.id(), path.display())));
        }
        Ok(path)
    }

    fn publish(&mut self, artifact: NewArtifact<'_>) -> Result<ArtifactVersion, StoreError> {
        Ok(self.publish_inner(artifact)?)
    }

    fn add_alias(&mut self, reference: &ArtifactRef, alias: &str) -> Result<ArtifactVersion, StoreError> {
        Ok(self.add_alias_inner(reference, alias)?)
    }

    fn versions(&self, name: &str) -> Result<Vec<ArtifactVersion>, StoreError> {
        let mut versions = self.require_manifest(name)?.versions;
        versions.sort_by_key(|v| v.version);
        Ok(versions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_like_names() {
        assert!(validate_name("../etc").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name("team:model").is_ok());
    }

    #[test]
    fn next_version_starts_at_zero() {
        assert_eq!(Manifest::empty("x").next_version(), 0);
    }
}
