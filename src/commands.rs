//! Operaciones sobre el store de artifacts expuestas por la CLI.
use log::info;

use flow_core::{ArtifactRef, ArtifactStore, ArtifactVersion};
use flow_persistence::{FsArtifactStore, StoreConfig};

use crate::errors::AppError;

pub fn list_versions(store: &StoreConfig, name: &str) -> Result<Vec<ArtifactVersion>, AppError> {
    Ok(FsArtifactStore::from_config(store).versions(name)?)
}

/// Asigna `alias` a la versión referenciada (p. ej. `model_export:v3 prod`).
pub fn promote(store: &StoreConfig, reference: &str, alias: &str) -> Result<ArtifactVersion, AppError> {
    let reference: ArtifactRef = reference.parse()?;
    let version = FsArtifactStore::from_config(store).add_alias(&reference, alias)?;
    info!("promote:ok artifact={} alias={alias}", version.id());
    Ok(version)
}

/// Línea de listado: `name:vN  type  digest[..12]  [aliases]  created_at`.
pub fn format_version(v: &ArtifactVersion) -> String {
    let digest = v.digest.get(..12).unwrap_or(&v.digest);
    format!("{}\t{}\t{}\t[{}]\t{}",
            v.id(),
            v.kind,
            digest,
            v.aliases.join(","),
            v.created_at.to_rfc3339())
}
