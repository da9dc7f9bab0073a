use std::path::PathBuf;

use crate::errors::StoreError;
use crate::model::{ArtifactRef, ArtifactVersion, NewArtifact};

/// Almacenamiento versionado de artifacts por nombre.
///
/// Invariantes esperadas de toda implementación:
/// - `latest` apunta siempre a la versión más reciente.
/// - Un alias pertenece como mucho a una versión de cada nombre.
/// - Publicar contenido idéntico a `latest` no crea una versión nueva.
pub trait ArtifactStore {
    /// Resuelve una referencia (alias o `v<N>`) a una versión concreta.
    fn resolve(&self, reference: &ArtifactRef) -> Result<ArtifactVersion, StoreError>;

    /// Ruta local del archivo de una versión.
    fn local_path(&self, version: &ArtifactVersion) -> Result<PathBuf, StoreError>;

    /// Publica `artifact.source` como nueva versión de `artifact.name`.
    fn publish(&mut self, artifact: NewArtifact<'_>) -> Result<ArtifactVersion, StoreError>;

    /// Asigna `alias` a la versión referenciada, quitándolo de cualquier otra.
    fn add_alias(&mut self, reference: &ArtifactRef, alias: &str) -> Result<ArtifactVersion, StoreError>;

    /// Versiones de un nombre, en orden ascendente.
    fn versions(&self, name: &str) -> Result<Vec<ArtifactVersion>, StoreError>;

    /// `resolve` + `local_path`.
    fn fetch(&self, reference: &ArtifactRef) -> Result<(ArtifactVersion, PathBuf), StoreError> {
        let version = self.resolve(reference)?;
        let path = self.local_path(&version)?;
        Ok((version, path))
    }
}
