//! Configuración del pipeline.
//!
//! El archivo es YAML y se carga como árbol `serde_json::Value` dentro de un
//! `ConfigTree`; cada step deserializa sus secciones tipadas al construir el
//! plan. Los overrides de línea de comandos (`main.steps=download`) se
//! aplican sobre el árbol antes de construir nada.
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use serde_json::Value;

use flow_core::ConfigTree;

use crate::errors::AppError;

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

pub fn load_config(path: &Path) -> Result<ConfigTree, AppError> {
    let text = fs::read_to_string(path).map_err(|source| AppError::ConfigRead { path: path.display().to_string(),
                                                                                 source })?;
    parse_config_named(&text, &path.display().to_string())
}

pub fn parse_config(text: &str) -> Result<ConfigTree, AppError> {
    parse_config_named(text, "<inline>")
}

fn parse_config_named(text: &str, origin: &str) -> Result<ConfigTree, AppError> {
    let root: Value = serde_yaml::from_str(text).map_err(|e| AppError::ConfigParse { path: origin.to_string(),
                                                                                      reason: e.to_string() })?;
    Ok(ConfigTree::new(root)?)
}

/// Override `clave.ruta=valor`; el valor se interpreta como escalar YAML
/// (`10` es número, `true` booleano, el resto texto).
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    pub path: String,
    pub value: Value,
}

impl FromStr for Override {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, raw) = s.split_once('=').ok_or_else(|| AppError::Override(s.to_string()))?;
        let path = path.trim();
        if path.is_empty() {
            return Err(AppError::Override(s.to_string()));
        }
        let value = if raw.trim().is_empty() {
            Value::String(raw.to_string())
        } else {
            match serde_yaml::from_str::<Value>(raw) {
                Ok(v @ (Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_))) => v,
                // listas/mapas o YAML inválido: se toma el texto literal
                _ => Value::String(raw.to_string()),
            }
        };
        Ok(Self { path: path.to_string(),
                  value })
    }
}

pub fn apply_overrides(config: &mut ConfigTree, overrides: &[Override]) -> Result<(), AppError> {
    for o in overrides {
        debug!("config:override path={} value={}", o.path, o.value);
        config.set(&o.path, o.value.clone())?;
    }
    Ok(())
}
