//! Árbol de configuración del pipeline.
//!
//! El árbol es un `serde_json::Value` cuya raíz es siempre un objeto. Las
//! secciones se deserializan a structs tipados sólo cuando un step activo
//! las necesita, de modo que la configuración de steps inactivos puede
//! faltar.
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::CoreEngineError;

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTree {
    root: Value,
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self { root: Value::Object(Map::new()) }
    }
}

impl ConfigTree {
    pub fn new(root: Value) -> Result<Self, CoreEngineError> {
        if !root.is_object() {
            return Err(CoreEngineError::invalid_config("<root>", "configuration root must be a mapping"));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Acceso por ruta con puntos (`basic_cleaning.filter_value`).
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(&self.root, |node, key| node.get(key))
    }

    /// Deserializa la sección `key` en un struct tipado.
    pub fn section<T: DeserializeOwned>(&self, key: &str) -> Result<T, CoreEngineError> {
        let value = self.get(key)
                        .filter(|v| !v.is_null())
                        .ok_or_else(|| CoreEngineError::MissingConfig(key.to_string()))?;
        serde_json::from_value(value.clone()).map_err(|e| CoreEngineError::invalid_config(key, e))
    }

    /// Fija `value` en `path`, creando los mapas intermedios que falten.
    pub fn set(&mut self, path: &str, value: Value) -> Result<(), CoreEngineError> {
        let keys: Vec<&str> = path.split('.').collect();
        if keys.iter().any(|k| k.trim().is_empty()) {
            return Err(CoreEngineError::invalid_config(path, "empty key segment"));
        }
        let (last, parents) = keys.split_last()
                                  .ok_or_else(|| CoreEngineError::invalid_config(path, "empty key"))?;
        let mut node = &mut self.root;
        for key in parents {
            let map = node.as_object_mut()
                          .ok_or_else(|| CoreEngineError::invalid_config(path, format!("'{key}' is under a scalar")))?;
            node = map.entry(key.to_string()).or_insert_with(|| Value::Object(Map::new()));
        }
        let map = node.as_object_mut()
                      .ok_or_else(|| CoreEngineError::invalid_config(path, "parent is not a mapping"))?;
        map.insert(last.to_string(), value);
        Ok(())
    }
}
