//! Constantes del driver.
//!
//! `ENGINE_VERSION` participa en el cálculo de fingerprints: un cambio de
//! versión invalida los fingerprints previos aunque el plan no cambie.

/// Versión lógica del driver incluida en cada fingerprint.
pub const ENGINE_VERSION: &str = "P1.0";

/// Nombre del archivo con los hiperparámetros del random forest que se
/// escribe en el directorio temporal antes del step de entrenamiento.
pub const RF_CONFIG_FILE: &str = "rf_config.json";
