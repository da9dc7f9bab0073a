use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::Step;

/// Mapeo plano clave → escalar, en el orden en que se construyó.
pub type Params = IndexMap<String, Value>;

/// Archivo que debe existir antes de invocar el step (p.ej. `rf_config.json`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub path: PathBuf,
    pub contents: Value,
}

/// Par (step, params) entregado al `Runner`. No tiene estado propio más
/// allá de lo que devuelva el runner.
#[derive(Debug, Clone, PartialEq)]
pub struct StepInvocation {
    pub step: Step,
    pub params: Params,
    pub attachments: Vec<Attachment>,
}

impl StepInvocation {
    pub fn new(step: Step, params: Params) -> Self {
        Self { step,
               params,
               attachments: Vec::new() }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Params como pares de strings, listos para una línea de comandos.
    pub fn rendered_params(&self) -> Vec<(String, String)> {
        self.params.iter().map(|(k, v)| (k.clone(), render_param(v))).collect()
    }
}

/// Los strings se pasan tal cual; el resto con su forma JSON.
pub fn render_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn render_keeps_strings_raw() {
        assert_eq!(render_param(&json!("sample.csv:latest")), "sample.csv:latest");
        assert_eq!(render_param(&json!(0.3)), "0.3");
        assert_eq!(render_param(&json!(42)), "42");
        assert_eq!(render_param(&json!(true)), "true");
    }

    #[test]
    fn rendered_params_keep_insertion_order() {
        let mut params = Params::new();
        params.insert("z".into(), json!(1));
        params.insert("a".into(), json!("x"));
        let inv = StepInvocation::new(Step::DataSplit, params);
        let keys: Vec<String> = inv.rendered_params().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }
}
