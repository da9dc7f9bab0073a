//! Selección de steps activos a partir de `main.steps`.
use std::collections::BTreeSet;

use crate::errors::CoreEngineError;

use super::Step;

/// Valor de `main.steps` que selecciona el conjunto por defecto.
pub const ALL_STEPS: &str = "all";

/// Subconjunto de steps a ejecutar. Itera siempre en orden de catálogo,
/// independientemente del orden en que se listaron.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSteps {
    steps: BTreeSet<Step>,
}

impl ActiveSteps {
    pub fn all() -> Self {
        Self { steps: Step::DEFAULT.into_iter().collect() }
    }

    /// `"all"` o una lista separada por comas de ids del catálogo.
    pub fn parse(selection: &str) -> Result<Self, CoreEngineError> {
        let selection = selection.trim();
        if selection.is_empty() {
            return Err(CoreEngineError::EmptySelection);
        }
        if selection == ALL_STEPS {
            return Ok(Self::all());
        }
        let mut steps = BTreeSet::new();
        for raw in selection.split(',') {
            let name = raw.trim();
            if name.is_empty() {
                return Err(CoreEngineError::invalid_config("main.steps", format!("empty step name in '{selection}'")));
            }
            steps.insert(name.parse::<Step>()?);
        }
        Ok(Self { steps })
    }

    pub fn contains(&self, step: Step) -> bool {
        self.steps.contains(&step)
    }

    pub fn iter(&self) -> impl Iterator<Item = Step> + '_ {
        self.steps.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps fuera del conjunto por defecto (opt-in manual).
    pub fn manual_steps(&self) -> Vec<Step> {
        self.iter().filter(|s| !s.is_default()).collect()
    }
}

impl FromIterator<Step> for ActiveSteps {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        Self { steps: iter.into_iter().collect() }
    }
}
