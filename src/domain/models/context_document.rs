use serde::{Deserialize, Serialize};

/// Reference text supplied to the model on every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDocument {
    text: String,
    unit_count: usize,
}

impl ContextDocument {
    pub fn new(text: impl Into<String>, unit_count: usize) -> Self {
        Self {
            text: text.into(),
            unit_count,
        }
    }

    /// Joins per-row text units with newlines.
    pub fn from_units(units: Vec<String>) -> Self {
        let unit_count = units.len();
        Self {
            text: units.join("\n"),
            unit_count,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn unit_count(&self) -> usize {
        self.unit_count
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
