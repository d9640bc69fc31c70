//! Variable catalog with O(1) token lookup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One personalization variable offered by the host application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Literal token, braces included, e.g. `"{{Prénom}}"`.
    pub code: String,
    /// Human label displayed in the storage representation.
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Read-only lookup over the variables available in the current scope.
///
/// The lookup map is built once so transcoding a tree stays linear in the
/// number of text nodes.
#[derive(Debug, Clone, Default)]
pub struct VariableCatalog {
    by_code: HashMap<String, Variable>,
}

impl VariableCatalog {
    pub fn new(variables: Vec<Variable>) -> Self {
        let mut by_code = HashMap::with_capacity(variables.len());
        for variable in variables {
            by_code.insert(variable.code.clone(), variable);
        }
        Self { by_code }
    }

    pub fn get(&self, code: &str) -> Option<&Variable> {
        self.by_code.get(code)
    }

    /// Display label for a token: the catalog label when known, otherwise
    /// the token's inner content (between the braces), trimmed.
    pub fn label_for(&self, code: &str) -> String {
        match self.get(code) {
            Some(variable) => variable.label.clone(),
            None => code
                .trim_start_matches("{{")
                .trim_end_matches("}}")
                .trim()
                .to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
