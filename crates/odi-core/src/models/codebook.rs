//! Survey codebook: how demographic answer codes map to labels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Answer kind of a dimension. Only categorical dimensions are summarised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionKind {
    Categorical,
    Text,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    /// Attribute key in respondent records, e.g. `D1`.
    pub id: String,
    /// Display name, used as the breakdown key.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub kind: DimensionKind,
    /// Answer code to label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<BTreeMap<String, String>>,
    /// Codes meaning "no answer"; excluded before percentages are taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_codes: Option<Vec<String>>,
}

impl Dimension {
    pub fn is_categorical(&self) -> bool {
        self.kind == DimensionKind::Categorical
    }

    pub fn label(&self, code: &str) -> Option<&str> {
        self.options.as_ref()?.get(code).map(String::as_str)
    }

    pub fn is_missing_code(&self, code: &str) -> bool {
        self.missing_codes
            .as_ref()
            .is_some_and(|codes| codes.iter().any(|c| c == code))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Codebook {
    dimensions: Vec<Dimension>,
}

impl Codebook {
    pub fn new(dimensions: Vec<Dimension>) -> Self {
        Self { dimensions }
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    /// Categorical dimensions in codebook order.
    pub fn categorical(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.iter().filter(|d| d.is_categorical())
    }
}
