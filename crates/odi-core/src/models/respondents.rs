//! Respondent records carrying free-form demographic attributes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::RespondentId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Respondent {
    pub respondent_id: RespondentId,
    /// Every other field of the record, keyed by codebook dimension id.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl Respondent {
    /// Answer code for `key`, normalised so `2`, `2.0` and `"2"` agree.
    /// `None` when the attribute is absent or null.
    pub fn code(&self, key: &str) -> Option<String> {
        match self.attributes.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => i.to_string(),
                (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => {
                    format!("{}", f as i64)
                }
                _ => n.to_string(),
            }),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Respondents {
    respondents: Vec<Respondent>,
}

impl Respondents {
    pub fn new(respondents: Vec<Respondent>) -> Self {
        Self { respondents }
    }

    pub fn len(&self) -> usize {
        self.respondents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.respondents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Respondent> {
        self.respondents.iter()
    }

    pub fn get(&self, id: RespondentId) -> Option<&Respondent> {
        self.respondents.iter().find(|r| r.respondent_id == id)
    }

    /// Whether any respondent carries `key`.
    pub fn has_attribute(&self, key: &str) -> bool {
        self.respondents
            .iter()
            .any(|r| r.attributes.contains_key(key))
    }
}
