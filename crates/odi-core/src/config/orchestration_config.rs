//! Parameter sweep definition: candidate values per parameter plus
//! cross-parameter constraints.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ConfigError;

/// Builder parameters that a sweep may vary.
///
/// Declaration order fixes the enumeration order of the cartesian product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SweepParameter {
    NumSegments,
    PcaMethod,
    MaxOutcomesPerComponent,
    MaxCrossLoading,
    MinPrimaryLoading,
    TopBoxThreshold,
    RandomSeed,
}

impl SweepParameter {
    pub fn name(self) -> &'static str {
        match self {
            Self::NumSegments => "num_segments",
            Self::PcaMethod => "pca_method",
            Self::MaxOutcomesPerComponent => "max_outcomes_per_component",
            Self::MaxCrossLoading => "max_cross_loading",
            Self::MinPrimaryLoading => "min_primary_loading",
            Self::TopBoxThreshold => "top_box_threshold",
            Self::RandomSeed => "random_seed",
        }
    }
}

impl fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SweepParameter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "num_segments" => Self::NumSegments,
            "pca_method" => Self::PcaMethod,
            "max_outcomes_per_component" => Self::MaxOutcomesPerComponent,
            "max_cross_loading" => Self::MaxCrossLoading,
            "min_primary_loading" => Self::MinPrimaryLoading,
            "top_box_threshold" => Self::TopBoxThreshold,
            "random_seed" | "random_state" => Self::RandomSeed,
            other => {
                return Err(ConfigError::validation(
                    "orchestration.parameters",
                    format!("unknown sweep parameter '{other}'"),
                ))
            }
        })
    }
}

impl Serialize for SweepParameter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for SweepParameter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A candidate value for a sweep parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; integers widen to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numbers compare numerically, strings lexically; mixed kinds are
    /// unordered.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            _ => self.as_f64()?.partial_cmp(&other.as_f64()?),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// One point of the sweep grid.
pub type Combination = BTreeMap<SweepParameter, ParamValue>;

/// Render a combination as `name=value` pairs in parameter order.
pub fn describe_combination(combination: &Combination) -> String {
    combination
        .iter()
        .map(|(p, v)| format!("{p}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    LessThan,
    GreaterThan,
    NotEqual,
}

/// Binary relation that a combination must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
    pub left: SweepParameter,
    pub right: SweepParameter,
}

impl Constraint {
    pub fn less_than(left: SweepParameter, right: SweepParameter) -> Self {
        Self {
            kind: ConstraintKind::LessThan,
            left,
            right,
        }
    }

    pub fn greater_than(left: SweepParameter, right: SweepParameter) -> Self {
        Self {
            kind: ConstraintKind::GreaterThan,
            left,
            right,
        }
    }

    pub fn not_equal(left: SweepParameter, right: SweepParameter) -> Self {
        Self {
            kind: ConstraintKind::NotEqual,
            left,
            right,
        }
    }

    /// True when both referenced parameters are present in `combination`.
    pub fn applies_to(&self, combination: &Combination) -> bool {
        combination.contains_key(&self.left) && combination.contains_key(&self.right)
    }

    /// Evaluate against a combination.
    ///
    /// A constraint naming a parameter the combination lacks is vacuously
    /// satisfied. Ordering relations over incomparable values fail.
    pub fn check(&self, combination: &Combination) -> bool {
        let (Some(left), Some(right)) =
            (combination.get(&self.left), combination.get(&self.right))
        else {
            return true;
        };
        let ordering = left.compare(right);
        match self.kind {
            ConstraintKind::LessThan => ordering == Some(Ordering::Less),
            ConstraintKind::GreaterThan => ordering == Some(Ordering::Greater),
            ConstraintKind::NotEqual => ordering != Some(Ordering::Equal),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.kind {
            ConstraintKind::LessThan => "<",
            ConstraintKind::GreaterThan => ">",
            ConstraintKind::NotEqual => "!=",
        };
        write!(f, "{} {op} {}", self.left, self.right)
    }
}

/// What the orchestrator does when one combination's fit fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the sweep and surface the failure.
    #[default]
    Abort,
    /// Record the failure and continue with the remaining combinations.
    Skip,
}

/// Sweep grid, constraints, and execution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationConfig {
    pub parameters: BTreeMap<SweepParameter, Vec<ParamValue>>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Worker count for parallel sweeps. `None` runs sequentially.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<usize>,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        let ints = |vs: &[i64]| vs.iter().map(|v| ParamValue::Int(*v)).collect::<Vec<_>>();
        let floats = |vs: &[f64]| vs.iter().map(|v| ParamValue::Float(*v)).collect::<Vec<_>>();

        let mut parameters = BTreeMap::new();
        parameters.insert(SweepParameter::NumSegments, ints(&[2, 3, 4]));
        parameters.insert(
            SweepParameter::MaxCrossLoading,
            floats(&[0.36, 0.40, 0.42, 0.46]),
        );
        parameters.insert(
            SweepParameter::MinPrimaryLoading,
            floats(&[0.40, 0.44, 0.48, 0.50]),
        );
        parameters.insert(SweepParameter::RandomSeed, ints(&[3, 6, 10, 12]));

        Self {
            parameters,
            constraints: vec![Constraint::less_than(
                SweepParameter::MaxCrossLoading,
                SweepParameter::MinPrimaryLoading,
            )],
            failure_policy: FailurePolicy::Abort,
            parallelism: None,
        }
    }
}

impl OrchestrationConfig {
    pub fn new(parameters: BTreeMap<SweepParameter, Vec<ParamValue>>) -> Self {
        Self {
            parameters,
            constraints: Vec::new(),
            failure_policy: FailurePolicy::Abort,
            parallelism: None,
        }
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_parallelism(mut self, workers: usize) -> Self {
        self.parallelism = Some(workers);
        self
    }

    /// Constraints that reference a parameter the sweep never varies.
    ///
    /// These pass every combination vacuously.
    pub fn inert_constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().filter(|c| {
            !self.parameters.contains_key(&c.left) || !self.parameters.contains_key(&c.right)
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((parameter, _)) = self.parameters.iter().find(|(_, vs)| vs.is_empty()) {
            return Err(ConfigError::validation(
                "orchestration.parameters",
                format!("{parameter} has no candidate values"),
            ));
        }
        if self.parallelism == Some(0) {
            return Err(ConfigError::validation(
                "orchestration.parallelism",
                "must be at least 1 when set",
            ));
        }
        Ok(())
    }
}
