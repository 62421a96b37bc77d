//! Segment Builder parameters and typed sweep overrides.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::orchestration_config::{Combination, ParamValue, SweepParameter};
use crate::constants::{DEFAULT_MIN_RESPONDENTS_PER_SEGMENT, RATING_MAX, RATING_MIN};
use crate::errors::ConfigError;

/// Clustering algorithm. Only k-means is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusteringMethod {
    #[default]
    Kmeans,
}

impl ClusteringMethod {
    pub fn name(self) -> &'static str {
        match self {
            Self::Kmeans => "kmeans",
        }
    }
}

impl fmt::Display for ClusteringMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rule for choosing how many principal components to retain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PcaMethod {
    /// Count eigenvalues strictly above 1.0.
    #[default]
    Kaiser,
    /// Smallest count whose cumulative explained-variance ratio reaches 0.80.
    VarianceThreshold,
}

impl PcaMethod {
    pub fn name(self) -> &'static str {
        match self {
            Self::Kaiser => "kaiser",
            Self::VarianceThreshold => "variance_threshold",
        }
    }
}

impl fmt::Display for PcaMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PcaMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kaiser" => Ok(Self::Kaiser),
            "variance_threshold" => Ok(Self::VarianceThreshold),
            other => Err(ConfigError::validation(
                "pca_method",
                format!("unknown method '{other}', expected kaiser or variance_threshold"),
            )),
        }
    }
}

/// Parameters of one segmentation fit. Immutable once handed to the builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentBuilderConfig {
    pub num_segments: usize,
    #[serde(alias = "segment_method")]
    pub clustering_method: ClusteringMethod,
    pub pca_method: PcaMethod,
    #[serde(alias = "random_state")]
    pub random_seed: u64,
    pub max_outcomes_per_component: usize,
    pub max_cross_loading: f64,
    pub min_primary_loading: f64,
    pub top_box_threshold: u8,
    pub min_respondents_per_segment: usize,
    /// Fail the fit instead of warning when the sample is below the
    /// per-segment minimum.
    pub strict_preflight: bool,
}

impl Default for SegmentBuilderConfig {
    fn default() -> Self {
        Self {
            num_segments: 3,
            clustering_method: ClusteringMethod::Kmeans,
            pca_method: PcaMethod::Kaiser,
            random_seed: 10,
            max_outcomes_per_component: 1,
            max_cross_loading: 0.30,
            min_primary_loading: 0.35,
            top_box_threshold: 4,
            min_respondents_per_segment: DEFAULT_MIN_RESPONDENTS_PER_SEGMENT,
            strict_preflight: false,
        }
    }
}

impl SegmentBuilderConfig {
    pub fn with_num_segments(mut self, num_segments: usize) -> Self {
        self.num_segments = num_segments;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_pca_method(mut self, method: PcaMethod) -> Self {
        self.pca_method = method;
        self
    }

    pub fn with_loading_thresholds(mut self, max_cross: f64, min_primary: f64) -> Self {
        self.max_cross_loading = max_cross;
        self.min_primary_loading = min_primary;
        self
    }

    pub fn with_strict_preflight(mut self, strict: bool) -> Self {
        self.strict_preflight = strict;
        self
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_segments < 1 {
            return Err(ConfigError::validation("num_segments", "must be at least 1"));
        }
        if self.max_outcomes_per_component < 1 {
            return Err(ConfigError::validation(
                "max_outcomes_per_component",
                "must be at least 1",
            ));
        }
        let (cross, primary) = (self.max_cross_loading, self.min_primary_loading);
        if !cross.is_finite() || !primary.is_finite() {
            return Err(ConfigError::validation(
                "max_cross_loading",
                "loading thresholds must be finite",
            ));
        }
        if cross < 0.0 {
            return Err(ConfigError::validation("max_cross_loading", "must be non-negative"));
        }
        if cross >= primary {
            return Err(ConfigError::validation(
                "max_cross_loading",
                format!("must be below min_primary_loading ({cross} >= {primary})"),
            ));
        }
        if primary > 1.0 {
            return Err(ConfigError::validation("min_primary_loading", "must not exceed 1.0"));
        }
        if !(RATING_MIN..=RATING_MAX).contains(&self.top_box_threshold) {
            return Err(ConfigError::validation(
                "top_box_threshold",
                format!("must be in [1, 5], got {}", self.top_box_threshold),
            ));
        }
        Ok(())
    }

    /// Overwrite one field from a sweep value, checking the value's type.
    pub fn apply_override(
        &mut self,
        parameter: SweepParameter,
        value: &ParamValue,
    ) -> Result<(), ConfigError> {
        match parameter {
            SweepParameter::NumSegments => self.num_segments = expect_count(parameter, value)?,
            SweepParameter::PcaMethod => {
                let name = value.as_str().ok_or_else(|| mismatch(parameter, value, "a string"))?;
                self.pca_method = name.parse().map_err(|_| ConfigError::InvalidOverride {
                    parameter: parameter.name().to_string(),
                    message: format!("unknown PCA method '{name}'"),
                })?;
            }
            SweepParameter::RandomSeed => {
                self.random_seed = value
                    .as_i64()
                    .and_then(|v| u64::try_from(v).ok())
                    .ok_or_else(|| mismatch(parameter, value, "a non-negative integer"))?;
            }
            SweepParameter::MaxOutcomesPerComponent => {
                self.max_outcomes_per_component = expect_count(parameter, value)?;
            }
            SweepParameter::MaxCrossLoading => {
                self.max_cross_loading =
                    value.as_f64().ok_or_else(|| mismatch(parameter, value, "a number"))?;
            }
            SweepParameter::MinPrimaryLoading => {
                self.min_primary_loading =
                    value.as_f64().ok_or_else(|| mismatch(parameter, value, "a number"))?;
            }
            SweepParameter::TopBoxThreshold => {
                self.top_box_threshold = value
                    .as_i64()
                    .and_then(|v| u8::try_from(v).ok())
                    .ok_or_else(|| mismatch(parameter, value, "an integer rating"))?;
            }
        }
        Ok(())
    }

    /// Clone this config, apply every override of a sweep combination, and
    /// validate the result.
    pub fn with_overrides(&self, combination: &Combination) -> Result<Self, ConfigError> {
        let mut config = self.clone();
        for (parameter, value) in combination {
            config.apply_override(*parameter, value)?;
        }
        config.validate()?;
        Ok(config)
    }
}

fn expect_count(parameter: SweepParameter, value: &ParamValue) -> Result<usize, ConfigError> {
    value
        .as_i64()
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| mismatch(parameter, value, "a non-negative integer"))
}

fn mismatch(parameter: SweepParameter, value: &ParamValue, expected: &str) -> ConfigError {
    ConfigError::InvalidOverride {
        parameter: parameter.name().to_string(),
        message: format!("expected {expected}, got {value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SegmentBuilderConfig::default();
        assert_eq!(config.num_segments, 3);
        assert_eq!(config.random_seed, 10);
        assert_eq!(config.top_box_threshold, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cross_loading_must_be_below_primary() {
        let config = SegmentBuilderConfig::default().with_loading_thresholds(0.5, 0.4);
        assert!(config.validate().is_err());
        let equal = SegmentBuilderConfig::default().with_loading_thresholds(0.4, 0.4);
        assert!(equal.validate().is_err());
    }

    #[test]
    fn test_negative_cross_loading_rejected() {
        let config = SegmentBuilderConfig::default().with_loading_thresholds(-0.1, 0.4);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_top_box_threshold_range() {
        let mut config = SegmentBuilderConfig::default();
        config.top_box_threshold = 6;
        assert!(config.validate().is_err());
        config.top_box_threshold = 0;
        assert!(config.validate().is_err());
        config.top_box_threshold = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_override_type_checks() {
        let mut config = SegmentBuilderConfig::default();
        config
            .apply_override(SweepParameter::NumSegments, &ParamValue::Int(4))
            .unwrap();
        assert_eq!(config.num_segments, 4);
        config
            .apply_override(SweepParameter::MaxCrossLoading, &ParamValue::Float(0.2))
            .unwrap();
        assert_eq!(config.max_cross_loading, 0.2);
        config
            .apply_override(SweepParameter::PcaMethod, &ParamValue::Text("variance_threshold".into()))
            .unwrap();
        assert_eq!(config.pca_method, PcaMethod::VarianceThreshold);

        let err = config.apply_override(SweepParameter::NumSegments, &ParamValue::Float(2.5));
        assert!(matches!(err, Err(ConfigError::InvalidOverride { .. })));
        let err = config.apply_override(SweepParameter::RandomSeed, &ParamValue::Int(-1));
        assert!(err.is_err());
        let err =
            config.apply_override(SweepParameter::PcaMethod, &ParamValue::Text("magic".into()));
        assert!(err.is_err());
    }

    #[test]
    fn test_integer_accepted_for_float_field() {
        let mut config = SegmentBuilderConfig::default();
        config
            .apply_override(SweepParameter::MinPrimaryLoading, &ParamValue::Int(1))
            .unwrap();
        assert_eq!(config.min_primary_loading, 1.0);
    }

    #[test]
    fn test_random_state_alias() {
        let config: SegmentBuilderConfig =
            serde_json::from_str(r#"{"random_state": 42, "segment_method": "kmeans"}"#).unwrap();
        assert_eq!(config.random_seed, 42);
        assert_eq!(config.num_segments, 3);
    }

    #[test]
    fn test_unknown_clustering_method_rejected() {
        let parsed: Result<SegmentBuilderConfig, _> =
            serde_json::from_str(r#"{"clustering_method": "dbscan"}"#);
        assert!(parsed.is_err());
    }
}
