//! Shared numeric constants.

/// Crate version, stamped into run summaries.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lowest valid survey rating.
pub const RATING_MIN: u8 = 1;

/// Highest valid survey rating.
pub const RATING_MAX: u8 = 5;

/// Rule-of-thumb minimum respondents per segment for a stable solution.
pub const DEFAULT_MIN_RESPONDENTS_PER_SEGMENT: usize = 60;

/// Kaiser criterion: keep components whose eigenvalue exceeds this.
pub const KAISER_EIGENVALUE_FLOOR: f64 = 1.0;

/// Cumulative explained-variance ratio the variance rule must reach.
pub const VARIANCE_RATIO_TARGET: f64 = 0.80;

/// Mean silhouette at or above this is treated as the scoring ceiling.
pub const SILHOUETTE_CEILING: f64 = 0.5;

/// Lloyd iteration cap for k-means.
pub const KMEANS_MAX_ITERATIONS: usize = 300;

/// Upper bound of the aggregate opportunity scale.
pub const AGGREGATE_OPPORTUNITY_MAX: f64 = 20.0;
