//! Silhouette coefficients under Euclidean distance.

use ndarray::{ArrayView2, Axis};

use super::squared_distance;

#[derive(Debug, Clone, PartialEq)]
pub struct Silhouette {
    /// Mean coefficient over all samples.
    pub mean: f64,
    /// Mean coefficient per cluster id `0..k`; NaN for empty clusters.
    pub per_cluster: Vec<f64>,
}

impl Silhouette {
    /// Placeholder for fits where the coefficient is undefined.
    pub fn undefined(k: usize) -> Self {
        Self {
            mean: f64::NAN,
            per_cluster: vec![f64::NAN; k],
        }
    }
}

/// Compute `s(i) = (b - a) / max(a, b)` for every row.
///
/// `a` is the mean distance to the rest of the row's own cluster and `b` the
/// smallest mean distance to another non-empty cluster. A row alone in its
/// cluster scores 0. Callers must ensure at least two distinct labels.
pub fn silhouette(data: ArrayView2<f64>, labels: &[usize], k: usize) -> Silhouette {
    let n = data.nrows();
    let mut sizes = vec![0usize; k];
    for &l in labels {
        sizes[l] += 1;
    }

    let rows: Vec<_> = data.axis_iter(Axis(0)).collect();
    let mut scores = vec![0.0; n];
    let mut dist_sums = vec![0.0; k];
    for i in 0..n {
        dist_sums.iter_mut().for_each(|d| *d = 0.0);
        for j in 0..n {
            if i != j {
                dist_sums[labels[j]] += squared_distance(rows[i], rows[j]).sqrt();
            }
        }
        let own = labels[i];
        if sizes[own] <= 1 {
            scores[i] = 0.0;
            continue;
        }
        let a = dist_sums[own] / (sizes[own] - 1) as f64;
        let b = (0..k)
            .filter(|&c| c != own && sizes[c] > 0)
            .map(|c| dist_sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);
        let denom = a.max(b);
        scores[i] = if denom > 0.0 && denom.is_finite() {
            (b - a) / denom
        } else {
            0.0
        };
    }

    let mean = scores.iter().sum::<f64>() / n as f64;
    let per_cluster = (0..k)
        .map(|c| {
            if sizes[c] == 0 {
                return f64::NAN;
            }
            let total: f64 = scores
                .iter()
                .zip(labels)
                .filter(|(_, &l)| l == c)
                .map(|(s, _)| s)
                .sum();
            total / sizes[c] as f64
        })
        .collect();

    Silhouette { mean, per_cluster }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_well_separated_clusters_near_one() {
        let data = array![[0.0], [0.1], [10.0], [10.1]];
        let s = silhouette(data.view(), &[0, 0, 1, 1], 2);
        assert!(s.mean > 0.98);
        assert_eq!(s.per_cluster.len(), 2);
    }

    #[test]
    fn test_known_value() {
        // a = 1, b = mean(|0-3|, |0-4|) = 3.5 for the first point.
        let data = array![[0.0], [1.0], [3.0], [4.0]];
        let s = silhouette(data.view(), &[0, 0, 1, 1], 2);
        let first = (3.5 - 1.0) / 3.5;
        // Point 1: a = 1, b = mean(2, 3) = 2.5.
        let second = (2.5 - 1.0) / 2.5;
        assert!((s.per_cluster[0] - (first + second) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_singleton_scores_zero_and_empty_is_nan() {
        let data = array![[0.0], [0.2], [5.0]];
        let s = silhouette(data.view(), &[0, 0, 1], 3);
        assert_eq!(s.per_cluster[1], 0.0);
        assert!(s.per_cluster[2].is_nan());
    }
}
