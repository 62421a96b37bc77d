//! Seeded k-means: k-means++ initialization followed by Lloyd iterations.

use ndarray::{Array2, ArrayView2, Axis};
use odi_core::errors::StepError;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use super::squared_distance;

#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// Cluster label per input row, in `0..k`.
    pub labels: Vec<usize>,
    pub centroids: Array2<f64>,
    /// Sum of squared distances to assigned centroids.
    pub inertia: f64,
    pub iterations: usize,
}

/// Cluster the rows of `data` into `k` groups.
///
/// Deterministic for a given `seed`.
pub fn kmeans(
    data: ArrayView2<f64>,
    k: usize,
    seed: u64,
    max_iterations: usize,
) -> Result<KMeansFit, StepError> {
    let n = data.nrows();
    if n == 0 || data.ncols() == 0 {
        return Err(StepError::EmptyInput {
            what: "clustering features",
        });
    }
    if k == 0 || k > n {
        return Err(StepError::InvalidSegmentCount {
            requested: k,
            respondents: n,
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut centroids = init_plus_plus(data, k, &mut rng);
    let mut labels = vec![usize::MAX; n];
    let mut iterations = 0;

    while iterations < max_iterations {
        iterations += 1;
        let changed = assign(data, &centroids, &mut labels);
        if !changed {
            break;
        }
        update_centroids(data, &mut centroids, &mut labels);
    }

    let inertia = data
        .axis_iter(Axis(0))
        .zip(&labels)
        .map(|(row, &l)| squared_distance(row, centroids.row(l)))
        .sum();

    Ok(KMeansFit {
        labels,
        centroids,
        inertia,
        iterations,
    })
}

/// k-means++ seeding: first center uniform, each next one drawn with
/// probability proportional to squared distance from the nearest chosen
/// center. Falls back to a uniform draw when every distance is zero.
fn init_plus_plus(data: ArrayView2<f64>, k: usize, rng: &mut ChaCha8Rng) -> Array2<f64> {
    let n = data.nrows();
    let mut centroids = Array2::<f64>::zeros((k, data.ncols()));
    let first = rng.gen_range(0..n);
    centroids.row_mut(0).assign(&data.row(first));

    let mut nearest: Vec<f64> = data
        .axis_iter(Axis(0))
        .map(|row| squared_distance(row, centroids.row(0)))
        .collect();

    for c in 1..k {
        let total: f64 = nearest.iter().sum();
        let chosen = if total > 0.0 {
            let target = rng.gen::<f64>() * total;
            let mut acc = 0.0;
            nearest
                .iter()
                .position(|&d| {
                    acc += d;
                    acc > target
                })
                .unwrap_or(n - 1)
        } else {
            rng.gen_range(0..n)
        };
        centroids.row_mut(c).assign(&data.row(chosen));
        for (i, row) in data.axis_iter(Axis(0)).enumerate() {
            let d = squared_distance(row, centroids.row(c));
            if d < nearest[i] {
                nearest[i] = d;
            }
        }
    }
    centroids
}

/// Assign every row to its nearest centroid, lowest index on ties.
/// Returns whether any label changed.
fn assign(data: ArrayView2<f64>, centroids: &Array2<f64>, labels: &mut [usize]) -> bool {
    let mut changed = false;
    for (i, row) in data.axis_iter(Axis(0)).enumerate() {
        let mut best = 0;
        let mut best_d = f64::INFINITY;
        for (c, centroid) in centroids.axis_iter(Axis(0)).enumerate() {
            let d = squared_distance(row, centroid);
            if d < best_d {
                best_d = d;
                best = c;
            }
        }
        if labels[i] != best {
            labels[i] = best;
            changed = true;
        }
    }
    changed
}

/// Recompute centroids as member means.
///
/// An empty cluster takes over the point farthest from its own centroid,
/// provided that point's cluster keeps at least one other member; otherwise
/// the empty cluster keeps its previous centroid.
fn update_centroids(data: ArrayView2<f64>, centroids: &mut Array2<f64>, labels: &mut [usize]) {
    let k = centroids.nrows();
    let mut sums = Array2::<f64>::zeros(centroids.dim());
    let mut counts = vec![0usize; k];
    for (row, &l) in data.axis_iter(Axis(0)).zip(labels.iter()) {
        let mut acc = sums.row_mut(l);
        acc += &row;
        counts[l] += 1;
    }

    for c in 0..k {
        if counts[c] > 0 {
            continue;
        }
        let farthest = data
            .axis_iter(Axis(0))
            .enumerate()
            .filter(|(i, _)| counts[labels[*i]] > 1)
            .map(|(i, row)| (i, squared_distance(row, centroids.row(labels[i]))))
            .max_by(|a, b| a.1.total_cmp(&b.1).then(b.0.cmp(&a.0)));
        if let Some((i, _)) = farthest {
            let donor = labels[i];
            let mut donor_sum = sums.row_mut(donor);
            donor_sum -= &data.row(i);
            counts[donor] -= 1;
            sums.row_mut(c).assign(&data.row(i));
            counts[c] = 1;
            labels[i] = c;
        }
    }

    for c in 0..k {
        if counts[c] > 0 {
            let mean = &sums.row(c) / counts[c] as f64;
            centroids.row_mut(c).assign(&mean);
        }
    }
}
