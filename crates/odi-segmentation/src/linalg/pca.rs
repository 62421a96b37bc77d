//! Principal component analysis through a symmetric eigendecomposition of the
//! sample covariance matrix.
//!
//! Eigenvalues are the unnormalized explained variances (covariance with an
//! `n - 1` denominator). Components are unit-norm eigenvectors, sign-fixed so
//! the entry of largest magnitude is positive.

use ndarray::{Array1, Array2, ArrayView2, Axis};
use odi_core::errors::StepError;

/// Cyclic Jacobi sweep cap.
const MAX_SWEEPS: usize = 100;

/// Relative off-diagonal mass at which the rotation loop stops.
const CONVERGENCE_TOL: f64 = 1e-24;

/// Full PCA fit, components ordered by descending eigenvalue.
#[derive(Debug, Clone)]
pub struct PcaFit {
    /// Explained variance per component.
    pub eigenvalues: Vec<f64>,
    /// Row `c` is component `c` over the input features.
    pub components: Array2<f64>,
}

impl PcaFit {
    pub fn explained_variance_ratio(&self) -> Vec<f64> {
        let total: f64 = self.eigenvalues.iter().sum();
        self.eigenvalues.iter().map(|e| e / total).collect()
    }

    /// Loadings matrix for the first `n` components: rows are features,
    /// columns are components.
    pub fn loadings(&self, n: usize) -> Array2<f64> {
        let n = n.min(self.components.nrows());
        self.components.slice(ndarray::s![..n, ..]).t().to_owned()
    }
}

/// Fit PCA over rows of `data` (samples x features).
pub fn fit_pca(data: ArrayView2<f64>) -> Result<PcaFit, StepError> {
    let (n_samples, n_features) = data.dim();
    if n_samples == 0 || n_features == 0 {
        return Err(StepError::EmptyInput { what: "PCA input" });
    }
    if n_samples < 2 {
        return Err(StepError::Numeric {
            message: "PCA needs at least two samples".to_string(),
        });
    }
    let cov = covariance(data);
    let (eigenvalues, vectors) = symmetric_eigen(&cov)?;

    let mut components = vectors.reversed_axes();
    for mut row in components.axis_iter_mut(Axis(0)) {
        let pivot = row
            .iter()
            .copied()
            .fold(0.0f64, |best, x| if x.abs() > best.abs() { x } else { best });
        if pivot < 0.0 {
            row.mapv_inplace(|x| -x);
        }
    }

    Ok(PcaFit {
        eigenvalues: eigenvalues.to_vec(),
        components,
    })
}

/// Sample covariance of the columns of `data`.
pub fn covariance(data: ArrayView2<f64>) -> Array2<f64> {
    let n = data.nrows();
    let means = data.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(data.ncols()));
    let centered = &data - &means.insert_axis(Axis(0));
    let denom = (n.saturating_sub(1)).max(1) as f64;
    centered.t().dot(&centered) / denom
}

/// Eigen-decompose a symmetric matrix with cyclic Jacobi rotations.
///
/// Returns eigenvalues in descending order and the matching unit
/// eigenvectors as columns.
pub fn symmetric_eigen(matrix: &Array2<f64>) -> Result<(Array1<f64>, Array2<f64>), StepError> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return Err(StepError::Numeric {
            message: format!("matrix is {}x{}, expected square", n, matrix.ncols()),
        });
    }
    let mut a = matrix.to_owned();
    let mut v = Array2::<f64>::eye(n);
    let norm_sq: f64 = a.iter().map(|x| x * x).sum();

    let mut converged = false;
    for _ in 0..MAX_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|p| (0..n).filter(move |&q| q != p).map(move |q| (p, q)))
            .map(|(p, q)| a[[p, q]] * a[[p, q]])
            .sum();
        if off <= CONVERGENCE_TOL * norm_sq || off == 0.0 {
            converged = true;
            break;
        }
        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq == 0.0 {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;
                rotate_columns(&mut a, p, q, c, s);
                rotate_rows(&mut a, p, q, c, s);
                rotate_columns(&mut v, p, q, c, s);
            }
        }
    }
    if !converged {
        return Err(StepError::Numeric {
            message: format!("eigendecomposition did not converge in {MAX_SWEEPS} sweeps"),
        });
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| a[[j, j]].total_cmp(&a[[i, i]]));
    let values = Array1::from_iter(order.iter().map(|&i| a[[i, i]]));
    let vectors = v.select(Axis(1), &order);
    Ok((values, vectors))
}

fn rotate_columns(m: &mut Array2<f64>, p: usize, q: usize, c: f64, s: f64) {
    for k in 0..m.nrows() {
        let (mkp, mkq) = (m[[k, p]], m[[k, q]]);
        m[[k, p]] = c * mkp - s * mkq;
        m[[k, q]] = s * mkp + c * mkq;
    }
}

fn rotate_rows(m: &mut Array2<f64>, p: usize, q: usize, c: f64, s: f64) {
    for k in 0..m.ncols() {
        let (mpk, mqk) = (m[[p, k]], m[[q, k]]);
        m[[p, k]] = c * mpk - s * mqk;
        m[[q, k]] = s * mpk + c * mqk;
    }
}
