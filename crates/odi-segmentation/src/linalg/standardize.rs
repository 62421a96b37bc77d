//! Column-wise z-scores with population statistics.

use ndarray::{Array2, ArrayView2, Axis};
use statrs::statistics::Statistics;

/// Standardize every column to zero mean and unit population variance.
///
/// A zero-variance column maps to all zeros.
pub fn standardize_columns(data: ArrayView2<f64>) -> Array2<f64> {
    let mut out = data.to_owned();
    for mut column in out.axis_iter_mut(Axis(1)) {
        let values: Vec<f64> = column.iter().copied().collect();
        let mean = values.iter().mean();
        let std = values.iter().population_std_dev();
        let scale = if std > 0.0 && std.is_finite() { std } else { 1.0 };
        column.mapv_inplace(|x| (x - mean) / scale);
    }
    out
}
