//! Numeric kernels: standardization, PCA, k-means, silhouette.

pub mod kmeans;
pub mod pca;
pub mod silhouette;
pub mod standardize;

pub use kmeans::{kmeans, KMeansFit};
pub use pca::{fit_pca, PcaFit};
pub use silhouette::{silhouette, Silhouette};
pub use standardize::standardize_columns;

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Squared Euclidean distance between two equal-length rows.
pub(crate) fn squared_distance<'a>(
    a: impl IntoIterator<Item = &'a f64>,
    b: impl IntoIterator<Item = &'a f64>,
) -> f64 {
    a.into_iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
