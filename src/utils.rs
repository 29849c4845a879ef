// src/utils.rs

use ndarray::ArrayView1;

/// Sums a row strictly left to right.
///
/// `ArrayBase::sum` is free to reorder additions; scores must be reproducible
/// across runs and builds, so every sum in the pipeline goes through here.
pub fn sequential_sum(row: ArrayView1<f64>) -> f64 {
    row.iter().fold(0.0, |acc, &x| acc + x)
}

/// `numerator / denominator`, or `0.0` when the denominator is zero.
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// `|a - b| <= tolerance * max(|a|, |b|)`; two zeros compare equal.
pub fn within_relative(a: f64, b: f64, tolerance: f64) -> bool {
    let scale = a.abs().max(b.abs());
    (a - b).abs() <= tolerance * scale
}
