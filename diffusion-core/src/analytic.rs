//! Closed-form reference for the first Fourier mode.

use std::f64::consts::PI;

use crate::error::{SolverError, SolverResult};

/// `exp(-(pi/L)^2 alpha t) sin(pi x / L)`: the exact solution on `[0, L]`
/// with zero Dirichlet ends and `sin(pi x / L)` as initial data.
pub fn sine_mode(x: &[f64], length: f64, alpha: f64, t: f64) -> Vec<f64> {
    let k = PI / length;
    let decay = (-k * k * alpha * t).exp();
    x.iter().map(|&xi| decay * (k * xi).sin()).collect()
}

/// Largest pointwise deviation between two profiles of equal length.
pub fn max_abs_error(a: &[f64], b: &[f64]) -> SolverResult<f64> {
    if a.len() != b.len() {
        return Err(SolverError::invalid(
            "profiles",
            format!("lengths differ: {} vs {}", a.len(), b.len()),
        ));
    }
    Ok(a.iter()
        .zip(b)
        .map(|(u, v)| (u - v).abs())
        .fold(0.0, f64::max))
}
