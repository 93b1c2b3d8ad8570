use thiserror::Error;

pub type SolverResult<T> = Result<T, SolverError>;

/// Everything a stepper can refuse or fail on.
///
/// Argument problems are reported before the first step runs, so a caller
/// never sees a half-advanced field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// The Thomas sweep hit a zero (or non-finite) pivot.
    #[error("singular tridiagonal system: pivot {pivot} at row {row}")]
    SingularSystem { row: usize, pivot: f64 },
}

impl SolverError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SolverError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

/// Rejects zero, negative, NaN and infinite values.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> SolverResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SolverError::invalid(
            name,
            format!("must be finite and > 0, got {value}"),
        ));
    }
    Ok(value)
}

pub(crate) fn ensure_finite_field(name: &'static str, values: &[f64]) -> SolverResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(SolverError::invalid(
            name,
            format!("non-finite value {} at index {i}", values[i]),
        )),
        None => Ok(()),
    }
}
