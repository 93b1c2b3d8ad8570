//! Tridiagonal matrices and the Thomas algorithm.

use crate::error::{SolverError, SolverResult};

/// Three bands of an `n × n` tridiagonal matrix.
///
/// `lower[i]` couples row `i` to column `i - 1` and `upper[i]` couples row
/// `i` to column `i + 1`; `lower[0]` and `upper[n - 1]` are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Tridiagonal {
    lower: Vec<f64>,
    diag: Vec<f64>,
    upper: Vec<f64>,
}

impl Tridiagonal {
    pub fn new(lower: Vec<f64>, diag: Vec<f64>, upper: Vec<f64>) -> SolverResult<Tridiagonal> {
        let n = diag.len();
        if n == 0 {
            return Err(SolverError::invalid("diag", "matrix must have at least one row"));
        }
        if lower.len() != n || upper.len() != n {
            return Err(SolverError::invalid(
                "bands",
                format!(
                    "band lengths differ: lower {}, diag {n}, upper {}",
                    lower.len(),
                    upper.len()
                ),
            ));
        }
        Ok(Tridiagonal { lower, diag, upper })
    }

    pub fn len(&self) -> usize {
        self.diag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diag.is_empty()
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn diag(&self) -> &[f64] {
        &self.diag
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// `A x`.
    pub fn mul_vec(&self, x: &[f64]) -> SolverResult<Vec<f64>> {
        let n = self.len();
        if x.len() != n {
            return Err(SolverError::invalid(
                "x",
                format!("expected {n} entries, got {}", x.len()),
            ));
        }
        Ok((0..n)
            .map(|i| {
                let mut v = self.diag[i] * x[i];
                if i > 0 {
                    v += self.lower[i] * x[i - 1];
                }
                if i + 1 < n {
                    v += self.upper[i] * x[i + 1];
                }
                v
            })
            .collect())
    }

    /// Solves `A x = rhs` into `out`.
    ///
    /// `scratch` holds the modified super-diagonal and is resized as needed,
    /// so a caller stepping many times can keep it around and avoid
    /// allocating per solve. No pivoting: the matrix should be diagonally
    /// dominant.
    pub fn solve_into(
        &self,
        rhs: &[f64],
        scratch: &mut Vec<f64>,
        out: &mut [f64],
    ) -> SolverResult<()> {
        let n = self.len();
        if rhs.len() != n || out.len() != n {
            return Err(SolverError::invalid(
                "rhs",
                format!(
                    "expected {n} entries, got rhs {} / out {}",
                    rhs.len(),
                    out.len()
                ),
            ));
        }
        scratch.clear();
        scratch.resize(n, 0.0);

        // forward sweep; out doubles as the modified rhs
        let mut pivot = self.diag[0];
        check_pivot(0, pivot)?;
        scratch[0] = self.upper[0] / pivot;
        out[0] = rhs[0] / pivot;
        for i in 1..n {
            pivot = self.diag[i] - self.lower[i] * scratch[i - 1];
            check_pivot(i, pivot)?;
            scratch[i] = if i + 1 < n { self.upper[i] / pivot } else { 0.0 };
            out[i] = (rhs[i] - self.lower[i] * out[i - 1]) / pivot;
        }

        for i in (0..n - 1).rev() {
            out[i] -= scratch[i] * out[i + 1];
        }
        Ok(())
    }

    pub fn solve(&self, rhs: &[f64]) -> SolverResult<Vec<f64>> {
        let mut out = vec![0.0; self.len()];
        let mut scratch = Vec::with_capacity(self.len());
        self.solve_into(rhs, &mut scratch, &mut out)?;
        Ok(out)
    }
}

fn check_pivot(row: usize, pivot: f64) -> SolverResult<()> {
    if pivot == 0.0 || !pivot.is_finite() {
        return Err(SolverError::SingularSystem { row, pivot });
    }
    Ok(())
}
