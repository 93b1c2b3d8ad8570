//! Backward-time, centred-space stepper for a rod with a fixed left value
//! and a constant flux `q` leaving through the right end.
//!
//! Eliminating the ghost node `T[nx-1] = T[nx-2] + q dx` from the last
//! interior equation turns its diagonal into `1 + 1/sigma`; every other
//! row is `-1, 2 + 1/sigma, -1`. The matrix depends only on sigma, so it is
//! assembled once per stepper.

use tracing::debug;

use crate::error::{SolverError, SolverResult, ensure_finite_field, ensure_positive};
use crate::grid::{Grid1d, TimeStep};
use crate::snapshot::SnapshotRecorder;
use crate::tridiag::Tridiagonal;

pub struct Btcs1d {
    sigma: f64,
    flux_dx: f64,
    matrix: Tridiagonal,
    field: Vec<f64>,
    rhs: Vec<f64>,
    solution: Vec<f64>,
    scratch: Vec<f64>,
}

impl Btcs1d {
    pub fn new(grid: Grid1d, step: TimeStep, flux_q: f64, initial: &[f64]) -> SolverResult<Btcs1d> {
        grid.check_field(initial)?;
        ensure_finite_field("initial_field", initial)?;
        if !flux_q.is_finite() {
            return Err(SolverError::invalid(
                "flux_q",
                format!("must be finite, got {flux_q}"),
            ));
        }

        // a sigma of 0 or inf would only surface mid-run as a singular pivot
        let sigma = ensure_positive("sigma", grid.sigma(&step))?;
        let n = grid.interior_len();
        let matrix = assemble(n, sigma)?;

        Ok(Btcs1d {
            sigma,
            flux_dx: flux_q * grid.dx(),
            matrix,
            field: initial.to_vec(),
            rhs: vec![0.0; n],
            solution: vec![0.0; n],
            scratch: Vec::with_capacity(n),
        })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn matrix(&self) -> &Tridiagonal {
        &self.matrix
    }

    pub fn field(&self) -> &[f64] {
        &self.field
    }

    pub fn into_field(self) -> Vec<f64> {
        self.field
    }

    /// Right-hand side for the current field: interior values over sigma,
    /// plus the left boundary value and the right flux term.
    fn build_rhs(&mut self) {
        let n = self.rhs.len();
        for (k, b) in self.rhs.iter_mut().enumerate() {
            *b = self.field[k + 1] / self.sigma;
        }
        self.rhs[0] += self.field[0];
        self.rhs[n - 1] += self.flux_dx;
    }

    pub fn step(&mut self) -> SolverResult<()> {
        self.build_rhs();
        self.matrix
            .solve_into(&self.rhs, &mut self.scratch, &mut self.solution)?;

        let nx = self.field.len();
        self.field[1..nx - 1].copy_from_slice(&self.solution);
        self.field[nx - 1] = self.field[nx - 2] + self.flux_dx;
        Ok(())
    }

    pub fn run(&mut self, nt: usize, recorder: &mut SnapshotRecorder<Vec<f64>>) -> SolverResult<()> {
        debug!(nx = self.field.len(), nt, sigma = self.sigma, "btcs 1d run");
        for s in 0..nt {
            self.step()?;
            recorder.observe(s, &self.field);
        }
        Ok(())
    }
}

/// Coefficient matrix for `n` interior nodes.
pub fn assemble(n: usize, sigma: f64) -> SolverResult<Tridiagonal> {
    let mut diag = vec![2.0 + 1.0 / sigma; n];
    if let Some(last) = diag.last_mut() {
        *last = 1.0 + 1.0 / sigma;
    }
    Tridiagonal::new(vec![-1.0; n], diag, vec![-1.0; n])
}

/// Implicit 1D run with the left end held at its initial value and a
/// constant flux `flux_q` through the right end.
pub fn implicit_step_1d(
    initial_field: &[f64],
    step_count: usize,
    dt: f64,
    dx: f64,
    alpha: f64,
    flux_q: f64,
) -> SolverResult<Vec<f64>> {
    let grid = Grid1d::new(initial_field.len(), dx)?;
    let step = TimeStep::new(alpha, dt)?;
    let mut stepper = Btcs1d::new(grid, step, flux_q, initial_field)?;
    stepper.run(step_count, &mut SnapshotRecorder::disabled())?;
    Ok(stepper.into_field())
}
