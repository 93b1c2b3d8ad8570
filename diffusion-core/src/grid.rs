//! Uniform grids and the time-step coupling between them.
//!
//! A grid only knows its node count and spacing; the field living on it
//! is a plain `Vec<f64>` (1D) or a [`Field2d`](crate::Field2d).

use crate::error::{SolverError, SolverResult, ensure_positive};

/// Smallest node count per axis that still leaves one interior node.
pub const MIN_NODES: usize = 3;

/// Largest stable sigma (or sigma_x + sigma_y) for the explicit scheme.
pub const EXPLICIT_STABILITY_LIMIT: f64 = 0.5;

fn ensure_nodes(name: &'static str, n: usize) -> SolverResult<usize> {
    if n < MIN_NODES {
        return Err(SolverError::invalid(
            name,
            format!("need at least {MIN_NODES} nodes, got {n}"),
        ));
    }
    Ok(n)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid1d {
    nx: usize,
    dx: f64,
}

impl Grid1d {
    pub fn new(nx: usize, dx: f64) -> SolverResult<Grid1d> {
        Ok(Grid1d {
            nx: ensure_nodes("nx", nx)?,
            dx: ensure_positive("dx", dx)?,
        })
    }

    /// Spreads `nx` nodes over `[0, length]`, both ends included.
    pub fn with_length(nx: usize, length: f64) -> SolverResult<Grid1d> {
        let nx = ensure_nodes("nx", nx)?;
        let length = ensure_positive("length", length)?;
        Grid1d::new(nx, length / (nx - 1) as f64)
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn length(&self) -> f64 {
        self.dx * (self.nx - 1) as f64
    }

    pub fn interior_len(&self) -> usize {
        self.nx - 2
    }

    pub fn coords(&self) -> Vec<f64> {
        (0..self.nx).map(|i| i as f64 * self.dx).collect()
    }

    pub fn sigma(&self, step: &TimeStep) -> f64 {
        step.alpha * step.dt / (self.dx * self.dx)
    }

    /// dt giving the requested sigma on this grid.
    pub fn dt_for_sigma(&self, alpha: f64, sigma: f64) -> SolverResult<f64> {
        let alpha = ensure_positive("alpha", alpha)?;
        let sigma = ensure_positive("sigma", sigma)?;
        Ok(sigma * self.dx * self.dx / alpha)
    }

    pub(crate) fn check_field(&self, field: &[f64]) -> SolverResult<()> {
        if field.len() != self.nx {
            return Err(SolverError::invalid(
                "initial_field",
                format!("length {} does not match nx = {}", field.len(), self.nx),
            ));
        }
        Ok(())
    }
}

/// Rectangular grid; rows run along y, columns along x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid2d {
    nx: usize,
    ny: usize,
    dx: f64,
    dy: f64,
}

impl Grid2d {
    pub fn new(nx: usize, ny: usize, dx: f64, dy: f64) -> SolverResult<Grid2d> {
        Ok(Grid2d {
            nx: ensure_nodes("nx", nx)?,
            ny: ensure_nodes("ny", ny)?,
            dx: ensure_positive("dx", dx)?,
            dy: ensure_positive("dy", dy)?,
        })
    }

    pub fn with_lengths(nx: usize, ny: usize, lx: f64, ly: f64) -> SolverResult<Grid2d> {
        let nx = ensure_nodes("nx", nx)?;
        let ny = ensure_nodes("ny", ny)?;
        let lx = ensure_positive("lx", lx)?;
        let ly = ensure_positive("ly", ly)?;
        Grid2d::new(nx, ny, lx / (nx - 1) as f64, ly / (ny - 1) as f64)
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }

    pub fn x_coords(&self) -> Vec<f64> {
        (0..self.nx).map(|j| j as f64 * self.dx).collect()
    }

    pub fn y_coords(&self) -> Vec<f64> {
        (0..self.ny).map(|i| i as f64 * self.dy).collect()
    }

    /// `(row, column)` of the cell watched by the threshold check.
    pub fn center(&self) -> (usize, usize) {
        (self.ny / 2, self.nx / 2)
    }

    /// `(sigma_x, sigma_y)`.
    pub fn sigmas(&self, step: &TimeStep) -> (f64, f64) {
        (
            step.alpha * step.dt / (self.dx * self.dx),
            step.alpha * step.dt / (self.dy * self.dy),
        )
    }

    /// dt giving the requested sigma along the finer of the two axes.
    pub fn dt_for_sigma(&self, alpha: f64, sigma: f64) -> SolverResult<f64> {
        let alpha = ensure_positive("alpha", alpha)?;
        let sigma = ensure_positive("sigma", sigma)?;
        let h = self.dx.min(self.dy);
        Ok(sigma * h * h / alpha)
    }
}

/// Diffusivity together with the time-step size. Both strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeStep {
    alpha: f64,
    dt: f64,
}

impl TimeStep {
    pub fn new(alpha: f64, dt: f64) -> SolverResult<TimeStep> {
        Ok(TimeStep {
            alpha: ensure_positive("alpha", alpha)?,
            dt: ensure_positive("dt", dt)?,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn grid_1d_from_length() {
        let g = Grid1d::with_length(51, 1.0).unwrap();
        assert_eq!(g.nx(), 51);
        assert_eq!(g.interior_len(), 49);
        assert_approx_eq!(f64, g.dx(), 0.02);
        assert_approx_eq!(f64, g.length(), 1.0, ulps = 4);
        let x = g.coords();
        assert_approx_eq!(f64, x[0], 0.0);
        assert_approx_eq!(f64, x[50], 1.0, ulps = 4);
    }

    #[test]
    fn grid_rejects_small_or_bad_spacing() {
        assert!(Grid1d::new(2, 0.1).is_err());
        assert!(Grid1d::new(3, 0.0).is_err());
        assert!(Grid1d::with_length(5, -1.0).is_err());
        assert!(Grid2d::new(3, 2, 0.1, 0.1).is_err());
        assert!(Grid2d::new(3, 3, 0.1, f64::NAN).is_err());
    }

    #[test]
    fn sigma_round_trips_through_dt() {
        let g = Grid1d::with_length(51, 1.0).unwrap();
        let alpha = 1.22e-3;
        let dt = g.dt_for_sigma(alpha, 0.5).unwrap();
        let step = TimeStep::new(alpha, dt).unwrap();
        assert_approx_eq!(f64, g.sigma(&step), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn grid_2d_sigmas_use_finer_axis() {
        let g = Grid2d::new(10, 5, 0.1, 0.2).unwrap();
        let dt = g.dt_for_sigma(1.0, 0.25).unwrap();
        let (sx, sy) = g.sigmas(&TimeStep::new(1.0, dt).unwrap());
        assert_approx_eq!(f64, sx, 0.25, epsilon = 1e-12);
        assert_approx_eq!(f64, sy, 0.0625, epsilon = 1e-12);
    }

    #[test]
    fn center_is_row_then_column() {
        let g = Grid2d::new(24, 11, 1.0, 1.0).unwrap();
        assert_eq!(g.center(), (5, 12));
    }

    #[test]
    fn time_step_validation() {
        assert!(TimeStep::new(0.0, 1.0).is_err());
        assert!(TimeStep::new(1.0, -0.1).is_err());
        assert!(TimeStep::new(1e-4, 0.5).is_ok());
    }
}
