//! Forward-time, centred-space steppers.
//!
//! Both steppers own a double buffer: the stencil reads `field` and writes
//! `next`, the buffers are swapped, then the boundary policy runs. A step
//! therefore only ever sees values from the previous step.
//!
//! Stability (sigma <= 0.5 in 1D, sigma_x + sigma_y <= 0.5 in 2D) is the
//! caller's business. A violation is logged, never rejected.

use tracing::{debug, warn};

use crate::boundary::{BoundaryPair, Edges};
use crate::error::{SolverError, SolverResult, ensure_finite_field, ensure_positive};
use crate::field::Field2d;
use crate::grid::{EXPLICIT_STABILITY_LIMIT, Grid1d, Grid2d, TimeStep};
use crate::snapshot::SnapshotRecorder;

pub struct Ftcs1d {
    sigma: f64,
    bc: BoundaryPair,
    field: Vec<f64>,
    next: Vec<f64>,
}

impl Ftcs1d {
    pub fn new(
        grid: Grid1d,
        step: TimeStep,
        bc: BoundaryPair,
        initial: &[f64],
    ) -> SolverResult<Ftcs1d> {
        grid.check_field(initial)?;
        ensure_finite_field("initial_field", initial)?;

        // alpha dt / dx^2 can still under- or overflow with valid inputs
        let sigma = ensure_positive("sigma", grid.sigma(&step))?;
        if sigma > EXPLICIT_STABILITY_LIMIT {
            warn!(sigma, "explicit 1D run above the stability limit, expect divergence");
        }

        Ok(Ftcs1d {
            sigma,
            bc,
            field: initial.to_vec(),
            next: initial.to_vec(),
        })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn field(&self) -> &[f64] {
        &self.field
    }

    pub fn into_field(self) -> Vec<f64> {
        self.field
    }

    pub fn step(&mut self) {
        let n = self.field.len();
        let s = self.sigma;
        let t = &self.field;

        self.next[0] = t[0];
        self.next[n - 1] = t[n - 1];
        for i in 1..n - 1 {
            self.next[i] = t[i] + s * (t[i + 1] - 2.0 * t[i] + t[i - 1]);
        }

        std::mem::swap(&mut self.field, &mut self.next);
        self.bc.apply(&mut self.field);
    }

    pub fn run(&mut self, nt: usize, recorder: &mut SnapshotRecorder<Vec<f64>>) {
        debug!(nx = self.field.len(), nt, sigma = self.sigma, "ftcs 1d run");
        for s in 0..nt {
            self.step();
            recorder.observe(s, &self.field);
        }
    }
}

/// Why a 2D run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub steps_taken: usize,
    pub threshold_reached: bool,
}

pub struct Ftcs2d {
    sigma_x: f64,
    sigma_y: f64,
    center: (usize, usize),
    edges: Edges,
    field: Field2d,
    next: Field2d,
}

impl Ftcs2d {
    pub fn new(grid: Grid2d, step: TimeStep, initial: &Field2d) -> SolverResult<Ftcs2d> {
        if initial.nx() != grid.nx() || initial.ny() != grid.ny() {
            return Err(SolverError::invalid(
                "initial_field",
                format!(
                    "shape {} x {} does not match grid {} x {}",
                    initial.ny(),
                    initial.nx(),
                    grid.ny(),
                    grid.nx()
                ),
            ));
        }
        ensure_finite_field("initial_field", initial.as_slice())?;

        let (sigma_x, sigma_y) = grid.sigmas(&step);
        ensure_positive("sigma_x", sigma_x)?;
        ensure_positive("sigma_y", sigma_y)?;
        if sigma_x + sigma_y > EXPLICIT_STABILITY_LIMIT {
            warn!(sigma_x, sigma_y, "explicit 2D run above the stability limit, expect divergence");
        }

        Ok(Ftcs2d {
            sigma_x,
            sigma_y,
            center: grid.center(),
            edges: Edges::default(),
            field: initial.clone(),
            next: initial.clone(),
        })
    }

    pub fn with_edges(mut self, edges: Edges) -> Ftcs2d {
        self.edges = edges;
        self
    }

    pub fn sigmas(&self) -> (f64, f64) {
        (self.sigma_x, self.sigma_y)
    }

    pub fn field(&self) -> &Field2d {
        &self.field
    }

    pub fn into_field(self) -> Field2d {
        self.field
    }

    pub fn center_value(&self) -> f64 {
        self.field[self.center]
    }

    pub fn step(&mut self) {
        let (ny, nx) = (self.field.ny(), self.field.nx());
        let (sx, sy) = (self.sigma_x, self.sigma_y);
        let t = self.field.as_slice();
        let next = self.next.as_mut_slice();

        // boundary rows/columns carry over; the policy may rewrite them below
        next.copy_from_slice(t);
        for i in 1..ny - 1 {
            let row = i * nx;
            for j in 1..nx - 1 {
                let k = row + j;
                let u = t[k];
                let lap_x = t[k + 1] - 2.0 * u + t[k - 1];
                let lap_y = t[k + nx] - 2.0 * u + t[k - nx];
                next[k] = u + sx * lap_x + sy * lap_y;
            }
        }

        std::mem::swap(&mut self.field, &mut self.next);
        self.edges.apply(&mut self.field);
    }

    /// Steps up to `nt` times, stopping as soon as the centre cell reaches
    /// `threshold`.
    pub fn run(
        &mut self,
        nt: usize,
        threshold: Option<f64>,
        recorder: &mut SnapshotRecorder<Field2d>,
    ) -> RunSummary {
        debug!(
            nx = self.field.nx(),
            ny = self.field.ny(),
            nt,
            sigma_x = self.sigma_x,
            sigma_y = self.sigma_y,
            ?threshold,
            "ftcs 2d run"
        );
        for s in 0..nt {
            self.step();
            recorder.observe(s, &self.field);
            if threshold.is_some_and(|limit| self.center_value() >= limit) {
                debug!(step = s, center = self.center_value(), "threshold reached");
                return RunSummary {
                    steps_taken: s + 1,
                    threshold_reached: true,
                };
            }
        }
        RunSummary {
            steps_taken: nt,
            threshold_reached: false,
        }
    }
}

/// Explicit 1D run. Returns the final field and the snapshots taken every
/// `sample_interval` steps.
pub fn explicit_step_1d(
    initial_field: &[f64],
    step_count: usize,
    dt: f64,
    dx: f64,
    alpha: f64,
    bc: BoundaryPair,
    sample_interval: usize,
) -> SolverResult<(Vec<f64>, Vec<Vec<f64>>)> {
    let grid = Grid1d::new(initial_field.len(), dx)?;
    let step = TimeStep::new(alpha, dt)?;
    let mut recorder = SnapshotRecorder::new(sample_interval)?;
    let mut stepper = Ftcs1d::new(grid, step, bc, initial_field)?;
    stepper.run(step_count, &mut recorder);
    Ok((stepper.into_field(), recorder.into_frames()))
}

/// Explicit 2D run with all four edges held at their initial values.
pub fn explicit_step_2d(
    initial_field: &Field2d,
    step_count: usize,
    dt: f64,
    dx: f64,
    dy: f64,
    alpha: f64,
    threshold: Option<f64>,
) -> SolverResult<Field2d> {
    let grid = Grid2d::new(initial_field.nx(), initial_field.ny(), dx, dy)?;
    let step = TimeStep::new(alpha, dt)?;
    let mut stepper = Ftcs2d::new(grid, step, initial_field)?;
    stepper.run(step_count, threshold, &mut SnapshotRecorder::disabled());
    Ok(stepper.into_field())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryKind;
    use float_cmp::assert_approx_eq;

    #[test]
    fn single_step_matches_hand_stencil() {
        let t0 = vec![0.0, 1.0, 0.0, 0.0];
        let (t, _) = explicit_step_1d(&t0, 1, 0.25, 1.0, 1.0, BoundaryPair::default(), 200)
            .unwrap();
        // sigma = 0.25
        assert_approx_eq!(f64, t[1], 0.5);
        assert_approx_eq!(f64, t[2], 0.25);
        assert_eq!(t[0], 0.0);
        assert_eq!(t[3], 0.0);
    }

    #[test]
    fn interior_reads_previous_step_only() {
        // a sequential in-place sweep would make t[2] depend on the new t[1]
        let t0 = vec![1.0, 0.0, 0.0, 0.0, 0.0];
        let (t, _) = explicit_step_1d(&t0, 1, 0.5, 1.0, 1.0, BoundaryPair::default(), 1)
            .unwrap();
        assert_eq!(t, vec![1.0, 0.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn zero_steps_returns_input() {
        let t0 = vec![1.0, 0.3, 0.7, 0.2];
        let (t, frames) =
            explicit_step_1d(&t0, 0, 0.1, 0.5, 1.0, BoundaryPair::default(), 200).unwrap();
        assert_eq!(t, t0);
        assert!(frames.is_empty());
    }

    #[test]
    fn neumann_right_copies_neighbour_every_step() {
        let grid = Grid1d::with_length(11, 1.0).unwrap();
        let dt = grid.dt_for_sigma(1.0, 0.4).unwrap();
        let bc = BoundaryPair::new(BoundaryKind::Dirichlet, BoundaryKind::Neumann);
        let mut t0 = vec![0.0; 11];
        t0[0] = 1.0;
        t0[10] = 0.2;
        let mut stepper = Ftcs1d::new(grid, TimeStep::new(1.0, dt).unwrap(), bc, &t0).unwrap();
        for _ in 0..50 {
            stepper.step();
            let f = stepper.field();
            assert_eq!(f[10], f[9]);
            assert_eq!(f[0], 1.0);
        }
    }

    #[test]
    fn invalid_arguments_rejected() {
        let bc = BoundaryPair::default();
        assert!(explicit_step_1d(&[0.0, 1.0], 1, 0.1, 0.1, 1.0, bc, 1).is_err());
        assert!(explicit_step_1d(&[0.0; 5], 1, 0.0, 0.1, 1.0, bc, 1).is_err());
        assert!(explicit_step_1d(&[0.0; 5], 1, 0.1, -0.1, 1.0, bc, 1).is_err());
        assert!(explicit_step_1d(&[0.0; 5], 1, 0.1, 0.1, 0.0, bc, 1).is_err());
        assert!(explicit_step_1d(&[0.0; 5], 1, 0.1, 0.1, 1.0, bc, 0).is_err());
        assert!(explicit_step_1d(&[0.0, f64::NAN, 0.0], 1, 0.1, 0.1, 1.0, bc, 1).is_err());
    }

    #[test]
    fn degenerate_sigma_rejected_before_stepping() {
        let bc = BoundaryPair::default();
        // dx^2 underflows to 0, so sigma would be infinite
        let err = explicit_step_1d(&[0.0, 1.0, 0.5, 0.0], 1, 1e-3, 1e-200, 1.0, bc, 1)
            .unwrap_err();
        assert!(matches!(err, SolverError::InvalidArgument { name: "sigma", .. }), "{err}");

        // alpha dt underflows to 0
        let err = explicit_step_1d(&[0.0, 1.0, 0.5, 0.0], 0, 1e-200, 1.0, 1e-200, bc, 1)
            .unwrap_err();
        assert!(matches!(err, SolverError::InvalidArgument { name: "sigma", .. }), "{err}");

        let t0 = Field2d::filled(3, 3, 1.0);
        let err = explicit_step_2d(&t0, 1, 1e-3, 1.0, 1e-200, 1.0, None).unwrap_err();
        assert!(matches!(err, SolverError::InvalidArgument { name: "sigma_y", .. }), "{err}");
    }

    #[test]
    fn edge_policies_only_see_validated_shapes() {
        // Neumann edges read the neighbour at n - 2, so thin inputs must stop at entry
        let bc = BoundaryPair::new(BoundaryKind::Neumann, BoundaryKind::Neumann);
        let err = explicit_step_1d(&[1.0], 1, 0.1, 1.0, 1.0, bc, 1).unwrap_err();
        assert!(matches!(err, SolverError::InvalidArgument { name: "nx", .. }), "{err}");

        let thin = Field2d::filled(4, 2, 1.0);
        let err = explicit_step_2d(&thin, 1, 0.1, 1.0, 1.0, 1.0, None).unwrap_err();
        assert!(matches!(err, SolverError::InvalidArgument { name: "nx", .. }), "{err}");

        let empty = Field2d::from_rows(&[]).unwrap();
        assert!(explicit_step_2d(&empty, 1, 0.1, 1.0, 1.0, 1.0, None).is_err());
    }

    #[test]
    fn plate_single_step() {
        let mut t0 = Field2d::filled(3, 3, 0.0);
        t0[(1, 1)] = 1.0;
        let t = explicit_step_2d(&t0, 1, 0.1, 1.0, 1.0, 1.0, None).unwrap();
        // sigma_x = sigma_y = 0.1
        assert_approx_eq!(f64, t[(1, 1)], 0.6, epsilon = 1e-12);
        assert_eq!(t[(0, 1)], 0.0);
    }

    #[test]
    fn plate_zero_steps() {
        let t0 = Field2d::filled(4, 5, 20.0);
        let t = explicit_step_2d(&t0, 0, 0.1, 1.0, 1.0, 1.0, Some(70.0)).unwrap();
        assert_eq!(t, t0);
    }

    #[test]
    fn plate_threshold_stops_early() {
        let mut t0 = Field2d::filled(5, 5, 100.0);
        t0[(2, 2)] = 20.0;
        let grid = Grid2d::new(5, 5, 1.0, 1.0).unwrap();
        let mut stepper = Ftcs2d::new(grid, TimeStep::new(1.0, 0.2).unwrap(), &t0).unwrap();
        let summary = stepper.run(1000, Some(70.0), &mut SnapshotRecorder::disabled());
        assert!(summary.threshold_reached);
        assert!(summary.steps_taken < 1000);
        assert!(stepper.center_value() >= 70.0);
    }

    #[test]
    fn plate_without_threshold_runs_all_steps() {
        let t0 = Field2d::filled(5, 5, 20.0);
        let grid = Grid2d::new(5, 5, 1.0, 1.0).unwrap();
        let mut stepper = Ftcs2d::new(grid, TimeStep::new(1.0, 0.2).unwrap(), &t0).unwrap();
        let mut rec = SnapshotRecorder::new(10).unwrap();
        let summary = stepper.run(35, Some(70.0), &mut rec);
        assert_eq!(
            summary,
            RunSummary {
                steps_taken: 35,
                threshold_reached: false
            }
        );
        assert_eq!(rec.len(), 4);
    }

    #[test]
    fn plate_neumann_edges_track_interior() {
        let mut t0 = Field2d::filled(6, 6, 0.0);
        for j in 0..6 {
            t0[(0, j)] = 100.0;
        }
        let grid = Grid2d::new(6, 6, 1.0, 1.0).unwrap();
        let edges = Edges {
            bottom: BoundaryKind::Neumann,
            ..Edges::default()
        };
        let mut stepper = Ftcs2d::new(grid, TimeStep::new(1.0, 0.2).unwrap(), &t0)
            .unwrap()
            .with_edges(edges);
        for _ in 0..20 {
            stepper.step();
            let f = stepper.field();
            for j in 1..5 {
                assert_eq!(f[(5, j)], f[(4, j)]);
            }
        }
    }
}
