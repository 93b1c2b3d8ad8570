use wasm_bindgen::prelude::*;
use diffusion_core::{
    BoundaryKind, BoundaryPair, Field2d, Ftcs2d, Grid2d, SnapshotRecorder, SolverError,
    SolverResult, TimeStep, explicit_step_1d, implicit_step_1d,
};

fn js_err(e: SolverError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_kind(s: &str) -> Result<BoundaryKind, JsValue> {
    s.parse().map_err(|e: String| JsValue::from_str(&e))
}

/// Explicit rod run. `left`/`right` are "dirichlet" or "neumann".
#[wasm_bindgen]
pub fn ftcs_1d(
    field: Vec<f64>,
    nt: usize,
    dt: f64,
    dx: f64,
    alpha: f64,
    left: &str,
    right: &str,
    sample_interval: usize,
) -> Result<RodRun, JsValue> {
    let bc = BoundaryPair::new(parse_kind(left)?, parse_kind(right)?);
    let t0 = now_ms();
    let mut run = explicit_rod(&field, nt, dt, dx, alpha, bc, sample_interval).map_err(js_err)?;
    run.compute_ms = now_ms() - t0;
    Ok(run)
}

/// Implicit rod run with flux `q` through the right end.
#[wasm_bindgen]
pub fn btcs_1d(
    field: Vec<f64>,
    nt: usize,
    dt: f64,
    dx: f64,
    alpha: f64,
    q: f64,
) -> Result<RodRun, JsValue> {
    let t0 = now_ms();
    let mut run = implicit_rod(&field, nt, dt, dx, alpha, q).map_err(js_err)?;
    run.compute_ms = now_ms() - t0;
    Ok(run)
}

/// Explicit plate run on a flat row-major `ny * nx` field. A non-finite
/// `threshold` (e.g. `Infinity`) disables the early stop; a
/// `sample_interval` of 0 keeps no snapshots.
#[wasm_bindgen]
pub fn ftcs_2d(
    field: Vec<f64>,
    nx: usize,
    ny: usize,
    nt: usize,
    dt: f64,
    dx: f64,
    dy: f64,
    alpha: f64,
    threshold: f64,
    sample_interval: usize,
) -> Result<PlateRun, JsValue> {
    let t0 = now_ms();
    let mut run = explicit_plate(field, nx, ny, nt, dt, dx, dy, alpha, threshold, sample_interval)
        .map_err(js_err)?;
    run.compute_ms = now_ms() - t0;
    Ok(run)
}

fn explicit_rod(
    field: &[f64],
    nt: usize,
    dt: f64,
    dx: f64,
    alpha: f64,
    bc: BoundaryPair,
    sample_interval: usize,
) -> SolverResult<RodRun> {
    let (field, frames) = explicit_step_1d(field, nt, dt, dx, alpha, bc, sample_interval)?;
    Ok(RodRun {
        field,
        frames,
        steps: nt,
        compute_ms: 0.0,
    })
}

fn implicit_rod(
    field: &[f64],
    nt: usize,
    dt: f64,
    dx: f64,
    alpha: f64,
    q: f64,
) -> SolverResult<RodRun> {
    Ok(RodRun {
        field: implicit_step_1d(field, nt, dt, dx, alpha, q)?,
        frames: Vec::new(),
        steps: nt,
        compute_ms: 0.0,
    })
}

#[allow(clippy::too_many_arguments)]
fn explicit_plate(
    field: Vec<f64>,
    nx: usize,
    ny: usize,
    nt: usize,
    dt: f64,
    dx: f64,
    dy: f64,
    alpha: f64,
    threshold: f64,
    sample_interval: usize,
) -> SolverResult<PlateRun> {
    let initial = Field2d::from_vec(ny, nx, field)?;
    let grid = Grid2d::new(nx, ny, dx, dy)?;
    let step = TimeStep::new(alpha, dt)?;
    let threshold = threshold.is_finite().then_some(threshold);
    let mut recorder = match sample_interval {
        0 => SnapshotRecorder::disabled(),
        k => SnapshotRecorder::new(k)?,
    };

    let mut stepper = Ftcs2d::new(grid, step, &initial)?;
    let summary = stepper.run(nt, threshold, &mut recorder);

    Ok(PlateRun {
        nx,
        ny,
        field: stepper.into_field().into_vec(),
        frames: recorder.into_frames().into_iter().map(Field2d::into_vec).collect(),
        steps: summary.steps_taken,
        threshold_reached: summary.threshold_reached,
        compute_ms: 0.0,
    })
}

#[wasm_bindgen]
pub struct RodRun {
    field: Vec<f64>,
    frames: Vec<Vec<f64>>,
    steps: usize,
    compute_ms: f64,
}

#[wasm_bindgen]
impl RodRun {
    // Copy-based JS access (reliable)
    pub fn field(&self) -> Vec<f64> { self.field.clone() }
    pub fn snapshot_count(&self) -> usize { self.frames.len() }
    pub fn snapshot(&self, k: usize) -> Option<Vec<f64>> { self.frames.get(k).cloned() }
    pub fn steps(&self) -> usize { self.steps }
    pub fn compute_ms(&self) -> f64 { self.compute_ms }
}

#[wasm_bindgen]
pub struct PlateRun {
    nx: usize,
    ny: usize,
    field: Vec<f64>,
    frames: Vec<Vec<f64>>,
    steps: usize,
    threshold_reached: bool,
    compute_ms: f64,
}

#[wasm_bindgen]
impl PlateRun {
    pub fn nx(&self) -> usize { self.nx }
    pub fn ny(&self) -> usize { self.ny }
    pub fn field(&self) -> Vec<f64> { self.field.clone() }
    /// Row-major `ny * nx` copy of frame `k`.
    pub fn snapshot(&self, k: usize) -> Option<Vec<f64>> { self.frames.get(k).cloned() }
    pub fn snapshot_count(&self) -> usize { self.frames.len() }
    pub fn steps(&self) -> usize { self.steps }
    pub fn threshold_reached(&self) -> bool { self.threshold_reached }
    pub fn compute_ms(&self) -> f64 { self.compute_ms }
}


fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rod_run_reports_steps_and_frames() {
        let t0 = vec![0.0, 1.0, 1.0, 1.0, 0.0];
        let run = explicit_rod(&t0, 7, 0.1, 1.0, 1.0, BoundaryPair::default(), 3).unwrap();
        assert_eq!(run.steps(), 7);
        // steps 0, 3, 6
        assert_eq!(run.snapshot_count(), 3);
        assert_eq!(run.snapshot(2), Some(run.field()));
        assert_eq!(run.snapshot(3), None);

        let run = implicit_rod(&t0, 4, 0.1, 1.0, 1.0, 0.0).unwrap();
        assert_eq!(run.steps(), 4);
        assert_eq!(run.snapshot_count(), 0);
    }

    #[test]
    fn plate_run_exposes_frames() {
        let mut t0 = vec![20.0; 25];
        t0[..5].fill(100.0);
        let run = explicit_plate(t0, 5, 5, 12, 0.2, 1.0, 1.0, 1.0, f64::INFINITY, 5).unwrap();
        assert!(!run.threshold_reached());
        assert_eq!(run.steps(), 12);
        // steps 0, 5, 10
        assert_eq!(run.snapshot_count(), 3);
        assert!(run.snapshot(0).is_some_and(|f| f.len() == 25));

        let run = explicit_plate(vec![20.0; 25], 5, 5, 12, 0.2, 1.0, 1.0, 1.0, 70.0, 0).unwrap();
        assert_eq!(run.snapshot_count(), 0);
    }

    #[test]
    fn plate_run_stops_at_threshold() {
        let mut t0 = vec![100.0; 25];
        t0[12] = 20.0;
        let run = explicit_plate(t0, 5, 5, 1000, 0.2, 1.0, 1.0, 1.0, 70.0, 1).unwrap();
        assert!(run.threshold_reached());
        assert!(run.steps() < 1000);
        assert_eq!(run.snapshot_count(), run.steps());
    }
}
