mod ic;
mod output;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use diffusion_core::analytic::{max_abs_error, sine_mode};
use diffusion_core::{
    Btcs1d, BoundaryKind, BoundaryPair, Edges, Ftcs1d, Ftcs2d, Grid1d, Grid2d, SnapshotRecorder,
    TimeStep,
};
use ic::{IcType, PlateEdge, StepEnds, generate_plate_ic, generate_rod_ic};
use output::{RunMeta, write_run};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Explicit (FTCS) run on a rod
    Ftcs1d(Ftcs1dArgs),
    /// Explicit (FTCS) run on a plate with a centre-temperature stop
    Ftcs2d(Ftcs2dArgs),
    /// Implicit (BTCS) run on a rod with a flux through the right end
    Btcs1d(Btcs1dArgs),
}

#[derive(Args, Debug)]
struct RodArgs {
    /// Output directory
    #[arg(long)]
    out: PathBuf,

    /// Node count
    #[arg(long, default_value_t = 51)]
    nx: usize,

    /// Rod length
    #[arg(long, default_value_t = 1.0)]
    length: f64,

    /// Thermal diffusivity
    #[arg(long, default_value_t = 1.22e-3)]
    alpha: f64,

    /// Stability ratio alpha dt / dx^2; dt is derived from it
    #[arg(long, default_value_t = 0.5)]
    sigma: f64,

    /// Initial condition
    #[arg(long, value_enum, default_value_t = IcType::Sine)]
    ic: IcType,

    /// Left end value for the step initial condition
    #[arg(long, default_value_t = 1.0)]
    left_value: f64,

    /// Right end value for the step initial condition
    #[arg(long, default_value_t = 0.2)]
    right_value: f64,

    /// RNG seed for noisy initial conditions
    #[arg(long, default_value_t = 123)]
    seed: u64,
}

#[derive(Args, Debug)]
struct Ftcs1dArgs {
    #[command(flatten)]
    rod: RodArgs,

    /// Number of time steps
    #[arg(long, default_value_t = 1801)]
    nt: usize,

    /// Left boundary (dirichlet|neumann)
    #[arg(long, default_value = "dirichlet")]
    left: BoundaryKind,

    /// Right boundary (dirichlet|neumann)
    #[arg(long, default_value = "dirichlet")]
    right: BoundaryKind,

    /// Keep a snapshot every this many steps
    #[arg(long, default_value_t = diffusion_core::DEFAULT_SAMPLE_INTERVAL)]
    sample_interval: usize,
}

#[derive(Args, Debug)]
struct Btcs1dArgs {
    #[command(flatten)]
    rod: RodArgs,

    /// Number of time steps
    #[arg(long, default_value_t = 100)]
    nt: usize,

    /// Constant flux through the right end
    #[arg(long, default_value_t = 0.0)]
    q: f64,

    /// Keep a snapshot every this many steps (0 disables)
    #[arg(long, default_value_t = 0)]
    sample_interval: usize,
}

#[derive(Args, Debug)]
struct Ftcs2dArgs {
    /// Output directory
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 24)]
    nx: usize,

    #[arg(long, default_value_t = 24)]
    ny: usize,

    #[arg(long, default_value_t = 1.0)]
    lx: f64,

    #[arg(long, default_value_t = 1.0)]
    ly: f64,

    /// Thermal diffusivity
    #[arg(long, default_value_t = 1e-4)]
    alpha: f64,

    /// Stability ratio along the finer axis; dt is derived from it
    #[arg(long, default_value_t = 0.25)]
    sigma: f64,

    /// Maximum number of time steps
    #[arg(long, default_value_t = 500)]
    nt: usize,

    /// Initial interior temperature
    #[arg(long, default_value_t = 20.0)]
    interior: f64,

    /// Temperature of the hot edges
    #[arg(long, default_value_t = 100.0)]
    boundary: f64,

    /// Comma-separated edges held at the boundary temperature
    #[arg(long, value_enum, value_delimiter = ',', default_value = "top,left")]
    hot_edges: Vec<PlateEdge>,

    /// Comma-separated edges with a zero-gradient condition
    #[arg(long, value_enum, value_delimiter = ',')]
    neumann_edges: Vec<PlateEdge>,

    /// Stop once the centre cell reaches this temperature
    #[arg(long, default_value_t = 70.0)]
    threshold: f64,

    /// Run all steps regardless of the centre temperature
    #[arg(long)]
    no_threshold: bool,

    /// Keep a snapshot every this many steps (0 disables)
    #[arg(long, default_value_t = 0)]
    sample_interval: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Ftcs1d(args) => run_ftcs_1d(args),
        Command::Ftcs2d(args) => run_ftcs_2d(args),
        Command::Btcs1d(args) => run_btcs_1d(args),
    }
}

/// 0 turns recording off for the commands where snapshots are optional.
fn optional_recorder<T: Clone>(sample_interval: usize) -> Result<SnapshotRecorder<T>> {
    if sample_interval == 0 {
        return Ok(SnapshotRecorder::disabled());
    }
    Ok(SnapshotRecorder::new(sample_interval)?)
}

/// Grid, time step and initial field shared by both rod commands.
fn setup_rod(rod: &RodArgs) -> Result<(Grid1d, TimeStep, Vec<f64>)> {
    let grid = Grid1d::with_length(rod.nx, rod.length).context("building rod grid")?;
    let dt = grid.dt_for_sigma(rod.alpha, rod.sigma)?;
    let step = TimeStep::new(rod.alpha, dt)?;

    let mut rng = ChaCha8Rng::seed_from_u64(rod.seed);
    let ends = StepEnds {
        left: rod.left_value,
        right: rod.right_value,
    };
    let t0 = generate_rod_ic(&mut rng, &grid.coords(), rod.ic, ends);
    Ok((grid, step, t0))
}

fn run_ftcs_1d(args: Ftcs1dArgs) -> Result<()> {
    let rod = &args.rod;
    let (grid, step, t0) = setup_rod(rod)?;
    let bc = BoundaryPair::new(args.left, args.right);

    let mut rec = SnapshotRecorder::new(args.sample_interval)?;
    let mut stepper = Ftcs1d::new(grid, step, bc, &t0)?;
    stepper.run(args.nt, &mut rec);
    let sigma = stepper.sigma();
    let field = stepper.into_field();

    // exact decay only exists for the sine profile between zero Dirichlet ends
    let compare = rod.ic == IcType::Sine && bc == BoundaryPair::default();
    let analytic_max_error = compare
        .then(|| {
            let t_end = args.nt as f64 * step.dt();
            let exact = sine_mode(&grid.coords(), grid.length(), step.alpha(), t_end);
            max_abs_error(&field, &exact)
        })
        .transpose()?;
    if let Some(err) = analytic_max_error {
        info!(err, "max deviation from the analytic sine decay");
    }

    let meta = RunMeta {
        scheme: "ftcs1d",
        ic_type: rod.ic.as_str().to_string(),
        nx: grid.nx(),
        ny: None,
        dx: grid.dx(),
        dy: None,
        alpha: step.alpha(),
        dt: step.dt(),
        sigma_x: sigma,
        sigma_y: None,
        steps_requested: args.nt,
        steps_taken: args.nt,
        threshold: None,
        threshold_reached: None,
        boundary: vec![args.left.to_string(), args.right.to_string()],
        flux_q: None,
        sample_interval: rec.interval(),
        snapshot_count: rec.len(),
        seed: (rod.ic == IcType::SmoothNoise).then_some(rod.seed),
        analytic_max_error,
    };
    let frames = rec.steps().iter().copied().zip(rec.frames().iter().map(Vec::as_slice));
    write_run(&rod.out, &field, frames, &meta)?;

    info!(out = %rod.out.display(), snapshots = rec.len(), "ftcs1d done");
    Ok(())
}

fn run_btcs_1d(args: Btcs1dArgs) -> Result<()> {
    let rod = &args.rod;
    let (grid, step, t0) = setup_rod(rod)?;

    let mut rec = optional_recorder(args.sample_interval)?;
    let mut stepper = Btcs1d::new(grid, step, args.q, &t0)?;
    stepper.run(args.nt, &mut rec).context("implicit solve failed")?;
    let sigma = stepper.sigma();
    let field = stepper.into_field();

    let meta = RunMeta {
        scheme: "btcs1d",
        ic_type: rod.ic.as_str().to_string(),
        nx: grid.nx(),
        ny: None,
        dx: grid.dx(),
        dy: None,
        alpha: step.alpha(),
        dt: step.dt(),
        sigma_x: sigma,
        sigma_y: None,
        steps_requested: args.nt,
        steps_taken: args.nt,
        threshold: None,
        threshold_reached: None,
        boundary: vec![BoundaryKind::Dirichlet.to_string(), "flux".to_string()],
        flux_q: Some(args.q),
        sample_interval: rec.interval(),
        snapshot_count: rec.len(),
        seed: (rod.ic == IcType::SmoothNoise).then_some(rod.seed),
        analytic_max_error: None,
    };
    let frames = rec.steps().iter().copied().zip(rec.frames().iter().map(Vec::as_slice));
    write_run(&rod.out, &field, frames, &meta)?;

    info!(out = %rod.out.display(), "btcs1d done");
    Ok(())
}

fn run_ftcs_2d(args: Ftcs2dArgs) -> Result<()> {
    let grid = Grid2d::with_lengths(args.nx, args.ny, args.lx, args.ly)
        .context("building plate grid")?;
    let dt = grid.dt_for_sigma(args.alpha, args.sigma)?;
    let step = TimeStep::new(args.alpha, dt)?;

    let t0 = generate_plate_ic(args.ny, args.nx, args.interior, args.boundary, &args.hot_edges);
    let mut edges = Edges::default();
    for edge in &args.neumann_edges {
        match edge {
            PlateEdge::Top => edges.top = BoundaryKind::Neumann,
            PlateEdge::Bottom => edges.bottom = BoundaryKind::Neumann,
            PlateEdge::Left => edges.left = BoundaryKind::Neumann,
            PlateEdge::Right => edges.right = BoundaryKind::Neumann,
        }
    }
    let threshold = (!args.no_threshold).then_some(args.threshold);

    let mut rec = optional_recorder(args.sample_interval)?;
    let mut stepper = Ftcs2d::new(grid, step, &t0)?.with_edges(edges);
    let summary = stepper.run(args.nt, threshold, &mut rec);
    let (sigma_x, sigma_y) = stepper.sigmas();
    let center = stepper.center_value();
    let field = stepper.into_field();

    if summary.threshold_reached {
        info!(steps = summary.steps_taken, center, "centre reached threshold");
    } else {
        info!(steps = summary.steps_taken, center, "ran all steps");
    }

    let meta = RunMeta {
        scheme: "ftcs2d",
        ic_type: "plate".to_string(),
        nx: grid.nx(),
        ny: Some(grid.ny()),
        dx: grid.dx(),
        dy: Some(grid.dy()),
        alpha: step.alpha(),
        dt: step.dt(),
        sigma_x,
        sigma_y: Some(sigma_y),
        steps_requested: args.nt,
        steps_taken: summary.steps_taken,
        threshold,
        threshold_reached: Some(summary.threshold_reached),
        boundary: [edges.top, edges.bottom, edges.left, edges.right]
            .iter()
            .map(ToString::to_string)
            .collect(),
        flux_q: None,
        sample_interval: rec.interval(),
        snapshot_count: rec.len(),
        seed: None,
        analytic_max_error: None,
    };
    let frames = rec
        .steps()
        .iter()
        .copied()
        .zip(rec.frames().iter().map(|f| f.as_slice()));
    write_run(&args.out, field.as_slice(), frames, &meta)?;

    info!(out = %args.out.display(), "ftcs2d done");
    Ok(())
}
