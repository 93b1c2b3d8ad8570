//! Finite-difference time stepping for the heat equation on uniform 1D and
//! 2D grids.
//!
//! Three entry points cover the usual experiments:
//!
//! - [`explicit_step_1d`]: FTCS on a rod with Dirichlet/Neumann ends and
//!   periodic snapshots,
//! - [`explicit_step_2d`]: FTCS on a plate, stopping early once the centre
//!   cell reaches a threshold,
//! - [`implicit_step_1d`]: BTCS on a rod with a fixed left value and a
//!   constant flux through the right end.
//!
//! The stepper types behind them ([`Ftcs1d`], [`Ftcs2d`], [`Btcs1d`]) can be
//! driven step by step. Arguments are validated before any stepping; the
//! explicit stability limit is only logged.

pub mod analytic;
pub mod boundary;
pub mod error;
pub mod explicit;
pub mod field;
pub mod grid;
pub mod implicit;
pub mod snapshot;
pub mod tridiag;

pub use boundary::{BoundaryKind, BoundaryPair, Edges};
pub use error::{SolverError, SolverResult};
pub use explicit::{Ftcs1d, Ftcs2d, RunSummary, explicit_step_1d, explicit_step_2d};
pub use field::Field2d;
pub use grid::{EXPLICIT_STABILITY_LIMIT, Grid1d, Grid2d, MIN_NODES, TimeStep};
pub use implicit::{Btcs1d, implicit_step_1d};
pub use snapshot::{DEFAULT_SAMPLE_INTERVAL, SnapshotRecorder};
pub use tridiag::Tridiagonal;
