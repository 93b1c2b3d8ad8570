use std::num::NonZeroUsize;

use tracing::trace;

use crate::error::{SolverError, SolverResult};

pub const DEFAULT_SAMPLE_INTERVAL: usize = 200;

/// Keeps a copy of the field every `interval` steps.
///
/// A frame is taken after the step with 0-based index `s` whenever
/// `s % interval == 0`, so the first frame shows the field after one step
/// and a zero-step run records nothing. Recording never feeds back into the
/// simulation.
#[derive(Debug, Clone)]
pub struct SnapshotRecorder<T> {
    interval: Option<NonZeroUsize>,
    frames: Vec<T>,
    steps: Vec<usize>,
}

impl<T: Clone> SnapshotRecorder<T> {
    pub fn new(interval: usize) -> SolverResult<SnapshotRecorder<T>> {
        let interval = NonZeroUsize::new(interval)
            .ok_or_else(|| SolverError::invalid("sample_interval", "must be >= 1"))?;
        Ok(SnapshotRecorder {
            interval: Some(interval),
            frames: Vec::new(),
            steps: Vec::new(),
        })
    }

    /// A recorder that never stores anything.
    pub fn disabled() -> SnapshotRecorder<T> {
        SnapshotRecorder {
            interval: None,
            frames: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn interval(&self) -> Option<usize> {
        self.interval.map(NonZeroUsize::get)
    }

    pub fn observe(&mut self, step: usize, field: &T) {
        let Some(k) = self.interval else { return };
        if step % k.get() == 0 {
            trace!(step, frame = self.frames.len(), "snapshot");
            self.frames.push(field.clone());
            self.steps.push(step);
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[T] {
        &self.frames
    }

    /// 0-based step index each frame was taken after.
    pub fn steps(&self) -> &[usize] {
        &self.steps
    }

    pub fn into_frames(self) -> Vec<T> {
        self.frames
    }
}
