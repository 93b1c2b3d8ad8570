use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// One row of `meta.jsonl`, describing a stored snapshot.
#[derive(Serialize, Debug)]
pub struct SnapshotRow {
    pub frame_idx: usize,
    pub step_idx: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl SnapshotRow {
    pub fn describe(frame_idx: usize, step_idx: usize, values: &[f64]) -> SnapshotRow {
        let (mut min, mut max, mut sum) = (f64::INFINITY, f64::NEG_INFINITY, 0.0);
        for &v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        SnapshotRow {
            frame_idx,
            step_idx,
            min,
            max,
            mean: sum / values.len().max(1) as f64,
        }
    }
}

/// Everything a renderer needs to interpret the binaries, written to
/// `run.json`.
#[derive(Serialize, Debug)]
pub struct RunMeta {
    pub scheme: &'static str,
    pub ic_type: String,
    pub nx: usize,
    pub ny: Option<usize>,
    pub dx: f64,
    pub dy: Option<f64>,
    pub alpha: f64,
    pub dt: f64,
    pub sigma_x: f64,
    pub sigma_y: Option<f64>,
    pub steps_requested: usize,
    pub steps_taken: usize,
    pub threshold: Option<f64>,
    pub threshold_reached: Option<bool>,
    pub boundary: Vec<String>,
    pub flux_q: Option<f64>,
    pub sample_interval: Option<usize>,
    pub snapshot_count: usize,
    pub seed: Option<u64>,
    pub analytic_max_error: Option<f64>,
}

pub fn write_f64_vec<W: Write>(w: &mut W, v: &[f64]) -> std::io::Result<()> {
    for &x in v {
        w.write_all(&x.to_le_bytes())?;
    }
    Ok(())
}

/// Writes `field.bin`, `snapshots.bin`, `meta.jsonl` and `run.json` into
/// `out`.
pub fn write_run<'a, I>(out: &Path, field: &[f64], frames: I, meta: &RunMeta) -> Result<()>
where
    I: IntoIterator<Item = (usize, &'a [f64])>,
{
    fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;

    let mut field_writer = BufWriter::new(File::create(out.join("field.bin"))?);
    write_f64_vec(&mut field_writer, field)?;
    field_writer.flush()?;

    let mut snapshot_writer = BufWriter::new(File::create(out.join("snapshots.bin"))?);
    let mut meta_file = BufWriter::new(File::create(out.join("meta.jsonl"))?);
    for (frame_idx, (step_idx, frame)) in frames.into_iter().enumerate() {
        write_f64_vec(&mut snapshot_writer, frame)?;
        let row = SnapshotRow::describe(frame_idx, step_idx, frame);
        serde_json::to_writer(&mut meta_file, &row)?;
        meta_file.write_all(b"\n")?;
    }
    snapshot_writer.flush()?;
    meta_file.flush()?;

    let run_file = BufWriter::new(File::create(out.join("run.json"))?);
    serde_json::to_writer_pretty(run_file, meta).context("writing run.json")?;
    Ok(())
}
