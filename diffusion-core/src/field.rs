use std::ops::{Index, IndexMut};

use crate::error::{SolverError, SolverResult};

/// Row-major `ny × nx` temperature field. `(row, col)` indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct Field2d {
    nx: usize,
    ny: usize,
    data: Vec<f64>,
}

impl Field2d {
    pub fn filled(ny: usize, nx: usize, value: f64) -> Field2d {
        Field2d {
            nx,
            ny,
            data: vec![value; nx * ny],
        }
    }

    pub fn from_vec(ny: usize, nx: usize, data: Vec<f64>) -> SolverResult<Field2d> {
        if data.len() != nx * ny {
            return Err(SolverError::invalid(
                "initial_field",
                format!("{} values cannot fill {ny} x {nx}", data.len()),
            ));
        }
        Ok(Field2d { nx, ny, data })
    }

    /// Builds a field from row vectors; every row must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> SolverResult<Field2d> {
        let ny = rows.len();
        let nx = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(nx * ny);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != nx {
                return Err(SolverError::invalid(
                    "initial_field",
                    format!("row {i} has {} values, expected {nx}", row.len()),
                ));
            }
            data.extend_from_slice(row);
        }
        Ok(Field2d { nx, ny, data })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.nx..(i + 1) * self.nx]
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        if self.nx == 0 {
            return Vec::new();
        }
        self.data.chunks(self.nx).map(<[f64]>::to_vec).collect()
    }

    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    #[inline]
    fn offset(&self, (i, j): (usize, usize)) -> usize {
        debug_assert!(i < self.ny && j < self.nx);
        i * self.nx + j
    }
}

impl Index<(usize, usize)> for Field2d {
    type Output = f64;

    fn index(&self, at: (usize, usize)) -> &f64 {
        &self.data[self.offset(at)]
    }
}

impl IndexMut<(usize, usize)> for Field2d {
    fn index_mut(&mut self, at: (usize, usize)) -> &mut f64 {
        let k = self.offset(at);
        &mut self.data[k]
    }
}
