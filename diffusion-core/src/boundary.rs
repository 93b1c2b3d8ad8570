//! Boundary policies applied after each interior update.
//!
//! Dirichlet nodes are never written: whatever value the initial field
//! carries there stays for the whole run. Neumann nodes copy their interior
//! neighbour, giving a zero-gradient edge.

use std::fmt;
use std::str::FromStr;

use crate::field::Field2d;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryKind {
    #[default]
    Dirichlet,
    Neumann,
}

impl BoundaryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryKind::Dirichlet => "dirichlet",
            BoundaryKind::Neumann => "neumann",
        }
    }

    pub fn is_neumann(&self) -> bool {
        matches!(self, BoundaryKind::Neumann)
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundaryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dirichlet" => Ok(BoundaryKind::Dirichlet),
            "neumann" => Ok(BoundaryKind::Neumann),
            other => Err(format!("unknown boundary kind `{other}`")),
        }
    }
}

/// Left/right policy of a 1D rod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundaryPair {
    pub left: BoundaryKind,
    pub right: BoundaryKind,
}

impl BoundaryPair {
    pub fn new(left: BoundaryKind, right: BoundaryKind) -> BoundaryPair {
        BoundaryPair { left, right }
    }

    pub(crate) fn apply(&self, field: &mut [f64]) {
        let n = field.len();
        if self.left.is_neumann() {
            field[0] = field[1];
        }
        if self.right.is_neumann() {
            field[n - 1] = field[n - 2];
        }
    }
}

/// Per-edge policy of a 2D plate. `top` is row 0, `left` is column 0.
///
/// Neumann edges copy along their interior span only; corner nodes are not
/// read by the 5-point stencil and keep their initial values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub top: BoundaryKind,
    pub bottom: BoundaryKind,
    pub left: BoundaryKind,
    pub right: BoundaryKind,
}

impl Edges {
    pub fn all(kind: BoundaryKind) -> Edges {
        Edges {
            top: kind,
            bottom: kind,
            left: kind,
            right: kind,
        }
    }

    pub(crate) fn apply(&self, field: &mut Field2d) {
        let (ny, nx) = (field.ny(), field.nx());
        for j in 1..nx - 1 {
            if self.top.is_neumann() {
                field[(0, j)] = field[(1, j)];
            }
            if self.bottom.is_neumann() {
                field[(ny - 1, j)] = field[(ny - 2, j)];
            }
        }
        for i in 1..ny - 1 {
            if self.left.is_neumann() {
                field[(i, 0)] = field[(i, 1)];
            }
            if self.right.is_neumann() {
                field[(i, nx - 1)] = field[(i, nx - 2)];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kinds() {
        assert_eq!("Neumann".parse::<BoundaryKind>(), Ok(BoundaryKind::Neumann));
        assert_eq!(" dirichlet ".parse::<BoundaryKind>(), Ok(BoundaryKind::Dirichlet));
        assert!("robin".parse::<BoundaryKind>().is_err());
        assert_eq!(BoundaryKind::Neumann.to_string(), "neumann");
    }

    #[test]
    fn pair_leaves_dirichlet_alone() {
        let mut f = vec![1.0, 0.5, 0.25, 0.2];
        BoundaryPair::default().apply(&mut f);
        assert_eq!(f, vec![1.0, 0.5, 0.25, 0.2]);
    }

    #[test]
    fn pair_copies_neighbour_on_neumann() {
        let mut f = vec![1.0, 0.5, 0.25, 0.2];
        BoundaryPair::new(BoundaryKind::Dirichlet, BoundaryKind::Neumann).apply(&mut f);
        assert_eq!(f, vec![1.0, 0.5, 0.25, 0.25]);
        BoundaryPair::new(BoundaryKind::Neumann, BoundaryKind::Dirichlet).apply(&mut f);
        assert_eq!(f, vec![0.5, 0.5, 0.25, 0.25]);
    }

    #[test]
    fn edges_skip_corners() {
        let rows: Vec<Vec<f64>> = (0..4)
            .map(|i| (0..4).map(|j| (10 * i + j) as f64).collect())
            .collect();
        let mut f = Field2d::from_rows(&rows).unwrap();
        Edges::all(BoundaryKind::Neumann).apply(&mut f);
        assert_eq!(f.row(0), &[0.0, 11.0, 12.0, 3.0]);
        assert_eq!(f.row(3), &[30.0, 21.0, 22.0, 33.0]);
        assert_eq!(f[(1, 0)], 11.0);
        assert_eq!(f[(2, 3)], 22.0);
    }
}
