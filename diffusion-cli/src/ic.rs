use std::f64::consts::PI;

use clap::ValueEnum;
use diffusion_core::Field2d;
use rand::Rng;

/// Initial temperature profile of a rod.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum IcType {
    /// sin(pi x / L), zero at both ends
    Sine,
    /// cold interior between two fixed end temperatures
    Step,
    /// blurred random interior in [0,1], zero ends
    SmoothNoise,
}

impl IcType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IcType::Sine => "sine",
            IcType::Step => "step",
            IcType::SmoothNoise => "smooth_noise",
        }
    }
}

/// End values used by [`IcType::Step`].
#[derive(Clone, Copy, Debug)]
pub struct StepEnds {
    pub left: f64,
    pub right: f64,
}

/// Fill a rod of `x.len()` nodes spanning `[0, x[last]]`.
pub fn generate_rod_ic<R: Rng>(rng: &mut R, x: &[f64], ic: IcType, ends: StepEnds) -> Vec<f64> {
    let n = x.len();
    let length = x[n - 1];

    match ic {
        IcType::Sine => x.iter().map(|&xi| (PI * xi / length).sin()).collect(),

        IcType::Step => {
            let mut f = vec![0.0; n];
            f[0] = ends.left;
            f[n - 1] = ends.right;
            f
        }

        IcType::SmoothNoise => {
            let mut f: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();
            f = box_blur(&f, 2);
            normalize_01(&mut f);
            f[0] = 0.0;
            f[n - 1] = 0.0;
            f
        }
    }
}

/// Plate at `interior` with the selected edges held at `hot`.
pub fn generate_plate_ic(
    ny: usize,
    nx: usize,
    interior: f64,
    hot: f64,
    hot_edges: &[PlateEdge],
) -> Field2d {
    let mut f = Field2d::filled(ny, nx, interior);
    for edge in hot_edges {
        match edge {
            PlateEdge::Top => (0..nx).for_each(|j| f[(0, j)] = hot),
            PlateEdge::Bottom => (0..nx).for_each(|j| f[(ny - 1, j)] = hot),
            PlateEdge::Left => (0..ny).for_each(|i| f[(i, 0)] = hot),
            PlateEdge::Right => (0..ny).for_each(|i| f[(i, nx - 1)] = hot),
        }
    }
    f
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PlateEdge {
    Top,
    Bottom,
    Left,
    Right,
}

fn normalize_01(f: &mut [f64]) {
    let mut mx = 0.0f64;
    for &v in f.iter() {
        if v > mx {
            mx = v;
        }
    }
    if mx > 0.0 {
        for v in f.iter_mut() {
            *v = (*v / mx).clamp(0.0, 1.0);
        }
    }
}

fn box_blur(src: &[f64], passes: usize) -> Vec<f64> {
    let n = src.len();
    let mut cur = src.to_vec();
    let mut tmp = vec![0.0f64; n];

    for _ in 0..passes {
        for i in 0..n {
            let lo = i.saturating_sub(1);
            let hi = (i + 1).min(n - 1);
            let window = &cur[lo..=hi];
            tmp[i] = window.iter().sum::<f64>() / window.len() as f64;
        }
        std::mem::swap(&mut cur, &mut tmp);
    }
    cur
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn coords(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64 / (n - 1) as f64).collect()
    }

    #[test]
    fn step_sets_only_ends() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let ends = StepEnds { left: 1.0, right: 0.2 };
        let f = generate_rod_ic(&mut rng, &coords(6), IcType::Step, ends);
        assert_eq!(f, vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.2]);
    }

    #[test]
    fn sine_peaks_mid_rod() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let ends = StepEnds { left: 0.0, right: 0.0 };
        let f = generate_rod_ic(&mut rng, &coords(5), IcType::Sine, ends);
        assert!((f[2] - 1.0).abs() < 1e-15);
        assert!(f[4].abs() < 1e-15);
    }

    #[test]
    fn smooth_noise_is_reproducible_and_bounded() {
        let ends = StepEnds { left: 0.0, right: 0.0 };
        let a = generate_rod_ic(&mut ChaCha8Rng::seed_from_u64(7), &coords(40), IcType::SmoothNoise, ends);
        let b = generate_rod_ic(&mut ChaCha8Rng::seed_from_u64(7), &coords(40), IcType::SmoothNoise, ends);
        assert_eq!(a, b);
        assert_eq!(a[0], 0.0);
        assert_eq!(a[39], 0.0);
        assert!(a.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn plate_edges() {
        let f = generate_plate_ic(4, 5, 20.0, 100.0, &[PlateEdge::Top, PlateEdge::Left]);
        assert_eq!(f.row(0), &[100.0; 5]);
        assert_eq!(f[(3, 0)], 100.0);
        assert_eq!(f[(3, 4)], 20.0);
        assert_eq!(f[(1, 1)], 20.0);
    }
}
