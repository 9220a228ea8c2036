//! Demo field used when no imagery is available.
//!
//! Three Gaussian bumps over a `[-3, 3] x [-3, 3]` plane with a little white
//! noise on top, rescaled to `[0, 1]`. The shape is fixed; only the noise
//! changes between calls.

use super::error::GridError;
use super::grid::RawGrid;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Half-width of the sampled coordinate plane.
pub const COORD_EXTENT: f64 = 3.0;

/// `(cx, cy)` centers of the unit-variance bumps.
pub const BUMP_CENTERS: [(f64, f64); 3] = [(1.2, -0.8), (-1.5, 0.4), (0.6, 1.3)];

pub const NOISE_STD_DEV: f64 = 0.05;

/// Builds a `size x size` demo field with values in `[0, 1]`.
///
/// Noise is drawn from `rng`, row by row, so a seeded generator reproduces
/// the field exactly.
pub fn synthesize<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<RawGrid, GridError> {
    if size < 2 {
        return Err(GridError::TooSmall(size));
    }
    let axis = linspace(-COORD_EXTENT, COORD_EXTENT, size);
    let mut field = Vec::with_capacity(size * size);
    for &y in &axis {
        for &x in &axis {
            let noise: f64 = StandardNormal.sample(rng);
            field.push(bumps(x, y) + noise * NOISE_STD_DEV);
        }
    }

    // No missing cells here, so the range always exists; noise makes it non-zero.
    let (min, max) = field
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    let values: Vec<f32> = field
        .into_iter()
        .map(|v| if range > 0.0 { ((v - min) / range) as f32 } else { 0.0 })
        .collect();

    RawGrid::new(size, size, values)
}

/// Noise-free field value at `(x, y)`.
pub fn bumps(x: f64, y: f64) -> f64 {
    BUMP_CENTERS
        .iter()
        .map(|(cx, cy)| (-((x - cx).powi(2) + (y - cy).powi(2))).exp())
        .sum()
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n)
        .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_linspace_endpoints() {
        let axis = linspace(-3.0, 3.0, 7);
        assert_eq!(axis, vec![-3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_rejects_tiny_grids() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(synthesize(0, &mut rng).unwrap_err(), GridError::TooSmall(0));
        assert_eq!(synthesize(1, &mut rng).unwrap_err(), GridError::TooSmall(1));
    }

    #[test]
    fn test_peaks_sit_on_bump_centers() {
        for (cx, cy) in BUMP_CENTERS {
            let at_center = bumps(cx, cy);
            assert!(at_center > bumps(cx + 0.5, cy));
            assert!(at_center > bumps(cx, cy - 0.5));
        }
        // Far corner is almost flat.
        assert!(bumps(-3.0, -3.0) < 0.01);
    }

    #[test]
    fn test_seed_reproduces_field() {
        let a = synthesize(32, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = synthesize(32, &mut StdRng::seed_from_u64(7)).unwrap();
        let c = synthesize(32, &mut StdRng::seed_from_u64(8)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
