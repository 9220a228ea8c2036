//! Normalization of raw index grids and the high-concentration area share.

use super::error::SignalError;
use super::grid::{NormalizedGrid, RawGrid};

/// Normalized values strictly above this count as high concentration.
pub const HIGH_CONCENTRATION_THRESHOLD: f32 = 0.7;

/// Area fractions are reported as percentages.
pub const PERCENT: f64 = 100.0;

/// Normalized grid plus the area share derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub normalized: NormalizedGrid,
    /// Percentage of all cells (missing ones included) above the threshold.
    pub area_fraction: f64,
}

/// Rescales valid cells to `[0, 1]` using the min and max of non-missing cells.
///
/// Missing cells (`NaN` or infinite) come out as `NaN`. A grid without valid cells, or whose valid cells
/// are all equal, carries no signal and is rejected instead of dividing by zero.
pub fn normalize(grid: &RawGrid) -> Result<NormalizedGrid, SignalError> {
    let (min, max) = grid.valid_range().ok_or(SignalError::AllMissing)?;
    if max <= min {
        return Err(SignalError::FlatSignal { value: min });
    }
    // In f64 so extreme finite values cannot overflow the range.
    let (lo, range) = (min as f64, max as f64 - min as f64);

    let values = grid
        .values()
        .iter()
        .map(|&v| {
            if v.is_finite() {
                ((v as f64 - lo) / range) as f32
            } else {
                f32::NAN
            }
        })
        .collect();
    Ok(NormalizedGrid::from_parts(grid.width(), grid.height(), values))
}

/// Percentage of cells strictly above `threshold`.
///
/// The denominator is the total cell count: missing cells count against the
/// area rather than being excluded from it.
pub fn area_fraction(grid: &NormalizedGrid, threshold: f32) -> f64 {
    if grid.is_empty() {
        return 0.0;
    }
    // NaN comparisons are false, so missing cells never count as above.
    let above = grid.values().iter().filter(|&&v| v > threshold).count();
    above as f64 / grid.len() as f64 * PERCENT
}

pub fn summarize(grid: &RawGrid) -> Result<Summary, SignalError> {
    let normalized = normalize(grid)?;
    let area_fraction = area_fraction(&normalized, HIGH_CONCENTRATION_THRESHOLD);
    Ok(Summary {
        normalized,
        area_fraction,
    })
}
