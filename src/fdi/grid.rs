use super::error::GridError;

/// Index values as produced by a field source. `NaN` marks a missing cell;
/// infinities are treated as missing too.
///
/// Values are stored row-major, row 0 being the northern edge of the box.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGrid {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl RawGrid {
    pub fn new(width: usize, height: usize, values: Vec<f32>) -> Result<Self, GridError> {
        check_shape(width, height, values.len())?;
        Ok(RawGrid {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        (x < self.width && y < self.height).then(|| self.values[y * self.width + x])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Minimum and maximum over finite cells, `None` when there are none.
    pub fn valid_range(&self) -> Option<(f32, f32)> {
        valid_range(&self.values)
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_finite()).count()
    }
}

/// A [`RawGrid`] rescaled so valid cells span exactly `[0, 1]`.
///
/// Every value is either in `[0, 1]` or `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGrid {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl NormalizedGrid {
    /// Wraps values that are already normalized, checking they lie in `[0, 1]`.
    pub fn new(width: usize, height: usize, values: Vec<f32>) -> Result<Self, GridError> {
        check_shape(width, height, values.len())?;
        if let Some(&value) = values.iter().find(|v| !v.is_nan() && !(0.0..=1.0).contains(*v)) {
            return Err(GridError::OutOfUnitRange(value));
        }
        Ok(NormalizedGrid::from_parts(width, height, values))
    }

    pub(crate) fn from_parts(width: usize, height: usize, values: Vec<f32>) -> Self {
        debug_assert_eq!(width * height, values.len());
        NormalizedGrid {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        (x < self.width && y < self.height).then(|| self.values[y * self.width + x])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }

    /// Rows of optional values, `None` for missing cells.
    pub fn rows(&self) -> Vec<Vec<Option<f32>>> {
        self.values
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|v| (!v.is_nan()).then_some(*v)).collect())
            .collect()
    }
}

fn check_shape(width: usize, height: usize, actual: usize) -> Result<(), GridError> {
    let expected = width * height;
    if expected != actual {
        return Err(GridError::ShapeMismatch {
            width,
            height,
            expected,
            actual,
        });
    }
    Ok(())
}

fn valid_range(values: &[f32]) -> Option<(f32, f32)> {
    values
        .iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
