use thiserror::Error;

/// Reasons a field source could not produce a grid.
///
/// The pipeline treats every variant the same way (fall back to the synthetic
/// field); the variants only exist so the real cause can be logged and shown
/// as the fallback reason.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("remote provider was not selected")]
    NotSelected,
    #[error("remote provider credentials are not configured")]
    NotConfigured,
    #[error("authentication with the imagery provider failed: {0}")]
    Auth(String),
    #[error("imagery request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("imagery provider answered HTTP {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("could not decode provider raster: {0}")]
    Decode(String),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Shape problems when building a grid.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("grid size must be at least 2, got {0}")]
    TooSmall(usize),
    #[error("expected {expected} values for a {width}x{height} grid, got {actual}")]
    ShapeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
    #[error("normalized value {0} is outside [0, 1]")]
    OutOfUnitRange(f32),
}

/// Degenerate inputs for which no concentration can be derived.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SignalError {
    #[error("every cell of the grid is missing")]
    AllMissing,
    #[error("grid has no dynamic range (all valid cells equal {value})")]
    FlatSignal { value: f32 },
}

/// Errors returned to the caller of a run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid analysis request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Grid(#[from] GridError),
}
