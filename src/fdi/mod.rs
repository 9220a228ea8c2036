//! Floating Debris Index (FDI) estimation.
//!
//! A run turns a center point and radius into a [`bbox::BoundingBox`], obtains a
//! [`grid::RawGrid`] from a field source (remote imagery or the synthetic demo
//! generator) and summarizes it into a [`grid::NormalizedGrid`] plus the share of
//! the area above the high-concentration threshold.

pub mod bbox;
pub mod error;
pub mod grid;
pub mod pipeline;
pub mod remote;
pub mod summary;
pub mod synthetic;

pub use bbox::{BoundingBox, TimeWindow};
pub use error::{AnalysisError, GridError, SignalError, SourceError};
pub use grid::{NormalizedGrid, RawGrid};
pub use pipeline::{AnalysisRequest, AnalysisResult, FieldOrigin, SourceMode, run_analysis};
pub use remote::{RemoteSource, SentinelHubClient, UnconfiguredSource};

/// Kilometres per degree used to turn a radius into a degree delta.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Edge length of the square rasters produced by every field source.
pub const DEFAULT_RASTER_SIZE: usize = 512;
