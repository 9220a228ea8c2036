// Properties of the FDI core: bounding boxes, demo field, normalization,
// area share and the remote-to-synthetic fallback.

mod common;

use chrono::Utc;
use common::test_router::FailingSource;
use plastic_map_api::fdi::pipeline::RunSettings;
use plastic_map_api::fdi::summary::{HIGH_CONCENTRATION_THRESHOLD, area_fraction, normalize};
use plastic_map_api::fdi::synthetic::synthesize;
use plastic_map_api::fdi::{
    AnalysisRequest, BoundingBox, FieldOrigin, NormalizedGrid, RawGrid, SignalError, SourceMode,
    UnconfiguredSource, run_analysis,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn settings(raster_size: usize) -> RunSettings {
    RunSettings {
        raster_size,
        lookback_days: 3,
        now: Utc::now(),
    }
}

fn request(mode: SourceMode) -> AnalysisRequest {
    AnalysisRequest {
        lat: 43.0,
        lon: 39.0,
        radius_km: 20,
        mode,
    }
}

// ============================================================================
// BOUNDING BOX
// ============================================================================

#[test]
fn test_bbox_is_ordered_for_valid_inputs() {
    for lat in [-89.0, -45.5, 0.0, 43.0, 89.0] {
        for lon in [-179.0, -10.25, 0.0, 39.0, 179.0] {
            for radius in 5..=50 {
                let radius_km = radius as f64;
                let bbox = BoundingBox::from_center(lat, lon, radius_km).unwrap();
                let delta = radius_km / 111.0;
                assert!(bbox.min_lon < bbox.max_lon);
                assert!(bbox.min_lat < bbox.max_lat);
                assert_eq!(bbox.min_lon, lon - delta);
                assert_eq!(bbox.max_lon, lon + delta);
                assert_eq!(bbox.min_lat, lat - delta);
                assert_eq!(bbox.max_lat, lat + delta);
            }
        }
    }
}

// ============================================================================
// SYNTHETIC FIELD
// ============================================================================

#[test]
fn test_synthetic_field_shape_and_range() {
    let mut rng = StdRng::seed_from_u64(3);
    for size in [2, 17, 64, 128] {
        let grid = synthesize(size, &mut rng).unwrap();
        assert_eq!(grid.width(), size);
        assert_eq!(grid.height(), size);
        assert_eq!(grid.missing_count(), 0);
        assert!(grid.values().iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(grid.valid_range(), Some((0.0, 1.0)));
    }
}

#[test]
fn test_synthetic_field_differs_between_unseeded_calls() {
    let a = synthesize(32, &mut rand::rng()).unwrap();
    let b = synthesize(32, &mut rand::rng()).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_synthetic_field_peaks_near_bumps() {
    // Bumps dominate the noise: the corner far from every center stays low
    // while the area around (1.2, -0.8) stays high.
    let size = 61; // 0.1 spacing on [-3, 3]
    let grid = synthesize(size, &mut StdRng::seed_from_u64(11)).unwrap();
    let index = |coord: f64| ((coord + 3.0) / 0.1).round() as usize;
    let corner = grid.get(index(-3.0), index(-3.0)).unwrap();
    let peak = grid.get(index(1.2), index(-0.8)).unwrap();
    assert!(corner < 0.3, "corner value {corner}");
    assert!(peak > 0.6, "peak value {peak}");
}

// ============================================================================
// NORMALIZATION
// ============================================================================

fn random_grid_with_gaps(rng: &mut StdRng, size: usize) -> RawGrid {
    let values = (0..size * size)
        .map(|_| {
            if rng.random_bool(0.2) {
                f32::NAN
            } else {
                rng.random_range(-0.3f32..0.4)
            }
        })
        .collect();
    RawGrid::new(size, size, values).unwrap()
}

#[test]
fn test_normalize_spans_zero_to_one_and_keeps_gaps() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..20 {
        let raw = random_grid_with_gaps(&mut rng, 24);
        let norm = normalize(&raw).unwrap();

        let valid: Vec<f32> = norm.values().iter().copied().filter(|v| !v.is_nan()).collect();
        let min = valid.iter().copied().fold(f32::INFINITY, f32::min);
        let max = valid.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert!(min.abs() < 1e-6);
        assert!((max - 1.0).abs() < 1e-6);

        for (r, n) in raw.values().iter().zip(norm.values()) {
            assert_eq!(r.is_nan(), n.is_nan());
        }
    }
}

#[test]
fn test_normalize_is_identity_on_unit_grids() {
    let raw = RawGrid::new(3, 2, vec![0.0, 0.2, f32::NAN, 0.9, 1.0, 0.5]).unwrap();
    let once = normalize(&raw).unwrap();
    let again = normalize(&RawGrid::new(3, 2, once.values().to_vec()).unwrap()).unwrap();
    for (a, b) in once.values().iter().zip(again.values()) {
        assert!((a.is_nan() && b.is_nan()) || a == b);
    }
    assert_eq!(once.values()[1], 0.2);
}

#[test]
fn test_normalize_shifts_grids_not_spanning_unit_interval() {
    let raw = RawGrid::new(2, 1, vec![0.2, 0.6]).unwrap();
    let norm = normalize(&raw).unwrap();
    assert_eq!(norm.values(), &[0.0, 1.0]);
}

#[test]
fn test_degenerate_grids_have_no_signal() {
    let flat = RawGrid::new(4, 4, vec![0.42; 16]).unwrap();
    assert!(matches!(
        normalize(&flat),
        Err(SignalError::FlatSignal { .. })
    ));

    let empty = RawGrid::new(4, 4, vec![f32::NAN; 16]).unwrap();
    assert_eq!(normalize(&empty).unwrap_err(), SignalError::AllMissing);
}

// ============================================================================
// AREA FRACTION
// ============================================================================

#[test]
fn test_area_fraction_bounds() {
    let low = NormalizedGrid::new(3, 3, vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.65]).unwrap();
    assert_eq!(area_fraction(&low, HIGH_CONCENTRATION_THRESHOLD), 0.0);

    let high = NormalizedGrid::new(2, 2, vec![0.71, 0.8, 0.95, 1.0]).unwrap();
    assert_eq!(area_fraction(&high, HIGH_CONCENTRATION_THRESHOLD), 100.0);
}

#[test]
fn test_area_fraction_counts_missing_against_area() {
    let half = NormalizedGrid::new(2, 2, vec![0.9, f32::NAN, 0.8, f32::NAN]).unwrap();
    assert_eq!(area_fraction(&half, HIGH_CONCENTRATION_THRESHOLD), 50.0);
}

// ============================================================================
// END TO END
// ============================================================================

#[tokio::test]
async fn test_seeded_demo_run_is_reproducible() {
    let run = |seed| async move {
        let mut rng = StdRng::seed_from_u64(seed);
        run_analysis(
            request(SourceMode::Demo),
            &UnconfiguredSource,
            settings(64),
            &mut rng,
        )
        .await
        .unwrap()
    };

    let first = run(42).await;
    let second = run(42).await;
    let area = first.area_fraction().unwrap();

    assert_eq!(first.origin, FieldOrigin::Synthetic);
    assert_eq!(area.to_bits(), second.area_fraction().unwrap().to_bits());
    assert_eq!(first.normalized(), second.normalized());

    // Seed 42 at 64 x 64 puts exactly 392 of 4096 cells above the threshold.
    let above = first
        .normalized()
        .unwrap()
        .values()
        .iter()
        .filter(|&&v| v > HIGH_CONCENTRATION_THRESHOLD)
        .count();
    assert_eq!(above, 392);
    assert_eq!(area, 9.5703125);
    // Noise-free field puts 9.91 % above the threshold; noise moves it only a little.
    assert!((4.0..=15.0).contains(&area), "area fraction {area}");
}

#[tokio::test]
async fn test_failed_remote_run_matches_demo_run() {
    let mut demo_rng = StdRng::seed_from_u64(2024);
    let demo = run_analysis(
        request(SourceMode::Demo),
        &UnconfiguredSource,
        settings(64),
        &mut demo_rng,
    )
    .await
    .unwrap();

    let mut remote_rng = StdRng::seed_from_u64(2024);
    let fallback = run_analysis(
        request(SourceMode::SentinelHub),
        &FailingSource,
        settings(64),
        &mut remote_rng,
    )
    .await
    .unwrap();

    assert_eq!(fallback.origin, FieldOrigin::Synthetic);
    assert_eq!(demo.normalized(), fallback.normalized());
    assert_eq!(demo.area_fraction(), fallback.area_fraction());
    assert_eq!(
        demo.fallback.as_deref(),
        Some("remote provider was not selected")
    );
    let reason = fallback.fallback.expect("fallback should be reported");
    assert!(reason.contains("503"), "reason: {reason}");
}

#[tokio::test]
async fn test_unconfigured_remote_falls_back() {
    let mut rng = StdRng::seed_from_u64(9);
    let result = run_analysis(
        request(SourceMode::SentinelHub),
        &UnconfiguredSource,
        settings(16),
        &mut rng,
    )
    .await
    .unwrap();
    assert_eq!(result.origin, FieldOrigin::Synthetic);
    assert!(result.fallback.unwrap().contains("not configured"));
}
