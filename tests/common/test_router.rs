// Test-specific router builder with an injectable imagery provider

use async_trait::async_trait;
use axum::Router;
use plastic_map_api::common::state::AppState;
use plastic_map_api::config::Config;
use plastic_map_api::fdi::{BoundingBox, RawGrid, RemoteSource, SourceError, TimeWindow};
use std::sync::Arc;
use std::time::Duration;

/// Provider that always fails, as an unreachable API would.
pub struct FailingSource;

#[async_trait]
impl RemoteSource for FailingSource {
    async fn fetch(
        &self,
        _bbox: &BoundingBox,
        _window: &TimeWindow,
        _size: usize,
    ) -> Result<RawGrid, SourceError> {
        Err(SourceError::Provider {
            status: 503,
            body: "service unavailable".to_string(),
        })
    }
}

/// Provider that returns a fixed grid.
pub struct FixedSource(pub RawGrid);

#[async_trait]
impl RemoteSource for FixedSource {
    async fn fetch(
        &self,
        _bbox: &BoundingBox,
        _window: &TimeWindow,
        _size: usize,
    ) -> Result<RawGrid, SourceError> {
        Ok(self.0.clone())
    }
}

/// Provider that answers with a fixed grid after a delay.
pub struct SlowSource {
    pub delay: Duration,
    pub grid: RawGrid,
}

#[async_trait]
impl RemoteSource for SlowSource {
    async fn fetch(
        &self,
        _bbox: &BoundingBox,
        _window: &TimeWindow,
        _size: usize,
    ) -> Result<RawGrid, SourceError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.grid.clone())
    }
}

pub fn build_test_router(remote: Arc<dyn RemoteSource>) -> Router {
    super::init();
    let state = AppState::new(Config::for_tests(), remote);
    plastic_map_api::routes::build_router(&state)
}
