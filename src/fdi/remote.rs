//! Sentinel Hub Process API client.
//!
//! The provider evaluates [`EVALSCRIPT`] per pixel and returns a single-band
//! TIFF. Masked pixels come back as `0`, which [`apply_missing_sentinel`]
//! turns into `NaN`.

use super::bbox::{BoundingBox, TimeWindow};
use super::error::SourceError;
use super::grid::RawGrid;
use crate::config::Config;
use async_trait::async_trait;
use georaster::geotiff::{GeoTiffReader, RasterValue};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

/// Per-pixel FDI with scene-classification masking.
///
/// SCL classes 3 (cloud shadow), 8 and 9 (cloud medium/high probability),
/// 10 (thin cirrus) and 11 (snow) are masked to 0. The text is part of the
/// provider contract and must not be reformatted.
pub const EVALSCRIPT: &str = r#"
//VERSION=3
function setup() {
  return {
    input: ["B04","B06","B08","SCL"],
    output: { bands: 1 }
  };
}

function evaluatePixel(s) {
  if ([3,8,9,10,11].includes(s.SCL)) return [0];
  let fdi = s.B08 - (s.B04 + (s.B06 - s.B04) * 0.5);
  return [fdi];
}
"#;

pub const DATA_COLLECTION: &str = "sentinel-2-l2a";

pub const WGS84_CRS: &str = "http://www.opengis.net/def/crs/OGC/1.3/CRS84";

/// Value the provider uses for masked pixels.
///
/// A genuine index of exactly 0 is indistinguishable from a masked pixel and
/// is dropped as well; the loss is accepted.
pub const MISSING_SENTINEL: f32 = 0.0;

/// A source of raw index grids backed by remote imagery.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch(
        &self,
        bbox: &BoundingBox,
        window: &TimeWindow,
        size: usize,
    ) -> Result<RawGrid, SourceError>;
}

/// Stands in for the provider when no credentials are configured.
pub struct UnconfiguredSource;

#[async_trait]
impl RemoteSource for UnconfiguredSource {
    async fn fetch(
        &self,
        _bbox: &BoundingBox,
        _window: &TimeWindow,
        _size: usize,
    ) -> Result<RawGrid, SourceError> {
        Err(SourceError::NotConfigured)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct SentinelHubClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    auth_url: String,
    process_url: String,
}

impl SentinelHubClient {
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let (Some(client_id), Some(client_secret)) = (
            config.sentinel_hub_client_id.clone(),
            config.sentinel_hub_client_secret.clone(),
        ) else {
            return Err(SourceError::NotConfigured);
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.remote_timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(SentinelHubClient {
            http,
            client_id,
            client_secret,
            auth_url: config.sentinel_hub_auth_url.clone(),
            process_url: config.sentinel_hub_process_url.clone(),
        })
    }

    /// Exchanges the client credentials for a bearer token.
    async fn access_token(&self) -> Result<String, SourceError> {
        let response = self
            .http
            .post(&self.auth_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Auth(format!("HTTP {}: {}", status.as_u16(), body)));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Auth(format!("unreadable token response: {e}")))?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl RemoteSource for SentinelHubClient {
    async fn fetch(
        &self,
        bbox: &BoundingBox,
        window: &TimeWindow,
        size: usize,
    ) -> Result<RawGrid, SourceError> {
        let token = self.access_token().await?;
        debug!("Obtained Sentinel Hub access token");

        let body = process_request_body(bbox, window, size);
        let response = self
            .http
            .post(&self.process_url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "image/tiff")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        info!(bytes = bytes.len(), "Received raster from Sentinel Hub");

        let mut grid = decode_tiff(&bytes)?;
        apply_missing_sentinel(&mut grid)?;
        Ok(grid)
    }
}

/// JSON body of a Process API request for a `size x size` FDI raster.
pub fn process_request_body(bbox: &BoundingBox, window: &TimeWindow, size: usize) -> Value {
    let (from, to) = window.to_rfc3339_range();
    json!({
        "input": {
            "bounds": {
                "bbox": bbox.to_array(),
                "properties": { "crs": WGS84_CRS }
            },
            "data": [{
                "type": DATA_COLLECTION,
                "dataFilter": {
                    "timeRange": { "from": from, "to": to }
                }
            }]
        },
        "output": {
            "width": size,
            "height": size,
            "responses": [{
                "identifier": "default",
                "format": { "type": "image/tiff" }
            }]
        },
        "evalscript": EVALSCRIPT
    })
}

/// Reads the first band of a (Geo)TIFF into a grid, keeping raw values.
///
/// Non-finite samples become missing cells; multi-channel samples are rejected.
pub fn decode_tiff(bytes: &[u8]) -> Result<RawGrid, SourceError> {
    let cursor = std::io::Cursor::new(bytes.to_vec());
    let mut dataset =
        GeoTiffReader::open(cursor).map_err(|e| SourceError::Decode(format!("{e:?}")))?;

    let (width, height) = dataset
        .image_info()
        .dimensions
        .ok_or_else(|| SourceError::Decode("image dimensions not available".to_string()))?;

    let mut values = vec![f32::NAN; width as usize * height as usize];
    for (x, y, pixel) in dataset.pixels(0, 0, width, height) {
        let value = match pixel {
            RasterValue::U8(v) => v as f32,
            RasterValue::U16(v) => v as f32,
            RasterValue::U32(v) => v as f32,
            RasterValue::U64(v) => v as f32,
            RasterValue::I8(v) => v as f32,
            RasterValue::I16(v) => v as f32,
            RasterValue::I32(v) => v as f32,
            RasterValue::F32(v) => v,
            RasterValue::F64(v) => v as f32,
            other => {
                return Err(SourceError::Decode(format!(
                    "unsupported sample type {other:?}"
                )));
            }
        };
        // Infinities (including f64 samples beyond the f32 range) are missing.
        values[y as usize * width as usize + x as usize] =
            if value.is_finite() { value } else { f32::NAN };
    }

    Ok(RawGrid::new(width as usize, height as usize, values)?)
}

/// Marks every cell equal to [`MISSING_SENTINEL`] as missing.
pub fn apply_missing_sentinel(grid: &mut RawGrid) -> Result<usize, SourceError> {
    let mut masked = 0;
    let values: Vec<f32> = grid
        .values()
        .iter()
        .map(|&v| {
            if v == MISSING_SENTINEL {
                masked += 1;
                f32::NAN
            } else {
                v
            }
        })
        .collect();
    *grid = RawGrid::new(grid.width(), grid.height(), values)?;
    debug!(masked, "Applied missing-value sentinel");
    Ok(masked)
}
