use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

pub const DEFAULT_AUTH_URL: &str =
    "https://services.sentinel-hub.com/auth/realms/main/protocol/openid-connect/token";
pub const DEFAULT_PROCESS_URL: &str = "https://services.sentinel-hub.com/api/v1/process";

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub app_name: String,
    pub deployment: String,
    pub bind_addr: String,
    pub raster_size: usize,
    pub lookback_days: u64, // Length of the trailing imagery window
    pub overlay_opacity: f32,
    pub default_lat: f64,
    pub default_lon: f64,
    pub default_radius_km: u32,
    // Sentinel Hub (remote mode is unavailable when credentials are missing)
    pub sentinel_hub_client_id: Option<String>,
    pub sentinel_hub_client_secret: Option<String>,
    pub sentinel_hub_auth_url: String,
    pub sentinel_hub_process_url: String,
    pub remote_timeout_secs: u64,
    pub log_json: bool,
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok(); // Load from .env file if available

        Config {
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "plastic-map-api".to_string()),
            deployment: env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            raster_size: parse_or("RASTER_SIZE", crate::fdi::DEFAULT_RASTER_SIZE),
            lookback_days: parse_or("LOOKBACK_DAYS", 3),
            overlay_opacity: parse_or("OVERLAY_OPACITY", 0.75),
            default_lat: parse_or("DEFAULT_LAT", 43.0),
            default_lon: parse_or("DEFAULT_LON", 39.0),
            default_radius_km: parse_or("DEFAULT_RADIUS_KM", 20),
            sentinel_hub_client_id: non_empty("SENTINEL_HUB_CLIENT_ID"),
            sentinel_hub_client_secret: non_empty("SENTINEL_HUB_CLIENT_SECRET"),
            sentinel_hub_auth_url: env::var("SENTINEL_HUB_AUTH_URL")
                .unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string()),
            sentinel_hub_process_url: env::var("SENTINEL_HUB_PROCESS_URL")
                .unwrap_or_else(|_| DEFAULT_PROCESS_URL.to_string()),
            remote_timeout_secs: parse_or("REMOTE_TIMEOUT_SECS", 60),
            log_json: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }

    /// Configuration without credentials and with a small raster.
    pub fn for_tests() -> Self {
        Config {
            app_name: "plastic-map-api-test".to_string(),
            deployment: "test".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            raster_size: 64,
            lookback_days: 3,
            overlay_opacity: 0.75,
            default_lat: 43.0,
            default_lon: 39.0,
            default_radius_km: 20,
            sentinel_hub_client_id: None,
            sentinel_hub_client_secret: None,
            sentinel_hub_auth_url: DEFAULT_AUTH_URL.to_string(),
            sentinel_hub_process_url: DEFAULT_PROCESS_URL.to_string(),
            remote_timeout_secs: 5,
            log_json: false,
        }
    }

    pub fn remote_configured(&self) -> bool {
        self.sentinel_hub_client_id.is_some() && self.sentinel_hub_client_secret.is_some()
    }
}
