use plastic_map_api::{common::state::AppState, config, routes};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::from_env();
    init_tracing(config.log_json);

    let addr: std::net::SocketAddr = config.bind_addr.parse()?;
    info!(
        app_name = %config.app_name,
        deployment = %config.deployment,
        raster_size = config.raster_size,
        "Starting service"
    );

    let app_state = AppState::from_config(config);
    let router = routes::build_router(&app_state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");
    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}
