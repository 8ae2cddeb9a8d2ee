use std::error::Error;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use busconnect_web::api::{Backend, BusApiClient, MockBusApi};
use busconnect_web::cache::{CacheConfig, CachedBusApi};
use busconnect_web::config::AppConfig;
use busconnect_web::stops::StopDirectory;
use busconnect_web::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    let backend = match &config.mock_dir {
        Some(dir) => Backend::Mock(MockBusApi::new(dir)?),
        None => Backend::Live(BusApiClient::new(config.api_config())?),
    };
    let api = CachedBusApi::new(backend, &CacheConfig::default());

    // The site still works without stops; free text is sent as typed.
    let stops = match StopDirectory::fetch(&api).await {
        Ok(stops) => {
            let count = stops.len().await;
            info!(count, "loaded stops");
            stops
        }
        Err(e) => {
            warn!(error = %e, "failed to fetch stops, starting with none");
            StopDirectory::default()
        }
    };

    let state = AppState::new(api, stops.clone());

    let refresh_api = state.api.clone();
    let refresh_every = config.stop_refresh;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_every);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            match stops.refresh(refresh_api.as_ref()).await {
                Ok(count) => info!(count, "refreshed stops"),
                Err(e) => error!(error = %e, "failed to refresh stops"),
            }
        }
    });

    let app = create_router(state, &config.static_dir.to_string_lossy());

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    info!(addr = %config.listen, backend = %config.api_url, "BusConnect listening");

    axum::serve(listener, app).await?;
    Ok(())
}
