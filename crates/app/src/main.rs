mod problem;
mod router;
mod schema;
mod telemetry;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use hypercast_core::{ForecastService, InMemoryForecastRepository};
use hypercast_util::{load_env_file, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_env_file();
    let config = AppConfig::from_env()?;

    telemetry::init_tracing(&config)?;
    let metrics = telemetry::init_metrics()?;

    // One repository and one service per process, constructed here and
    // threaded into the router state for the process lifetime.
    let repository = Arc::new(InMemoryForecastRepository::new());
    let service = ForecastService::new(repository);

    let state = router::AppState::new(service, metrics, &config);

    let addr: SocketAddr = config.bind_addr;
    info!(
        stage = "app",
        %addr,
        env = %config.environment.as_str(),
        app = %config.app_name,
        "starting HTTP server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router::app_router(state))
        .await
        .map_err(|err| err.into())
}
