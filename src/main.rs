use gymtrack_charts::{AppState, PassReport, Settings, load_snapshot, router};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let settings = Settings::from_env();
    let snapshot = load_snapshot(&settings.data_path).await;
    let state = AppState::new(&settings, snapshot);

    {
        let mut board = state.dashboard.lock().await;
        match board.start().await {
            PassReport::Rendered(_) => info!("finance charts ready"),
            PassReport::LoadFailed(err) => warn!("charts unavailable until retried: {err}"),
            PassReport::MissingAnchors(missing) => warn!(?missing, "page is missing chart anchors"),
        }
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
    }
    info!("shutting down");
}
