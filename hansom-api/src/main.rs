use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hansom_api::{app, app_config::Config, AppState};
use hansom_distance::{DistanceResolver, FixedResolver, MatrixClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hansom_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!("Starting Hansom API on port {}", config.server.port);

    let resolver: Arc<dyn DistanceResolver> = match config.distance.fixed_miles {
        Some(miles) => {
            tracing::info!(miles, "Using fixed distance resolver");
            Arc::new(FixedResolver::new(miles))
        }
        None => Arc::new(MatrixClient::new(
            config.distance.matrix_url.clone(),
            config.distance.api_key.clone(),
            Duration::from_secs(config.distance.timeout_seconds),
        )?),
    };

    let state = AppState::new(config.pricing.clone(), resolver);
    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
