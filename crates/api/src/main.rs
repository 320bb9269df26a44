use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::app::build_router;
use api::config::AppConfig;
use api::gql::{build_registry, load_schema};
use api::state::AppState;
use infra::repos::SampleCatalog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    // Resolvers are wired once; the schema is compiled once and shared by all requests.
    let registry = build_registry(Arc::new(SampleCatalog::new()));
    let schema = load_schema(&config.schema_path, &registry, &config.schema_options())
        .context("GraphQL schema could not be built")?;

    let addr = format!("0.0.0.0:{}", config.port);
    let state = AppState::new(schema, config);
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
