use anyhow::Context;
use tracing_subscriber::EnvFilter;

use product_recommender::{
    api::{create_router, AppState},
    config::Config,
    services::{build_matrix, load_ratings, BuilderConfig, Recommender},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("product_recommender=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Build the rating and similarity matrices once, before serving
    let records = load_ratings(&config.data_path)
        .with_context(|| format!("Failed to load ratings from {}", config.data_path.display()))?;
    let builder = BuilderConfig {
        max_users: config.max_users,
        max_products: config.max_products,
        duplicate_policy: config.duplicate_policy,
    };
    let matrix = build_matrix(&records, &builder).context("Failed to build rating matrix")?;
    let recommender = Recommender::new(matrix);

    let state = AppState::new(recommender, config.default_top_n);
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
