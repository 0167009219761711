use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recipe_search_engine::proxy::HttpImageFetcher;
use recipe_search_engine::server::{create_router, AppState};
use recipe_search_engine::{RecipeEngine, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_search_server=debug,recipe_search_engine=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    tracing::info!("🚀 Starting Recipe Search Server");
    tracing::info!("📦 Recipes: {}", config.engine.recipes_path.display());
    if let Some(path) = &config.engine.interactions_path {
        tracing::info!("⭐ Interactions: {}", path.display());
    }
    tracing::info!("🧮 Scoring: {}", config.engine.policy);

    // The catalog is loaded once, before any request is accepted
    let engine_config = config.engine.clone();
    let engine = tokio::task::spawn_blocking(move || RecipeEngine::from_config(&engine_config)).await??;

    let state = AppState::new(
        Arc::new(engine),
        Arc::new(HttpImageFetcher::new()?),
        config.image_proxy_prefix(),
    );

    let app = create_router(state);

    // Start server
    let addr = config.bind_addr();
    tracing::info!("🍲 Server listening on http://{}", addr);
    tracing::info!("Try: http://{}/recipes?query=apple", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
