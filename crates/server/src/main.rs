use server::config::Config;
use server::routes;
use server::SharedAnalyzer;

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use sharpness_core::{AnalysisMemoizer, EnginePool, SharpnessAnalyzer, StockfishGateway};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();
    tracing::info!(
        stockfish = %config.stockfish_path,
        max_depth = config.max_depth,
        multipv = config.multipv,
        pool_size = config.engine_pool_size,
        cache_capacity = config.cache_capacity,
        "Configuration loaded"
    );

    // Engine sessions spawn lazily, so a missing binary surfaces as a 503
    // on the first analysis request rather than at startup
    let pool = EnginePool::new(config.stockfish_path.clone(), config.engine_pool_size);
    let gateway = StockfishGateway::new(pool);
    let memoizer = AnalysisMemoizer::new(gateway.clone(), config.cache_capacity);
    let analyzer: SharedAnalyzer = Arc::new(SharpnessAnalyzer::new(memoizer, config.multipv));

    // CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/eval", get(routes::eval::get_eval))
        .route("/api/sharpness", get(routes::sharpness::get_sharpness))
        // Shared state
        .layer(Extension(analyzer))
        .layer(Extension(gateway))
        .layer(Extension(config.clone()))
        .layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
