//! DCE API /v1: REST endpoints over the parse worker, store and renderer
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use dce_core::EditorConfig;
use tower_http::trace::TraceLayer;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/parse", post(handlers::parse))
        .route("/v1/render", post(handlers::render))
        .route(
            "/v1/contract",
            get(handlers::load_contract).put(handlers::store_contract),
        )
        .route("/v1/health", get(handlers::health))
        .layer(middleware::cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: EditorConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;

    tracing::info!("DCE API listening on {}", config.listen_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
