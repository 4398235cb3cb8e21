//! HTTP backend proxying the rate provider and serving the storefront page.

pub mod handlers;

use crate::core::RateTableProvider;
use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Shared state for request handlers.
pub struct AppState {
    pub provider: Arc<dyn RateTableProvider>,
    /// Storefront currency when a request does not choose one.
    pub default_currency: String,
}

impl AppState {
    pub fn new(provider: Arc<dyn RateTableProvider>, default_currency: &str) -> Self {
        AppState {
            provider,
            default_currency: default_currency.to_string(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/rates", get(handlers::get_rates))
        .route("/api/convert", post(handlers::convert_currency))
        .route("/api/cart", get(handlers::get_cart))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server(port: u16, state: AppState) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Listening on http://{}", addr);
    println!("Server running at http://localhost:{port}");

    axum::serve(listener, router(Arc::new(state)))
        .await
        .context("Server error")
}
