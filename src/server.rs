use axum::{
    middleware as axum_mw,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::RuntimeHeadersConfig;
use crate::handlers;
use crate::middleware::{runtime_headers_middleware, RuntimeHeaders};
use crate::AppState;

/// Builds the full Axum `Router` with all routes and middleware.
pub fn create_router(state: Arc<AppState>, config: RuntimeHeadersConfig) -> Router {
    let runtime = RuntimeHeaders::new(state.notifier.clone(), config);

    Router::new()
        // ── User endpoints ──────────────────────────────────────
        .route("/api/users/:id", get(handlers::users::get_user))
        .route("/api/users", post(handlers::users::create_user))
        // ── Product endpoints ───────────────────────────────────
        .route(
            "/api/products/:id",
            get(handlers::products::get_product),
        )
        // ── No controller dispatch ──────────────────────────────
        .route("/health", get(handlers::health))
        // ── Provide shared state to all routes above ────────────
        .with_state(state)
        // ── Global middleware (applied bottom-up) ───────────────
        .layer(axum_mw::from_fn_with_state(
            runtime,
            runtime_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
