//! Request-scoped instrumentation headers for axum.
//!
//! Every request gets its own [`metrics::EventCollector`] listening on the
//! shared [`notifications::Notifier`]. When the handler returns, the
//! collected controller and SQL notifications are reduced to
//! `X-View-Runtime`, `X-Db-Runtime` and `X-Sql-Queries` response headers.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod notifications;
pub mod scope;
pub mod server;
pub mod store;
pub mod telemetry;

use notifications::Notifier;
use store::Store;

/// Shared application state available to every handler via `State<Arc<AppState>>`.
pub struct AppState {
    /// Bus the handlers and the store publish to; the middleware listens.
    pub notifier: Notifier,

    /// In-memory tables backing the demo endpoints.
    pub store: Store,
}

impl AppState {
    pub fn new(notifier: Notifier) -> Self {
        let store = Store::new(notifier.clone());
        Self { notifier, store }
    }
}
