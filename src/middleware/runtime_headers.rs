use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::config::RuntimeHeadersConfig;
use crate::metrics::{EventCollector, RuntimeSummary};
use crate::notifications::Notifier;
use crate::scope::ScopeId;

/// State for [`runtime_headers_middleware`].
#[derive(Clone)]
pub struct RuntimeHeaders {
    pub notifier: Notifier,
    pub config: RuntimeHeadersConfig,
}

impl RuntimeHeaders {
    pub fn new(notifier: Notifier, config: RuntimeHeadersConfig) -> Self {
        Self { notifier, config }
    }
}

/// Middleware that adds per-request instrumentation headers:
///
///   X-View-Runtime  — view render time of the dispatched action (ms)
///   X-Db-Runtime    — database time of the dispatched action (ms)
///   X-Sql-Queries   — number of application SQL queries, always present
///   Server-Timing   — the same figures, when enabled in config
///
/// The inner handler runs inside a fresh request scope so concurrent
/// requests never see each other's events. Status and body are untouched.
pub async fn runtime_headers_middleware(
    State(rt): State<RuntimeHeaders>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let scope = ScopeId::next();
    let collector = EventCollector::begin(&rt.notifier, Some(scope));
    let mut response = scope.enter(next.run(req)).await;
    let events = collector.finish();

    // ── Inject response headers ─────────────────────────────────
    let (summary, errors) = RuntimeSummary::from_events(&events);
    for err in &errors {
        tracing::warn!(%method, path = %path, %scope, error = %err, "omitting runtime header");
    }

    summary.apply(response.headers_mut());
    if rt.config.server_timing {
        summary.apply_server_timing(response.headers_mut());
    }

    tracing::debug!(
        %method,
        path = %path,
        status = response.status().as_u16(),
        view_ms = summary.view_runtime,
        db_ms = summary.db_runtime,
        sql_queries = summary.sql_queries,
        events = events.len(),
        "request instrumented"
    );

    response
}
