use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::error::AggregateError;
use crate::notifications::{Category, Event};

// ─── Header names ────────────────────────────────────────────────

pub const X_VIEW_RUNTIME: HeaderName = HeaderName::from_static("x-view-runtime");
pub const X_DB_RUNTIME: HeaderName = HeaderName::from_static("x-db-runtime");
pub const X_SQL_QUERIES: HeaderName = HeaderName::from_static("x-sql-queries");
pub const SERVER_TIMING: HeaderName = HeaderName::from_static("server-timing");

// ─── Summary ─────────────────────────────────────────────────────

/// Per-request figures derived from the collected events.
///
/// Durations are milliseconds as reported by the producer; they have already
/// been checked to be finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RuntimeSummary {
    pub view_runtime: Option<f64>,
    pub db_runtime: Option<f64>,
    /// Application queries, schema introspection excluded.
    pub sql_queries: usize,
}

impl RuntimeSummary {
    /// Reduce a request's events to header values.
    ///
    /// Only the first controller event is consulted; a request dispatches
    /// at most one action, so later ones are ignored. Each controller field
    /// is checked on its own: an invalid one is left out of the summary and
    /// reported in the returned errors, and the rest still apply.
    pub fn from_events(events: &[Event]) -> (Self, Vec<AggregateError>) {
        let mut controller = events
            .iter()
            .filter(|e| e.category == Category::ProcessAction);
        let first = controller.next();
        let extra = controller.count();
        if extra > 0 {
            tracing::debug!(extra, "ignoring additional controller events");
        }

        let sql_queries = events
            .iter()
            .filter(|e| e.category == Category::SqlQuery && !e.payload.is_schema_query())
            .count();

        let mut errors = Vec::new();
        let mut check = |field: &'static str, value: Option<f64>| match checked(field, value) {
            Ok(v) => v,
            Err(err) => {
                errors.push(err);
                None
            }
        };

        let (view_runtime, db_runtime) = match first {
            Some(e) => (
                check("view_runtime", e.payload.view_runtime),
                check("db_runtime", e.payload.db_runtime),
            ),
            None => (None, None),
        };

        let summary = Self {
            view_runtime,
            db_runtime,
            sql_queries,
        };
        (summary, errors)
    }

    /// Insert the `X-*` headers. Unrelated headers are left alone.
    pub fn apply(&self, headers: &mut HeaderMap) {
        if let Some(ms) = self.view_runtime {
            headers.insert(X_VIEW_RUNTIME, HeaderValue::from(whole_millis(ms)));
        }
        if let Some(ms) = self.db_runtime {
            headers.insert(X_DB_RUNTIME, HeaderValue::from(whole_millis(ms)));
        }
        headers.insert(X_SQL_QUERIES, HeaderValue::from(self.sql_queries));
    }

    /// Render the W3C `Server-Timing` value for the same figures.
    pub fn server_timing(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if let Some(ms) = self.view_runtime {
            parts.push(format!("view;dur={ms:.3}"));
        }
        if let Some(ms) = self.db_runtime {
            parts.push(format!("db;dur={ms:.3}"));
        }
        let noun = if self.sql_queries == 1 { "query" } else { "queries" };
        parts.push(format!("sql;desc=\"{} {noun}\"", self.sql_queries));
        parts.join(", ")
    }

    /// Insert `Server-Timing` alongside the `X-*` headers.
    pub fn apply_server_timing(&self, headers: &mut HeaderMap) {
        if let Ok(val) = self.server_timing().parse() {
            headers.insert(SERVER_TIMING, val);
        }
    }
}

/// Summarize `events` and merge the resulting headers into `headers`.
///
/// Headers for valid figures are inserted even when the first error is
/// returned; `X-Sql-Queries` is always set.
pub fn aggregate(events: &[Event], headers: &mut HeaderMap) -> Result<(), AggregateError> {
    let (summary, errors) = RuntimeSummary::from_events(events);
    summary.apply(headers);
    match errors.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

// ─── Helpers ─────────────────────────────────────────────────────

fn checked(field: &'static str, value: Option<f64>) -> Result<Option<f64>, AggregateError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(AggregateError::InvalidDuration { field, value: v })
        }
        other => Ok(other),
    }
}

/// Round half to even, the same tie-break `printf("%.0f")` uses.
fn whole_millis(ms: f64) -> u64 {
    ms.round_ties_even() as u64
}
