pub mod products;
pub mod users;

use std::time::{Duration, Instant};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::notifications::{Category, Notifier, Payload};

// ─── Action instrumentation ──────────────────────────────────────

/// Times one controller action and reports it as a
/// `process_action.action_controller` notification on `finish()`.
///
/// Database work goes through [`ActionTimer::db`] and response building
/// through [`ActionTimer::render`]; an action that never renders reports no
/// `view_runtime`.
pub struct ActionTimer {
    notifier: Notifier,
    action: &'static str,
    db: Duration,
    view: Option<Duration>,
}

impl ActionTimer {
    pub fn start(notifier: &Notifier, action: &'static str) -> Self {
        Self {
            notifier: notifier.clone(),
            action,
            db: Duration::ZERO,
            view: None,
        }
    }

    pub fn db<R>(&mut self, run: impl FnOnce() -> R) -> R {
        let t0 = Instant::now();
        let out = run();
        self.db += t0.elapsed();
        out
    }

    pub fn render(&mut self, build: impl FnOnce() -> Response) -> Response {
        let t0 = Instant::now();
        let response = build();
        *self.view.get_or_insert(Duration::ZERO) += t0.elapsed();
        response
    }

    pub fn finish(self) {
        let payload = Payload::controller(self.view.map(millis), Some(millis(self.db)));
        tracing::trace!(action = self.action, ?payload, "action finished");
        self.notifier
            .instrument(Category::ProcessAction.name(), payload);
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

// ─── Unified error type ──────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = serde_json::json!({
            "error":  self.to_string(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

// ─── GET /health ─────────────────────────────────────────────────
/// Served without controller dispatch, like a static asset.

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
