use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::store::User;
use crate::AppState;

use super::{ActionTimer, AppError};

// ─── Request / response types ────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "viewer".into()
}

#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub user: User,
    pub total_users: usize,
}

// ─── GET /api/users/:id ──────────────────────────────────────────

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let mut action = ActionTimer::start(&state.notifier, "UsersController#show");

    let user = action.db(|| state.store.find_user(&id));
    let result = match user {
        Some(user) => Ok(action.render(|| Json(user).into_response())),
        None => Err(AppError::NotFound(format!("user '{id}' not found"))),
    };

    action.finish();
    result
}

// ─── POST /api/users ─────────────────────────────────────────────

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Response, AppError> {
    let mut action = ActionTimer::start(&state.notifier, "UsersController#create");

    if req.name.trim().is_empty() {
        action.finish();
        return Err(AppError::BadRequest("name must not be empty".into()));
    }

    let user = User {
        id: format!("usr_{}", &uuid::Uuid::new_v4().simple().to_string()[..8]),
        name: req.name,
        email: req.email,
        role: req.role,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    let total_users = action.db(|| {
        state.store.insert_user(user.clone());
        state.store.count_users()
    });

    let response = action.render(|| {
        (StatusCode::CREATED, Json(CreatedUser { user, total_users })).into_response()
    });
    action.finish();
    Ok(response)
}
