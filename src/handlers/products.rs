use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::AppState;

use super::{ActionTimer, AppError};

// ─── GET /api/products/:id ───────────────────────────────────────

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let mut action = ActionTimer::start(&state.notifier, "ProductsController#show");

    let product = action.db(|| state.store.find_product(&id));
    let result = match product {
        Some(product) => Ok(action.render(|| Json(product).into_response())),
        None => Err(AppError::NotFound(format!("product '{id}' not found"))),
    };

    action.finish();
    result
}
