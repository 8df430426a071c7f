use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::errors::AppError;
use crate::handlers::extract::AppJson;
use crate::models::{Account, AccountKind, Booking, NewAccount};
use crate::state::AppState;

// POST /api/customers
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<NewAccount>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let account = state
        .catalog
        .create_account(AccountKind::Customer, body)
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

// POST /api/admins
pub async fn create_admin(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<NewAccount>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let account = state.catalog.create_account(AccountKind::Admin, body).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

// GET /api/customers/:id/bookings
pub async fn customer_bookings(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.bookings.list_by_customer(&id).await?))
}

// GET /api/admins/:id/bookings
pub async fn admin_bookings(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.bookings.list_by_admin(&id).await?))
}
