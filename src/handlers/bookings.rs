use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::handlers::extract::AppJson;
use crate::models::{Booking, BookingStatus, NewBooking};
use crate::state::AppState;

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<NewBooking>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let booking = state.bookings.create(body).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Booking created successfully",
            "booking": booking,
        })),
    ))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.bookings.get(&id).await?))
}

// PUT /api/bookings/:id
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AppJson(body): AppJson<UpdateStatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status: BookingStatus = body.status.parse()?;
    let booking = state.bookings.update_status(&id, status).await?;
    Ok(Json(serde_json::json!({
        "message": "Booking status updated successfully",
        "booking": booking,
    })))
}

// DELETE /api/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let booking = state.bookings.delete(&id).await?;
    Ok(Json(serde_json::json!({
        "message": "Booking deleted successfully",
        "booking": booking,
    })))
}
