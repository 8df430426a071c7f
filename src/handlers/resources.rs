use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::errors::AppError;
use crate::handlers::extract::AppJson;
use crate::models::{Bike, NewBike, NewTimeslot, Timeslot};
use crate::state::AppState;

// GET /api/bikes
pub async fn list_bikes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Bike>>, AppError> {
    Ok(Json(state.catalog.available_bikes().await?))
}

// POST /api/bikes
pub async fn create_bike(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<NewBike>,
) -> Result<(StatusCode, Json<Bike>), AppError> {
    let bike = state.catalog.create_bike(body).await?;
    Ok((StatusCode::CREATED, Json(bike)))
}

// GET /api/timeslots
pub async fn list_timeslots(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Timeslot>>, AppError> {
    Ok(Json(state.catalog.available_timeslots().await?))
}

// POST /api/timeslots
pub async fn create_timeslot(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<NewTimeslot>,
) -> Result<(StatusCode, Json<Timeslot>), AppError> {
    let slot = state.catalog.create_timeslot(body).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}
