//! Customer route handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use logistik_core::customer::{
    self,
    model::{Customer, NewCustomer},
};

use super::{api_error, ApiError};
use crate::state::{AppState, WebSocketMessage};

pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let customers = customer::list_customers(&state.db).map_err(api_error)?;
    Ok(Json(customers))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Customer>, ApiError> {
    let customer = customer::get_customer(&state.db, id).map_err(api_error)?;
    Ok(Json(customer))
}

pub async fn create_customer(
    State(state): State<AppState>,
    Json(req): Json<NewCustomer>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let customer = customer::create_customer(&state.db, &req).map_err(api_error)?;
    state.broadcast(WebSocketMessage::Refresh);
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    customer::delete_customer(&state.db, id).map_err(api_error)?;
    state.broadcast(WebSocketMessage::Refresh);
    Ok(StatusCode::NO_CONTENT)
}
