//! Shipment route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use logistik_core::shipment::{
    self,
    model::{LegCosts, LegPartners, ShipmentStatus, ShipmentView},
    NewShipment,
};
use serde::Deserialize;

use super::{api_error, ApiError};
use crate::state::{AppState, WebSocketMessage};

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct OfferRequest {
    pub price: f64,
}

#[derive(Deserialize)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct DatesRequest {
    pub pickup_date: Option<String>,
    pub flight_departure: Option<String>,
    pub delivery_date: Option<String>,
}

/// Re-read the view after a write and tell connected clients.
fn updated(state: &AppState, id: i64) -> Result<Json<ShipmentView>, ApiError> {
    let view = shipment::get_shipment_view(&state.db, id, state.rule).map_err(api_error)?;
    state.broadcast(WebSocketMessage::ShipmentUpdated {
        shipment_id: id,
        status: view.shipment.status.to_string(),
    });
    Ok(Json(view))
}

pub async fn list_shipments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ShipmentView>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(ShipmentStatus::parse);

    let views = shipment::list_shipment_views(&state.db, status.as_ref(), state.rule)
        .map_err(api_error)?;
    Ok(Json(views))
}

pub async fn get_shipment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ShipmentView>, ApiError> {
    let view = shipment::get_shipment_view(&state.db, id, state.rule).map_err(api_error)?;
    Ok(Json(view))
}

pub async fn create_shipment(
    State(state): State<AppState>,
    Json(req): Json<NewShipment>,
) -> Result<(StatusCode, Json<ShipmentView>), ApiError> {
    let created = shipment::create_request(&state.db, &req).map_err(api_error)?;
    let view = shipment::get_shipment_view(&state.db, created.id, state.rule).map_err(api_error)?;

    state.broadcast(WebSocketMessage::Refresh);
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn delete_shipment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    shipment::delete_shipment(&state.db, id).map_err(api_error)?;
    state.broadcast(WebSocketMessage::Refresh);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_offer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<OfferRequest>,
) -> Result<Json<ShipmentView>, ApiError> {
    shipment::create_offer(&state.db, id, req.price).map_err(api_error)?;
    updated(&state, id)
}

pub async fn accept_offer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ShipmentView>, ApiError> {
    shipment::accept_offer(&state.db, id).map_err(api_error)?;
    updated(&state, id)
}

pub async fn reject_offer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    req: Option<Json<RejectRequest>>,
) -> Result<Json<ShipmentView>, ApiError> {
    // Body is optional; a bare POST rejects without a reason.
    let reason = req.and_then(|Json(r)| r.reason);
    shipment::reject_offer(&state.db, id, reason.as_deref()).map_err(api_error)?;
    updated(&state, id)
}

pub async fn book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ShipmentView>, ApiError> {
    shipment::book(&state.db, id).map_err(api_error)?;
    updated(&state, id)
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<ShipmentView>, ApiError> {
    shipment::move_shipment(&state.db, id, &ShipmentStatus::parse(&req.status))
        .map_err(api_error)?;
    updated(&state, id)
}

pub async fn update_costs(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(costs): Json<LegCosts>,
) -> Result<Json<ShipmentView>, ApiError> {
    shipment::update_costs(&state.db, id, costs).map_err(api_error)?;
    updated(&state, id)
}

pub async fn update_dates(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<DatesRequest>,
) -> Result<Json<ShipmentView>, ApiError> {
    shipment::update_dates(
        &state.db,
        id,
        req.pickup_date.as_deref(),
        req.flight_departure.as_deref(),
        req.delivery_date.as_deref(),
    )
    .map_err(api_error)?;
    updated(&state, id)
}

pub async fn assign_partners(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(legs): Json<LegPartners>,
) -> Result<Json<ShipmentView>, ApiError> {
    shipment::assign_partners(&state.db, id, legs).map_err(api_error)?;
    updated(&state, id)
}

pub async fn complete_milestone(
    State(state): State<AppState>,
    Path((id, milestone_id)): Path<(i64, u32)>,
) -> Result<Json<ShipmentView>, ApiError> {
    shipment::complete_milestone(&state.db, id, milestone_id).map_err(api_error)?;
    updated(&state, id)
}

pub async fn reopen_milestone(
    State(state): State<AppState>,
    Path((id, milestone_id)): Path<(i64, u32)>,
) -> Result<Json<ShipmentView>, ApiError> {
    shipment::reopen_milestone(&state.db, id, milestone_id).map_err(api_error)?;
    updated(&state, id)
}
