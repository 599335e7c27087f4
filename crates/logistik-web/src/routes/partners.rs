//! Partner route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use logistik_core::partner::{
    self,
    model::{NewPartner, Partner, PartnerType},
};
use serde::Deserialize;

use super::{api_error, ApiError};
use crate::state::{AppState, WebSocketMessage};

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub partner_type: Option<String>,
}

pub async fn list_partners(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Partner>>, ApiError> {
    let partner_type = match query.partner_type.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(PartnerType::parse(raw).ok_or_else(|| {
            (StatusCode::BAD_REQUEST, format!("Unknown partner type '{}'", raw))
        })?),
    };

    let partners = partner::list_partners(&state.db, partner_type).map_err(api_error)?;
    Ok(Json(partners))
}

pub async fn get_partner(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Partner>, ApiError> {
    let partner = partner::get_partner(&state.db, id).map_err(api_error)?;
    Ok(Json(partner))
}

pub async fn create_partner(
    State(state): State<AppState>,
    Json(req): Json<NewPartner>,
) -> Result<(StatusCode, Json<Partner>), ApiError> {
    let partner = partner::create_partner(&state.db, &req).map_err(api_error)?;
    state.broadcast(WebSocketMessage::Refresh);
    Ok((StatusCode::CREATED, Json(partner)))
}

pub async fn delete_partner(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    partner::delete_partner(&state.db, id).map_err(api_error)?;
    state.broadcast(WebSocketMessage::Refresh);
    Ok(StatusCode::NO_CONTENT)
}
