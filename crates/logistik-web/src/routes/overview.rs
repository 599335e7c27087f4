//! Dashboard summary.

use axum::{extract::State, Json};
use logistik_core::shipment::{self, model::Overview};

use super::{api_error, ApiError};
use crate::state::AppState;

/// GET /api/overview - Counts per status and number of late shipments.
pub async fn get_overview(State(state): State<AppState>) -> Result<Json<Overview>, ApiError> {
    let overview = shipment::overview(&state.db, state.rule).map_err(api_error)?;
    Ok(Json(overview))
}
