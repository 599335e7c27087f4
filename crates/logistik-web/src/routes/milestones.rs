//! Milestone catalog lookup.

use axum::{extract::Query, Json};
use logistik_core::milestone::{self, CatalogKey, MilestoneDef, CATALOG_VERSION};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct CatalogQuery {
    pub transport_type: Option<String>,
    pub direction: Option<String>,
}

#[derive(Serialize)]
pub struct CatalogResponse {
    pub version: u32,
    pub catalog: CatalogKey,
    /// True when the transport type was not recognised.
    pub fallback: bool,
    pub milestones: &'static [MilestoneDef],
}

/// GET /api/milestones - Milestone list for a transport mode.
pub async fn get_catalog(Query(query): Query<CatalogQuery>) -> Json<CatalogResponse> {
    let selection = milestone::select_catalog(
        query.transport_type.as_deref().unwrap_or(""),
        query.direction.as_deref().unwrap_or("EXPORT"),
    );

    Json(CatalogResponse {
        version: CATALOG_VERSION,
        catalog: selection.key,
        fallback: selection.fallback,
        milestones: selection.key.milestones(),
    })
}
