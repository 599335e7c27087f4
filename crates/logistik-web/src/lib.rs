//! LogistikPro Web Server
//!
//! Axum-based REST API and WebSocket refresh channel.

pub mod routes;
pub mod state;
pub mod websocket;

use axum::{
    routing::{get, post, put},
    Router,
};
use logistik_core::ampel::AmpelRule;
use logistik_db::DbPool;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Shipments
        .route(
            "/shipments",
            get(routes::shipments::list_shipments).post(routes::shipments::create_shipment),
        )
        .route(
            "/shipments/{id}",
            get(routes::shipments::get_shipment).delete(routes::shipments::delete_shipment),
        )
        .route("/shipments/{id}/offer", post(routes::shipments::create_offer))
        .route("/shipments/{id}/accept", post(routes::shipments::accept_offer))
        .route("/shipments/{id}/reject", post(routes::shipments::reject_offer))
        .route("/shipments/{id}/book", post(routes::shipments::book))
        .route("/shipments/{id}/status", post(routes::shipments::set_status))
        .route("/shipments/{id}/costs", put(routes::shipments::update_costs))
        .route("/shipments/{id}/dates", put(routes::shipments::update_dates))
        .route("/shipments/{id}/partners", put(routes::shipments::assign_partners))
        .route(
            "/shipments/{id}/milestones/{milestone_id}",
            post(routes::shipments::complete_milestone)
                .delete(routes::shipments::reopen_milestone),
        )
        // Catalog
        .route("/milestones", get(routes::milestones::get_catalog))
        // Master data
        .route(
            "/customers",
            get(routes::customers::list_customers).post(routes::customers::create_customer),
        )
        .route(
            "/customers/{id}",
            get(routes::customers::get_customer).delete(routes::customers::delete_customer),
        )
        .route(
            "/partners",
            get(routes::partners::list_partners).post(routes::partners::create_partner),
        )
        .route(
            "/partners/{id}",
            get(routes::partners::get_partner).delete(routes::partners::delete_partner),
        )
        // Dashboard
        .route("/overview", get(routes::overview::get_overview))
        .with_state(state.clone());

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(websocket::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(db: Arc<DbPool>, rule: AmpelRule, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(db, rule);
    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(ampel_rule = rule.as_str(), "Web server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::state::WebSocketMessage;

    fn test_state() -> AppState {
        let db = Arc::new(logistik_db::init_memory_pool().unwrap());
        AppState::new(db, AmpelRule::Completion)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_create_and_get_shipment() {
        let app = create_router(test_state());

        let (status, created) = send(
            &app,
            "POST",
            "/api/shipments",
            Some(json!({ "transport_type": "AIR", "direction": "IMPORT", "origin": "Shenzhen" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "ANFRAGE");
        assert_eq!(created["catalog"], "airImport");
        assert_eq!(created["lights"]["abholung"], "grey");

        let id = created["id"].as_i64().unwrap();
        let (status, fetched) = send(&app, "GET", &format!("/api/shipments/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["origin"], "Shenzhen");
        assert_eq!(fetched["milestones"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_milestone_updates_lights_and_broadcasts() {
        let state = test_state();
        let mut rx = state.tx.subscribe();
        let app = create_router(state);

        let (_, created) = send(&app, "POST", "/api/shipments", Some(json!({ "transport_type": "TRUCK" }))).await;
        let id = created["id"].as_i64().unwrap();
        assert_eq!(rx.recv().await.unwrap(), WebSocketMessage::Refresh);

        let (status, view) = send(&app, "POST", &format!("/api/shipments/{}/milestones/1", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["lights"]["abholung"], "yellow");
        assert_eq!(view["lights"]["carrier"], "grey");
        assert!(matches!(
            rx.recv().await.unwrap(),
            WebSocketMessage::ShipmentUpdated { shipment_id, .. } if shipment_id == id
        ));

        let (status, _) = send(&app, "POST", &format!("/api/shipments/{}/milestones/5", id), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, view) = send(&app, "DELETE", &format!("/api/shipments/{}/milestones/1", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["lights"]["abholung"], "grey");
    }

    #[tokio::test]
    async fn test_offer_workflow_status_codes() {
        let app = create_router(test_state());
        let (_, created) = send(&app, "POST", "/api/shipments", Some(json!({ "transport_type": "SEA" }))).await;
        let id = created["id"].as_i64().unwrap();

        let (status, _) = send(&app, "POST", &format!("/api/shipments/{}/book", id), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, view) = send(
            &app,
            "POST",
            &format!("/api/shipments/{}/offer", id),
            Some(json!({ "price": 1800.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["status"], "ANGEBOT");

        let (status, view) = send(
            &app,
            "PUT",
            &format!("/api/shipments/{}/costs", id),
            Some(json!({ "pickup": 200.0, "main": 1100.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["total_cost"], 1300.0);
        assert_eq!(view["margin"], 500.0);

        let (status, view) = send(&app, "POST", &format!("/api/shipments/{}/reject", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["status"], "ABGELEHNT");
    }

    #[tokio::test]
    async fn test_not_found_and_validation() {
        let app = create_router(test_state());

        let (status, _) = send(&app, "GET", "/api/shipments/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "POST", "/api/shipments", Some(json!({ "transport_type": "RAIL" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "GET", "/api/partners?type=bank", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_catalog_endpoint() {
        let app = create_router(test_state());

        let (status, body) = send(&app, "GET", "/api/milestones?transport_type=SEA&direction=IMPORT", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["catalog"], "seaImport");
        assert_eq!(body["fallback"], false);
        assert_eq!(body["milestones"].as_array().unwrap().len(), 11);

        let (_, body) = send(&app, "GET", "/api/milestones?transport_type=RAIL", None).await;
        assert_eq!(body["catalog"], "airExport");
        assert_eq!(body["fallback"], true);
    }

    #[tokio::test]
    async fn test_customers_and_overview() {
        let app = create_router(test_state());

        let (status, customer) = send(
            &app,
            "POST",
            "/api/customers",
            Some(json!({ "name": "Nordlicht AG", "phones": ["040 1"] })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(customer["phones"][0], "040 1");

        let customer_id = customer["id"].as_i64().unwrap();
        send(
            &app,
            "POST",
            "/api/shipments",
            Some(json!({ "transport_type": "AIR", "customer_id": customer_id })),
        )
        .await;

        let (status, overview) = send(&app, "GET", "/api/overview", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(overview["total"], 1);
        assert_eq!(overview["late"], 0);
        assert_eq!(overview["by_status"][0]["status"], "ANFRAGE");

        let (status, _) = send(&app, "DELETE", &format!("/api/customers/{}", customer_id), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_master_data() {
        let app = create_router(test_state());

        let (_, partner) = send(
            &app,
            "POST",
            "/api/partners",
            Some(json!({ "name": "Hapag-Lloyd", "partner_type": "carrier" })),
        )
        .await;
        let partner_id = partner["id"].as_i64().unwrap();
        let (_, created) = send(&app, "POST", "/api/shipments", Some(json!({ "transport_type": "SEA" }))).await;
        let shipment_id = created["id"].as_i64().unwrap();
        send(
            &app,
            "PUT",
            &format!("/api/shipments/{}/partners", shipment_id),
            Some(json!({ "main": partner_id })),
        )
        .await;

        let (status, _) = send(&app, "DELETE", &format!("/api/partners/{}", partner_id), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "DELETE", &format!("/api/shipments/{}", shipment_id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "DELETE", &format!("/api/partners/{}", partner_id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &format!("/api/partners/{}", partner_id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", "/api/customers/77", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
