//! Application state.

use logistik_core::ampel::AmpelRule;
use logistik_db::DbPool;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// WebSocket message types.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum WebSocketMessage {
    /// One shipment changed; clients re-fetch it to get fresh lights.
    ShipmentUpdated { shipment_id: i64, status: String },
    /// Lists changed (create, delete, master data).
    Refresh,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub tx: broadcast::Sender<WebSocketMessage>,
    /// Traffic-light rule used for every view served.
    pub rule: AmpelRule,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, rule: AmpelRule) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self { db, tx, rule }
    }

    /// Broadcast a message to all WebSocket clients.
    pub fn broadcast(&self, msg: WebSocketMessage) {
        let _ = self.tx.send(msg);
    }
}
