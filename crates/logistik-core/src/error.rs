//! Centralized error types for LogistikPro.

use thiserror::Error;

/// Main error type for LogistikPro operations.
#[derive(Error, Debug)]
pub enum LogistikError {
    #[error("Shipment not found: {0}")]
    ShipmentNotFound(i64),

    #[error("Customer not found: {0}")]
    CustomerNotFound(i64),

    #[error("Partner not found: {0}")]
    PartnerNotFound(i64),

    #[error("Milestone {milestone} does not exist in catalog '{catalog}'")]
    UnknownMilestone { milestone: u32, catalog: String },

    #[error("Invalid state transition: cannot move from '{from}' to '{to}'")]
    InvalidStateTransition { from: String, to: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    Database(#[from] logistik_db::DbError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for LogistikPro operations.
pub type LogistikResult<T> = Result<T, LogistikError>;

impl LogistikError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// True for the "no such record" family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ShipmentNotFound(_)
                | Self::CustomerNotFound(_)
                | Self::PartnerNotFound(_)
                | Self::Database(logistik_db::DbError::NotFound(_))
        )
    }
}
