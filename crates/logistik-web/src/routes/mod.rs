//! Route handlers.

pub mod customers;
pub mod milestones;
pub mod overview;
pub mod partners;
pub mod shipments;

use axum::http::StatusCode;
use logistik_core::LogistikError;

/// Error half of every handler result.
pub type ApiError = (StatusCode, String);

/// Map a domain error to a status code and message.
pub fn api_error(e: LogistikError) -> ApiError {
    let status = match &e {
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        LogistikError::ValidationError(_) | LogistikError::UnknownMilestone { .. } => {
            StatusCode::BAD_REQUEST
        }
        LogistikError::InvalidStateTransition { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(error = %e, "Request failed");
    }
    (status, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(api_error(LogistikError::ShipmentNotFound(1)).0, StatusCode::NOT_FOUND);
        assert_eq!(
            api_error(LogistikError::validation("bad")).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            api_error(LogistikError::InvalidStateTransition {
                from: "ANFRAGE".into(),
                to: "booked".into()
            })
            .0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            api_error(LogistikError::Config("broken".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
