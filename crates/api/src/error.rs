//! JSON rendering of application errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hrm_core::workflow::LifecycleError;
use hrm_shared::AppError;
use serde_json::json;
use std::fmt::Display;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An [`AppError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl<E> From<E> for ApiError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    /// Maps a status-machine failure, e.g. an unknown status string.
    pub fn lifecycle(err: &LifecycleError) -> Self {
        Self(AppError::from_status(
            err.status_code(),
            err.error_code(),
            err.to_string(),
        ))
    }

    /// 404 for a record missing from the tenant.
    pub fn not_found(kind: &str, id: impl Display) -> Self {
        Self(AppError::NotFound(format!("{kind} not found: {id}")))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, code = self.0.error_code(), "Request rejected");
        }

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.public_message(),
            })),
        )
            .into_response()
    }
}

/// Unwraps a lookup, turning `None` into a 404.
pub fn found<T>(value: Option<T>, kind: &str, id: impl Display) -> ApiResult<T> {
    value.ok_or_else(|| ApiError::not_found(kind, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_app_error() {
        let response = ApiError(AppError::rule("CYCLE_DETECTED", "loop")).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = ApiError(AppError::Database("pool timed out".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unknown_status_is_bad_request() {
        let err = LifecycleError::UnknownStatus {
            kind: "timesheet",
            value: "archived".into(),
        };
        let api = ApiError::lifecycle(&err);
        assert_eq!(api.0.status_code(), 400);
    }

    #[test]
    fn test_found_maps_none() {
        let err = found::<u8>(None, "Timesheet", "abc").unwrap_err();
        assert!(matches!(err.0, AppError::NotFound(ref m) if m == "Timesheet not found: abc"));
        assert_eq!(found(Some(3), "Timesheet", "abc").unwrap(), 3);
    }
}
