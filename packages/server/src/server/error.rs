//! JSON error responses for the REST surface.
//!
//! Every failure renders as `{ "error": { "code", "message", "details"? } }`
//! with `code` equal to the HTTP status.

use axum::{
    extract::rejection::{BytesRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use crate::common::auth::AuthError;
use crate::domains::moderation::messages::failure_message;
use crate::domains::moderation::{ModerationError, VALID_ACTIONS};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorPayload<'a>,
}

#[derive(Serialize)]
struct ErrorPayload<'a> {
    code: u16,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorPayload {
                code: self.status.as_u16(),
                message: &self.message,
                details: self.details.as_ref(),
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ModerationError> for ApiError {
    fn from(err: ModerationError) -> Self {
        let status = match &err {
            ModerationError::ReportNotFound(_) => StatusCode::NOT_FOUND,
            ModerationError::AlreadyReviewed { .. } => StatusCode::CONFLICT,
            ModerationError::InvalidAction { .. }
            | ModerationError::NoteTooLong { .. }
            | ModerationError::ContentMissing { .. }
            | ModerationError::Storage(_)
            | ModerationError::Timeout => StatusCode::UNPROCESSABLE_ENTITY,
        };

        let api = ApiError::new(status, failure_message(&err));
        if matches!(err, ModerationError::InvalidAction { .. }) {
            api.with_details(json!({ "valid_actions": VALID_ACTIONS }))
        } else {
            api
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationRequired => {
                ApiError::new(StatusCode::UNAUTHORIZED, err.to_string())
            }
            AuthError::AdminRequired | AuthError::PermissionDenied(_) => {
                ApiError::new(StatusCode::FORBIDDEN, AuthError::AdminRequired.to_string())
            }
            AuthError::DatabaseError(e) => {
                error!(error = %e, "authorization lookup failed");
                ApiError::internal()
            }
        }
    }
}

/// Unexpected infrastructure errors. The cause is logged, never returned.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        error!(error = ?err, "request failed");
        ApiError::internal()
    }
}

/// Malformed path or query parameters and unreadable bodies keep axum's
/// status and text but render in the error envelope.
macro_rules! rejection_into_api_error {
    ($($rejection:ty),+) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    ApiError::new(rejection.status(), rejection.body_text())
                }
            }
        )+
    };
}

rejection_into_api_error!(PathRejection, QueryRejection, BytesRejection);

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        error!(error = %err, "database query failed");
        ApiError::internal()
    }
}
