use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Extension, Path,
    },
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::require_admin;
use crate::common::auth::AdminCapability;
use crate::common::ReportId;
use crate::domains::moderation::data::{
    DataEnvelope, ProcessReportRequest, ProcessReportResponse, ReportDetail,
};
use crate::domains::moderation::messages::success_message;
use crate::domains::moderation::{process_report, ModerationError};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;
use crate::server::middleware::AuthUser;

/// Apply an admin decision to a pending report (admin only)
///
/// The path and body are only inspected once the caller is known to be an
/// admin.
pub async fn process_report_handler(
    Extension(state): Extension<AxumAppState>,
    auth_user: Option<Extension<AuthUser>>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<DataEnvelope<ProcessReportResponse>>, ApiError> {
    let deps = state.server_deps.as_ref();
    let admin = require_admin(
        auth_user.map(|Extension(user)| user),
        AdminCapability::ModerateReports,
        deps,
    )
    .await?;

    let Path(id) = path?;
    let body = parse_body(&body?)?;

    let report_id = ReportId::from_uuid(id);
    info!(report_id = %report_id, admin_id = %admin.user_id, "processing report");

    let action = body.moderation_action.unwrap_or_default();
    let processed = process_report(report_id, &action, admin.user_id, body.admin_note, deps).await?;

    Ok(Json(DataEnvelope::new(ProcessReportResponse {
        message: success_message(processed.action).to_string(),
        user_flagged: processed.user_flagged,
        report: ReportDetail::new(processed.report, processed.content),
    })))
}

/// Read the request body leniently: an empty body is `{}` and the content
/// type is not checked. A `moderation_action` that is not a string is an
/// invalid action.
fn parse_body(bytes: &[u8]) -> Result<ProcessReportRequest, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ProcessReportRequest::default());
    }

    let value: Value = serde_json::from_slice(bytes).map_err(|e| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("Request body is not valid JSON: {}", e),
        )
    })?;
    let Value::Object(mut fields) = value else {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Request body must be a JSON object",
        ));
    };

    let moderation_action = match fields.remove("moderation_action") {
        None | Some(Value::Null) => None,
        Some(Value::String(action)) => Some(action),
        Some(other) => {
            return Err(ModerationError::InvalidAction {
                action: other.to_string(),
            }
            .into())
        }
    };

    let admin_note = match fields.remove("admin_note") {
        None | Some(Value::Null) => None,
        Some(Value::String(note)) => Some(note),
        Some(_) => {
            return Err(ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "admin_note must be a string",
            ))
        }
    };

    Ok(ProcessReportRequest {
        moderation_action,
        admin_note,
    })
}
