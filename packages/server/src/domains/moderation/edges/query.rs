use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Extension, Path, Query,
    },
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use super::require_admin;
use crate::common::auth::AdminCapability;
use crate::common::ReportId;
use crate::domains::moderation::data::{
    DataEnvelope, FlaggedUserData, FlaggedUserPage, ListReportsQuery, PageQuery, ReportDetail,
    ReportPage,
};
use crate::domains::moderation::models::ReportRecord;
use crate::domains::users::User;
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;
use crate::server::middleware::AuthUser;

#[derive(Debug, Serialize)]
pub struct SingleReport {
    pub report: ReportDetail,
}

/// Reports newest first, optionally filtered by status
pub async fn list_reports_handler(
    Extension(state): Extension<AxumAppState>,
    auth_user: Option<Extension<AuthUser>>,
    params: Result<Query<ListReportsQuery>, QueryRejection>,
) -> Result<Json<DataEnvelope<ReportPage>>, ApiError> {
    require_admin(
        auth_user.map(|Extension(user)| user),
        AdminCapability::ModerateReports,
        &state.server_deps,
    )
    .await?;
    let Query(params) = params?;

    let paging = params.paging();
    let records =
        ReportRecord::query(params.status, paging.per_page(), paging.offset(), &state.db_pool)
            .await?;

    let mut reports = Vec::with_capacity(records.len());
    for record in records {
        reports.push(ReportDetail::load(record, &state.db_pool).await?);
    }

    Ok(Json(DataEnvelope::new(ReportPage {
        reports,
        page: paging.page(),
        per_page: paging.per_page(),
    })))
}

pub async fn get_report_handler(
    Extension(state): Extension<AxumAppState>,
    auth_user: Option<Extension<AuthUser>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<DataEnvelope<SingleReport>>, ApiError> {
    require_admin(
        auth_user.map(|Extension(user)| user),
        AdminCapability::ModerateReports,
        &state.server_deps,
    )
    .await?;
    let Path(id) = path?;

    let report_id = ReportId::from_uuid(id);
    let record = ReportRecord::find_by_id(report_id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Report {} not found", report_id)))?;

    let report = ReportDetail::load(record, &state.db_pool).await?;
    Ok(Json(DataEnvelope::new(SingleReport { report })))
}

/// Users flagged for repeated violations, worst first
pub async fn list_flagged_users_handler(
    Extension(state): Extension<AxumAppState>,
    auth_user: Option<Extension<AuthUser>>,
    paging: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<DataEnvelope<FlaggedUserPage>>, ApiError> {
    require_admin(
        auth_user.map(|Extension(user)| user),
        AdminCapability::ViewViolations,
        &state.server_deps,
    )
    .await?;
    let Query(paging) = paging?;

    let users = User::find_flagged(paging.per_page(), paging.offset(), &state.db_pool).await?;

    Ok(Json(DataEnvelope::new(FlaggedUserPage {
        users: users.into_iter().map(FlaggedUserData::from).collect(),
        page: paging.page(),
        per_page: paging.per_page(),
    })))
}
