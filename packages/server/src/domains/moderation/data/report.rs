use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{ReportId, UserId};
use crate::domains::content::{ContentSnapshot, ModerationStatus, ReportableType};
use crate::domains::moderation::models::{ReportRecord, ReportStatus};

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

/// Body of `POST /admin/reports/:id/process`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessReportRequest {
    pub moderation_action: Option<String>,
    pub admin_note: Option<String>,
}

/// API representation of a report together with its content
#[derive(Debug, Clone, Serialize)]
pub struct ReportDetail {
    pub id: ReportId,
    pub reason: String,
    pub status: ReportStatus,
    pub admin_note: Option<String>,
    pub reporter_id: UserId,
    pub resolved_by_id: Option<UserId>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reportable: ReportableDetail,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportableDetail {
    #[serde(rename = "type")]
    pub kind: ReportableType,
    pub id: Uuid,
    /// `None` when the owner account or the content itself is gone
    pub owner_id: Option<UserId>,
    pub is_visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderation_status: Option<ModerationStatus>,
}

impl ReportDetail {
    pub fn new(report: ReportRecord, content: Option<ContentSnapshot>) -> Self {
        let reportable = match content {
            Some(content) => ReportableDetail {
                kind: content.kind,
                id: content.id,
                owner_id: content.owner_id,
                is_visible: content.is_visible,
                moderation_status: content.moderation_status,
            },
            None => ReportableDetail {
                kind: report.reportable_type,
                id: report.reportable_id,
                owner_id: None,
                is_visible: false,
                moderation_status: None,
            },
        };

        Self {
            id: report.id,
            reason: report.reason,
            status: report.status,
            admin_note: report.admin_note,
            reporter_id: report.reporter_id,
            resolved_by_id: report.resolved_by_id,
            resolved_at: report.resolved_at,
            created_at: report.created_at,
            updated_at: report.updated_at,
            reportable,
        }
    }

    /// Read the current content state and build the detail view
    pub async fn load(report: ReportRecord, pool: &PgPool) -> Result<Self, sqlx::Error> {
        let content = report.reportable().snapshot(pool).await?;
        Ok(Self::new(report, content))
    }
}

/// Success body of the process endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ProcessReportResponse {
    pub report: ReportDetail,
    pub message: String,
    pub user_flagged: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportPage {
    pub reports: Vec<ReportDetail>,
    pub page: i64,
    pub per_page: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListReportsQuery {
    pub status: Option<ReportStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListReportsQuery {
    pub fn paging(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// 1-based page parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.per_page())
    }
}

/// Every success body is wrapped in `{ "data": ... }`
#[derive(Debug, Clone, Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
