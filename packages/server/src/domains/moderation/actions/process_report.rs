//! Process a report: mutate the content, close the report, account the
//! violation, then tell the owner.
//!
//! The first three steps share one transaction and commit together. The
//! owner notice is sent after commit and can never fail the request.

use anyhow::Context;
use serde_json::json;
use tracing::{error, info, warn};

use crate::common::{ReportId, UserId};
use crate::domains::content::{ContentSnapshot, Reportable};
use crate::domains::moderation::actions::violations;
use crate::domains::moderation::errors::ModerationError;
use crate::domains::moderation::machines::{ContentEffect, ModerationAction, TransitionError};
use crate::domains::moderation::messages;
use crate::domains::moderation::models::{ReportRecord, ReportStatus, MAX_ADMIN_NOTE_LENGTH};
use crate::domains::notifications::NotificationDispatcher;
use crate::domains::users::User;
use crate::kernel::ServerDeps;

/// Committed outcome of a moderation action
#[derive(Debug, Clone)]
pub struct ProcessedReport {
    pub action: ModerationAction,
    pub report: ReportRecord,
    /// Content state after the action; `None` if the content is gone
    /// (only possible for `approve`)
    pub content: Option<ContentSnapshot>,
    /// Whether this action pushed the owner over the violation threshold
    pub user_flagged: bool,
}

/// Run one admin decision against a pending report.
///
/// `admin_id` must already have passed the admin check. Validation errors
/// are returned before any transaction is opened; any later error rolls
/// the whole unit back.
pub async fn process_report(
    report_id: ReportId,
    action: &str,
    admin_id: UserId,
    admin_note: Option<String>,
    deps: &ServerDeps,
) -> Result<ProcessedReport, ModerationError> {
    let action: ModerationAction = action.parse()?;
    let admin_note = normalize_note(admin_note)?;

    let processed = match apply(report_id, action, admin_id, admin_note, deps).await {
        Ok(processed) => processed,
        Err(err) => {
            match &err {
                ModerationError::Storage(cause) => {
                    error!(report_id = %report_id, action = %action, error = %cause, "moderation rolled back")
                }
                other => {
                    warn!(report_id = %report_id, action = %action, error = %other, "moderation rejected")
                }
            }
            return Err(err);
        }
    };

    info!(
        report_id = %report_id,
        admin_id = %admin_id,
        action = %action,
        status = processed.report.status.as_str(),
        user_flagged = processed.user_flagged,
        "report processed"
    );

    if action.is_penalty() {
        if let Some(owner_id) = processed.content.as_ref().and_then(|c| c.owner_id) {
            if let Err(err) = notify_owner(owner_id, action, &processed.report, deps).await {
                warn!(
                    report_id = %report_id,
                    owner_id = %owner_id,
                    error = %err,
                    "owner notification failed"
                );
            }
        }
    }

    Ok(processed)
}

/// Blank notes are stored as NULL
fn normalize_note(note: Option<String>) -> Result<Option<String>, ModerationError> {
    let note = note
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    if let Some(n) = &note {
        if n.chars().count() > MAX_ADMIN_NOTE_LENGTH {
            return Err(ModerationError::NoteTooLong {
                max: MAX_ADMIN_NOTE_LENGTH,
            });
        }
    }

    Ok(note)
}

fn content_missing(reportable: Reportable) -> ModerationError {
    ModerationError::ContentMissing {
        kind: reportable.kind(),
        id: reportable.raw_id(),
    }
}

/// The atomic unit. Order: content, then report, then accounting.
async fn apply(
    report_id: ReportId,
    action: ModerationAction,
    admin_id: UserId,
    admin_note: Option<String>,
    deps: &ServerDeps,
) -> Result<ProcessedReport, ModerationError> {
    let mut tx = deps.db_pool.begin().await?;

    sqlx::query("SELECT set_config('statement_timeout', $1, true)")
        .bind(format!("{}ms", deps.moderation.statement_timeout.as_millis()))
        .execute(&mut *tx)
        .await?;

    let report = ReportRecord::find_for_update(report_id, &mut *tx)
        .await?
        .ok_or(ModerationError::ReportNotFound(report_id))?;

    let next_status = report.status.transition(action).map_err(
        |TransitionError::AlreadyReviewed { current }| ModerationError::AlreadyReviewed {
            report_id,
            status: current,
        },
    )?;

    let reportable = report.reportable();
    let content = match action.content_effect() {
        ContentEffect::Untouched => reportable.snapshot(&mut *tx).await?,
        ContentEffect::Hide => Some(
            reportable
                .set_hidden(&mut *tx)
                .await?
                .ok_or_else(|| content_missing(reportable))?,
        ),
        ContentEffect::Delete => Some(
            reportable
                .set_deleted(&mut *tx)
                .await?
                .ok_or_else(|| content_missing(reportable))?,
        ),
    };

    let closed = match next_status {
        ReportStatus::Dismissed => {
            ReportRecord::dismiss(report_id, admin_id, admin_note, &mut *tx).await?
        }
        _ => ReportRecord::resolve(report_id, admin_id, admin_note, &mut *tx).await?,
    };
    // The row lock makes this unreachable; the pending-only update backs it up.
    let report = closed.ok_or(ModerationError::AlreadyReviewed {
        report_id,
        status: report.status,
    })?;

    let owner_id = content.as_ref().and_then(|c| c.owner_id);
    let user_flagged = match owner_id {
        Some(owner_id) if action.is_penalty() => {
            violations::recount_and_maybe_flag(owner_id, &mut *tx).await?
        }
        _ => false,
    };

    tx.commit().await?;

    Ok(ProcessedReport {
        action,
        report,
        content,
        user_flagged,
    })
}

async fn notify_owner(
    owner_id: UserId,
    action: ModerationAction,
    report: &ReportRecord,
    deps: &ServerDeps,
) -> anyhow::Result<()> {
    let (Some(kind), Some((title, body))) = (
        action.notification_kind(),
        messages::owner_notice(action, report.reportable_type),
    ) else {
        return Ok(());
    };

    let owner = User::find_by_id(owner_id, &deps.db_pool)
        .await
        .context("Failed to load content owner")?;

    let data = json!({
        "report_id": report.id,
        "reportable_type": report.reportable_type.as_str(),
        "reportable_id": report.reportable_id,
        "action": action.as_str(),
    });

    NotificationDispatcher::from_deps(deps)
        .send(&owner, &title, &body, data, kind)
        .await
}
