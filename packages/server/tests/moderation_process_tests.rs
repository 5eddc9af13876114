//! Integration tests for processing reports.
//!
//! Covers the three admin actions against photos and comments, rollback on
//! failure, conflict handling and best-effort owner notification.

mod common;

use std::time::Duration;

use crate::common::*;
use rainbow_core::domains::content::{Comment, ModerationStatus, Photo, Reportable};
use rainbow_core::domains::moderation::{process_report, ModerationError, ReportRecord, ReportStatus};
use rainbow_core::domains::notifications::{Notification, NotificationKind};
use rainbow_core::domains::users::User;
use rainbow_core::kernel::ModerationSettings;
use test_context::test_context;

// =============================================================================
// Approve / hide / delete
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn approve_dismisses_report_and_leaves_photo_visible(ctx: &TestHarness) {
    let admin = create_admin(&ctx.db_pool).await.unwrap();
    let owner = create_user(&ctx.db_pool, Some("ExponentPushToken[owner]")).await.unwrap();
    let (photo, report) = create_photo_report(&ctx.db_pool, owner.id).await.unwrap();

    let processed = process_report(
        report.id,
        "approve",
        admin.id,
        Some("not a violation".to_string()),
        &ctx.deps(),
    )
    .await
    .expect("approve should succeed");

    assert_eq!(processed.report.status, ReportStatus::Dismissed);
    assert_eq!(processed.report.resolved_by_id, Some(admin.id));
    assert_eq!(processed.report.admin_note.as_deref(), Some("not a violation"));
    assert!(processed.report.resolved_at.is_some());
    assert!(!processed.user_flagged);

    let photo = Photo::find_by_id(photo.id, &ctx.db_pool).await.unwrap().unwrap();
    assert!(photo.is_visible);
    assert_eq!(photo.moderation_status, ModerationStatus::Approved);

    // Approvals never notify the owner
    assert!(ctx.push.sent_notifications().is_empty());
    assert!(Notification::find_for_user(owner.id, &ctx.db_pool)
        .await
        .unwrap()
        .is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn hide_reaching_threshold_flags_owner(ctx: &TestHarness) {
    let admin = create_admin(&ctx.db_pool).await.unwrap();
    let owner = create_user(&ctx.db_pool, Some("ExponentPushToken[owner]")).await.unwrap();
    seed_resolved_reports(&ctx.db_pool, owner.id, admin.id, 2).await.unwrap();
    let (photo, report) = create_photo_report(&ctx.db_pool, owner.id).await.unwrap();

    let processed = process_report(
        report.id,
        "hide",
        admin.id,
        Some("inappropriate".to_string()),
        &ctx.deps(),
    )
    .await
    .expect("hide should succeed");

    assert_eq!(processed.report.status, ReportStatus::Resolved);
    assert!(processed.user_flagged);

    let photo = Photo::find_by_id(photo.id, &ctx.db_pool).await.unwrap().unwrap();
    assert!(!photo.is_visible);
    assert_eq!(photo.moderation_status, ModerationStatus::Hidden);

    let owner = User::find_by_id(owner.id, &ctx.db_pool).await.unwrap();
    assert_eq!(owner.violation_count, 3);
    assert!(owner.violation_flagged);

    assert!(ctx.push.was_sent_with_title("Your photo was hidden"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn delete_photo_marks_it_deleted(ctx: &TestHarness) {
    let admin = create_admin(&ctx.db_pool).await.unwrap();
    let owner = create_user(&ctx.db_pool, None).await.unwrap();
    let (photo, report) = create_photo_report(&ctx.db_pool, owner.id).await.unwrap();

    let processed = process_report(report.id, "delete", admin.id, None, &ctx.deps())
        .await
        .expect("delete should succeed");

    assert_eq!(processed.report.status, ReportStatus::Resolved);
    assert_eq!(processed.report.admin_note, None);
    assert!(!processed.user_flagged);

    let photo = Photo::find_by_id(photo.id, &ctx.db_pool).await.unwrap().unwrap();
    assert!(!photo.is_visible);
    assert_eq!(photo.moderation_status, ModerationStatus::Deleted);

    let owner = User::find_by_id(owner.id, &ctx.db_pool).await.unwrap();
    assert_eq!(owner.violation_count, 1);
    assert!(!owner.violation_flagged);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn comments_are_hidden_and_soft_deleted(ctx: &TestHarness) {
    let admin = create_admin(&ctx.db_pool).await.unwrap();
    let owner = create_user(&ctx.db_pool, None).await.unwrap();

    let hidden = create_comment(&ctx.db_pool, owner.id).await.unwrap();
    let report = create_report(&ctx.db_pool, Reportable::Comment(hidden.id)).await.unwrap();
    process_report(report.id, "hide", admin.id, None, &ctx.deps())
        .await
        .expect("hide should succeed");

    let hidden = Comment::find_by_id(hidden.id, &ctx.db_pool).await.unwrap().unwrap();
    assert!(!hidden.is_visible);
    assert!(hidden.deleted_at.is_none());

    let deleted = create_comment(&ctx.db_pool, owner.id).await.unwrap();
    let report = create_report(&ctx.db_pool, Reportable::Comment(deleted.id)).await.unwrap();
    let processed = process_report(report.id, "delete", admin.id, None, &ctx.deps())
        .await
        .expect("delete should succeed");

    let deleted = Comment::find_by_id(deleted.id, &ctx.db_pool).await.unwrap().unwrap();
    assert!(!deleted.is_visible);
    assert!(deleted.deleted_at.is_some());

    // Comments have no moderation status column
    let content = processed.content.unwrap();
    assert_eq!(content.moderation_status, None);

    let owner = User::find_by_id(owner.id, &ctx.db_pool).await.unwrap();
    assert_eq!(owner.violation_count, 2);
}

// =============================================================================
// Rejections
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn invalid_action_changes_nothing(ctx: &TestHarness) {
    let admin = create_admin(&ctx.db_pool).await.unwrap();
    let owner = create_user(&ctx.db_pool, None).await.unwrap();
    let (photo, report) = create_photo_report(&ctx.db_pool, owner.id).await.unwrap();

    let err = process_report(report.id, "publish", admin.id, None, &ctx.deps())
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::InvalidAction { ref action } if action == "publish"));

    let report = ReportRecord::find_by_id(report.id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(report.status, ReportStatus::Pending);
    let photo = Photo::find_by_id(photo.id, &ctx.db_pool).await.unwrap().unwrap();
    assert!(photo.is_visible);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn reviewed_reports_are_rejected(ctx: &TestHarness) {
    let admin = create_admin(&ctx.db_pool).await.unwrap();
    let owner = create_user(&ctx.db_pool, None).await.unwrap();
    let (_, report) = create_photo_report(&ctx.db_pool, owner.id).await.unwrap();

    process_report(report.id, "hide", admin.id, None, &ctx.deps())
        .await
        .expect("first review should succeed");

    let err = process_report(report.id, "delete", admin.id, None, &ctx.deps())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ModerationError::AlreadyReviewed {
            status: ReportStatus::Resolved,
            ..
        }
    ));

    // The second attempt must not count twice
    let owner = User::find_by_id(owner.id, &ctx.db_pool).await.unwrap();
    assert_eq!(owner.violation_count, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_reviews_have_one_winner(ctx: &TestHarness) {
    let admin = create_admin(&ctx.db_pool).await.unwrap();
    let owner = create_user(&ctx.db_pool, None).await.unwrap();
    let (_, report) = create_photo_report(&ctx.db_pool, owner.id).await.unwrap();

    let deps_a = ctx.deps();
    let deps_b = ctx.deps();
    let (a, b) = tokio::join!(
        process_report(report.id, "hide", admin.id, None, &deps_a),
        process_report(report.id, "approve", admin.id, None, &deps_b),
    );

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Err(ModerationError::AlreadyReviewed { .. }))));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_report_is_not_found(ctx: &TestHarness) {
    let admin = create_admin(&ctx.db_pool).await.unwrap();
    let missing = rainbow_core::common::ReportId::new();

    let err = process_report(missing, "approve", admin.id, None, &ctx.deps())
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::ReportNotFound(id) if id == missing));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn overlong_note_is_rejected(ctx: &TestHarness) {
    let admin = create_admin(&ctx.db_pool).await.unwrap();
    let owner = create_user(&ctx.db_pool, None).await.unwrap();
    let (_, report) = create_photo_report(&ctx.db_pool, owner.id).await.unwrap();

    let err = process_report(report.id, "hide", admin.id, Some("x".repeat(2001)), &ctx.deps())
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::NoteTooLong { max: 2000 }));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn hiding_vanished_content_fails_and_keeps_report_pending(ctx: &TestHarness) {
    let admin = create_admin(&ctx.db_pool).await.unwrap();
    let owner = create_user(&ctx.db_pool, None).await.unwrap();
    let (photo, report) = create_photo_report(&ctx.db_pool, owner.id).await.unwrap();

    sqlx::query("DELETE FROM photos WHERE id = $1")
        .bind(photo.id)
        .execute(&ctx.db_pool)
        .await
        .unwrap();

    let err = process_report(report.id, "hide", admin.id, None, &ctx.deps())
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::ContentMissing { .. }));

    let report = ReportRecord::find_by_id(report.id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(report.status, ReportStatus::Pending);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn approving_vanished_content_still_dismisses(ctx: &TestHarness) {
    let admin = create_admin(&ctx.db_pool).await.unwrap();
    let owner = create_user(&ctx.db_pool, None).await.unwrap();
    let (photo, report) = create_photo_report(&ctx.db_pool, owner.id).await.unwrap();

    sqlx::query("DELETE FROM photos WHERE id = $1")
        .bind(photo.id)
        .execute(&ctx.db_pool)
        .await
        .unwrap();

    let processed = process_report(report.id, "approve", admin.id, None, &ctx.deps())
        .await
        .expect("approve should succeed");
    assert_eq!(processed.report.status, ReportStatus::Dismissed);
    assert!(processed.content.is_none());
}

// =============================================================================
// Atomicity
// =============================================================================

/// A trigger fails the report update after the content update has already
/// run inside the same transaction. Nothing may persist.
#[test_context(TestHarness)]
#[tokio::test]
async fn failure_after_content_update_rolls_everything_back(ctx: &TestHarness) {
    sqlx::query(
        "CREATE OR REPLACE FUNCTION test_fail_marked_report_update() RETURNS trigger AS $$
         BEGIN
             IF NEW.admin_note = 'force-rollback' THEN
                 RAISE EXCEPTION 'forced failure';
             END IF;
             RETURN NEW;
         END;
         $$ LANGUAGE plpgsql",
    )
    .execute(&ctx.db_pool)
    .await
    .unwrap();
    sqlx::query(
        "DO $$ BEGIN
             IF NOT EXISTS (SELECT 1 FROM pg_trigger WHERE tgname = 'test_fail_marked_report_update') THEN
                 CREATE TRIGGER test_fail_marked_report_update
                 BEFORE UPDATE ON reports
                 FOR EACH ROW EXECUTE FUNCTION test_fail_marked_report_update();
             END IF;
         END $$",
    )
    .execute(&ctx.db_pool)
    .await
    .unwrap();

    let admin = create_admin(&ctx.db_pool).await.unwrap();
    let owner = create_user(&ctx.db_pool, Some("ExponentPushToken[owner]")).await.unwrap();
    seed_resolved_reports(&ctx.db_pool, owner.id, admin.id, 2).await.unwrap();
    let (photo, report) = create_photo_report(&ctx.db_pool, owner.id).await.unwrap();

    let err = process_report(
        report.id,
        "delete",
        admin.id,
        Some("force-rollback".to_string()),
        &ctx.deps(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ModerationError::Storage(_)));

    let photo = Photo::find_by_id(photo.id, &ctx.db_pool).await.unwrap().unwrap();
    assert!(photo.is_visible);
    assert_eq!(photo.moderation_status, ModerationStatus::Approved);

    let report = ReportRecord::find_by_id(report.id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(report.status, ReportStatus::Pending);
    assert_eq!(report.resolved_by_id, None);

    let owner_after = User::find_by_id(owner.id, &ctx.db_pool).await.unwrap();
    assert!(!owner_after.violation_flagged);
    assert!(ctx.push.sent_notifications().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn statement_timeout_is_reported_as_timeout(ctx: &TestHarness) {
    let admin = create_admin(&ctx.db_pool).await.unwrap();
    let owner = create_user(&ctx.db_pool, None).await.unwrap();
    let (photo, report) = create_photo_report(&ctx.db_pool, owner.id).await.unwrap();

    // Hold the report row so the executor's lock has to wait
    let mut blocker = ctx.db_pool.begin().await.unwrap();
    sqlx::query("SELECT id FROM reports WHERE id = $1 FOR UPDATE")
        .bind(report.id)
        .execute(&mut *blocker)
        .await
        .unwrap();

    let deps = ctx.deps_with(ModerationSettings {
        statement_timeout: Duration::from_millis(200),
        ..ModerationSettings::default()
    });
    let err = process_report(report.id, "hide", admin.id, None, &deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::Timeout));

    blocker.rollback().await.unwrap();

    let photo = Photo::find_by_id(photo.id, &ctx.db_pool).await.unwrap().unwrap();
    assert!(photo.is_visible);
}

// =============================================================================
// Notifications
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn push_failure_does_not_fail_moderation(ctx: &TestHarness) {
    ctx.push.set_failing(true);

    let admin = create_admin(&ctx.db_pool).await.unwrap();
    let owner = create_user(&ctx.db_pool, Some("ExponentPushToken[owner]")).await.unwrap();
    let (photo, report) = create_photo_report(&ctx.db_pool, owner.id).await.unwrap();

    let processed = process_report(report.id, "delete", admin.id, None, &ctx.deps())
        .await
        .expect("delete should succeed even when push fails");
    assert_eq!(processed.report.status, ReportStatus::Resolved);

    let photo = Photo::find_by_id(photo.id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(photo.moderation_status, ModerationStatus::Deleted);

    // The inbox row is written before push delivery is attempted
    let inbox = Notification::find_for_user(owner.id, &ctx.db_pool).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::ContentDeleted);
    assert_eq!(inbox[0].title, "Your photo was removed");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn owner_notice_carries_report_data(ctx: &TestHarness) {
    let admin = create_admin(&ctx.db_pool).await.unwrap();
    let owner = create_user(&ctx.db_pool, Some("ExponentPushToken[notice]")).await.unwrap();
    let comment = create_comment(&ctx.db_pool, owner.id).await.unwrap();
    let report = create_report(&ctx.db_pool, Reportable::Comment(comment.id)).await.unwrap();

    process_report(report.id, "hide", admin.id, None, &ctx.deps())
        .await
        .expect("hide should succeed");

    let sent = ctx.push.sent_notifications();
    assert_eq!(sent.len(), 1);
    let (token, title, _, data) = &sent[0];
    assert_eq!(token, "ExponentPushToken[notice]");
    assert_eq!(title, "Your comment was hidden");
    assert_eq!(data["report_id"], report.id.to_string());
    assert_eq!(data["reportable_type"], "Comment");
    assert_eq!(data["action"], "hide");
    assert_eq!(data["kind"], "content_hidden");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn ownerless_content_skips_accounting_and_notice(ctx: &TestHarness) {
    let admin = create_admin(&ctx.db_pool).await.unwrap();
    let owner = create_user(&ctx.db_pool, Some("ExponentPushToken[gone]")).await.unwrap();
    let (photo, report) = create_photo_report(&ctx.db_pool, owner.id).await.unwrap();

    // Deleting the account nulls the photo's owner
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(owner.id)
        .execute(&ctx.db_pool)
        .await
        .unwrap();

    let processed = process_report(report.id, "hide", admin.id, None, &ctx.deps())
        .await
        .expect("hide should succeed without an owner");

    assert!(!processed.user_flagged);
    assert_eq!(processed.content.unwrap().owner_id, None);
    assert!(ctx.push.sent_notifications().is_empty());

    let photo = Photo::find_by_id(photo.id, &ctx.db_pool).await.unwrap().unwrap();
    assert!(!photo.is_visible);
}
