//! User-facing strings for moderation, keyed by action.

use super::errors::ModerationError;
use super::machines::ModerationAction;
use crate::domains::content::ReportableType;

/// Shown to the admin after a successful action
pub fn success_message(action: ModerationAction) -> &'static str {
    match action {
        ModerationAction::Approve => "Report dismissed. The content remains visible.",
        ModerationAction::Hide => "Content hidden and report resolved.",
        ModerationAction::Delete => "Content deleted and report resolved.",
    }
}

/// Shown to the admin when an action fails. Storage failures get a fixed
/// string; the underlying error is logged instead.
pub fn failure_message(err: &ModerationError) -> String {
    match err {
        ModerationError::Storage(_) => {
            "The report could not be processed. No changes were made.".to_string()
        }
        ModerationError::Timeout => {
            "Processing the report took too long. No changes were made.".to_string()
        }
        other => other.to_string(),
    }
}

/// Title and body of the notice sent to the content owner
pub fn owner_notice(action: ModerationAction, kind: ReportableType) -> Option<(String, String)> {
    let noun = kind.noun();
    match action {
        ModerationAction::Approve => None,
        ModerationAction::Hide => Some((
            format!("Your {} was hidden", noun),
            format!(
                "Your {} was reported and hidden after review because it does not follow the community guidelines.",
                noun
            ),
        )),
        ModerationAction::Delete => Some((
            format!("Your {} was removed", noun),
            format!(
                "Your {} was reported and removed after review because it does not follow the community guidelines.",
                noun
            ),
        )),
    }
}
