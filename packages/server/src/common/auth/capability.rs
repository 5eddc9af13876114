/// Capabilities an actor can be checked for.
///
/// Every capability currently maps to the admin role; the enum exists so
/// call sites say what they are about to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCapability {
    /// Review reports and run moderation actions on reported content
    ModerateReports,

    /// Inspect users' violation standing
    ViewViolations,
}

impl AdminCapability {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminCapability::ModerateReports => "moderate_reports",
            AdminCapability::ViewViolations => "view_violations",
        }
    }
}
