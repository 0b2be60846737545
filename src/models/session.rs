use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role the browsing user picked on the landing page.
///
/// Purely local bookkeeping: the backend never sees this record and it
/// implies no authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    /// A resident issuing access passes.
    Resident,
    /// A guard validating scanned passes.
    Guard,
    /// An owner/manager (syndic) consulting statistics and reports.
    Manager,
}

/// An ephemeral "who is browsing" record, independent of authentication.
///
/// Discarded on read once `last_activity` is older than the configured
/// maximum age (24h by default).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    /// A locally generated identifier for this session.
    pub id: String,
    /// The role the user selected.
    pub role: SessionRole,
    /// Display name, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Timestamp of the last tracked activity.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_activity: DateTime<Utc>,
}

/// The mutable subset of a session, merged in by `update_session`.
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    /// New role, if changing.
    pub role: Option<SessionRole>,
    /// New display name, if changing.
    pub name: Option<String>,
    /// New email, if changing.
    pub email: Option<String>,
}
