use serde::{Deserialize, Serialize};

/// The authenticated resident as known to the client.
///
/// Restored from storage as a partial record (name only); phone and
/// apartment stay empty until a profile fetch fills them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// The resident's display name.
    pub name: String,
    /// The resident's phone number.
    pub phone_number: String,
    /// The apartment the resident lives in.
    pub apartment: String,
}

/// The request payload for resident registration.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterData {
    /// The resident's full name.
    pub name: String,
    /// The resident's phone number.
    pub phone_number: String,
    /// The apartment identifier. The backend uses the French field name.
    #[serde(rename = "appartement")]
    pub apartment: String,
    /// The chosen password.
    pub password: String,
    /// The residence/building name.
    pub resident: String,
}

/// The response payload of a successful resident login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// The bearer token to attach to authenticated requests.
    pub access_token: String,
    /// The token type, always `bearer`.
    pub token_type: String,
    /// The resident's display name, cached locally.
    pub user_name: String,
}

/// The response payload of a successful owner login (no display name).
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTokens {
    /// The bearer token to attach to authenticated requests.
    pub access_token: String,
    /// The token type, always `bearer`.
    pub token_type: String,
}

/// The request payload for changing a password.
#[derive(Debug, Clone, Serialize)]
pub struct ChangePassword {
    /// The account's phone number.
    pub phone_number: String,
    /// The current password.
    pub old_password: String,
    /// The new password.
    pub new_password: String,
}

/// The request payload for resetting a forgotten password.
#[derive(Debug, Clone, Serialize)]
pub struct ResetPassword {
    /// The account's phone number.
    pub phone_number: String,
    /// The new password.
    pub new_password: String,
    /// Confirmation of the new password.
    pub confirm_password: String,
}

/// The request payload for a resident-wide alert.
#[derive(Debug, Clone, Serialize)]
pub struct AlertData {
    /// Free-form alert text relayed to all residents.
    pub alert_details: String,
}

/// A simple `{ message }` acknowledgement from the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct Acknowledgement {
    /// The backend's human-readable confirmation.
    pub message: String,
}
