use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The discriminator embedded in every QR payload.
pub const QR_PAYLOAD_KIND: &str = "welqo_access";

/// The issuing resident as embedded in an access grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantUser {
    /// The resident's name.
    pub name: String,
    /// The resident's phone number.
    pub phone_number: String,
    /// The resident's apartment. The backend uses the French field name.
    #[serde(rename = "appartement")]
    pub apartment: String,
}

/// A backend-issued, time-bounded access grant for a named visitor.
///
/// The authoritative record lives server-side; the client only renders it
/// and derives a display status from `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    /// The grant's unique identifier.
    pub id: Uuid,
    /// The visitor's name.
    pub name: String,
    /// The visitor's phone number.
    pub phone_number: String,
    /// The opaque QR data the backend associates with this grant.
    pub qr_code_data: String,
    /// When the grant was issued.
    pub created_at: DateTime<Utc>,
    /// When the grant stops admitting the visitor.
    pub expires_at: DateTime<Utc>,
    /// The resident who issued the grant.
    pub user: GrantUser,
}

/// Display status of a grant, recomputed on every read and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantStatus {
    /// `expires_at` lies in the future.
    Active,
    /// `expires_at` has passed.
    Expired,
}

impl AccessGrant {
    /// Derives the display status from `expires_at` against the clock.
    pub fn status(&self) -> GrantStatus {
        if Utc::now() > self.expires_at {
            GrantStatus::Expired
        } else {
            GrantStatus::Active
        }
    }

    /// Returns `true` once the grant is past its expiry.
    pub fn is_expired(&self) -> bool {
        self.status() == GrantStatus::Expired
    }
}

/// The request payload for issuing a new grant.
#[derive(Debug, Clone, Serialize)]
pub struct CreateGrant {
    /// The visitor's name.
    pub name: String,
    /// The visitor's phone number.
    pub phone_number: String,
    /// How long the grant stays valid, in minutes.
    pub duration_minutes: i64,
}

/// The request payload for editing a grant's visitor details.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateGrant {
    /// New visitor name, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New visitor phone, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// The visitor identity embedded in a QR payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrVisitor {
    /// The visitor's name.
    pub name: String,
    /// The visitor's phone number.
    pub phone: String,
}

/// The resident identity embedded in a QR payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrResident {
    /// The resident's name.
    pub name: String,
    /// The resident's phone number.
    pub phone: String,
    /// The resident's apartment.
    pub apartment: String,
}

/// The structured JSON document encoded into the QR bitmap.
///
/// A redundant, offline-readable subset of the grant. Scanning it is never
/// sufficient for admission: guards re-validate through the backend's
/// validation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    /// The grant id.
    pub id: Uuid,
    /// The payload discriminator, always [`QR_PAYLOAD_KIND`].
    #[serde(rename = "type")]
    pub kind: String,
    /// The visitor the grant admits.
    pub visitor: QrVisitor,
    /// The resident who issued the grant.
    pub resident: QrResident,
    /// When the grant was issued.
    pub created_at: DateTime<Utc>,
    /// When the grant expires.
    pub expires_at: DateTime<Utc>,
    /// When this payload was generated client-side.
    pub timestamp: DateTime<Utc>,
}

impl QrPayload {
    /// Builds the payload from a fetched grant, stamping it with a fresh
    /// client-side timestamp.
    pub fn from_grant(grant: &AccessGrant) -> Self {
        Self {
            id: grant.id,
            kind: QR_PAYLOAD_KIND.to_string(),
            visitor: QrVisitor {
                name: grant.name.clone(),
                phone: grant.phone_number.clone(),
            },
            resident: QrResident {
                name: grant.user.name.clone(),
                phone: grant.user.phone_number.clone(),
                apartment: grant.user.apartment.clone(),
            },
            created_at: grant.created_at,
            expires_at: grant.expires_at,
            timestamp: Utc::now(),
        }
    }
}

/// The backend's answer to a guard-side QR validation request.
#[derive(Debug, Clone, Deserialize)]
pub struct QrValidation {
    /// Whether the scanned pass admits the visitor right now.
    pub valid: bool,
    /// A human-readable verdict.
    pub message: String,
    /// Grant details, present when the pass resolved to a known grant.
    pub data: Option<QrValidationData>,
}

/// Grant details attached to a validation verdict.
#[derive(Debug, Clone, Deserialize)]
pub struct QrValidationData {
    /// The issuing resident.
    pub user: GrantUser,
    /// The visitor the grant admits.
    pub visitor: QrValidationVisitor,
    /// When the grant was issued.
    pub created_at: DateTime<Utc>,
    /// When the grant expires.
    pub expires_at: DateTime<Utc>,
}

/// The visitor identity inside a validation verdict.
#[derive(Debug, Clone, Deserialize)]
pub struct QrValidationVisitor {
    /// The visitor's name.
    pub name: String,
    /// The visitor's phone number.
    pub phone_number: String,
}
