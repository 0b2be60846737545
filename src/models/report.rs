use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kinds of reports the backend can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// Visitors and their accesses.
    UserReport,
    /// QR code usage statistics.
    QrCodeReport,
    /// Platform-wide activity overview.
    ActivityReport,
    /// Security analysis and anomaly detection.
    SecurityReport,
}

/// The request payload for generating a report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportCreate {
    /// The report's title.
    pub title: String,
    /// The owner requesting the report.
    pub owner_id: Uuid,
    /// The kind of report to generate.
    pub report_type: ReportType,
    /// Lower bound of the reporting window, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<DateTime<Utc>>,
    /// Upper bound of the reporting window, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<DateTime<Utc>>,
}

/// A generated report as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Report {
    /// The report's unique identifier.
    pub id: Uuid,
    /// The report's title.
    pub title: String,
    /// Server-side path of the rendered file.
    pub file_path: String,
    /// The kind of report.
    pub report_type: ReportType,
    /// The owner the report belongs to.
    pub owner_id: Uuid,
    /// When the report was generated.
    pub created_at: DateTime<Utc>,
}

/// Aggregate platform statistics for the owner dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Statistics {
    /// Total registered residents.
    pub total_users: u64,
    /// Total issued QR passes.
    pub total_qr_codes: u64,
    /// Passes currently within their validity window.
    pub active_qr_codes: u64,
    /// Total guard-side scans.
    pub total_scans: u64,
    /// Residents registered this month.
    pub users_this_month: u64,
    /// Passes issued this month.
    pub qr_codes_this_month: u64,
}

/// The request payload for registering an owner account.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerCreate {
    /// The owner's phone number.
    pub phone_number: String,
    /// The chosen password.
    pub password: String,
    /// The owner's name.
    pub name: String,
    /// Contact email, if provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// An owner account as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    /// The owner's unique identifier.
    pub id: Uuid,
    /// The owner's phone number.
    pub phone_number: String,
    /// The owner's name.
    pub name: String,
    /// Contact email, if provided.
    pub email: Option<String>,
    /// Server-side path of the uploaded logo, if any.
    pub logo_path: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_type_uses_backend_wire_names() {
        assert_eq!(
            serde_json::to_string(&ReportType::QrCodeReport).unwrap(),
            "\"qr_code_report\""
        );
        let back: ReportType = serde_json::from_str("\"security_report\"").unwrap();
        assert_eq!(back, ReportType::SecurityReport);
    }

    #[test]
    fn report_create_omits_absent_date_bounds() {
        let create = ReportCreate {
            title: "Monthly".to_string(),
            owner_id: Uuid::new_v4(),
            report_type: ReportType::ActivityReport,
            date_from: None,
            date_to: None,
        };
        let raw = serde_json::to_string(&create).unwrap();
        assert!(!raw.contains("date_from"));
        assert!(!raw.contains("date_to"));
    }
}
