use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::http::{read_bytes, read_json, read_unit, with_bearer};
use crate::config::Config;
use crate::error::Result;
use crate::models::report::{Owner, OwnerCreate, Report, ReportCreate, Statistics};
use crate::models::user::{Acknowledgement, AuthTokens, ResetPassword};
use crate::storage::{ACCESS_TOKEN_KEY, LocalStorage};

/// The owner-facing API client.
///
/// Structurally the twin of [`ResidentApi`](crate::api::resident::ResidentApi),
/// pointed at the owner endpoint set: account management, reports and
/// platform statistics.
pub struct OwnerApi {
    http: reqwest::Client,
    base_url: String,
    storage: Arc<LocalStorage>,
}

impl OwnerApi {
    /// Creates a new `OwnerApi` bound to the configured base URL.
    pub fn new(config: &Config, storage: Arc<LocalStorage>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.owner_api_url.clone(),
            storage,
        }
    }

    /// Returns `true` if a bearer token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn token(&self) -> Option<String> {
        self.storage.get(ACCESS_TOKEN_KEY)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Logs an owner in with OAuth2-style multipart form credentials and
    /// persists the token on success.
    pub async fn login(&self, phone_number: &str, password: &str) -> Result<AuthTokens> {
        let form = reqwest::multipart::Form::new()
            .text("username", phone_number.to_string())
            .text("password", password.to_string());

        let resp = self
            .http
            .post(self.url("/owner/login"))
            .multipart(form)
            .send()
            .await?;
        let auth: AuthTokens = read_json(resp).await?;

        self.storage.set(ACCESS_TOKEN_KEY, &auth.access_token)?;
        tracing::info!("✅ Owner logged in");

        Ok(auth)
    }

    /// Clears the persisted token.
    pub fn logout(&self) -> Result<()> {
        self.storage.remove(ACCESS_TOKEN_KEY)?;
        tracing::info!("👋 Owner token cleared");
        Ok(())
    }

    /// Registers a new owner account.
    pub async fn create_owner(&self, data: &OwnerCreate) -> Result<Owner> {
        let resp = self
            .http
            .post(self.url("/owners/create-owner"))
            .json(data)
            .send()
            .await?;
        read_json(resp).await
    }

    /// Uploads the owner's logo as a multipart file.
    pub async fn upload_logo(&self, filename: &str, bytes: Vec<u8>) -> Result<Owner> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let req = self.http.post(self.url("/owners/upload-logo")).multipart(form);
        let resp = with_bearer(req, self.token()).send().await?;
        read_json(resp).await
    }

    /// Lists the authenticated owner's reports.
    pub async fn my_reports(&self) -> Result<Vec<Report>> {
        let req = self.http.get(self.url("/owners/my-reports"));
        let resp = with_bearer(req, self.token()).send().await?;
        read_json(resp).await
    }

    /// Downloads a rendered report as raw bytes.
    pub async fn download_report(&self, id: Uuid) -> Result<Vec<u8>> {
        let req = self.http.get(self.url(&format!("/owners/download/{}", id)));
        let resp = with_bearer(req, self.token()).send().await?;
        read_bytes(resp).await
    }

    /// Downloads a report and writes it to `path` (the blob-download
    /// analogue of the original UI).
    pub async fn save_report(&self, id: Uuid, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.download_report(id).await?;
        std::fs::write(path.as_ref(), bytes)?;
        tracing::info!("💾 Report {} saved to {}", id, path.as_ref().display());
        Ok(())
    }

    /// Asks the backend to generate a new report.
    pub async fn create_report(&self, data: &ReportCreate) -> Result<Report> {
        let req = self.http.post(self.url("/reports/create-reports")).json(data);
        let resp = with_bearer(req, self.token()).send().await?;
        let report: Report = read_json(resp).await?;
        tracing::info!("📊 Report created: {} ({:?})", report.id, report.report_type);
        Ok(report)
    }

    /// Deletes a report by id.
    pub async fn delete_report(&self, id: Uuid) -> Result<()> {
        let req = self
            .http
            .delete(self.url(&format!("/reports/delete-report/{}", id)));
        let resp = with_bearer(req, self.token()).send().await?;
        read_unit(resp).await
    }

    /// Fetches aggregate platform statistics for the dashboard.
    pub async fn statistics(&self) -> Result<Statistics> {
        let req = self.http.get(self.url("/reports/statistics"));
        let resp = with_bearer(req, self.token()).send().await?;
        read_json(resp).await
    }

    /// Starts the forgotten-password flow for an owner account.
    pub async fn forgot_password(&self, phone_number: &str) -> Result<Acknowledgement> {
        let resp = self
            .http
            .post(self.url("/owners/forgot-password"))
            .json(&serde_json::json!({ "phone_number": phone_number }))
            .send()
            .await?;
        read_json(resp).await
    }

    /// Completes the forgotten-password flow for an owner account.
    pub async fn reset_password(&self, data: &ResetPassword) -> Result<Acknowledgement> {
        let resp = self
            .http
            .post(self.url("/owners/reset-password"))
            .json(data)
            .send()
            .await?;
        read_json(resp).await
    }
}
