use std::sync::Arc;
use uuid::Uuid;

use crate::api::http::{read_json, read_unit, with_bearer};
use crate::config::Config;
use crate::error::Result;
use crate::models::grant::{AccessGrant, CreateGrant, QrValidation, UpdateGrant};
use crate::models::user::{
    Acknowledgement, AlertData, ChangePassword, LoginResponse, RegisterData, ResetPassword,
};
use crate::storage::{ACCESS_TOKEN_KEY, LocalStorage, USER_NAME_KEY};

/// The resident-facing API client.
///
/// A thin wrapper over the backend's resident endpoints. Every call
/// attaches the bearer token read from the injected [`LocalStorage`] and
/// normalizes the response into the crate's error shape.
pub struct ResidentApi {
    http: reqwest::Client,
    base_url: String,
    storage: Arc<LocalStorage>,
}

impl ResidentApi {
    /// Creates a new `ResidentApi` bound to the configured base URL.
    pub fn new(config: &Config, storage: Arc<LocalStorage>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.resident_api_url.clone(),
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

    /// Logs a resident in with OAuth2-style multipart form credentials.
    ///
    /// On success the token and display name are persisted into storage as
    /// part of this call. Request and session establishment are one
    /// operation here because the backend's form login is consumed from a
    /// single call site; see DESIGN.md before copying this coupling.
    pub async fn login(&self, phone_number: &str, password: &str) -> Result<LoginResponse> {
        let form = reqwest::multipart::Form::new()
            .text("username", phone_number.to_string())
            .text("password", password.to_string());

        let resp = self
            .http
            .post(self.url("/user/login"))
            .multipart(form)
            .send()
            .await?;
        let auth: LoginResponse = read_json(resp).await?;

        self.storage.set(ACCESS_TOKEN_KEY, &auth.access_token)?;
        self.storage.set(USER_NAME_KEY, &auth.user_name)?;
        tracing::info!("✅ Resident logged in: {}", auth.user_name);

        Ok(auth)
    }

    /// Clears the persisted token and cached display name.
    pub fn logout(&self) -> Result<()> {
        self.storage.remove(ACCESS_TOKEN_KEY)?;
        self.storage.remove(USER_NAME_KEY)?;
        tracing::info!("👋 Resident token cleared");
        Ok(())
    }

    /// Registers a new resident account.
    pub async fn register(&self, data: &RegisterData) -> Result<Acknowledgement> {
        let resp = self
            .http
            .post(self.url("/users/register"))
            .json(data)
            .send()
            .await?;
        read_json(resp).await
    }

    /// Changes the resident's password.
    pub async fn change_password(&self, data: &ChangePassword) -> Result<Acknowledgement> {
        let req = self.http.put(self.url("/users/change-password")).json(data);
        let resp = with_bearer(req, self.token()).send().await?;
        read_json(resp).await
    }

    /// Starts the forgotten-password flow for a phone number.
    pub async fn forgot_password(&self, phone_number: &str) -> Result<Acknowledgement> {
        let resp = self
            .http
            .post(self.url("/users/forgot-password"))
            .json(&serde_json::json!({ "phone_number": phone_number }))
            .send()
            .await?;
        read_json(resp).await
    }

    /// Completes the forgotten-password flow.
    pub async fn reset_password(&self, data: &ResetPassword) -> Result<Acknowledgement> {
        let resp = self
            .http
            .post(self.url("/users/reset-password"))
            .json(data)
            .send()
            .await?;
        read_json(resp).await
    }

    /// Issues a new access grant for a visitor.
    pub async fn create_grant(&self, data: &CreateGrant) -> Result<AccessGrant> {
        let req = self.http.post(self.url("/forms/create-form")).json(data);
        let resp = with_bearer(req, self.token()).send().await?;
        let grant: AccessGrant = read_json(resp).await?;
        tracing::info!("🎫 Grant issued: {} for {}", grant.id, grant.name);
        Ok(grant)
    }

    /// Lists the authenticated resident's grants.
    pub async fn user_grants(&self) -> Result<Vec<AccessGrant>> {
        let req = self.http.get(self.url("/forms/user-forms"));
        let resp = with_bearer(req, self.token()).send().await?;
        read_json(resp).await
    }

    /// Fetches one grant by id.
    pub async fn get_grant(&self, id: Uuid) -> Result<AccessGrant> {
        let req = self.http.get(self.url(&format!("/forms/{}", id)));
        let resp = with_bearer(req, self.token()).send().await?;
        read_json(resp).await
    }

    /// Fetches a grant through the public, unauthenticated endpoint.
    ///
    /// This is what the shared access-pass page uses: the visitor holding
    /// the link is not logged in.
    pub async fn get_public_grant(&self, id: Uuid) -> Result<AccessGrant> {
        let resp = self
            .http
            .get(self.url(&format!("/forms/public/{}", id)))
            .send()
            .await?;
        read_json(resp).await
    }

    /// Asks the backend whether scanned QR data admits the visitor.
    ///
    /// The single source of truth for admission; the local pass status is
    /// presentation only.
    pub async fn validate_qr_code(&self, qr_data: &str) -> Result<QrValidation> {
        let req = self
            .http
            .get(self.url("/forms/validate-qr-code"))
            .query(&[("qr_data", qr_data)]);
        let resp = with_bearer(req, self.token()).send().await?;
        read_json(resp).await
    }

    /// Edits a grant's visitor details.
    pub async fn update_grant(&self, id: Uuid, data: &UpdateGrant) -> Result<AccessGrant> {
        let req = self.http.put(self.url(&format!("/forms/{}", id))).json(data);
        let resp = with_bearer(req, self.token()).send().await?;
        read_json(resp).await
    }

    /// Deletes a grant.
    pub async fn delete_grant(&self, id: Uuid) -> Result<()> {
        let req = self.http.delete(self.url(&format!("/forms/{}", id)));
        let resp = with_bearer(req, self.token()).send().await?;
        read_unit(resp).await
    }

    /// Extends a grant's validity by `duration_minutes` from now.
    pub async fn renew_grant(&self, id: Uuid, duration_minutes: i64) -> Result<AccessGrant> {
        let req = self
            .http
            .post(self.url(&format!("/forms/{}/renew", id)))
            .query(&[("duration_minutes", duration_minutes)]);
        let resp = with_bearer(req, self.token()).send().await?;
        let grant: AccessGrant = read_json(resp).await?;
        tracing::info!("🔄 Grant renewed: {} until {}", grant.id, grant.expires_at);
        Ok(grant)
    }

    /// Relays an alert to every resident of the building.
    pub async fn send_alert(&self, data: &AlertData) -> Result<Acknowledgement> {
        let req = self.http.post(self.url("/users/send-alert")).json(data);
        let resp = with_bearer(req, self.token()).send().await?;
        read_json(resp).await
    }
}
