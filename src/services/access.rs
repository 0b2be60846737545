use std::path::Path;

use image::Luma;
use qrcode::{EcLevel, QrCode};
use uuid::Uuid;

use crate::api::resident::ResidentApi;
use crate::error::{ClientError, Result};
use crate::models::grant::{AccessGrant, GrantStatus, QrPayload};

/// Minimum rendered size of the QR bitmap, in pixels.
const QR_MIN_DIMENSIONS: u32 = 256;

/// What a share action hands to the platform share sheet (or, failing
/// that, the clipboard).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareContent {
    /// Short title naming the visitor.
    pub title: String,
    /// Human-readable validity message.
    pub text: String,
    /// The public link to the pass.
    pub url: String,
}

/// A fetched access pass, ready to render, download or share.
///
/// Presentation only: the pass trusts the fetched `expires_at` and never
/// re-validates the grant locally. Admission is decided by the guard-side
/// validation endpoint, not by anything this type computes.
pub struct AccessPass {
    grant: AccessGrant,
    payload: QrPayload,
}

impl AccessPass {
    /// Fetches the grant through the public endpoint and prepares the
    /// pass.
    pub async fn fetch(api: &ResidentApi, id: Uuid) -> Result<Self> {
        let grant = api.get_public_grant(id).await?;
        Ok(Self::from_grant(grant))
    }

    /// Builds a pass from an already-fetched grant, stamping the QR
    /// payload with a fresh client-side timestamp.
    pub fn from_grant(grant: AccessGrant) -> Self {
        let payload = QrPayload::from_grant(&grant);
        Self { grant, payload }
    }

    /// The underlying grant.
    pub fn grant(&self) -> &AccessGrant {
        &self.grant
    }

    /// The structured payload encoded into the QR bitmap.
    pub fn payload(&self) -> &QrPayload {
        &self.payload
    }

    /// The display status, recomputed against the clock on every call.
    pub fn status(&self) -> GrantStatus {
        self.grant.status()
    }

    /// Renders the payload into a QR bitmap (error correction H).
    pub fn qr_image(&self) -> Result<image::GrayImage> {
        let json = serde_json::to_string(&self.payload)?;
        let code = QrCode::with_error_correction_level(json.as_bytes(), EcLevel::H)
            .map_err(|e| ClientError::Qr(e.to_string()))?;

        let image = code
            .render::<Luma<u8>>()
            .min_dimensions(QR_MIN_DIMENSIONS, QR_MIN_DIMENSIONS)
            .quiet_zone(true)
            .build();

        Ok(image)
    }

    /// Saves the QR bitmap as a PNG (the download action).
    ///
    /// Refused with [`ClientError::PassExpired`] once the grant is past
    /// its expiry.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        if self.grant.is_expired() {
            return Err(ClientError::PassExpired);
        }

        let image = self.qr_image()?;
        image
            .save(path.as_ref())
            .map_err(|e| ClientError::Qr(e.to_string()))?;
        tracing::info!("💾 Access pass saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Builds the share-sheet content for this pass (the share action).
    ///
    /// Refused with [`ClientError::PassExpired`] once the grant is past
    /// its expiry.
    pub fn share(&self, app_base_url: &str) -> Result<ShareContent> {
        if self.grant.is_expired() {
            return Err(ClientError::PassExpired);
        }

        let expiry = self.grant.expires_at.format("%d %B %Y %H:%M");
        Ok(ShareContent {
            title: format!("Access pass for {}", self.grant.name),
            text: format!("Here is your Welqo access pass. Valid until {}", expiry),
            url: format!("{}/access/{}?shared=true", app_base_url, self.grant.id),
        })
    }

    /// A plain-text summary of the pass, used next to the rendered QR.
    pub fn display_info(&self) -> String {
        format!(
            "Visitor: {}\nPhone: {}\nResident: {}\nApartment: {}\nExpires: {}",
            self.grant.name,
            self.grant.phone_number,
            self.grant.user.name,
            self.grant.user.apartment,
            self.grant.expires_at.format("%d/%m/%Y %H:%M"),
        )
    }
}
