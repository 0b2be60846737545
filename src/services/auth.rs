use std::sync::{Arc, Mutex};

use crate::api::resident::ResidentApi;
use crate::error::Result;
use crate::models::user::User;
use crate::storage::{ACCESS_TOKEN_KEY, LocalStorage, USER_NAME_KEY};
use crate::token;
use crate::validation::auth::validate_phone_number;

/// Where the UI should land after a successful resident login.
///
/// Returned as a value rather than acted on: callers invalidate their own
/// state and navigate, instead of the full-page reload the original
/// application used as a synchronization primitive.
pub const POST_LOGIN_DESTINATION: &str = "/residents/dashboard";

/// The resident auth service.
///
/// Owns the in-memory authenticated user and delegates credential checks
/// to the backend through [`ResidentApi`]. Components depend on this one
/// interface instead of reading storage keys directly.
pub struct AuthService {
    api: Arc<ResidentApi>,
    storage: Arc<LocalStorage>,
    user: Mutex<Option<User>>,
}

impl AuthService {
    /// Creates the service and restores any persisted identity.
    pub fn new(api: Arc<ResidentApi>, storage: Arc<LocalStorage>) -> Self {
        let service = Self {
            api,
            storage,
            user: Mutex::new(None),
        };
        service.restore();
        service
    }

    /// Restores a partial [`User`] from the persisted token and cached
    /// display name.
    ///
    /// The token is probed for expiry first; a stale or malformed token is
    /// cleared silently and treated as an absent session. Phone and
    /// apartment stay empty until a profile fetch fills them in.
    pub fn restore(&self) {
        let token = self.storage.get(ACCESS_TOKEN_KEY);
        let name = self.storage.get(USER_NAME_KEY);

        let (Some(token), Some(name)) = (token, name) else {
            return;
        };

        if !token::is_token_valid(&token) {
            tracing::info!("⌛ Stored token is stale, forcing re-authentication");
            let _ = self.storage.remove(ACCESS_TOKEN_KEY);
            let _ = self.storage.remove(USER_NAME_KEY);
            return;
        }

        *self.lock_user() = Some(User {
            name,
            phone_number: String::new(),
            apartment: String::new(),
        });
        tracing::debug!("🔓 Identity restored from storage");
    }

    /// Logs in with phone number and password.
    ///
    /// Validates the phone locally before any network call. On success the
    /// API client has already persisted token and display name; this
    /// service sets the in-memory user and returns the dashboard
    /// destination for the caller to navigate to.
    pub async fn login(&self, phone_number: &str, password: &str) -> Result<&'static str> {
        validate_phone_number(phone_number)?;

        let auth = self.api.login(phone_number, password).await?;

        *self.lock_user() = Some(User {
            name: auth.user_name,
            phone_number: phone_number.to_string(),
            apartment: String::new(),
        });

        Ok(POST_LOGIN_DESTINATION)
    }

    /// Logs out: clears the token, cached name and in-memory user.
    pub fn logout(&self) -> Result<()> {
        self.api.logout()?;
        *self.lock_user() = None;
        Ok(())
    }

    /// Returns a snapshot of the authenticated user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.lock_user().clone()
    }

    /// Returns `true` while a user is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.lock_user().is_some()
    }

    fn lock_user(&self) -> std::sync::MutexGuard<'_, Option<User>> {
        self.user.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::Utc;

    fn service_with(storage: Arc<LocalStorage>) -> AuthService {
        let config = Config::with_base_url("http://127.0.0.1:9", "unused.json");
        let api = Arc::new(ResidentApi::new(&config, storage.clone()));
        AuthService::new(api, storage)
    }

    fn jwt(exp_offset_secs: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            serde_json::json!({ "exp": Utc::now().timestamp() + exp_offset_secs, "sub": "u-1" })
                .to_string()
                .as_bytes(),
        );
        format!("{}.{}.sig", header, payload)
    }

    #[test]
    fn restore_synthesizes_partial_user() {
        let storage = Arc::new(LocalStorage::in_memory());
        storage.set(ACCESS_TOKEN_KEY, &jwt(3600)).unwrap();
        storage.set(USER_NAME_KEY, "Awa").unwrap();

        let service = service_with(storage);
        let user = service.current_user().expect("user should be restored");
        assert_eq!(user.name, "Awa");
        assert!(user.phone_number.is_empty());
        assert!(user.apartment.is_empty());
    }

    #[test]
    fn restore_clears_stale_token() {
        let storage = Arc::new(LocalStorage::in_memory());
        storage.set(ACCESS_TOKEN_KEY, &jwt(-3600)).unwrap();
        storage.set(USER_NAME_KEY, "Awa").unwrap();

        let service = service_with(storage.clone());
        assert!(!service.is_authenticated());
        assert!(storage.get(ACCESS_TOKEN_KEY).is_none());
        assert!(storage.get(USER_NAME_KEY).is_none());
    }

    #[test]
    fn restore_needs_both_token_and_name() {
        let storage = Arc::new(LocalStorage::in_memory());
        storage.set(ACCESS_TOKEN_KEY, &jwt(3600)).unwrap();

        let service = service_with(storage);
        assert!(!service.is_authenticated());
    }

    #[tokio::test]
    async fn login_rejects_malformed_phone_before_any_call() {
        let storage = Arc::new(LocalStorage::in_memory());
        let service = service_with(storage);

        let err = service.login("not-a-phone", "secret123").await.unwrap_err();
        assert_eq!(err.status(), 400);
        assert!(!service.is_authenticated());
    }
}
