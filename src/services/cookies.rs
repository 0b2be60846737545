use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::consent::CookiePreferences;
use crate::storage::{COOKIE_JAR_KEY, COOKIE_PREFERENCES_KEY, COOKIES_ACCEPTED_KEY, LocalStorage};

/// Prefix that exempts a cookie name from consent gating.
pub const NECESSARY_PREFIX: &str = "necessary-";

/// A cookie value with its expiry, as persisted in the jar.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCookie {
    value: String,
    expires_at: DateTime<Utc>,
}

/// The cookie/consent store.
///
/// Holds the per-category consent flags, the tri-state "accepted" marker
/// and a persisted cookie jar (the `document.cookie` analogue). Expired
/// jar entries are dropped lazily on read.
pub struct CookieStore {
    storage: Arc<LocalStorage>,
    preferences: Mutex<CookiePreferences>,
    accepted: Mutex<Option<bool>>,
    jar: Mutex<HashMap<String, StoredCookie>>,
}

impl CookieStore {
    /// Creates the store, loading persisted consent state and jar.
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        let preferences = storage
            .get(COOKIE_PREFERENCES_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        let accepted = storage
            .get(COOKIES_ACCEPTED_KEY)
            .map(|raw| raw == "true");

        let jar = storage
            .get(COOKIE_JAR_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        Self {
            storage,
            preferences: Mutex::new(preferences),
            accepted: Mutex::new(accepted),
            jar: Mutex::new(jar),
        }
    }

    /// Returns the current consent flags.
    pub fn preferences(&self) -> CookiePreferences {
        *self.lock(&self.preferences)
    }

    /// Returns the tri-state consent decision: `None` before the user has
    /// chosen, then `Some(true)`/`Some(false)`.
    pub fn cookies_accepted(&self) -> Option<bool> {
        *self.lock(&self.accepted)
    }

    /// Grants every category and marks the decision made.
    pub fn accept_all(&self) -> Result<()> {
        self.apply_consent(CookiePreferences::all_accepted())
    }

    /// Grants only the necessary category and marks the decision made.
    pub fn accept_necessary_only(&self) -> Result<()> {
        self.apply_consent(CookiePreferences::necessary_only())
    }

    /// Persists an arbitrary combination of flags WITHOUT flipping the
    /// accepted marker.
    ///
    /// The "save custom settings" path uses this and must mark the
    /// decision itself via [`mark_accepted`](Self::mark_accepted).
    pub fn update_preferences(&self, prefs: CookiePreferences) -> Result<()> {
        *self.lock(&self.preferences) = prefs;
        self.storage
            .set(COOKIE_PREFERENCES_KEY, &serde_json::to_string(&prefs)?)
    }

    /// Records the consent decision explicitly.
    pub fn mark_accepted(&self, accepted: bool) -> Result<()> {
        *self.lock(&self.accepted) = Some(accepted);
        self.storage
            .set(COOKIES_ACCEPTED_KEY, if accepted { "true" } else { "false" })
    }

    /// Writes a cookie valid for `days`, gated by consent.
    ///
    /// The write happens only when the necessary category is granted or
    /// the name carries the `necessary-` prefix. Analytics and marketing
    /// keys pass through this same gate: category-specific enforcement is
    /// the CALLER's duty (check `preferences().analytics` first, as
    /// [`record_last_activity`](Self::record_last_activity) does).
    pub fn set_cookie(&self, name: &str, value: &str, days: i64) -> Result<()> {
        if !self.preferences().necessary && !name.starts_with(NECESSARY_PREFIX) {
            tracing::debug!("🍪 Cookie write suppressed by consent: {}", name);
            return Ok(());
        }

        let mut jar = self.lock(&self.jar);
        jar.insert(
            name.to_string(),
            StoredCookie {
                value: value.to_string(),
                expires_at: Utc::now() + Duration::days(days),
            },
        );
        self.persist_jar(&jar)
    }

    /// Reads a cookie, dropping it if it expired.
    pub fn get_cookie(&self, name: &str) -> Option<String> {
        let mut jar = self.lock(&self.jar);
        match jar.get(name) {
            Some(cookie) if cookie.expires_at > Utc::now() => Some(cookie.value.clone()),
            Some(_) => {
                jar.remove(name);
                let _ = self.persist_jar(&jar);
                None
            }
            None => None,
        }
    }

    /// Deletes a cookie. Deleting an absent cookie is a no-op.
    pub fn delete_cookie(&self, name: &str) -> Result<()> {
        let mut jar = self.lock(&self.jar);
        if jar.remove(name).is_some() {
            self.persist_jar(&jar)?;
        }
        Ok(())
    }

    /// Writes the `last-activity` analytics cookie, but only when the
    /// analytics category is granted.
    ///
    /// This is where the analytics gate lives; `set_cookie` itself only
    /// knows about the necessary category.
    pub fn record_last_activity(&self) -> Result<()> {
        if !self.preferences().analytics {
            return Ok(());
        }
        self.set_cookie("last-activity", &Utc::now().timestamp_millis().to_string(), 1)
    }

    fn apply_consent(&self, prefs: CookiePreferences) -> Result<()> {
        self.update_preferences(prefs)?;
        self.mark_accepted(true)?;
        tracing::info!(
            "🍪 Consent recorded: analytics={} marketing={}",
            prefs.analytics,
            prefs.marketing
        );
        Ok(())
    }

    fn persist_jar(&self, jar: &HashMap<String, StoredCookie>) -> Result<()> {
        self.storage
            .set(COOKIE_JAR_KEY, &serde_json::to_string(jar)?)
    }

    fn lock<'a, T>(&self, mutex: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
        mutex.lock().unwrap_or_else(|e| e.into_inner())
    }
}
