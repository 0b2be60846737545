use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::consent::CookiePreferences;
use crate::models::session::{SessionRole, SessionUpdate, UserSession};
use crate::storage::{COOKIE_PREFERENCES_KEY, LocalStorage, USER_SESSION_KEY};

/// The client-side session store.
///
/// Tracks the ephemeral "who is browsing" record, independent of
/// authentication. Expiry is soft and lazy: a record whose `last_activity`
/// is older than the configured maximum age is discarded the next time it
/// is read, not by a countdown.
pub struct SessionService {
    storage: Arc<LocalStorage>,
    current: Mutex<Option<UserSession>>,
    heartbeat: Mutex<Option<JoinHandle<()>>>,
    max_age: Duration,
    heartbeat_interval: Duration,
}

impl SessionService {
    /// Creates the service and loads any persisted session.
    ///
    /// A persisted record past its maximum age is removed instead of
    /// loaded; a live one gets its `last_activity` bumped right away.
    pub fn new(config: &Config, storage: Arc<LocalStorage>) -> Self {
        let service = Self {
            storage,
            current: Mutex::new(None),
            heartbeat: Mutex::new(None),
            max_age: config.session_max_age,
            heartbeat_interval: config.heartbeat_interval,
        };
        service.load();
        service
    }

    fn load(&self) {
        let Some(raw) = self.storage.get(USER_SESSION_KEY) else {
            return;
        };

        let session: UserSession = match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("⚠️ Discarding unreadable session record: {}", e);
                let _ = self.storage.remove(USER_SESSION_KEY);
                return;
            }
        };

        let age = Utc::now().signed_duration_since(session.last_activity);
        if age.num_milliseconds() >= self.max_age.as_millis() as i64 {
            tracing::info!("⌛ Session expired after {}h idle, discarding", age.num_hours());
            let _ = self.storage.remove(USER_SESSION_KEY);
            return;
        }

        *self.lock_current() = Some(session);
        // Loading counts as activity.
        let _ = self.refresh_activity();
    }

    /// Returns a snapshot of the live session, if any.
    pub fn session(&self) -> Option<UserSession> {
        self.lock_current().clone()
    }

    /// Returns `true` while a session is live.
    pub fn is_active(&self) -> bool {
        self.lock_current().is_some()
    }

    /// Creates a session for the given role, replacing any existing one.
    ///
    /// Requires `necessary` cookie consent; the record cannot be persisted
    /// without it.
    pub fn create_session(
        &self,
        role: SessionRole,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<UserSession> {
        let prefs: CookiePreferences = self
            .storage
            .get(COOKIE_PREFERENCES_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        if !prefs.necessary {
            return Err(ClientError::Validation(
                "Session tracking requires necessary cookie consent".to_string(),
            ));
        }

        let session = UserSession {
            id: Uuid::new_v4().to_string(),
            role,
            name,
            email,
            last_activity: Utc::now(),
        };

        self.persist(&session)?;
        *self.lock_current() = Some(session.clone());
        tracing::info!("🆕 Session created: {} ({:?})", session.id, role);
        Ok(session)
    }

    /// Merges `updates` into the live session and bumps `last_activity`.
    ///
    /// A no-op when no session is live.
    pub fn update_session(&self, updates: SessionUpdate) -> Result<()> {
        let mut current = self.lock_current();
        let Some(session) = current.as_mut() else {
            return Ok(());
        };

        if let Some(role) = updates.role {
            session.role = role;
        }
        if let Some(name) = updates.name {
            session.name = Some(name);
        }
        if let Some(email) = updates.email {
            session.email = Some(email);
        }
        session.last_activity = Utc::now();

        let snapshot = session.clone();
        drop(current);
        self.persist(&snapshot)
    }

    /// Bumps `last_activity` without changing anything else.
    pub fn refresh_activity(&self) -> Result<()> {
        self.update_session(SessionUpdate::default())
    }

    /// Destroys the session: record, ephemeral storage and heartbeat.
    pub fn destroy_session(&self) -> Result<()> {
        *self.lock_current() = None;
        self.storage.remove(USER_SESSION_KEY)?;
        self.storage.clear_ephemeral();
        self.stop_heartbeat();
        tracing::info!("🗑️ Session destroyed");
        Ok(())
    }

    /// Starts the keep-alive heartbeat, bumping `last_activity` every
    /// period while a session is live.
    ///
    /// This is a keep-alive for long-open tabs, not a real activity
    /// signal: an idle-but-open client is indistinguishable from an
    /// active one. Known imprecision, kept on purpose.
    pub fn start_heartbeat(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let period = self.heartbeat_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately; skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(service) = weak.upgrade() else {
                    break;
                };
                if !service.is_active() {
                    continue;
                }
                if let Err(e) = service.refresh_activity() {
                    tracing::warn!("⚠️ Heartbeat failed to persist activity: {}", e);
                }
            }
        });

        let mut heartbeat = self.lock_heartbeat();
        if let Some(previous) = heartbeat.replace(handle) {
            previous.abort();
        }
        tracing::debug!("💓 Session heartbeat started ({:?} period)", period);
    }

    /// Stops the keep-alive heartbeat.
    pub fn stop_heartbeat(&self) {
        if let Some(handle) = self.lock_heartbeat().take() {
            handle.abort();
            tracing::debug!("💓 Session heartbeat stopped");
        }
    }

    fn persist(&self, session: &UserSession) -> Result<()> {
        let raw = serde_json::to_string(session)?;
        self.storage.set(USER_SESSION_KEY, &raw)
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, Option<UserSession>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_heartbeat(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.heartbeat.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for SessionService {
    fn drop(&mut self) {
        self.stop_heartbeat();
    }
}
