//! Session store.
//!
//! [`AuthStore`] is the single source of truth for who is signed in. It is
//! constructed once at app start and cloned into whatever needs it; clones
//! share the same session. Every operation resolves to a definite session
//! state: failures become the session's `error` field or a fall back to
//! signed-out, and `is_loading` never stays set.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::client::{AuthClient, LoginOutcome};
use super::error::{AuthError, GENERIC_LOGIN_ERROR};
use crate::models::{AuthSession, Credentials, UserProfile, session_keys};
use crate::storage::KeyValueStore;

/// How a session restore ended.
#[derive(Debug)]
pub enum InitOutcome {
    /// A persisted session was found and loaded.
    Restored,
    /// Nothing (or only half a session) was persisted.
    SignedOut,
    /// Storage or profile decoding failed; the session was left signed out.
    Failed(AuthError),
}

/// Authentication state shared across the app.
///
/// Generic over the login endpoint `C` and the durable store `S` so hosts
/// and tests inject their own.
pub struct AuthStore<C, S> {
    inner: Arc<AuthStoreInner<C, S>>,
}

struct AuthStoreInner<C, S> {
    client: C,
    storage: S,
    session: watch::Sender<AuthSession>,
}

impl<C, S> Clone for AuthStore<C, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, S> AuthStore<C, S>
where
    C: AuthClient,
    S: KeyValueStore,
{
    /// Create a store with an empty, signed-out session.
    #[must_use]
    pub fn new(client: C, storage: S) -> Self {
        let (session, _) = watch::channel(AuthSession::default());
        Self {
            inner: Arc::new(AuthStoreInner {
                client,
                storage,
                session,
            }),
        }
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> AuthSession {
        self.inner.session.borrow().clone()
    }

    /// Whether a token is present, without cloning the session.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.inner.session.borrow().token().is_some()
    }

    /// Receiver that observes every session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthSession> {
        self.inner.session.subscribe()
    }

    /// The durable store backing this session.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.inner.storage
    }

    /// Sign in with email and password.
    ///
    /// On success the token and profile are persisted before the session is
    /// marked authenticated. Overlapping calls are not deduplicated: each
    /// issues its own request and the last one to resolve wins.
    ///
    /// # Errors
    ///
    /// Returns the failure as a signal to the caller. The session has
    /// already recorded it in `error` (server message, or
    /// [`GENERIC_LOGIN_ERROR`]) and kept any prior credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), AuthError> {
        self.inner.session.send_modify(AuthSession::begin_loading);

        match self.try_login(email, password).await {
            Ok(credentials) => {
                info!(user_id = %credentials.user.id, role = %credentials.user.role, "Signed in");
                self.inner
                    .session
                    .send_modify(|session| session.authenticate(credentials));
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Login failed");
                let message = err.user_message();
                self.inner
                    .session
                    .send_modify(|session| session.fail(message));
                Err(err)
            }
        }
    }

    async fn try_login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Credentials, AuthError> {
        match self.inner.client.login(email, password).await? {
            LoginOutcome::Failure { message } => Err(AuthError::Rejected(
                message.unwrap_or_else(|| GENERIC_LOGIN_ERROR.to_string()),
            )),
            LoginOutcome::Success(credentials) => {
                if let Err(err) = self.persist(&credentials).await {
                    self.roll_back_persisted().await;
                    return Err(err);
                }
                Ok(credentials)
            }
        }
    }

    async fn persist(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let profile = serde_json::to_string(&credentials.user)?;
        let storage = &self.inner.storage;
        storage
            .set(session_keys::AUTH_TOKEN, credentials.token.expose_secret())
            .await?;
        storage.set(session_keys::USER_DATA, &profile).await?;
        Ok(())
    }

    /// Undo a partial write after persisting new credentials failed.
    ///
    /// Storage is put back to the credentials currently in memory. If that
    /// write fails too, storage is cleared and the in-memory credentials are
    /// dropped with it, so an authenticated session always has its keys
    /// persisted.
    async fn roll_back_persisted(&self) {
        let prior = self.inner.session.borrow().credentials().cloned();
        let Some(prior) = prior else {
            self.clear_persisted().await;
            return;
        };

        if let Err(err) = self.persist(&prior).await {
            warn!(error = %err, "Failed to restore prior session keys; signing out");
            self.clear_persisted().await;
            self.inner.session.send_modify(AuthSession::sign_out);
        }
    }

    /// Sign out.
    ///
    /// Persisted keys are deleted best-effort (failures are logged); the
    /// in-memory session is cleared regardless.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        self.clear_persisted().await;
        self.inner.session.send_replace(AuthSession::default());
        info!("Signed out");
    }

    /// Restore the session persisted by a previous run.
    ///
    /// Never fails to the caller: a storage or decoding failure is logged,
    /// the session settles signed-out, and the outcome says so.
    #[instrument(skip(self))]
    pub async fn init_auth(&self) -> InitOutcome {
        self.inner.session.send_modify(AuthSession::begin_restore);

        match self.restore().await {
            Ok(Some(credentials)) => {
                info!(user_id = %credentials.user.id, "Session restored");
                self.inner
                    .session
                    .send_modify(|session| session.authenticate(credentials));
                InitOutcome::Restored
            }
            Ok(None) => {
                debug!("No persisted session");
                self.inner.session.send_modify(AuthSession::settle);
                InitOutcome::SignedOut
            }
            Err(err) => {
                warn!(error = %err, "Failed to restore session");
                self.inner.session.send_modify(AuthSession::settle);
                InitOutcome::Failed(err)
            }
        }
    }

    async fn restore(&self) -> Result<Option<Credentials>, AuthError> {
        self.migrate_legacy_keys().await?;

        let storage = &self.inner.storage;
        let token = storage.get(session_keys::AUTH_TOKEN).await?;
        let profile = storage.get(session_keys::USER_DATA).await?;

        let (Some(token), Some(profile)) = (token, profile) else {
            return Ok(None);
        };
        let user: UserProfile = serde_json::from_str(&profile)?;

        Ok(Some(Credentials {
            token: SecretString::from(token),
            user,
        }))
    }

    /// Move values stored under the legacy key names to the canonical ones.
    ///
    /// A canonical value that already exists wins over its legacy twin.
    async fn migrate_legacy_keys(&self) -> Result<(), AuthError> {
        let storage = &self.inner.storage;

        for (legacy, canonical) in session_keys::MIGRATIONS {
            let Some(value) = storage.get(legacy).await? else {
                continue;
            };
            if storage.get(canonical).await?.is_none() {
                storage.set(canonical, &value).await?;
                info!(legacy, canonical, "Migrated legacy session key");
            }
            if let Err(err) = storage.delete(legacy).await {
                warn!(key = legacy, error = %err, "Failed to delete legacy session key");
            }
        }
        Ok(())
    }

    /// Clear the `error` field.
    pub fn clear_error(&self) {
        self.inner.session.send_modify(AuthSession::clear_error);
    }

    /// Delete every persisted session key, canonical and legacy.
    ///
    /// Best-effort: failures are logged and the remaining keys are still
    /// attempted. The in-memory session is not touched.
    pub async fn clear_persisted(&self) {
        let keys = [
            session_keys::AUTH_TOKEN,
            session_keys::USER_DATA,
            session_keys::LEGACY_AUTH_TOKEN,
            session_keys::LEGACY_USER_DATA,
        ];
        for key in keys {
            if let Err(err) = self.inner.storage.delete(key).await {
                warn!(key, error = %err, "Failed to delete persisted session key");
            }
        }
    }
}
