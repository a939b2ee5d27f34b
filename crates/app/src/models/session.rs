//! Session-related types.
//!
//! The in-memory authentication state and the storage keys it is mirrored to.

use secrecy::SecretString;

use super::user::UserProfile;

/// Token and profile of an authenticated user.
///
/// The two only ever exist together, which is what makes
/// [`AuthSession::is_authenticated`] exact.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Bearer token issued by the login endpoint.
    pub token: SecretString,
    /// Profile of the signed-in user.
    pub user: UserProfile,
}

/// Current authentication state.
///
/// Starts empty and not loading. Only the session store mutates it; everyone
/// else reads snapshots.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    credentials: Option<Credentials>,
    is_loading: bool,
    error: Option<String>,
}

impl AuthSession {
    /// Token of the signed-in user, if any.
    #[must_use]
    pub fn token(&self) -> Option<&SecretString> {
        self.credentials.as_ref().map(|c| &c.token)
    }

    /// Profile of the signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        self.credentials.as_ref().map(|c| &c.user)
    }

    /// Token and profile together, if signed in.
    #[must_use]
    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// True iff both a token and a user are present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    /// True only while a login or restore is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message from the last failed login, if not yet cleared.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn begin_loading(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub(crate) fn begin_restore(&mut self) {
        self.is_loading = true;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.is_loading = false;
        self.error = Some(message);
    }

    pub(crate) fn authenticate(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
        self.is_loading = false;
        self.error = None;
    }

    pub(crate) fn sign_out(&mut self) {
        self.credentials = None;
    }

    pub(crate) const fn settle(&mut self) {
        self.is_loading = false;
    }

    pub(crate) fn clear_error(&mut self) {
        self.error = None;
    }
}

/// Storage keys for the persisted session.
pub mod keys {
    /// Key for the auth token.
    pub const AUTH_TOKEN: &str = "auth_token";

    /// Key for the JSON-serialized user profile.
    pub const USER_DATA: &str = "user_data";

    /// Older app builds stored the token under this key.
    pub const LEGACY_AUTH_TOKEN: &str = "token";

    /// Older app builds stored the profile under this key.
    pub const LEGACY_USER_DATA: &str = "userData";

    /// Canonical keys paired with the legacy key each one replaces.
    pub const MIGRATIONS: [(&str, &str); 2] = [
        (LEGACY_AUTH_TOKEN, AUTH_TOKEN),
        (LEGACY_USER_DATA, USER_DATA),
    ];
}
