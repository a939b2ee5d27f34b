//! Integration tests for the Laundry Lane client core.
//!
//! Each test runs the real [`HttpAuthClient`] against a `wiremock` backend
//! and the real [`FileStore`] in a temporary directory.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p laundry-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_flow` - login, restore and logout across store instances
//! - `redirects` - the navigation state machine reacting to real sign-ins

use std::path::PathBuf;

use laundry_app::auth::{AuthStore, HttpAuthClient};
use laundry_app::storage::FileStore;
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the login endpoint is served under.
pub const LOGIN_PATH: &str = "/api/auth/login";

/// A mock backend plus a scratch directory for the session file.
pub struct TestContext {
    pub server: MockServer,
    pub dir: TempDir,
}

impl TestContext {
    /// Start a mock backend and create a scratch directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Path of the session file inside the scratch directory.
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.dir.path().join("session.json")
    }

    /// A fresh store over the shared session file, as a new app launch
    /// would build.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URI is not a valid base URL.
    #[must_use]
    pub fn store(&self) -> AuthStore<HttpAuthClient, FileStore> {
        let base = Url::parse(&self.server.uri()).expect("mock server URI");
        let client = HttpAuthClient::new(&base).expect("login URL");
        AuthStore::new(client, FileStore::new(self.session_path()))
    }

    /// Answer every login with `status` and `body`.
    pub async fn respond_to_login(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }
}

/// Body of a successful login for a user with `role`.
#[must_use]
pub fn login_success(token: &str, role: &str) -> Value {
    json!({
        "success": true,
        "data": {
            "token": token,
            "id": "user-42",
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": "+44 20 7946 0000",
            "role": role,
        }
    })
}

/// Body of a rejected login.
#[must_use]
pub fn login_rejected(message: &str) -> Value {
    json!({ "success": false, "error": message })
}
