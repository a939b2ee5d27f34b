//! Remote login endpoint.
//!
//! Responses are decoded into [`LoginOutcome`] here, at the network
//! boundary; nothing past this module sees loosely-typed JSON.

use std::future::Future;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use url::Url;

use super::AuthError;
use crate::models::{Credentials, UserProfile};

/// Path of the login endpoint, relative to the API base URL.
const LOGIN_PATH: &str = "api/auth/login";

/// Result of a login request that reached the server and decoded.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// Credentials accepted.
    Success(Credentials),
    /// Credentials rejected; `message` is the server's explanation, if any.
    Failure {
        /// Server-provided reason.
        message: Option<String>,
    },
}

/// A service that exchanges email and password for a session.
pub trait AuthClient: Send + Sync {
    /// Submit credentials.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Http` if the request fails in transport,
    /// `AuthError::Parse` if the body does not decode, and
    /// `AuthError::MalformedResponse` if a success carries no data.
    fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<LoginOutcome, AuthError>> + Send;
}

/// Request body for the login endpoint.
#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Response envelope from the login endpoint.
#[derive(Deserialize)]
struct LoginResponse {
    success: bool,
    #[serde(default)]
    data: Option<LoginData>,
    #[serde(default)]
    error: Option<String>,
}

/// Payload of a successful login: the token alongside the profile fields.
#[derive(Deserialize)]
struct LoginData {
    token: String,
    #[serde(flatten)]
    user: UserProfile,
}

impl LoginResponse {
    fn into_outcome(self) -> Result<LoginOutcome, AuthError> {
        if !self.success {
            return Ok(LoginOutcome::Failure {
                message: self.error,
            });
        }

        let data = self
            .data
            .ok_or(AuthError::MalformedResponse("success without data"))?;
        if data.token.is_empty() {
            return Err(AuthError::MalformedResponse("empty token"));
        }

        Ok(LoginOutcome::Success(Credentials {
            token: SecretString::from(data.token),
            user: data.user,
        }))
    }
}

/// [`AuthClient`] that posts JSON to `{base_url}/api/auth/login`.
///
/// No timeout is applied; a request runs until the server or the transport
/// settles it.
#[derive(Debug, Clone)]
pub struct HttpAuthClient {
    http: reqwest::Client,
    login_url: Url,
}

impl HttpAuthClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the login URL cannot be derived from `base_url`.
    pub fn new(base_url: &Url) -> Result<Self, url::ParseError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client that sends requests through `http`.
    ///
    /// # Errors
    ///
    /// Returns an error if the login URL cannot be derived from `base_url`.
    pub fn with_client(http: reqwest::Client, base_url: &Url) -> Result<Self, url::ParseError> {
        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let login_url = base.join(LOGIN_PATH)?;

        Ok(Self { http, login_url })
    }

    /// The fully-resolved login URL.
    #[must_use]
    pub const fn login_url(&self) -> &Url {
        &self.login_url
    }
}

impl AuthClient for HttpAuthClient {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn login(&self, email: &str, password: &SecretString) -> Result<LoginOutcome, AuthError> {
        let response = self
            .http
            .post(self.login_url.clone())
            .json(&LoginRequest {
                email,
                password: password.expose_secret(),
            })
            .send()
            .await?;

        // Rejections arrive with 4xx statuses but still carry the JSON
        // envelope, so the body is decoded regardless of status.
        let status = response.status();
        let body = response.bytes().await?;

        let envelope: LoginResponse = serde_json::from_slice(&body).inspect_err(|e| {
            warn!(%status, error = %e, "login response did not decode");
        })?;

        envelope.into_outcome()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use laundry_core::UserRole;

    use super::*;

    fn decode(json: &str) -> Result<LoginOutcome, AuthError> {
        serde_json::from_str::<LoginResponse>(json)?.into_outcome()
    }

    #[test]
    fn test_login_url_keeps_base_path() {
        let base = Url::parse("https://api.example.com/v2").unwrap();
        let client = HttpAuthClient::new(&base).unwrap();
        assert_eq!(
            client.login_url().as_str(),
            "https://api.example.com/v2/api/auth/login"
        );

        let root = Url::parse("http://localhost:5000").unwrap();
        let client = HttpAuthClient::new(&root).unwrap();
        assert_eq!(
            client.login_url().as_str(),
            "http://localhost:5000/api/auth/login"
        );
    }

    #[test]
    fn test_decode_success() {
        let outcome = decode(
            r#"{
                "success": true,
                "data": {
                    "token": "jwt-abc",
                    "id": "u1",
                    "name": "Ada",
                    "email": "ada@example.com",
                    "phone": "555-0100",
                    "role": "customer"
                }
            }"#,
        )
        .unwrap();

        let LoginOutcome::Success(credentials) = outcome else {
            panic!("expected success");
        };
        assert_eq!(credentials.token.expose_secret(), "jwt-abc");
        assert_eq!(credentials.user.name, "Ada");
        assert_eq!(credentials.user.role, UserRole::Customer);
    }

    #[test]
    fn test_decode_failure_with_message() {
        let outcome = decode(r#"{"success": false, "error": "bad credentials"}"#).unwrap();
        assert!(matches!(
            outcome,
            LoginOutcome::Failure { message: Some(m) } if m == "bad credentials"
        ));
    }

    #[test]
    fn test_decode_failure_without_message() {
        let outcome = decode(r#"{"success": false}"#).unwrap();
        assert!(matches!(outcome, LoginOutcome::Failure { message: None }));
    }

    #[test]
    fn test_success_without_data_is_malformed() {
        assert!(matches!(
            decode(r#"{"success": true}"#),
            Err(AuthError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(decode("<html>"), Err(AuthError::Parse(_))));
    }
}
