//! Signed-in user profile.

use serde::{Deserialize, Serialize};

use laundry_core::{UserId, UserRole};

/// Profile of the signed-in user, as returned by the login endpoint.
///
/// Owned by the session; the serialized form is what gets persisted under
/// the profile key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address, as the backend reports it. Not validated here.
    pub email: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
    /// Role assigned by the backend.
    pub role: UserRole,
}

impl UserProfile {
    /// Whether this user may use the customer app.
    #[must_use]
    pub const fn is_customer(&self) -> bool {
        self.role.is_customer()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_taken_as_reported() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"id": "u1", "name": "Walk-in", "email": "", "role": "customer"}"#,
        )
        .unwrap();
        assert_eq!(profile.email, "");
        assert_eq!(profile.phone, "");
        assert!(profile.is_customer());
    }
}
