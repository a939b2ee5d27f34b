//! User roles.

use serde::{Deserialize, Serialize};

/// Role attached to a user profile by the backend.
///
/// The customer app only admits `Customer`; staff roles sign in through the
/// receptionist portal. Roles this client does not know about deserialize as
/// `Unknown` so a new backend role never breaks login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// End customer placing laundry orders.
    Customer,
    /// Front-desk staff taking orders in the portal.
    Receptionist,
    /// Tenant administrator.
    Admin,
    /// Any role not listed above.
    #[serde(other)]
    Unknown,
}

impl UserRole {
    /// Whether this role may use the customer app.
    #[must_use]
    pub const fn is_customer(self) -> bool {
        matches!(self, Self::Customer)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Receptionist => write!(f, "receptionist"),
            Self::Admin => write!(f, "admin"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "receptionist" => Ok(Self::Receptionist),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}
