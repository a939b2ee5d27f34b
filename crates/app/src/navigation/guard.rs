//! Guards for protected screens and operations.
//!
//! Call one at the start of anything that needs a signed-in user. On
//! rejection, [`GuardRejection::present`] shows the user why and moves them
//! somewhere they are allowed to be.
//!
//! # Example
//!
//! ```rust,ignore
//! let session = auth.session();
//! let credentials = match require_customer_role(&session) {
//!     Ok(credentials) => credentials,
//!     Err(rejection) => return rejection.present(&navigator, &routes),
//! };
//! place_order(&credentials.token, basket).await
//! ```

use super::{Navigator, Notice, RouteConfig};
use crate::models::{AuthSession, Credentials};

/// Why a guard refused entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardRejection {
    /// Nobody is signed in. Sends the user to the entry screen.
    SignInRequired,
    /// Signed in, but not as a customer. Sends the user back.
    CustomersOnly,
}

impl GuardRejection {
    /// The blocking notice shown before redirecting.
    #[must_use]
    pub fn notice(self) -> Notice {
        match self {
            Self::SignInRequired => Notice {
                title: "Sign in required".to_string(),
                message: "Please sign in to continue.".to_string(),
            },
            Self::CustomersOnly => Notice {
                title: "Access denied".to_string(),
                message: "This section is only available to customers.".to_string(),
            },
        }
    }

    /// Show the notice, then redirect once it is dismissed.
    pub fn present<N: Navigator + ?Sized>(self, navigator: &N, routes: &RouteConfig) {
        navigator.alert(&self.notice());
        match self {
            Self::SignInRequired => navigator.replace(&routes.entry),
            Self::CustomersOnly => navigator.back(),
        }
    }
}

/// Require a signed-in user.
///
/// # Errors
///
/// Returns `GuardRejection::SignInRequired` if there is no token.
pub fn require_auth(session: &AuthSession) -> Result<&Credentials, GuardRejection> {
    session.credentials().ok_or(GuardRejection::SignInRequired)
}

/// Require a signed-in customer.
///
/// # Errors
///
/// Returns `GuardRejection::SignInRequired` if there is no token, or
/// `GuardRejection::CustomersOnly` if the user's role is anything other
/// than customer.
pub fn require_customer_role(session: &AuthSession) -> Result<&Credentials, GuardRejection> {
    let credentials = require_auth(session)?;
    if credentials.user.is_customer() {
        Ok(credentials)
    } else {
        Err(GuardRejection::CustomersOnly)
    }
}
