//! Domain models for the customer app.

pub mod session;
pub mod user;

pub use session::{AuthSession, Credentials, keys as session_keys};
pub use user::UserProfile;
