//! Authentication.
//!
//! Login against the remote endpoint, the session store that mirrors the
//! session to durable storage, and their error type.

pub mod client;
mod error;
pub mod store;

pub use client::{AuthClient, HttpAuthClient, LoginOutcome};
pub use error::{AuthError, GENERIC_LOGIN_ERROR};
pub use store::{AuthStore, InitOutcome};
