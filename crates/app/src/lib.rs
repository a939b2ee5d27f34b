//! Laundry Lane client core.
//!
//! State for the customer app, independent of any UI framework:
//!
//! - [`cart`] - the basket reducer
//! - [`auth`] - login, logout and session restore against the backend, mirrored to durable storage
//! - [`navigation`] - guards and the redirect state machine that keep users on
//!   the right side of the auth boundary
//! - [`storage`] - the durable key-value seam and its implementations
//!
//! # Wiring
//!
//! ```rust,no_run
//! use laundry_app::auth::{AuthStore, HttpAuthClient};
//! use laundry_app::config::AppConfig;
//! use laundry_app::storage::FileStore;
//!
//! # async fn wire() -> laundry_app::error::Result<()> {
//! let config = AppConfig::from_env()?;
//! let client = HttpAuthClient::new(&config.api_base_url)?;
//! let auth = AuthStore::new(client, FileStore::new(&config.storage_path));
//! auth.init_auth().await;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod cart;
pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod storage;
