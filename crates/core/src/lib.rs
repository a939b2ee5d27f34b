//! Laundry Lane Core - Shared domain types.
//!
//! This crate provides the types shared by the Laundry Lane client crates:
//! - `app` - Cart, session and navigation state for the customer app
//! - `cli` - Command-line driver for the session store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. Validation happens at construction, so a value of one of these
//! types is always well-formed.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for identifiers, prices, emails, roles and image references

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
