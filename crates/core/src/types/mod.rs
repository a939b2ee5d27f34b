//! Core types for Laundry Lane.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod image;
pub mod price;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use image::ImageRef;
pub use price::{CurrencyCode, Price, PriceError};
pub use role::UserRole;
