//! Opaque image references.

use serde::{Deserialize, Serialize};

/// Reference to a product image.
///
/// The value is whatever the UI layer uses to locate the asset (a bundled
/// asset name or a remote URL); this crate never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Create a new image reference.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Get the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageRef {
    fn from(reference: &str) -> Self {
        Self(reference.to_owned())
    }
}
