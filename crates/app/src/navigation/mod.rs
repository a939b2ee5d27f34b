//! Navigation guard layer.
//!
//! Derives where the user may be from the session and moves them there:
//!
//! - [`guard`] - imperative checks at the start of protected screens and operations
//! - [`route`] - route classification and the pure redirect decision
//! - [`initialization`] - restore-then-redirect state machine driven by session and route changes
//!
//! The UI framework is reached only through [`Navigator`].

pub mod guard;
pub mod initialization;
pub mod route;

pub use guard::{GuardRejection, require_auth, require_customer_role};
pub use initialization::{AuthInitialization, Phase, RouteState};
pub use route::{RouteClass, RouteConfig, RouteTarget, decide};

/// A blocking message shown to the user before a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
}

/// The host's router and dialog layer.
pub trait Navigator: Send + Sync {
    /// Replace the current route with `path`.
    fn replace(&self, path: &str);

    /// Return to the previous route.
    fn back(&self);

    /// Show `notice` and return once the user has dismissed it.
    fn alert(&self, notice: &Notice);
}
