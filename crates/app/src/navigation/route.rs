//! Route classification and the redirect decision table.

/// Where the app's entry screen and protected area live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    /// Path of the unauthenticated landing screen.
    pub entry: String,
    /// Path to land on after signing in.
    pub protected_root: String,
    /// Route-group segment that tags the protected area, e.g. `(tabs)`.
    pub protected_group: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            entry: "/".to_string(),
            protected_root: "/(tabs)".to_string(),
            protected_group: "(tabs)".to_string(),
        }
    }
}

/// Which side of the auth boundary a route is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Entry screen or anywhere else outside the protected group.
    Entry,
    /// Inside the protected group.
    Protected,
}

/// A redirect destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    /// The entry screen.
    Entry,
    /// The protected area's root.
    ProtectedRoot,
}

impl RouteConfig {
    /// Classify a route by its path segments.
    ///
    /// A route is protected iff one of its segments is the protected group
    /// marker.
    #[must_use]
    pub fn classify<S: AsRef<str>>(&self, segments: &[S]) -> RouteClass {
        if segments
            .iter()
            .any(|segment| segment.as_ref() == self.protected_group)
        {
            RouteClass::Protected
        } else {
            RouteClass::Entry
        }
    }

    /// The path a redirect target resolves to.
    #[must_use]
    pub fn path(&self, target: RouteTarget) -> &str {
        match target {
            RouteTarget::Entry => &self.entry,
            RouteTarget::ProtectedRoot => &self.protected_root,
        }
    }
}

/// Where, if anywhere, to send the user.
///
/// | authenticated | route     | redirect        |
/// |---------------|-----------|-----------------|
/// | yes           | entry     | protected root  |
/// | no            | protected | entry           |
/// | yes           | protected | none            |
/// | no            | entry     | none            |
#[must_use]
pub const fn decide(is_authenticated: bool, class: RouteClass) -> Option<RouteTarget> {
    match (is_authenticated, class) {
        (true, RouteClass::Entry) => Some(RouteTarget::ProtectedRoot),
        (false, RouteClass::Protected) => Some(RouteTarget::Entry),
        (true, RouteClass::Protected) | (false, RouteClass::Entry) => None,
    }
}
