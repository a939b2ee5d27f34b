//! Restore-then-redirect state machine.
//!
//! [`AuthInitialization`] starts `Uninitialized`, restores the persisted
//! session once, and becomes `Ready`; it never gets stuck before `Ready`,
//! even when the restore fails. From then on every change to the route,
//! navigation readiness, or token presence re-evaluates the decision table
//! in [`super::route`]. Redirects are scheduled one frame out and the
//! pending one is cancelled whenever an evaluation re-runs before it fires.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use super::{Navigator, RouteConfig, RouteTarget, decide};
use crate::auth::{AuthClient, AuthStore, InitOutcome};
use crate::storage::KeyValueStore;

/// Default delay before a scheduled redirect fires: one 60 Hz frame.
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(16);

/// What the router currently reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteState {
    /// Segments of the current route.
    pub segments: Vec<String>,
    /// Whether the router has mounted and can accept navigation.
    pub navigation_ready: bool,
    /// Whether the router's state is stale (mid-transition).
    pub stale: bool,
}

impl RouteState {
    /// A ready, non-stale route with the given segments.
    #[must_use]
    pub fn ready<I, T>(segments: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            navigation_ready: true,
            stale: false,
        }
    }
}

/// Lifecycle of [`AuthInitialization`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The persisted session has not been restored yet.
    Uninitialized,
    /// Restore finished (successfully or not); redirects are live.
    Ready,
}

/// Restores the session at startup, then keeps the user on the right side
/// of the auth boundary.
pub struct AuthInitialization<C, S, N> {
    store: AuthStore<C, S>,
    navigator: Arc<N>,
    routes: RouteConfig,
    redirect_delay: Duration,
    phase: Phase,
    pending: Option<AbortHandle>,
}

impl<C, S, N> AuthInitialization<C, S, N>
where
    C: AuthClient,
    S: KeyValueStore,
    N: Navigator + 'static,
{
    /// Create an uninitialized state machine.
    #[must_use]
    pub fn new(store: AuthStore<C, S>, navigator: Arc<N>, routes: RouteConfig) -> Self {
        Self {
            store,
            navigator,
            routes,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            phase: Phase::Uninitialized,
            pending: None,
        }
    }

    /// Override the delay before a scheduled redirect fires.
    #[must_use]
    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a scheduled redirect has yet to fire.
    #[must_use]
    pub fn has_pending_redirect(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Restore the persisted session and become `Ready`.
    ///
    /// If the restore fails, the persisted keys are cleared so the next start
    /// does not trip over the same data.
    pub async fn initialize(&mut self) {
        if let InitOutcome::Failed(err) = self.store.init_auth().await {
            warn!(error = %err, "Clearing persisted session after failed restore");
            self.store.clear_persisted().await;
        }
        self.phase = Phase::Ready;
    }

    /// Re-evaluate the redirect decision for `route`.
    ///
    /// Cancels any pending redirect first. Does nothing else until `Ready`
    /// and until the router is ready and not stale. Returns the target of
    /// the newly scheduled redirect, if any.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn evaluate(&mut self, route: &RouteState) -> Option<RouteTarget> {
        self.cancel_pending();

        if self.phase != Phase::Ready || !route.navigation_ready || route.stale {
            return None;
        }

        let is_authenticated = self.store.has_token();
        let target = decide(is_authenticated, self.routes.classify(route.segments.as_slice()))?;
        self.schedule(target);
        Some(target)
    }

    /// Initialize if needed, then evaluate on every route or token change
    /// until the route channel closes.
    pub async fn run(mut self, mut routes: watch::Receiver<RouteState>) {
        if self.phase == Phase::Uninitialized {
            self.initialize().await;
        }

        let mut session = self.store.subscribe();
        let mut token_present = session.borrow_and_update().token().is_some();
        let route = routes.borrow_and_update().clone();
        self.evaluate(&route);

        loop {
            tokio::select! {
                changed = routes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = session.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let now_present = session.borrow_and_update().token().is_some();
                    // Loading and error flips don't move anyone
                    if now_present == token_present {
                        continue;
                    }
                    token_present = now_present;
                }
            }

            let route = routes.borrow_and_update().clone();
            self.evaluate(&route);
        }
    }

    fn schedule(&mut self, target: RouteTarget) {
        let path = self.routes.path(target).to_owned();
        let navigator = Arc::clone(&self.navigator);
        let delay = self.redirect_delay;
        debug!(%path, "Scheduling redirect");

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.replace(&path);
        });
        self.pending = Some(task.abort_handle());
    }

    fn cancel_pending(&mut self) {
        let Some(handle) = self.pending.take() else {
            return;
        };
        if !handle.is_finished() {
            debug!("Cancelling scheduled redirect");
            handle.abort();
        }
    }
}

impl<C, S, N> Drop for AuthInitialization<C, S, N> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use laundry_core::{UserId, UserRole};
    use secrecy::SecretString;

    use super::*;
    use crate::auth::{AuthError, LoginOutcome};
    use crate::models::{UserProfile, session_keys};
    use crate::navigation::testing::{NavEvent, RecordingNavigator};
    use crate::storage::MemoryStore;

    struct NoLogin;

    impl AuthClient for NoLogin {
        async fn login(
            &self,
            _email: &str,
            _password: &SecretString,
        ) -> Result<LoginOutcome, AuthError> {
            Ok(LoginOutcome::Failure { message: None })
        }
    }

    fn persisted_session() -> MemoryStore {
        let profile = UserProfile {
            id: UserId::new("u1"),
            name: "Kim".to_string(),
            email: "kim@example.com".to_string(),
            phone: "555-0101".to_string(),
            role: UserRole::Customer,
        };
        MemoryStore::with_entries([
            (session_keys::AUTH_TOKEN, "tok".to_string()),
            (
                session_keys::USER_DATA,
                serde_json::to_string(&profile).unwrap(),
            ),
        ])
    }

    fn machine(
        storage: MemoryStore,
    ) -> (
        AuthInitialization<NoLogin, MemoryStore, RecordingNavigator>,
        AuthStore<NoLogin, MemoryStore>,
        Arc<RecordingNavigator>,
    ) {
        let store = AuthStore::new(NoLogin, storage);
        let navigator = Arc::new(RecordingNavigator::default());
        let machine =
            AuthInitialization::new(store.clone(), Arc::clone(&navigator), RouteConfig::default());
        (machine, store, navigator)
    }

    async fn next_frames() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_authenticated_on_entry_redirects_to_protected_root() {
        let (mut machine, _store, navigator) = machine(persisted_session());
        machine.initialize().await;

        let target = machine.evaluate(&RouteState::ready([""]));
        assert_eq!(target, Some(RouteTarget::ProtectedRoot));
        // Not immediately
        assert!(navigator.events().is_empty());

        next_frames().await;
        assert_eq!(navigator.events(), vec![NavEvent::Replace("/(tabs)".to_string())]);
        assert!(!machine.has_pending_redirect());
    }

    #[tokio::test(start_paused = true)]
    async fn test_signed_out_in_protected_area_redirects_to_entry() {
        let (mut machine, _store, navigator) = machine(MemoryStore::new());
        machine.initialize().await;

        let target = machine.evaluate(&RouteState::ready(["(tabs)", "wallet"]));
        assert_eq!(target, Some(RouteTarget::Entry));

        next_frames().await;
        assert_eq!(navigator.events(), vec![NavEvent::Replace("/".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_redirect_when_already_in_place() {
        let (mut signed_in, _store, signed_in_nav) = machine(persisted_session());
        signed_in.initialize().await;
        assert_eq!(signed_in.evaluate(&RouteState::ready(["(tabs)", "home"])), None);

        let (mut signed_out, _store, signed_out_nav) = machine(MemoryStore::new());
        signed_out.initialize().await;
        assert_eq!(signed_out.evaluate(&RouteState::ready([""])), None);

        next_frames().await;
        assert!(signed_in_nav.events().is_empty());
        assert!(signed_out_nav.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_skips_until_initialized_and_router_ready() {
        let (mut machine, _store, navigator) = machine(persisted_session());
        assert_eq!(machine.phase(), Phase::Uninitialized);
        assert_eq!(machine.evaluate(&RouteState::ready([""])), None);

        machine.initialize().await;
        assert_eq!(machine.phase(), Phase::Ready);

        let not_ready = RouteState {
            navigation_ready: false,
            ..RouteState::ready([""])
        };
        assert_eq!(machine.evaluate(&not_ready), None);

        let stale = RouteState {
            stale: true,
            ..RouteState::ready([""])
        };
        assert_eq!(machine.evaluate(&stale), None);

        next_frames().await;
        assert!(navigator.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_re_evaluation_cancels_pending_redirect() {
        let (mut machine, _store, navigator) = machine(persisted_session());
        machine.initialize().await;

        assert!(machine.evaluate(&RouteState::ready([""])).is_some());
        assert!(machine.has_pending_redirect());
        // Router moves on its own before the frame fires
        assert_eq!(machine.evaluate(&RouteState::ready(["(tabs)"])), None);
        assert!(!machine.has_pending_redirect());

        next_frames().await;
        assert!(navigator.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_restore_still_becomes_ready_and_clears_storage() {
        let storage = MemoryStore::with_entries([
            (session_keys::AUTH_TOKEN, "tok"),
            (session_keys::USER_DATA, "{garbage"),
        ]);
        let (mut machine, store, navigator) = machine(storage.clone());

        machine.initialize().await;

        assert_eq!(machine.phase(), Phase::Ready);
        assert!(storage.is_empty());
        assert!(!store.session().is_loading());

        machine.evaluate(&RouteState::ready(["(tabs)"]));
        next_frames().await;
        assert_eq!(navigator.events(), vec![NavEvent::Replace("/".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_follows_route_and_token_changes() {
        let (machine, store, navigator) = machine(persisted_session());
        let (routes_tx, routes_rx) = watch::channel(RouteState::ready([""]));

        let task = tokio::spawn(machine.run(routes_rx));
        next_frames().await;
        assert_eq!(navigator.events(), vec![NavEvent::Replace("/(tabs)".to_string())]);

        // Router lands in the protected area
        routes_tx.send_replace(RouteState::ready(["(tabs)", "home"]));
        next_frames().await;
        assert_eq!(navigator.events().len(), 1);

        store.logout().await;
        next_frames().await;
        assert_eq!(
            navigator.events(),
            vec![
                NavEvent::Replace("/(tabs)".to_string()),
                NavEvent::Replace("/".to_string()),
            ]
        );

        drop(routes_tx);
        task.await.unwrap();
    }
}
