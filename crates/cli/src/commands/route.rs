//! Evaluate the navigation guards for a route from the terminal.

use laundry_app::auth::{AuthClient, AuthStore, InitOutcome};
use laundry_app::config::AppConfig;
use laundry_app::error::AppError;
use laundry_app::navigation::{Navigator, Notice, decide, require_customer_role};
use laundry_app::storage::KeyValueStore;

/// Prints navigation requests instead of performing them.
struct TerminalNavigator;

#[allow(clippy::print_stdout)]
impl Navigator for TerminalNavigator {
    fn replace(&self, path: &str) {
        println!("-> replace {path}");
    }

    fn back(&self) {
        println!("-> back");
    }

    fn alert(&self, notice: &Notice) {
        println!("[{}] {}", notice.title, notice.message);
    }
}

/// Restore the session and report where the app would send the user.
///
/// With `customers_only`, the customer guard runs after the redirect
/// decision, as a protected screen would on mount.
///
/// # Errors
///
/// Returns an error if the stored session is unreadable.
#[allow(clippy::print_stdout)]
pub async fn evaluate<C, S>(
    auth: &AuthStore<C, S>,
    config: &AppConfig,
    segments: &[String],
    customers_only: bool,
) -> Result<(), AppError>
where
    C: AuthClient,
    S: KeyValueStore,
{
    if let InitOutcome::Failed(err) = auth.init_auth().await {
        auth.clear_persisted().await;
        return Err(err.into());
    }

    let routes = &config.routes;
    let navigator = TerminalNavigator;
    let class = routes.classify(segments);
    println!("Route: /{} ({class:?})", segments.join("/"));

    match decide(auth.has_token(), class) {
        Some(target) => navigator.replace(routes.path(target)),
        None => println!("-> stay"),
    }

    if customers_only {
        let session = auth.session();
        if let Err(rejection) = require_customer_role(&session) {
            rejection.present(&navigator, routes);
        }
    }
    Ok(())
}
