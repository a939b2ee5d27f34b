//! Sign-in, sign-out and session inspection.

use laundry_app::auth::{AuthClient, AuthStore, InitOutcome};
use laundry_app::error::AppError;
use laundry_app::navigation::require_auth;
use laundry_app::storage::KeyValueStore;
use laundry_core::Email;
use secrecy::SecretString;

/// Sign in and persist the session.
///
/// # Errors
///
/// Returns an error if the backend rejects the credentials or the session
/// cannot be persisted.
#[allow(clippy::print_stdout)]
pub async fn login<C, S>(
    auth: &AuthStore<C, S>,
    email: &Email,
    password: &SecretString,
) -> Result<(), AppError>
where
    C: AuthClient,
    S: KeyValueStore,
{
    auth.login(email.as_str(), password).await?;

    let session = auth.session();
    if let Some(user) = session.user() {
        println!("Signed in as {} <{}> ({})", user.name, user.email, user.role);
    }
    Ok(())
}

/// Clear the persisted session.
#[allow(clippy::print_stdout)]
pub async fn logout<C, S>(auth: &AuthStore<C, S>)
where
    C: AuthClient,
    S: KeyValueStore,
{
    auth.logout().await;
    println!("Signed out");
}

/// Restore the persisted session and print the signed-in user.
///
/// # Errors
///
/// Returns an error if the stored session is unreadable or nobody is
/// signed in.
#[allow(clippy::print_stdout)]
pub async fn whoami<C, S>(auth: &AuthStore<C, S>) -> Result<(), AppError>
where
    C: AuthClient,
    S: KeyValueStore,
{
    if let InitOutcome::Failed(err) = auth.init_auth().await {
        auth.clear_persisted().await;
        return Err(err.into());
    }

    let session = auth.session();
    let credentials = require_auth(&session)
        .map_err(|rejection| AppError::Unauthorized(rejection.notice().message))?;

    let user = &credentials.user;
    println!("ID:    {}", user.id);
    println!("Name:  {}", user.name);
    println!("Email: {}", user.email);
    if !user.phone.is_empty() {
        println!("Phone: {}", user.phone);
    }
    println!("Role:  {}", user.role);
    Ok(())
}
