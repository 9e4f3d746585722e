//! Authorization gate
//!
//! Role checks use the role of the account loaded for this request, never
//! the role claim embedded in the token.

use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use crate::{
    error::{AuthError, AuthResult},
    models::Account,
    repositories::AccountStore,
    session::SessionResolver,
};

/// Require any authenticated account
pub async fn require_authenticated<A: AccountStore>(
    sessions: &SessionResolver<'_, A>,
    jar: &CookieJar,
) -> AuthResult<Account> {
    sessions
        .current_account(jar)
        .await?
        .ok_or(AuthError::Unauthorized)
}

/// Require an authenticated administrator
pub async fn require_admin<A: AccountStore>(
    sessions: &SessionResolver<'_, A>,
    jar: &CookieJar,
) -> AuthResult<Account> {
    let account = require_authenticated(sessions, jar).await?;
    ensure_admin(account)
}

/// Reject a non-admin account with `Forbidden`
pub fn ensure_admin(account: Account) -> AuthResult<Account> {
    if !account.is_admin() {
        warn!("Account {} attempted an admin operation", account.id);
        return Err(AuthError::Forbidden);
    }
    Ok(account)
}
