//! Route layers enforcing the authorization gate
//!
//! Both layers insert the resolved [`Account`] into the request extensions,
//! so handlers behind them take `Extension<Account>`.
//!
//! [`Account`]: crate::models::Account

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;

use crate::{error::AuthError, gate, repositories::Store, state::AppState};

/// Reject requests without a valid session
pub async fn require_authenticated<S: Store>(
    State(state): State<AppState<S>>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let account = gate::require_authenticated(&state.sessions(), &jar).await?;
    req.extensions_mut().insert(account);
    Ok(next.run(req).await)
}

/// Reject requests that are not from an administrator
pub async fn require_admin<S: Store>(
    State(state): State<AppState<S>>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let account = gate::require_admin(&state.sessions(), &jar).await?;
    req.extensions_mut().insert(account);
    Ok(next.run(req).await)
}
