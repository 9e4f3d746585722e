//! Authentication service routes

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::{
    cookies,
    error::{AuthError, AuthResult},
    middleware::require_authenticated,
    models::{Account, LoginCredentials, NewAccount, Role},
    repositories::Store,
    state::AppState,
    validation::{normalize_email, validate_email, validate_name, validate_password},
};

/// Request for self-registration
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Create the router for the authentication service
pub fn create_router<S: Store>(state: AppState<S>) -> Router {
    let protected_routes = Router::new()
        .route("/auth/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_authenticated::<S>,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register::<S>))
        .route("/auth/login", post(login::<S>))
        .route("/auth/logout", post(logout::<S>))
        .route("/auth/refresh", post(refresh::<S>))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// Self-registration; always creates a `CLIENT` account
pub async fn register<S: Store>(
    State(state): State<AppState<S>>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse> {
    let email = normalize_email(&payload.email);
    validate_email(&email).map_err(AuthError::Validation)?;
    validate_password(&payload.password).map_err(AuthError::Validation)?;
    validate_name(&payload.name).map_err(AuthError::Validation)?;

    if state.store.find_account_by_email(&email).await?.is_some() {
        return Err(AuthError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let password_hash = state.credentials.hash_blocking(payload.password).await?;

    // A concurrent registration can still win the race; the unique
    // constraint turns that into the same conflict.
    let account = state
        .store
        .create_account(&NewAccount {
            email,
            name: payload.name.trim().to_string(),
            phone: payload.phone.filter(|phone| !phone.trim().is_empty()),
            password_hash,
            role: Role::Client,
        })
        .await?;

    info!("Registered account {}", account.id);

    let jar = state.start_session(jar, &account)?;
    Ok((
        StatusCode::CREATED,
        jar,
        Json(json!({ "success": true, "user": account })),
    ))
}

/// Password login
pub async fn login<S: Store>(
    State(state): State<AppState<S>>,
    jar: CookieJar,
    Json(payload): Json<LoginCredentials>,
) -> AuthResult<impl IntoResponse> {
    let email = normalize_email(&payload.email);
    validate_email(&email).map_err(AuthError::Validation)?;
    if payload.password.is_empty() {
        return Err(AuthError::Validation("Password is required".to_string()));
    }

    let Some(account) = state.store.find_account_by_email(&email).await? else {
        // Unknown email: spend the same hashing work before failing
        let credentials = state.credentials.clone();
        let password = payload.password;
        if let Err(e) =
            tokio::task::spawn_blocking(move || credentials.verify_dummy(&password)).await
        {
            debug!("Dummy credential check did not complete: {}", e);
        }

        debug!("Login failed: unknown email");
        return Err(AuthError::InvalidCredentials);
    };

    let verified = state
        .credentials
        .verify_blocking(payload.password, account.password_hash.clone())
        .await?;
    if !verified {
        warn!("Login failed: wrong password for account {}", account.id);
        return Err(AuthError::InvalidCredentials);
    }

    info!("Account {} logged in", account.id);

    let jar = state.start_session(jar, &account)?;
    Ok((jar, Json(json!({ "success": true, "user": account }))))
}

/// Clear both cookies; succeeds with or without a session
pub async fn logout<S: Store>(
    State(state): State<AppState<S>>,
    jar: CookieJar,
) -> impl IntoResponse {
    (state.end_session(jar), Json(json!({ "success": true })))
}

/// Re-issue both tokens from a valid refresh cookie
///
/// The account is reloaded so the new tokens carry its current role.
pub async fn refresh<S: Store>(
    State(state): State<AppState<S>>,
    jar: CookieJar,
) -> AuthResult<impl IntoResponse> {
    let token = cookies::refresh_token(&jar).ok_or(AuthError::Unauthorized)?;

    let payload = state.jwt.verify_refresh(token).map_err(|e| {
        debug!("Rejected refresh token: {}", e);
        AuthError::Unauthorized
    })?;

    let account = state
        .store
        .find_account(payload.account_id)
        .await?
        .ok_or(AuthError::Unauthorized)?;

    let jar = state.start_session(jar, &account)?;
    Ok((jar, Json(json!({ "success": true, "user": account }))))
}

/// The caller's own account
pub async fn me(Extension(account): Extension<Account>) -> impl IntoResponse {
    Json(json!({ "user": account }))
}
