//! Application state shared across handlers

use axum_extra::extract::cookie::CookieJar;
use tracing::error;

use crate::{
    config::AppEnvironment,
    cookies::CookieSettings,
    credentials::CredentialService,
    error::{AuthError, AuthResult},
    jwt::{JwtService, TokenPayload},
    models::Account,
    repositories::Store,
    session::SessionResolver,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState<S> {
    pub store: S,
    pub jwt: JwtService,
    pub credentials: CredentialService,
    pub cookies: CookieSettings,
}

impl<S: Store> AppState<S> {
    pub fn new(store: S, jwt: JwtService, environment: AppEnvironment) -> Self {
        let cookies = CookieSettings {
            secure: environment.is_production(),
            access_max_age: jwt.access_token_expiry(),
            refresh_max_age: jwt.refresh_token_expiry(),
        };

        Self {
            store,
            jwt,
            credentials: CredentialService::new(),
            cookies,
        }
    }

    /// Session resolver bound to this state's store
    pub fn sessions(&self) -> SessionResolver<'_, S> {
        SessionResolver::new(&self.jwt, &self.store)
    }

    /// Issue a fresh token pair for `account` and set both cookies
    pub fn start_session(&self, jar: CookieJar, account: &Account) -> AuthResult<CookieJar> {
        let payload = TokenPayload::from(account);

        let access = self.jwt.sign_access(&payload).map_err(|e| {
            error!("Failed to sign access token: {}", e);
            AuthError::Internal
        })?;
        let refresh = self.jwt.sign_refresh(&payload).map_err(|e| {
            error!("Failed to sign refresh token: {}", e);
            AuthError::Internal
        })?;

        Ok(self.cookies.set_auth_cookies(jar, access, refresh))
    }

    /// Clear both token cookies
    pub fn end_session(&self, jar: CookieJar) -> CookieJar {
        self.cookies.clear_auth_cookies(jar)
    }
}
