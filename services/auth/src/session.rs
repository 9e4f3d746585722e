//! Session resolution from request cookies

use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::{
    cookies,
    error::AuthResult,
    jwt::JwtService,
    models::Account,
    repositories::AccountStore,
};

/// Resolves the account behind a request's access-token cookie
///
/// Sessions are stateless: the signed token is the whole session, and the
/// account is re-read on every request so deletions take effect immediately.
pub struct SessionResolver<'a, A> {
    jwt: &'a JwtService,
    accounts: &'a A,
}

impl<'a, A: AccountStore> SessionResolver<'a, A> {
    pub fn new(jwt: &'a JwtService, accounts: &'a A) -> Self {
        Self { jwt, accounts }
    }

    /// Current account, or `None` when there is no usable session
    ///
    /// A missing cookie, a token that fails verification, a refresh token
    /// presented as an access token, and an account that no longer exists all
    /// resolve to `None`. Only a persistence failure is an error.
    pub async fn current_account(&self, jar: &CookieJar) -> AuthResult<Option<Account>> {
        let Some(token) = cookies::access_token(jar) else {
            return Ok(None);
        };

        let payload = match self.jwt.verify_access(token) {
            Ok(payload) => payload,
            Err(e) => {
                debug!("Rejected access token: {}", e);
                return Ok(None);
            }
        };

        let account = self.accounts.find_account(payload.account_id).await?;
        if account.is_none() {
            debug!("Token subject {} no longer exists", payload.account_id);
        }

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cookies::ACCESS_TOKEN_COOKIE,
        jwt::{JwtConfig, TokenPayload},
        models::{NewAccount, Role},
        repositories::InMemoryStore,
    };
    use axum_extra::extract::cookie::Cookie;

    async fn seeded() -> (JwtService, InMemoryStore, Account) {
        let jwt = JwtService::new(JwtConfig::new("session-test-secret"));
        let store = InMemoryStore::new();
        let account = store
            .create_account(&NewAccount {
                email: "guest@example.com".to_string(),
                name: "Guest".to_string(),
                phone: None,
                password_hash: "hash".to_string(),
                role: Role::Client,
            })
            .await
            .unwrap();
        (jwt, store, account)
    }

    fn jar_with(token: String) -> CookieJar {
        CookieJar::new().add(Cookie::new(ACCESS_TOKEN_COOKIE, token))
    }

    #[tokio::test]
    async fn no_cookie_means_no_session() {
        let (jwt, store, _) = seeded().await;
        let resolver = SessionResolver::new(&jwt, &store);

        assert!(resolver.current_account(&CookieJar::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn valid_access_token_resolves_the_account() {
        let (jwt, store, account) = seeded().await;
        let token = jwt.sign_access(&TokenPayload::from(&account)).unwrap();
        let resolver = SessionResolver::new(&jwt, &store);

        let resolved = resolver.current_account(&jar_with(token)).await.unwrap();
        assert_eq!(resolved, Some(account));
    }

    #[tokio::test]
    async fn refresh_token_is_not_a_session() {
        let (jwt, store, account) = seeded().await;
        let token = jwt.sign_refresh(&TokenPayload::from(&account)).unwrap();
        let resolver = SessionResolver::new(&jwt, &store);

        assert!(resolver.current_account(&jar_with(token)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleted_account_has_no_session() {
        let (jwt, store, account) = seeded().await;
        let token = jwt.sign_access(&TokenPayload::from(&account)).unwrap();
        store.delete_account(account.id).await.unwrap();
        let resolver = SessionResolver::new(&jwt, &store);

        assert!(resolver.current_account(&jar_with(token)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn garbage_token_has_no_session() {
        let (jwt, store, _) = seeded().await;
        let resolver = SessionResolver::new(&jwt, &store);

        let resolved = resolver
            .current_account(&jar_with("not-a-jwt".to_string()))
            .await
            .unwrap();
        assert!(resolved.is_none());
    }
}
