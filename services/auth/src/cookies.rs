//! Cookie transport for access and refresh tokens.
//!
//! Both cookies are http-only, `SameSite=Lax`, path `/`, and `Secure` only in
//! production.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Cookie name for the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Attributes shared by both token cookies.
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    pub secure: bool,
    pub access_max_age: u64,
    pub refresh_max_age: u64,
}

impl CookieSettings {
    fn build(&self, name: &'static str, value: String, max_age: Duration) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .max_age(max_age)
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .build()
    }

    /// Set both token cookies on the jar.
    pub fn set_auth_cookies(&self, jar: CookieJar, access: String, refresh: String) -> CookieJar {
        let access = self.build(
            ACCESS_TOKEN_COOKIE,
            access,
            Duration::seconds(i64::try_from(self.access_max_age).unwrap_or(i64::MAX)),
        );
        let refresh = self.build(
            REFRESH_TOKEN_COOKIE,
            refresh,
            Duration::seconds(i64::try_from(self.refresh_max_age).unwrap_or(i64::MAX)),
        );
        jar.add(access).add(refresh)
    }

    /// Clear both token cookies with an empty, immediately expired value.
    pub fn clear_auth_cookies(&self, jar: CookieJar) -> CookieJar {
        let access = self.build(ACCESS_TOKEN_COOKIE, String::new(), Duration::ZERO);
        let refresh = self.build(REFRESH_TOKEN_COOKIE, String::new(), Duration::ZERO);
        jar.add(access).add(refresh)
    }
}

/// Read the access token from the jar, ignoring empty values.
pub fn access_token(jar: &CookieJar) -> Option<&str> {
    jar.get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
}

/// Read the refresh token from the jar, ignoring empty values.
pub fn refresh_token(jar: &CookieJar) -> Option<&str> {
    jar.get(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(secure: bool) -> CookieSettings {
        CookieSettings {
            secure,
            access_max_age: 900,
            refresh_max_age: 604800,
        }
    }

    #[test]
    fn sets_both_cookies_with_fixed_attributes() {
        let jar = settings(true).set_auth_cookies(
            CookieJar::new(),
            "access-value".to_string(),
            "refresh-value".to_string(),
        );

        let access = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
        assert_eq!(access.value(), "access-value");
        assert_eq!(access.path(), Some("/"));
        assert_eq!(access.max_age(), Some(Duration::seconds(900)));
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.secure(), Some(true));
        assert_eq!(access.same_site(), Some(SameSite::Lax));

        let refresh = jar.get(REFRESH_TOKEN_COOKIE).unwrap();
        assert_eq!(refresh.value(), "refresh-value");
        assert_eq!(refresh.path(), Some("/"));
        assert_eq!(refresh.max_age(), Some(Duration::seconds(604800)));
    }

    #[test]
    fn secure_flag_follows_the_environment() {
        let jar = settings(false).set_auth_cookies(
            CookieJar::new(),
            "a".to_string(),
            "r".to_string(),
        );

        assert_eq!(jar.get(ACCESS_TOKEN_COOKIE).unwrap().secure(), Some(false));
        assert_eq!(jar.get(REFRESH_TOKEN_COOKIE).unwrap().secure(), Some(false));
    }

    #[test]
    fn clearing_expires_both_cookies() {
        let settings = settings(true);
        let jar = settings.set_auth_cookies(CookieJar::new(), "a".to_string(), "r".to_string());
        let jar = settings.clear_auth_cookies(jar);

        let access = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
        let refresh = jar.get(REFRESH_TOKEN_COOKIE).unwrap();
        assert_eq!(access.value(), "");
        assert_eq!(refresh.value(), "");
        assert_eq!(access.max_age(), Some(Duration::ZERO));
        assert_eq!(refresh.max_age(), Some(Duration::ZERO));
        assert_eq!(access_token(&jar), None);
        assert_eq!(refresh_token(&jar), None);
    }

    #[test]
    fn reads_tokens_back_from_the_jar() {
        let jar = CookieJar::new()
            .add(Cookie::new(ACCESS_TOKEN_COOKIE, "abc"))
            .add(Cookie::new(REFRESH_TOKEN_COOKIE, "def"));

        assert_eq!(access_token(&jar), Some("abc"));
        assert_eq!(refresh_token(&jar), Some("def"));
        assert_eq!(access_token(&CookieJar::new()), None);
    }
}
