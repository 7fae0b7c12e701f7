//! Session cookie construction.

use axum::http::HeaderValue;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::{Duration, OffsetDateTime};

use crate::config::ProxyConfig;
use crate::error::ProxyError;

/// Builds the login cookie and its removal.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    name: String,
    max_age_days: i64,
    secure: bool,
}

impl SessionCookies {
    pub fn from_config(config: &ProxyConfig) -> Self {
        Self {
            name: config.session.cookie_name.clone(),
            max_age_days: config.session.max_age_days,
            secure: config.environment.is_production(),
        }
    }

    /// HttpOnly, SameSite=Lax, expiring after the configured lifetime.
    /// `Secure` only in production.
    ///
    /// Fails instead of panicking when the lifetime overflows the calendar.
    pub fn issue(&self, token: &str) -> Result<Cookie<'static>, ProxyError> {
        let expires = self
            .max_age_days
            .checked_mul(86_400)
            .map(Duration::seconds)
            .and_then(|lifetime| OffsetDateTime::now_utc().checked_add(lifetime))
            .ok_or(ProxyError::SessionExpiry(self.max_age_days))?;

        Ok(Cookie::build((self.name.clone(), token.to_string()))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .expires(expires)
            .build())
    }

    /// Same attributes, already expired.
    pub fn clear(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), String::new()))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(Duration::ZERO)
            .expires(OffsetDateTime::UNIX_EPOCH)
            .build()
    }

    /// `Set-Cookie` value, or `None` when the token holds bytes a header cannot carry.
    pub fn header_value(cookie: &Cookie<'_>) -> Option<HeaderValue> {
        HeaderValue::from_str(&cookie.to_string()).ok()
    }
}
