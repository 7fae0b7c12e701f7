//! Side effects keyed by auth endpoint.
//!
//! Adding a side-effecting endpoint means adding a row to
//! [`ENDPOINT_ACTIONS`]; the relay loop itself does not change.

use axum::http::{header, HeaderMap};
use serde_json::Value;

use crate::error::ProxyError;
use crate::session::SessionCookies;

/// Post-processing applied to a successful auth response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAction {
    /// Store `data.token` in the session cookie.
    IssueSessionCookie,
}

/// Endpoint → action. Endpoints are matched after normalization.
pub const ENDPOINT_ACTIONS: &[(&str, PostAction)] =
    &[("email/regLogin", PostAction::IssueSessionCookie)];

/// Action registered for `endpoint`, if any.
pub fn action_for(endpoint: &str) -> Option<PostAction> {
    ENDPOINT_ACTIONS
        .iter()
        .find(|(name, _)| *name == endpoint)
        .map(|(_, action)| *action)
}

impl PostAction {
    /// Apply to a relayed success body, writing any response headers into `headers`.
    ///
    /// On error nothing has been written.
    pub fn apply(
        self,
        body: &Value,
        cookies: &SessionCookies,
        headers: &mut HeaderMap,
    ) -> Result<(), ProxyError> {
        match self {
            PostAction::IssueSessionCookie => {
                let Some(token) = login_token(body) else {
                    tracing::warn!("Login response carried no token, session cookie not set");
                    return Ok(());
                };
                match SessionCookies::header_value(&cookies.issue(token)?) {
                    Some(value) => {
                        headers.append(header::SET_COOKIE, value);
                        tracing::info!("Session cookie issued");
                    }
                    None => tracing::warn!("Login token is not a valid cookie value"),
                }
            }
        }
        Ok(())
    }
}

/// `data.token` of a body whose `success` flag is true.
fn login_token(body: &Value) -> Option<&str> {
    if body.get("success").and_then(Value::as_bool) != Some(true) {
        return None;
    }
    body.pointer("/data/token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
}
