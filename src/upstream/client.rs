use reqwest::{Client, Method, Request, Response, Url};
use std::time::Duration;

use crate::config::TimeoutConfig;
use crate::error::ProxyError;
use crate::resilience::timeouts::with_deadline;

/// Shared client for upstream calls.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    http: Client,
    response_timeout: Duration,
}

impl UpstreamClient {
    /// Build the client from the timeout policy.
    ///
    /// Redirects are not followed: a 3xx is the upstream's answer and goes
    /// back to the client untouched. Upstreams are dialed directly, never
    /// through `HTTP_PROXY`.
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()?;

        Ok(Self {
            http,
            response_timeout: Duration::from_secs(timeouts.response_secs),
        })
    }

    /// Start building a request.
    pub fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.http.request(method, url)
    }

    /// Send exactly once and wait for the response head.
    pub async fn send(&self, request: Request) -> Result<Response, ProxyError> {
        with_deadline(self.response_timeout, async {
            self.http.execute(request).await.map_err(ProxyError::from)
        })
        .await
    }
}
