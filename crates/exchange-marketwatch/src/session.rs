//! Cookie-carrying HTTP session shared by the login flow and the client.
//!
//! All requests go through one `reqwest::Client` whose cookie jar holds the
//! SSO and game cookies, paced by a `governor` rate limiter.

use crate::client::MarketWatchClientConfig;
use crate::error::{MarketWatchError, Result};
use governor::{Quota, RateLimiter};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Authenticated (or about to be) browser-like session.
pub struct Session {
    /// Configuration.
    config: MarketWatchClientConfig,

    /// HTTP client.
    http: Client,

    /// Cookie jar backing `http`.
    jar: Arc<Jar>,

    /// Rate limiter.
    rate_limiter: Arc<DirectRateLimiter>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("www_url", &self.config.www_url)
            .field("requests_per_minute", &self.config.requests_per_minute)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates an empty session.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: MarketWatchClientConfig) -> Result<Self> {
        let jar = Arc::new(Jar::default());

        let http = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MarketWatchError::Network(format!("failed to build HTTP client: {e}")))?;

        let quota = Quota::per_minute(config.requests_per_minute);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            config,
            http,
            jar,
            rate_limiter,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &MarketWatchClientConfig {
        &self.config
    }

    /// Looks up a cookie the jar would send to `url`.
    #[must_use]
    pub fn cookie(&self, url: &Url, name: &str) -> Option<String> {
        let header = self.jar.cookies(url)?;
        let header = header.to_str().ok()?;
        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    }

    /// Issues a GET and returns the response whatever its status.
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.rate_limiter.until_ready().await;
        tracing::debug!("GET {}", url);
        Ok(self.http.get(url).send().await?)
    }

    /// Issues a GET and returns the body of a successful response.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = Self::check_status(self.get(url).await?).await?;
        Ok(response.text().await?)
    }

    /// Posts a form-encoded body.
    pub async fn post_form<B: Serialize + ?Sized>(&self, url: &str, form: &B) -> Result<Response> {
        self.rate_limiter.until_ready().await;
        tracing::debug!("POST {} (form)", url);
        let response = self.http.post(url).form(form).send().await?;
        Self::check_status(response).await
    }

    /// Posts a JSON body and decodes a JSON response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let body_json = serde_json::to_string(body)?;
        tracing::debug!("POST {} body_len={}", url, body_json.len());

        let response = self
            .http
            .post(url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .body(body_json)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Converts non-success statuses into errors.
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(MarketWatchError::rate_limit(retry_after));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(MarketWatchError::api(status.as_u16(), text));
        }

        Ok(response)
    }
}
