//! MarketWatch game client.
//!
//! Wraps a signed-in [`Session`] for one game and exposes trading and
//! portfolio operations. Each call is an independent request/response round
//! trip; nothing is cached.

use crate::auth;
use crate::error::{MarketWatchError, Result};
use crate::scrape;
use crate::session::Session;
use crate::types::{
    GameSettings, Order, OrderOutcome, OrderRequest, OrderType, PortfolioStats, Position,
    PriceType, Term, TickerUid,
};
use nonzero_ext::nonzero;
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::Deserialize;
use std::num::NonZeroU32;

// =============================================================================
// Constants
// =============================================================================

/// MarketWatch site.
pub const MARKETWATCH_URL: &str = "https://www.marketwatch.com";

/// MarketWatch account pages.
pub const ACCOUNTS_URL: &str = "https://accounts.marketwatch.com";

/// Dow Jones single-sign-on provider.
pub const SSO_URL: &str = "https://sso.accounts.dowjones.com";

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the MarketWatch client.
#[derive(Debug, Clone)]
pub struct MarketWatchClientConfig {
    /// Base URL for game and instrument pages.
    pub www_url: String,

    /// Base URL for the account login page.
    pub accounts_url: String,

    /// Base URL for the SSO provider.
    pub sso_url: String,

    /// Requests per minute limit.
    pub requests_per_minute: NonZeroU32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for MarketWatchClientConfig {
    fn default() -> Self {
        Self {
            www_url: MARKETWATCH_URL.to_string(),
            accounts_url: ACCOUNTS_URL.to_string(),
            sso_url: SSO_URL.to_string(),
            requests_per_minute: nonzero!(60u32),
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl MarketWatchClientConfig {
    /// Points all three sites at one base URL (useful for testing).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.www_url = url.clone();
        self.accounts_url = url.clone();
        self.sso_url = url;
        self
    }

    /// Sets the rate limit.
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_minute: NonZeroU32) -> Self {
        self.requests_per_minute = requests_per_minute;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Sets the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub(crate) fn accounts_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.accounts_url.trim_end_matches('/'), path)
    }

    pub(crate) fn sso_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.sso_url.trim_end_matches('/'), path)
    }

    pub(crate) fn www_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.www_url.trim_end_matches('/'), path)
    }

    pub(crate) fn game_endpoint(&self, game: &str, path: &str) -> String {
        self.www_endpoint(&format!("/game/{game}{path}"))
    }
}

/// Raw submit response; the site sends `null` messages at times.
#[derive(Debug, Deserialize)]
struct RawOrderOutcome {
    succeeded: Option<bool>,
    message: Option<String>,
}

impl From<RawOrderOutcome> for OrderOutcome {
    fn from(raw: RawOrderOutcome) -> Self {
        Self {
            succeeded: raw.succeeded.unwrap_or(false),
            message: raw.message.unwrap_or_default(),
        }
    }
}

// =============================================================================
// MarketWatchClient
// =============================================================================

/// Signed-in client for a single game.
#[derive(Debug)]
pub struct MarketWatchClient {
    /// Cookie-carrying session.
    session: Session,

    /// Game identifier as it appears in game URLs.
    game: String,

    /// Numeric player id within the game.
    player_id: String,
}

impl MarketWatchClient {
    /// Signs in, checks the game is reachable and resolves the player id.
    ///
    /// # Arguments
    /// * `config` - Client configuration
    /// * `email` - Account email
    /// * `password` - Account password
    /// * `game` - Game identifier from the game URL
    ///
    /// # Errors
    /// Returns `Authentication` if sign-in fails and `GameUnavailable` if the
    /// game page does not answer with 200.
    pub async fn login(
        config: MarketWatchClientConfig,
        email: &str,
        password: &SecretString,
        game: impl Into<String>,
    ) -> Result<Self> {
        let game = game.into();
        validate_identifier(&game).map_err(|_| {
            MarketWatchError::Configuration(format!("invalid game identifier: {game}"))
        })?;

        let session = Session::new(config)?;

        auth::sign_in(&session, email, password).await?;
        auth::ensure_game_available(&session, &game).await?;
        let player_id = auth::resolve_player_id(&session, &game).await?;

        tracing::info!(game = %game, player_id = %player_id, "Signed in to MarketWatch game");

        Ok(Self {
            session,
            game,
            player_id,
        })
    }

    /// Returns the game identifier.
    #[must_use]
    pub fn game(&self) -> &str {
        &self.game
    }

    /// Returns the player id.
    #[must_use]
    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    fn game_url(&self, path: &str) -> String {
        self.session.config().game_endpoint(&self.game, path)
    }

    /// Fetches an instrument page.
    ///
    /// Returns `Ok(None)` for a malformed ticker or a non-success status.
    async fn instrument_page(&self, ticker: &str) -> Result<Option<String>> {
        let ticker = match validate_ticker(ticker) {
            Ok(ticker) => ticker,
            Err(e) => {
                tracing::warn!(ticker, error = %e, "Rejected ticker");
                return Ok(None);
            }
        };

        let url = self
            .session
            .config()
            .www_endpoint(&format!("/investing/stock/{ticker}"));
        let response = self.session.get(&url).await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(ticker, status = status.as_u16(), "Instrument page unavailable");
            return Ok(None);
        }
        Ok(Some(response.text().await?))
    }

    /// Checks that the game page still answers with 200.
    ///
    /// # Errors
    /// Returns `GameUnavailable` otherwise.
    pub async fn check_game(&self) -> Result<()> {
        auth::ensure_game_available(&self.session, &self.game).await
    }

    // =========================================================================
    // Instruments
    // =========================================================================

    /// Gets the last price for a ticker, rounded to cents.
    ///
    /// Returns `Ok(None)` if the ticker is malformed, the instrument page is
    /// missing or it does not show a quote.
    ///
    /// # Errors
    /// Returns error if the request fails in transport.
    pub async fn get_price(&self, ticker: &str) -> Result<Option<Decimal>> {
        let Some(page) = self.instrument_page(ticker).await? else {
            return Ok(None);
        };
        let price = scrape::quote_price(&page);
        if price.is_none() {
            tracing::warn!(ticker, "No quote found on instrument page");
        }
        Ok(price)
    }

    /// Resolves a ticker to the internal id the trade endpoint expects.
    ///
    /// Returns `Ok(None)` if the ticker is malformed, the instrument page is
    /// missing or it has no chart symbol.
    ///
    /// # Errors
    /// Returns error if the request fails in transport.
    pub async fn resolve_ticker_uid(&self, ticker: &str) -> Result<Option<TickerUid>> {
        let Some(page) = self.instrument_page(ticker).await? else {
            return Ok(None);
        };
        let uid = scrape::ticker_uid(&page);
        if uid.is_none() {
            tracing::warn!(ticker, "No chart symbol found on instrument page");
        }
        Ok(uid)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Buys shares.
    ///
    /// # Errors
    /// See [`MarketWatchClient::submit_order`].
    pub async fn buy(
        &self,
        ticker: &str,
        shares: u32,
        term: Term,
        price_type: PriceType,
        price: Option<Decimal>,
    ) -> Result<OrderOutcome> {
        self.place(OrderType::Buy, ticker, shares, term, price_type, price)
            .await
    }

    /// Sells shares held long.
    ///
    /// # Errors
    /// See [`MarketWatchClient::submit_order`].
    pub async fn sell(
        &self,
        ticker: &str,
        shares: u32,
        term: Term,
        price_type: PriceType,
        price: Option<Decimal>,
    ) -> Result<OrderOutcome> {
        self.place(OrderType::Sell, ticker, shares, term, price_type, price)
            .await
    }

    /// Sells shares short.
    ///
    /// # Errors
    /// See [`MarketWatchClient::submit_order`].
    pub async fn short(
        &self,
        ticker: &str,
        shares: u32,
        term: Term,
        price_type: PriceType,
        price: Option<Decimal>,
    ) -> Result<OrderOutcome> {
        self.place(OrderType::Short, ticker, shares, term, price_type, price)
            .await
    }

    /// Buys back shares held short.
    ///
    /// # Errors
    /// See [`MarketWatchClient::submit_order`].
    pub async fn cover(
        &self,
        ticker: &str,
        shares: u32,
        term: Term,
        price_type: PriceType,
        price: Option<Decimal>,
    ) -> Result<OrderOutcome> {
        self.place(OrderType::Cover, ticker, shares, term, price_type, price)
            .await
    }

    async fn place(
        &self,
        order_type: OrderType,
        ticker: &str,
        shares: u32,
        term: Term,
        price_type: PriceType,
        price: Option<Decimal>,
    ) -> Result<OrderOutcome> {
        let request = OrderRequest {
            ticker: ticker.to_string(),
            shares,
            order_type,
            term,
            price_type,
            price,
        };
        self.submit_order(&request).await
    }

    /// Submits an order.
    ///
    /// If the ticker cannot be resolved nothing is sent and an unsuccessful
    /// outcome is returned.
    ///
    /// # Errors
    /// Returns `InvalidOrder` for bad parameters, or a transport error.
    pub async fn submit_order(&self, request: &OrderRequest) -> Result<OrderOutcome> {
        request.validate()?;

        let Some(uid) = self.resolve_ticker_uid(&request.ticker).await? else {
            return Ok(OrderOutcome::rejected(format!(
                "unable to resolve ticker {}",
                request.ticker
            )));
        };

        let payload = request.to_payload(&uid);
        let raw: RawOrderOutcome = self
            .session
            .post_json(&self.game_url("/trade/submitorder"), &payload)
            .await?;
        let outcome = OrderOutcome::from(raw);

        tracing::info!(
            ticker = %request.ticker,
            order_type = %request.order_type,
            shares = request.shares,
            succeeded = outcome.succeeded,
            site_message = %outcome.message,
            "Order submitted"
        );

        Ok(outcome)
    }

    /// Cancels a pending order.
    ///
    /// # Errors
    /// Returns error if the id is malformed or the request fails.
    pub async fn cancel_order(&self, order_id: &str) -> Result<()> {
        let order_id = validate_identifier(order_id)?;
        self.session
            .get_text(&self.game_url(&format!("/trade/cancelorder?id={order_id}")))
            .await?;
        tracing::info!(order_id, "Order cancelled");
        Ok(())
    }

    /// Cancels every pending order that carries an id.
    ///
    /// Returns the number of cancel requests issued.
    ///
    /// # Errors
    /// Stops at the first failing request.
    pub async fn cancel_all_orders(&self) -> Result<usize> {
        let mut cancelled = 0;
        for order in self.get_pending_orders().await? {
            match order.id.as_deref() {
                Some(id) => {
                    self.cancel_order(id).await?;
                    cancelled += 1;
                }
                None => {
                    tracing::warn!(ticker = %order.ticker, "Pending order has no id, skipping");
                }
            }
        }
        Ok(cancelled)
    }

    // =========================================================================
    // Portfolio
    // =========================================================================

    /// Gets pending orders from the portfolio page.
    ///
    /// # Errors
    /// Returns error if the request fails or an order row is malformed.
    pub async fn get_pending_orders(&self) -> Result<Vec<Order>> {
        let page = self.session.get_text(&self.game_url("/portfolio")).await?;
        scrape::pending_orders(&page)
    }

    /// Gets current positions from the holdings CSV download.
    ///
    /// # Errors
    /// Returns error if the request fails or the CSV is malformed.
    pub async fn get_positions(&self) -> Result<Vec<Position>> {
        let url = self.game_url(&format!(
            "/download?view=holdings&p={}",
            self.player_id
        ));
        let csv = self.session.get_text(&url).await?;
        scrape::holdings_csv(&csv)
    }

    /// Gets portfolio summary figures.
    ///
    /// # Errors
    /// Returns error if the request fails or a figure is missing.
    pub async fn get_portfolio_stats(&self) -> Result<PortfolioStats> {
        let page = self.session.get_text(&self.game_url("/portfolio")).await?;
        scrape::portfolio_stats(&page)
    }

    /// Gets the game rules.
    ///
    /// # Errors
    /// Returns error if the request fails or a setting is missing.
    pub async fn get_game_settings(&self) -> Result<GameSettings> {
        let page = self.session.get_text(&self.game_url("/settings")).await?;
        scrape::game_settings(&page)
    }
}

// =============================================================================
// Input Validation
// =============================================================================

/// Validates a ticker before it goes into a URL path.
///
/// Valid tickers contain only alphanumerics, dots and hyphens (e.g. "BRK.B").
fn validate_ticker(ticker: &str) -> Result<&str> {
    if ticker.is_empty() {
        return Err(MarketWatchError::InvalidOrder(
            "ticker cannot be empty".to_string(),
        ));
    }

    if ticker.contains("..") {
        return Err(MarketWatchError::InvalidOrder(format!(
            "invalid ticker: contains forbidden characters: {ticker}"
        )));
    }

    if !ticker
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(MarketWatchError::InvalidOrder(format!(
            "invalid ticker: must contain only alphanumeric, dot, or hyphen: {ticker}"
        )));
    }

    if ticker.len() > 16 {
        return Err(MarketWatchError::InvalidOrder(format!(
            "invalid ticker: exceeds maximum length of 16: {}",
            ticker.len()
        )));
    }

    Ok(ticker)
}

/// Validates an identifier (game, order id) before it goes into a URL.
fn validate_identifier(id: &str) -> Result<&str> {
    if id.is_empty() {
        return Err(MarketWatchError::InvalidOrder(
            "identifier cannot be empty".to_string(),
        ));
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MarketWatchError::InvalidOrder(format!(
            "invalid identifier: must contain only alphanumeric, hyphen, or underscore: {id}"
        )));
    }

    if id.len() > 128 {
        return Err(MarketWatchError::InvalidOrder(format!(
            "invalid identifier: exceeds maximum length of 128: {}",
            id.len()
        )));
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GAME: &str = "test-game";

    const INSTRUMENT_PAGE: &str = r#"<html><body><div id="maincontent">
        <div></div>
        <div>
          <div></div><div></div>
          <div><div><div></div><div><h2><bg-quote>42.017</bg-quote></h2></div></div></div>
          <div><mw-chart data-ticker="Stock/US/XNYS/IBM"></mw-chart></div>
        </div>
    </div></body></html>"#;

    fn client_for(server: &MockServer) -> MarketWatchClient {
        let config = MarketWatchClientConfig::default().with_base_url(server.uri());
        MarketWatchClient {
            session: Session::new(config).unwrap(),
            game: GAME.to_string(),
            player_id: "777".to_string(),
        }
    }

    async fn mount_instrument_page(server: &MockServer, ticker: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/investing/stock/{ticker}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    // ==================== Config Tests ====================

    #[test]
    fn test_client_config_default() {
        let config = MarketWatchClientConfig::default();
        assert_eq!(config.www_url, MARKETWATCH_URL);
        assert_eq!(config.accounts_url, ACCOUNTS_URL);
        assert_eq!(config.sso_url, SSO_URL);
        assert_eq!(config.requests_per_minute.get(), 60);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_client_config_builder() {
        let config = MarketWatchClientConfig::default()
            .with_base_url("http://localhost:9000/")
            .with_rate_limit(nonzero!(120u32))
            .with_timeout_secs(5)
            .with_user_agent("stockgame-test");

        assert_eq!(config.www_url, "http://localhost:9000/");
        assert_eq!(config.sso_url, "http://localhost:9000/");
        assert_eq!(config.requests_per_minute.get(), 120);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.user_agent, "stockgame-test");
    }

    #[test]
    fn test_endpoint_construction() {
        let config = MarketWatchClientConfig::default().with_base_url("http://localhost:9000/");
        assert_eq!(
            config.game_endpoint("my-game", "/portfolio"),
            "http://localhost:9000/game/my-game/portfolio"
        );
        assert_eq!(
            config.sso_endpoint("/login/callback"),
            "http://localhost:9000/login/callback"
        );
    }

    // ==================== Input Validation Tests ====================

    #[test]
    fn test_validate_ticker() {
        assert!(validate_ticker("AAPL").is_ok());
        assert!(validate_ticker("BRK.B").is_ok());
        assert!(validate_ticker("").is_err());
        assert!(validate_ticker("../etc").is_err());
        assert!(validate_ticker("AAPL?x=1").is_err());
        assert!(validate_ticker("A/B").is_err());
        assert!(validate_ticker(&"A".repeat(17)).is_err());
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("9876543").is_ok());
        assert!(validate_identifier("my_game-2026").is_ok());
        assert!(validate_identifier("1&id=2").is_err());
        assert!(validate_identifier("").is_err());
    }

    // ==================== Instrument Tests ====================

    #[tokio::test]
    async fn test_get_price() {
        let server = MockServer::start().await;
        mount_instrument_page(&server, "IBM", INSTRUMENT_PAGE).await;

        let client = client_for(&server);
        let price = client.get_price("IBM").await.unwrap();
        assert_eq!(price, Some(dec!(42.02)));
    }

    #[tokio::test]
    async fn test_get_price_missing_quote() {
        let server = MockServer::start().await;
        mount_instrument_page(&server, "ZZZZ", "<html><body>Symbol not found</body></html>").await;

        let client = client_for(&server);
        assert_eq!(client.get_price("ZZZZ").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_price_unknown_symbol_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/investing/stock/ZZZZZ"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.get_price("ZZZZZ").await.unwrap(), None);
        assert_eq!(client.get_price("../etc").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolve_ticker_uid() {
        let server = MockServer::start().await;
        mount_instrument_page(&server, "IBM", INSTRUMENT_PAGE).await;

        let client = client_for(&server);
        let uid = client.resolve_ticker_uid("IBM").await.unwrap().unwrap();
        assert_eq!(uid.as_str(), "Stock-XNYS-IBM");
    }

    // ==================== Order Tests ====================

    #[tokio::test]
    async fn test_buy_limit_submits_payload() {
        let server = MockServer::start().await;
        mount_instrument_page(&server, "IBM", INSTRUMENT_PAGE).await;

        Mock::given(method("POST"))
            .and(path(format!("/game/{GAME}/trade/submitorder")))
            .and(body_json(serde_json::json!([{
                "Fuid": "Stock-XNYS-IBM",
                "Shares": "10",
                "Type": "Buy",
                "Term": "Day",
                "Limit": "41.5"
            }])))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "succeeded": true,
                "message": "Your order was submitted successfully"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let outcome = client
            .buy("IBM", 10, Term::Day, PriceType::Limit, Some(dec!(41.50)))
            .await
            .unwrap();

        assert!(outcome.succeeded);
        assert!(outcome.message.contains("submitted"));
    }

    #[tokio::test]
    async fn test_short_market_rejected_by_site() {
        let server = MockServer::start().await;
        mount_instrument_page(&server, "IBM", INSTRUMENT_PAGE).await;

        Mock::given(method("POST"))
            .and(path(format!("/game/{GAME}/trade/submitorder")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "succeeded": false,
                "message": null
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let outcome = client
            .short("IBM", 5, Term::Indefinite, PriceType::Market, None)
            .await
            .unwrap();

        assert!(!outcome.succeeded);
        assert!(outcome.message.is_empty());
    }

    #[tokio::test]
    async fn test_unresolved_ticker_is_not_submitted() {
        let server = MockServer::start().await;
        mount_instrument_page(&server, "NOPE", "<html><body></body></html>").await;

        Mock::given(method("POST"))
            .and(path(format!("/game/{GAME}/trade/submitorder")))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let outcome = client
            .sell("NOPE", 1, Term::Day, PriceType::Market, None)
            .await
            .unwrap();

        assert!(!outcome.succeeded);
        assert!(outcome.message.contains("NOPE"));
    }

    #[tokio::test]
    async fn test_unknown_symbol_page_rejects_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/investing/stock/ZZZZZ"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(format!("/game/{GAME}/trade/submitorder")))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let outcome = client
            .buy("ZZZZZ", 3, Term::Day, PriceType::Market, None)
            .await
            .unwrap();

        assert!(!outcome.succeeded);
        assert!(outcome.message.contains("ZZZZZ"));
    }

    #[tokio::test]
    async fn test_malformed_ticker_rejects_order_without_request() {
        let server = MockServer::start().await;
        let client = client_for(&server);

        let outcome = client
            .buy("BF/B", 1, Term::Day, PriceType::Market, None)
            .await
            .unwrap();

        assert!(!outcome.succeeded);
        assert!(outcome.message.contains("BF/B"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stop_without_price_fails_before_request() {
        let server = MockServer::start().await;
        let client = client_for(&server);

        let err = client
            .cover("IBM", 5, Term::Day, PriceType::Stop, None)
            .await
            .unwrap_err();

        assert!(matches!(err, MarketWatchError::InvalidOrder(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/game/{GAME}/trade/cancelorder")))
            .and(query_param("id", "9876543"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.cancel_order("9876543").await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_order_rejects_bad_id() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        assert!(client.cancel_order("1&id=2").await.is_err());
    }

    // ==================== Portfolio Tests ====================

    #[tokio::test]
    async fn test_get_positions_uses_player_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/game/{GAME}/download")))
            .and(query_param("view", "holdings"))
            .and(query_param("p", "777"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("Symbol,Qty,Price,Type\nIBM,10,42.00,Buy\n"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let positions = client.get_positions().await.unwrap();

        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].ticker, "IBM");
        assert_eq!(positions[0].quantity, 10);
        assert_eq!(positions[0].order_type, "Buy");
    }

    #[tokio::test]
    async fn test_check_game_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/game/{GAME}")))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.check_game().await.unwrap_err();
        assert!(matches!(
            err,
            MarketWatchError::GameUnavailable {
                status_code: 503,
                ..
            }
        ));
    }
}
