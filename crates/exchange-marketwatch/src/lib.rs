//! MarketWatch Virtual Stock Exchange client.
//!
//! This crate provides:
//! - Browser-like session with a cookie jar and rate limiting
//! - Sign-in through the Dow Jones SSO provider
//! - Order placement and cancellation for a game
//! - Scrapers for quotes, pending orders, portfolio summary and game rules
//!
//! # Example
//!
//! ```ignore
//! use stockgame_marketwatch::{MarketWatchClient, MarketWatchClientConfig, PriceType, Term};
//! use secrecy::SecretString;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let password = SecretString::from("hunter2");
//!     let client = MarketWatchClient::login(
//!         MarketWatchClientConfig::default(),
//!         "trader@example.com",
//!         &password,
//!         "my-class-game",
//!     )
//!     .await?;
//!
//!     // Buy 10 shares at market, good for the day
//!     let outcome = client.buy("AAPL", 10, Term::Day, PriceType::Market, None).await?;
//!     println!("{}: {}", outcome.succeeded, outcome.message);
//!
//!     for order in client.get_pending_orders().await? {
//!         println!("{:?}", order);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Site Endpoints
//!
//! - `GET /investing/stock/{ticker}` - Quote and chart symbol
//! - `POST /game/{game}/trade/submitorder` - Submit order (JSON)
//! - `GET /game/{game}/trade/cancelorder?id={id}` - Cancel order
//! - `GET /game/{game}/portfolio` - Pending orders, summary, player id
//! - `GET /game/{game}/download?view=holdings&p={player}` - Holdings CSV
//! - `GET /game/{game}/settings` - Game rules
//!
//! Pages are scraped by position, so a site redesign shows up as
//! [`MarketWatchError::Markup`] rather than wrong numbers.

pub mod auth;
pub mod client;
pub mod error;
pub mod scrape;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use auth::{AuthorizeParams, CallbackForm};
pub use client::{
    MarketWatchClient, MarketWatchClientConfig, ACCOUNTS_URL, MARKETWATCH_URL, SSO_URL,
};
pub use error::{MarketWatchError, Result};
pub use session::Session;
pub use types::{
    GameSettings, Order, OrderOutcome, OrderRequest, OrderType, PortfolioStats, Position,
    PriceType, Term, TickerUid, TradeLeg,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_exports() {
        let _ = MarketWatchClientConfig::default();
        let _ = Term::default();
        let _ = PriceType::default();
    }

    #[test]
    fn test_error_types_accessible() {
        let err = MarketWatchError::api(400, "bad request");
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn test_types_accessible() {
        let order = OrderRequest::market(OrderType::Buy, "AAPL", 100);
        assert_eq!(order.ticker, "AAPL");
        assert_eq!(order.term, Term::Indefinite);
        assert_eq!(order.price_type, PriceType::Market);
    }

    #[test]
    fn test_constants_accessible() {
        assert!(MARKETWATCH_URL.starts_with("https://"));
        assert!(ACCOUNTS_URL.starts_with("https://"));
        assert!(SSO_URL.starts_with("https://"));
    }
}
