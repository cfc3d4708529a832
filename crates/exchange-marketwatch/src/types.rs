//! Data models for the MarketWatch game client.
//!
//! All monetary values use `rust_decimal::Decimal`. Percentages scraped from
//! the site are stored as fractions (`12.5%` becomes `0.125`).

use crate::error::{MarketWatchError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Order Enums
// =============================================================================

/// How long an order stays open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Term {
    /// Expires at the end of the trading day.
    Day,
    /// Good until cancelled.
    #[default]
    Indefinite,
}

impl Term {
    /// Returns the value the trade endpoint expects.
    #[must_use]
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Indefinite => "Cancelled",
        }
    }
}

impl FromStr for Term {
    type Err = MarketWatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "indefinite" | "gtc" | "cancelled" => Ok(Self::Indefinite),
            other => Err(MarketWatchError::InvalidOrder(format!("unknown term: {other}"))),
        }
    }
}

/// Pricing of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    /// Fill at the market price.
    #[default]
    Market,
    /// Fill at the given price or better.
    Limit,
    /// Becomes a market order once the given price trades.
    Stop,
}

impl PriceType {
    /// Returns true if this price type needs an explicit price.
    #[must_use]
    pub fn requires_price(self) -> bool {
        matches!(self, Self::Limit | Self::Stop)
    }
}

/// Direction of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    /// Open or add to a long position.
    Buy,
    /// Reduce a long position.
    Sell,
    /// Open or add to a short position.
    Short,
    /// Reduce a short position.
    Cover,
}

impl OrderType {
    /// Returns the value the trade endpoint expects.
    #[must_use]
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
            Self::Short => "Short",
            Self::Cover => "Cover",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

// =============================================================================
// Instruments
// =============================================================================

/// Internal instrument identifier used by the trade endpoint.
///
/// Built from the chart's `data-ticker` attribute, e.g.
/// `Stock/US/XNAS/AAPL` becomes `Stock-XNAS-AAPL`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickerUid(String);

impl TickerUid {
    /// Builds the identifier from a slash separated chart symbol.
    ///
    /// Returns `None` if the symbol has fewer than four segments.
    #[must_use]
    pub fn from_chart_symbol(symbol: &str) -> Option<Self> {
        let parts: Vec<&str> = symbol.split('/').collect();
        if parts.len() < 4 {
            return None;
        }
        Some(Self(format!("{}-{}-{}", parts[0], parts[2], parts[3])))
    }

    /// Returns the identifier as sent to the trade endpoint.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TickerUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Request to place an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Human readable symbol (e.g., "AAPL").
    pub ticker: String,

    /// Number of shares.
    pub shares: u32,

    /// Direction.
    pub order_type: OrderType,

    /// Order lifetime.
    pub term: Term,

    /// Pricing.
    pub price_type: PriceType,

    /// Limit or stop price.
    pub price: Option<Decimal>,
}

impl OrderRequest {
    /// Creates a market order with an indefinite term.
    pub fn market(order_type: OrderType, ticker: impl Into<String>, shares: u32) -> Self {
        Self {
            ticker: ticker.into(),
            shares,
            order_type,
            term: Term::default(),
            price_type: PriceType::Market,
            price: None,
        }
    }

    /// Creates a limit order with an indefinite term.
    pub fn limit(
        order_type: OrderType,
        ticker: impl Into<String>,
        shares: u32,
        price: Decimal,
    ) -> Self {
        Self {
            price_type: PriceType::Limit,
            price: Some(price),
            ..Self::market(order_type, ticker, shares)
        }
    }

    /// Creates a stop order with an indefinite term.
    pub fn stop(
        order_type: OrderType,
        ticker: impl Into<String>,
        shares: u32,
        price: Decimal,
    ) -> Self {
        Self {
            price_type: PriceType::Stop,
            price: Some(price),
            ..Self::market(order_type, ticker, shares)
        }
    }

    /// Sets the order term.
    #[must_use]
    pub fn with_term(mut self, term: Term) -> Self {
        self.term = term;
        self
    }

    /// Checks the request before anything is sent.
    ///
    /// # Errors
    /// Returns `InvalidOrder` for zero shares, or a limit/stop order without
    /// a positive price.
    pub fn validate(&self) -> Result<()> {
        if self.shares == 0 {
            return Err(MarketWatchError::InvalidOrder(
                "shares must be greater than zero".to_string(),
            ));
        }

        if self.price_type.requires_price() {
            match self.price {
                Some(price) if price > Decimal::ZERO => {}
                Some(price) => {
                    return Err(MarketWatchError::InvalidOrder(format!(
                        "{:?} price must be positive, got {}",
                        self.price_type, price
                    )))
                }
                None => {
                    return Err(MarketWatchError::InvalidOrder(format!(
                        "{:?} order requires a price",
                        self.price_type
                    )))
                }
            }
        }

        Ok(())
    }

    /// Builds the trade endpoint body for this request.
    #[must_use]
    pub fn to_payload(&self, uid: &TickerUid) -> Vec<TradeLeg> {
        let price = self.price.map(|p| p.normalize().to_string());
        let (limit, stop) = match self.price_type {
            PriceType::Market => (None, None),
            PriceType::Limit => (price, None),
            PriceType::Stop => (None, price),
        };

        vec![TradeLeg {
            fuid: uid.as_str().to_string(),
            shares: self.shares.to_string(),
            order_type: self.order_type.as_api_str(),
            term: self.term.as_api_str(),
            limit,
            stop,
        }]
    }
}

/// One entry of the JSON array posted to the trade endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TradeLeg {
    /// Instrument identifier.
    pub fuid: String,

    /// Share count, sent as a string.
    pub shares: String,

    /// "Buy", "Sell", "Short" or "Cover".
    #[serde(rename = "Type")]
    pub order_type: &'static str,

    /// "Day" or "Cancelled".
    pub term: &'static str,

    /// Limit price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,

    /// Stop price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
}

/// Result of an order submission: the site's success flag and message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderOutcome {
    /// Whether the site accepted the order.
    pub succeeded: bool,

    /// Message shown by the site.
    #[serde(default)]
    pub message: String,
}

impl OrderOutcome {
    /// Creates an unsuccessful outcome that was never sent to the site.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            message: message.into(),
        }
    }
}

/// A pending order scraped from the portfolio page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order id used for cancellation, if the row carried one.
    pub id: Option<String>,

    /// Symbol.
    pub ticker: String,

    /// Share count.
    pub quantity: u64,

    /// Direction, if the label was recognized.
    pub order_type: Option<OrderType>,

    /// Pricing, if the label was recognized.
    pub price_type: Option<PriceType>,

    /// Limit or stop price.
    pub price: Option<Decimal>,
}

// =============================================================================
// Portfolio
// =============================================================================

/// A holding from the holdings CSV download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Symbol.
    pub ticker: String,

    /// Type label as shown by the site (e.g., "Buy", "Short").
    pub order_type: String,

    /// Share count.
    pub quantity: i64,
}

/// Portfolio summary figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioStats {
    /// Net worth.
    pub value: Decimal,

    /// Overall gains in dollars.
    pub overall_gains: Decimal,

    /// Overall return as a fraction.
    pub overall_returns: Decimal,

    /// Cash remaining.
    pub cash: Decimal,

    /// Buying power.
    pub buying_power: Decimal,

    /// Cash reserved against short positions.
    pub short_reserve: Decimal,

    /// Cash borrowed on margin.
    pub borrowed: Decimal,

    /// Rank within the game.
    pub rank: u32,
}

/// Rules of a game, from its settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Whether the game is listed publicly.
    pub game_public: bool,

    /// Whether player portfolios are visible to others.
    pub portfolios_public: bool,

    /// Starting cash balance.
    pub start_balance: Decimal,

    /// Commission per trade.
    pub commission: Decimal,

    /// Interest earned on cash, as a fraction.
    pub credit_interest_rate: Decimal,

    /// Interest charged on margin debt, as a fraction.
    pub leverage_debt_interest_rate: Decimal,

    /// Lowest tradeable share price.
    pub minimum_stock_price: Decimal,

    /// Highest tradeable share price.
    pub maximum_stock_price: Decimal,

    /// Maximum share of daily volume per trade, as a fraction.
    pub volume_limit: Decimal,

    /// Short selling allowed.
    pub short_selling_enabled: bool,

    /// Margin trading allowed.
    pub margin_trading_enabled: bool,

    /// Limit orders allowed.
    pub limit_orders_enabled: bool,

    /// Stop loss orders allowed.
    pub stop_loss_orders_enabled: bool,

    /// Fractional shares allowed.
    pub partial_share_trading_enabled: bool,
}
