//! Order placement and cancellation commands.

use super::print_json;
use anyhow::{bail, Result};
use clap::Args;
use rust_decimal::Decimal;
use stockgame_marketwatch::{MarketWatchClient, OrderType, PriceType, Term};

/// Arguments shared by buy, sell, short and cover.
#[derive(Args, Debug, Clone)]
pub struct OrderArgs {
    /// Ticker symbol (e.g., "AAPL").
    pub ticker: String,

    /// Number of shares.
    #[arg(long)]
    pub shares: u32,

    /// Order term: "day" or "indefinite".
    #[arg(long, default_value = "indefinite")]
    pub term: Term,

    /// Limit price (makes this a limit order).
    #[arg(long, conflicts_with = "stop")]
    pub limit: Option<Decimal>,

    /// Stop price (makes this a stop order).
    #[arg(long)]
    pub stop: Option<Decimal>,
}

impl OrderArgs {
    /// Price type and price implied by `--limit` / `--stop`.
    #[must_use]
    pub fn pricing(&self) -> (PriceType, Option<Decimal>) {
        match (self.limit, self.stop) {
            (Some(limit), _) => (PriceType::Limit, Some(limit)),
            (None, Some(stop)) => (PriceType::Stop, Some(stop)),
            (None, None) => (PriceType::Market, None),
        }
    }
}

/// Arguments for the cancel command.
#[derive(Args, Debug, Clone)]
pub struct CancelArgs {
    /// Order id as listed by `orders`.
    pub id: String,
}

/// Places one order and reports the site's response.
///
/// # Errors
/// Returns an error if the request fails or the site rejects the order.
pub async fn run_order(
    client: &MarketWatchClient,
    order_type: OrderType,
    args: OrderArgs,
    json: bool,
) -> Result<()> {
    let (price_type, price) = args.pricing();
    let ticker = args.ticker.as_str();

    let outcome = match order_type {
        OrderType::Buy => client.buy(ticker, args.shares, args.term, price_type, price).await?,
        OrderType::Sell => client.sell(ticker, args.shares, args.term, price_type, price).await?,
        OrderType::Short => client.short(ticker, args.shares, args.term, price_type, price).await?,
        OrderType::Cover => client.cover(ticker, args.shares, args.term, price_type, price).await?,
    };

    if json {
        print_json(&outcome)?;
    } else {
        let status = if outcome.succeeded { "accepted" } else { "rejected" };
        println!(
            "{} {} {}: {}",
            order_type,
            args.shares,
            ticker.to_uppercase(),
            status
        );
        if !outcome.message.is_empty() {
            println!("  {}", outcome.message);
        }
    }

    if !outcome.succeeded {
        bail!("{order_type} order for {ticker} was not accepted");
    }
    Ok(())
}

/// Cancels one pending order.
///
/// # Errors
/// Returns an error if the request fails.
pub async fn run_cancel(client: &MarketWatchClient, args: CancelArgs, json: bool) -> Result<()> {
    client.cancel_order(&args.id).await?;

    if json {
        print_json(&serde_json::json!({ "cancelled": [args.id] }))?;
    } else {
        println!("Cancelled order {}", args.id);
    }
    Ok(())
}

/// Cancels every pending order.
///
/// # Errors
/// Returns an error if any request fails.
pub async fn run_cancel_all(client: &MarketWatchClient, json: bool) -> Result<()> {
    let count = client.cancel_all_orders().await?;

    if json {
        print_json(&serde_json::json!({ "cancelled_count": count }))?;
    } else {
        println!("Cancelled {count} pending order(s)");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn args(limit: Option<Decimal>, stop: Option<Decimal>) -> OrderArgs {
        OrderArgs {
            ticker: "AAPL".to_string(),
            shares: 10,
            term: Term::Day,
            limit,
            stop,
        }
    }

    #[test]
    fn test_pricing_market() {
        assert_eq!(args(None, None).pricing(), (PriceType::Market, None));
    }

    #[test]
    fn test_pricing_limit() {
        assert_eq!(
            args(Some(dec!(150.25)), None).pricing(),
            (PriceType::Limit, Some(dec!(150.25)))
        );
    }

    #[test]
    fn test_pricing_stop() {
        assert_eq!(
            args(None, Some(dec!(99))).pricing(),
            (PriceType::Stop, Some(dec!(99)))
        );
    }
}
