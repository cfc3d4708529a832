//! Price lookup command.

use super::print_json;
use anyhow::{bail, Result};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use stockgame_marketwatch::MarketWatchClient;

/// Arguments for the price command.
#[derive(Args, Debug, Clone)]
pub struct PriceArgs {
    /// Ticker symbol (e.g., "AAPL").
    pub ticker: String,
}

#[derive(Debug, Serialize)]
struct Quote<'a> {
    ticker: &'a str,
    price: Decimal,
}

/// Prints the last price for a ticker.
///
/// # Errors
/// Returns an error if the request fails or the page shows no quote.
pub async fn run_price(client: &MarketWatchClient, args: PriceArgs, json: bool) -> Result<()> {
    let Some(price) = client.get_price(&args.ticker).await? else {
        bail!("no quote found for {}", args.ticker);
    };

    let quote = Quote {
        ticker: &args.ticker,
        price,
    };

    if json {
        print_json(&quote)?;
    } else {
        println!("{}", format_quote(&quote));
    }
    Ok(())
}

fn format_quote(quote: &Quote<'_>) -> String {
    format!("{}  ${}", quote.ticker.to_uppercase(), quote.price)
}
