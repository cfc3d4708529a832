//! Portfolio and game information commands.

use super::print_json;
use anyhow::Result;
use rust_decimal::Decimal;
use stockgame_marketwatch::{GameSettings, MarketWatchClient, Order, PortfolioStats, Position};

/// Lists pending orders.
///
/// # Errors
/// Returns an error if the portfolio page cannot be read.
pub async fn run_orders(client: &MarketWatchClient, json: bool) -> Result<()> {
    let orders = client.get_pending_orders().await?;

    if json {
        return print_json(&orders);
    }

    if orders.is_empty() {
        println!("No pending orders");
        return Ok(());
    }

    println!(
        "{:<12} {:<8} {:<6} {:<7} {:>10} {:>8}",
        "ID", "TICKER", "SIDE", "PRICING", "PRICE", "QTY"
    );
    for order in &orders {
        println!("{}", format_order(order));
    }
    Ok(())
}

/// Lists current holdings.
///
/// # Errors
/// Returns an error if the holdings download fails.
pub async fn run_positions(client: &MarketWatchClient, json: bool) -> Result<()> {
    let positions = client.get_positions().await?;

    if json {
        return print_json(&positions);
    }

    if positions.is_empty() {
        println!("No positions");
        return Ok(());
    }

    println!("{:<8} {:<8} {:>10}", "TICKER", "TYPE", "QTY");
    for position in &positions {
        println!("{}", format_position(position));
    }
    Ok(())
}

/// Prints the portfolio summary.
///
/// # Errors
/// Returns an error if the portfolio page cannot be read.
pub async fn run_stats(client: &MarketWatchClient, json: bool) -> Result<()> {
    let stats = client.get_portfolio_stats().await?;

    if json {
        return print_json(&stats);
    }

    for line in format_stats(&stats) {
        println!("{line}");
    }
    Ok(())
}

/// Prints the game rules.
///
/// # Errors
/// Returns an error if the settings page cannot be read.
pub async fn run_settings(client: &MarketWatchClient, json: bool) -> Result<()> {
    let settings = client.get_game_settings().await?;

    if json {
        return print_json(&settings);
    }

    for line in format_settings(&settings) {
        println!("{line}");
    }
    Ok(())
}

/// Prints the signed-in game and player id.
///
/// # Errors
/// Returns an error if JSON output fails.
pub fn run_whoami(client: &MarketWatchClient, json: bool) -> Result<()> {
    if json {
        return print_json(&serde_json::json!({
            "game": client.game(),
            "player_id": client.player_id(),
        }));
    }

    println!("game:      {}", client.game());
    println!("player id: {}", client.player_id());
    Ok(())
}

fn format_order(order: &Order) -> String {
    let side = order
        .order_type
        .map_or_else(|| "?".to_string(), |t| t.to_string());
    let pricing = order
        .price_type
        .map_or_else(|| "?".to_string(), |p| format!("{p:?}").to_lowercase());
    let price = order
        .price
        .map_or_else(|| "-".to_string(), |p| format!("${p}"));

    format!(
        "{:<12} {:<8} {:<6} {:<7} {:>10} {:>8}",
        order.id.as_deref().unwrap_or("-"),
        order.ticker,
        side,
        pricing,
        price,
        order.quantity
    )
}

fn format_position(position: &Position) -> String {
    format!(
        "{:<8} {:<8} {:>10}",
        position.ticker, position.order_type, position.quantity
    )
}

fn percent(fraction: Decimal) -> String {
    format!("{}%", (fraction * Decimal::ONE_HUNDRED).normalize())
}

fn format_stats(stats: &PortfolioStats) -> Vec<String> {
    vec![
        format!("Rank:           {}", stats.rank),
        format!("Net worth:      ${}", stats.value),
        format!("Overall gains:  ${}", stats.overall_gains),
        format!("Overall return: {}", percent(stats.overall_returns)),
        format!("Cash:           ${}", stats.cash),
        format!("Buying power:   ${}", stats.buying_power),
        format!("Short reserve:  ${}", stats.short_reserve),
        format!("Borrowed:       ${}", stats.borrowed),
    ]
}

fn format_settings(settings: &GameSettings) -> Vec<String> {
    let flag = |on: bool| if on { "enabled" } else { "disabled" };
    let visibility = |public: bool| if public { "public" } else { "private" };

    vec![
        format!("Game:                  {}", visibility(settings.game_public)),
        format!("Portfolios:            {}", visibility(settings.portfolios_public)),
        format!("Starting balance:      ${}", settings.start_balance),
        format!("Commission:            ${}", settings.commission),
        format!("Credit interest:       {}", percent(settings.credit_interest_rate)),
        format!("Margin interest:       {}", percent(settings.leverage_debt_interest_rate)),
        format!("Minimum stock price:   ${}", settings.minimum_stock_price),
        format!("Maximum stock price:   ${}", settings.maximum_stock_price),
        format!("Volume limit:          {}", percent(settings.volume_limit)),
        format!("Short selling:         {}", flag(settings.short_selling_enabled)),
        format!("Margin trading:        {}", flag(settings.margin_trading_enabled)),
        format!("Limit orders:          {}", flag(settings.limit_orders_enabled)),
        format!("Stop loss orders:      {}", flag(settings.stop_loss_orders_enabled)),
        format!("Partial shares:        {}", flag(settings.partial_share_trading_enabled)),
    ]
}
