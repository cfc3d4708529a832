//! Field extraction from MarketWatch pages and downloads.
//!
//! Every location here is a fixed position in the page tree, rooted at the
//! `#maincontent` element. When the site moves things around these lookups
//! come back empty and the caller gets a `Markup` error (or `None` for the
//! quote and chart lookups).

use crate::auth::CallbackForm;
use crate::error::{MarketWatchError, Result};
use crate::types::{GameSettings, Order, OrderType, PortfolioStats, Position, PriceType, TickerUid};
use regex::Regex;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Node, Selector};
use std::str::FromStr;

// =============================================================================
// Locations
// =============================================================================

const QUOTE: &str = "#maincontent > div:nth-of-type(2) > div:nth-of-type(3) > div \
                     > div:nth-of-type(2) > h2 > bg-quote";

const CHART: &str = "#maincontent > div:nth-of-type(2) > div:nth-of-type(4) > mw-chart";

const PENDING_ORDERS: &str = "#maincontent > div:nth-of-type(3) > div:nth-of-type(1) \
                              > div:nth-of-type(6) > mw-tabs > div:nth-of-type(2) \
                              > div:nth-of-type(2) > div > table > tbody";

const SUMMARY: &str = "#maincontent > div:nth-of-type(3) > div:nth-of-type(1) > div:nth-of-type(2)";

const SETTINGS: &str = "#maincontent > div:nth-of-type(3) > div:nth-of-type(1) > div:nth-of-type(2)";

const PLAYER_ID_PATTERN: &str = ";p=([0-9]+)";

// =============================================================================
// Text Normalization
// =============================================================================

/// Strips whitespace and thousands separators from scraped text.
#[must_use]
pub fn clean_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect()
}

/// Parses a dollar amount such as `"$1,234.56"` or `"-$12.00"`.
#[must_use]
pub fn parse_money(text: &str) -> Option<Decimal> {
    let cleaned = clean_text(text).replace('$', "");
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    Decimal::from_str(cleaned).ok()
}

/// Parses a percentage such as `"12.5%"` into a fraction (`0.125`).
#[must_use]
pub fn parse_percent(text: &str) -> Option<Decimal> {
    let cleaned = clean_text(text).replace('%', "");
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    Decimal::from_str(cleaned)
        .ok()
        .map(|value| value / Decimal::ONE_HUNDRED)
}

/// Text that precedes the element's first child element.
fn leading_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for child in element.children() {
        match child.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(_) => break,
            _ => {}
        }
    }
    text
}

fn child_elements(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element.children().filter_map(ElementRef::wrap)
}

fn nth_child_element(element: ElementRef<'_>, index: usize) -> Option<ElementRef<'_>> {
    child_elements(element).nth(index)
}

fn select_in_document<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next()
}

// =============================================================================
// Session Pages
// =============================================================================

/// Extracts the numeric player id from a game portfolio page.
#[must_use]
pub fn player_id(html: &str) -> Option<String> {
    let pattern = Regex::new(PLAYER_ID_PATTERN).ok()?;
    pattern
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Reads the `value` of a named `<input>`.
#[must_use]
pub fn input_value(html: &str, name: &str) -> Option<String> {
    let document = Html::parse_document(html);
    named_input_value(&document, name)
}

fn named_input_value(document: &Html, name: &str) -> Option<String> {
    select_in_document(document, &format!("input[name=\"{name}\"]"))
        .and_then(|input| input.value().attr("value"))
        .map(str::to_string)
}

/// Reads the hidden callback fields posted back after credentials are accepted.
#[must_use]
pub fn callback_form(html: &str) -> Option<CallbackForm> {
    let document = Html::parse_document(html);
    Some(CallbackForm {
        wa: named_input_value(&document, "wa")?,
        wresult: named_input_value(&document, "wresult")?,
        wctx: named_input_value(&document, "wctx")?,
    })
}

// =============================================================================
// Instrument Page
// =============================================================================

/// Last price from an instrument page, rounded to cents.
#[must_use]
pub fn quote_price(html: &str) -> Option<Decimal> {
    let document = Html::parse_document(html);
    let quote = select_in_document(&document, QUOTE)?;
    parse_money(&leading_text(quote)).map(|price| price.round_dp(2))
}

/// Internal instrument identifier from an instrument page's chart element.
#[must_use]
pub fn ticker_uid(html: &str) -> Option<TickerUid> {
    let document = Html::parse_document(html);
    let chart = select_in_document(&document, CHART)?;
    let symbol = clean_text(chart.value().attr("data-ticker")?);
    TickerUid::from_chart_symbol(&symbol)
}

// =============================================================================
// Pending Orders
// =============================================================================

/// Direction named in an order label such as `"Buy: Limit at $12.00"`.
#[must_use]
pub fn classify_order_type(label: &str) -> Option<OrderType> {
    // "Buy to Cover" and "Sell Short" contain two keywords; the second wins.
    if label.contains("Cover") {
        Some(OrderType::Cover)
    } else if label.contains("Short") {
        Some(OrderType::Short)
    } else if label.contains("Buy") {
        Some(OrderType::Buy)
    } else if label.contains("Sell") {
        Some(OrderType::Sell)
    } else {
        None
    }
}

/// Pricing named in an order label.
#[must_use]
pub fn classify_price_type(label: &str) -> Option<PriceType> {
    let label = label.to_ascii_lowercase();
    if label.contains("market") {
        Some(PriceType::Market)
    } else if label.contains("limit") {
        Some(PriceType::Limit)
    } else if label.contains("stop") {
        Some(PriceType::Stop)
    } else {
        None
    }
}

/// Price following the `$` in an order label.
#[must_use]
pub fn order_price(label: &str) -> Option<Decimal> {
    let (_, price) = label.split_once('$')?;
    parse_money(price)
}

/// Pending orders listed on the portfolio page.
///
/// A page without the orders table yields an empty list.
///
/// # Errors
/// Returns `Markup` if a row lacks its ticker or quantity.
pub fn pending_orders(html: &str) -> Result<Vec<Order>> {
    let document = Html::parse_document(html);
    let Some(body) = select_in_document(&document, PENDING_ORDERS) else {
        return Ok(Vec::new());
    };

    child_elements(body)
        .enumerate()
        .map(|(index, row)| parse_order_row(row, index))
        .collect()
}

fn parse_order_row(row: ElementRef<'_>, index: usize) -> Result<Order> {
    let cell = |n: usize| nth_child_element(row, n);

    let ticker = cell(0)
        .and_then(|td| nth_child_element(td, 0))
        .and_then(|el| nth_child_element(el, 0))
        .map(|el| clean_text(&leading_text(el)))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| MarketWatchError::markup(format!("pending order row {index}: ticker")))?;

    let label = cell(2)
        .map(|td| clean_text(&leading_text(td)))
        .unwrap_or_default();

    let quantity = cell(3)
        .map(|td| clean_text(&leading_text(td)))
        .and_then(|q| q.parse::<u64>().ok())
        .ok_or_else(|| {
            MarketWatchError::markup(format!("pending order row {index}: quantity"))
        })?;

    let id = cell(4)
        .and_then(|td| nth_child_element(td, 0))
        .and_then(|el| nth_child_element(el, 0))
        .and_then(|el| el.value().attr("data-order"))
        .map(clean_text)
        .filter(|id| !id.is_empty());

    Ok(Order {
        id,
        ticker,
        quantity,
        order_type: classify_order_type(&label),
        price_type: classify_price_type(&label),
        price: order_price(&label),
    })
}

// =============================================================================
// Portfolio Summary
// =============================================================================

/// Summary figures from the portfolio page.
///
/// # Errors
/// Returns `Markup` naming the first figure that is missing or unparsable.
pub fn portfolio_stats(html: &str) -> Result<PortfolioStats> {
    let document = Html::parse_document(html);
    select_in_document(&document, SUMMARY)
        .ok_or_else(|| MarketWatchError::markup("portfolio summary"))?;

    let item = |n: usize| {
        select_in_document(&document, &format!("{SUMMARY} > ul > li:nth-of-type({n}) > span"))
            .map(leading_text)
    };
    let money = |n: usize, name: &str| {
        item(n)
            .as_deref()
            .and_then(parse_money)
            .ok_or_else(|| MarketWatchError::markup(format!("portfolio {name}")))
    };

    let overall_returns = item(4)
        .as_deref()
        .and_then(parse_percent)
        .ok_or_else(|| MarketWatchError::markup("portfolio returns"))?;

    let rank = select_in_document(&document, &format!("{SUMMARY} > div:nth-of-type(1) > div"))
        .map(|el| clean_text(&leading_text(el)).replace('$', ""))
        .and_then(|r| r.parse::<u32>().ok())
        .ok_or_else(|| MarketWatchError::markup("portfolio rank"))?;

    Ok(PortfolioStats {
        value: money(1, "value")?,
        overall_gains: money(3, "gains")?,
        overall_returns,
        cash: money(5, "cash")?,
        buying_power: money(6, "buying power")?,
        short_reserve: money(7, "short reserve")?,
        borrowed: money(8, "borrowed")?,
        rank,
    })
}

// =============================================================================
// Game Settings
// =============================================================================

/// Rules from the game settings page.
///
/// # Errors
/// Returns `Markup` naming the first setting that is missing or unparsable.
pub fn game_settings(html: &str) -> Result<GameSettings> {
    let document = Html::parse_document(html);
    select_in_document(&document, SETTINGS)
        .ok_or_else(|| MarketWatchError::markup("game settings"))?;

    // Value cell of a settings table row: div[block]/table[table]/tbody/tr[row]/td[2]
    let value = |block: usize, table: usize, row: Option<usize>, name: &str| {
        let row = row.map_or_else(|| "tr".to_string(), |r| format!("tr:nth-of-type({r})"));
        let css = format!(
            "{SETTINGS} > div:nth-of-type({block}) > table:nth-of-type({table}) > tbody > {row} \
             > td:nth-of-type(2)"
        );
        select_in_document(&document, &css)
            .map(|td| clean_text(&leading_text(td)))
            .ok_or_else(|| MarketWatchError::markup(format!("setting {name}")))
    };
    let money = |table: usize, row: usize, name: &str| {
        value(2, table, Some(row), name).and_then(|v| {
            parse_money(&v).ok_or_else(|| MarketWatchError::markup(format!("setting {name}")))
        })
    };
    let percent = |table: usize, row: usize, name: &str| {
        value(2, table, Some(row), name).and_then(|v| {
            parse_percent(&v).ok_or_else(|| MarketWatchError::markup(format!("setting {name}")))
        })
    };
    let enabled = |row: usize, name: &str| value(2, 2, Some(row), name).map(|v| v == "Enabled");

    Ok(GameSettings {
        game_public: value(1, 1, None, "game visibility")? == "Public",
        portfolios_public: value(1, 2, None, "portfolio visibility")? == "Public",
        start_balance: money(1, 1, "start balance")?,
        commission: money(1, 2, "commission")?,
        credit_interest_rate: percent(1, 3, "credit interest rate")?,
        leverage_debt_interest_rate: percent(1, 4, "leverage debt interest rate")?,
        minimum_stock_price: money(1, 5, "minimum stock price")?,
        maximum_stock_price: money(1, 6, "maximum stock price")?,
        volume_limit: percent(2, 1, "volume limit")?,
        short_selling_enabled: enabled(2, "short selling")?,
        margin_trading_enabled: enabled(3, "margin trading")?,
        limit_orders_enabled: enabled(4, "limit orders")?,
        stop_loss_orders_enabled: enabled(5, "stop loss orders")?,
        partial_share_trading_enabled: enabled(6, "partial share trading")?,
    })
}

// =============================================================================
// Holdings Download
// =============================================================================

/// Positions from the holdings CSV download.
///
/// The header row is skipped. Columns used: 0 symbol, 1 quantity, 3 type.
///
/// # Errors
/// Returns `Csv` for malformed rows.
pub fn holdings_csv(text: &str) -> Result<Vec<Position>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut positions = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let field = |n: usize| {
            record
                .get(n)
                .ok_or_else(|| MarketWatchError::Csv(format!("holdings row {index}: missing column {n}")))
        };

        let quantity = clean_text(field(1)?).parse::<i64>().map_err(|e| {
            MarketWatchError::Csv(format!("holdings row {index}: bad quantity: {e}"))
        })?;

        positions.push(Position {
            ticker: field(0)?.trim().to_string(),
            order_type: field(3)?.trim().to_string(),
            quantity,
        });
    }

    Ok(positions)
}
