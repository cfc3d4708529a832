use clap::{Parser, Subcommand};
use stockgame_core::ConfigLoader;
use stockgame_marketwatch::OrderType;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{CancelArgs, OrderArgs, PriceArgs};

#[derive(Parser, Debug)]
#[command(name = "stockgame")]
#[command(about = "Trade in a MarketWatch Virtual Stock Exchange game", long_about = None)]
struct Cli {
    /// Credentials file (email, password, game)
    #[arg(long, global = true)]
    creds: Option<String>,

    /// Config file path
    #[arg(short, long, global = true, default_value = "config/Config.toml")]
    config: String,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the last price for a ticker
    Price(PriceArgs),
    /// Buy shares
    Buy(OrderArgs),
    /// Sell shares held long
    Sell(OrderArgs),
    /// Sell shares short
    Short(OrderArgs),
    /// Buy back shares held short
    Cover(OrderArgs),
    /// Cancel a pending order
    Cancel(CancelArgs),
    /// Cancel every pending order
    CancelAll,
    /// List pending orders
    Orders,
    /// List current positions
    Positions,
    /// Show portfolio summary
    Stats,
    /// Show game rules
    Settings,
    /// Show the signed-in game and player id
    Whoami,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = ConfigLoader::load_from(&cli.config)?;
    let creds_path = cli
        .creds
        .clone()
        .unwrap_or_else(|| config.credentials_path().to_string());

    let client = commands::connect(&config, &creds_path).await?;
    let json = cli.json;

    match cli.command {
        Commands::Price(args) => commands::run_price(&client, args, json).await?,
        Commands::Buy(args) => commands::run_order(&client, OrderType::Buy, args, json).await?,
        Commands::Sell(args) => commands::run_order(&client, OrderType::Sell, args, json).await?,
        Commands::Short(args) => commands::run_order(&client, OrderType::Short, args, json).await?,
        Commands::Cover(args) => commands::run_order(&client, OrderType::Cover, args, json).await?,
        Commands::Cancel(args) => commands::run_cancel(&client, args, json).await?,
        Commands::CancelAll => commands::run_cancel_all(&client, json).await?,
        Commands::Orders => commands::run_orders(&client, json).await?,
        Commands::Positions => commands::run_positions(&client, json).await?,
        Commands::Stats => commands::run_stats(&client, json).await?,
        Commands::Settings => commands::run_settings(&client, json).await?,
        Commands::Whoami => commands::run_whoami(&client, json)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use stockgame_marketwatch::{PriceType, Term};

    #[test]
    fn test_parse_price() {
        let cli = Cli::try_parse_from(["stockgame", "price", "AAPL"]).unwrap();
        assert!(!cli.json);
        assert_eq!(cli.config, "config/Config.toml");
        match cli.command {
            Commands::Price(args) => assert_eq!(args.ticker, "AAPL"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_limit_buy_with_globals() {
        let cli = Cli::try_parse_from([
            "stockgame", "buy", "IBM", "--shares", "20", "--term", "day", "--limit", "140.50",
            "--json", "--creds", "mw.creds",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.creds.as_deref(), Some("mw.creds"));
        match cli.command {
            Commands::Buy(args) => {
                assert_eq!(args.ticker, "IBM");
                assert_eq!(args.shares, 20);
                assert_eq!(args.term, Term::Day);
                assert_eq!(args.pricing(), (PriceType::Limit, Some(dec!(140.50))));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_order_defaults_to_indefinite_market() {
        let cli = Cli::try_parse_from(["stockgame", "cover", "GME", "--shares", "5"]).unwrap();
        match cli.command {
            Commands::Cover(args) => {
                assert_eq!(args.term, Term::Indefinite);
                assert_eq!(args.pricing(), (PriceType::Market, None));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_limit_and_stop() {
        let result = Cli::try_parse_from([
            "stockgame", "sell", "AAPL", "--shares", "1", "--limit", "10", "--stop", "9",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_term() {
        let result = Cli::try_parse_from([
            "stockgame", "short", "AAPL", "--shares", "1", "--term", "week",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_order_requires_shares() {
        assert!(Cli::try_parse_from(["stockgame", "buy", "AAPL"]).is_err());
    }

    #[test]
    fn test_parse_cancel_all() {
        let cli = Cli::try_parse_from(["stockgame", "--debug", "cancel-all"]).unwrap();
        assert!(cli.debug);
        assert!(matches!(cli.command, Commands::CancelAll));
    }
}
