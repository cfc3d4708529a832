//! CLI commands for the MarketWatch stock game.

pub mod portfolio;
pub mod quote;
pub mod trade;

pub use portfolio::{run_orders, run_positions, run_settings, run_stats, run_whoami};
pub use quote::{run_price, PriceArgs};
pub use trade::{run_cancel, run_cancel_all, run_order, CancelArgs, OrderArgs};

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::num::NonZeroU32;
use stockgame_core::{AppConfig, Credentials, MarketWatchConfig};
use stockgame_marketwatch::{MarketWatchClient, MarketWatchClientConfig};

/// Builds the client configuration from the `[marketwatch]` config section.
///
/// # Errors
/// Returns an error if the rate limit is zero.
pub fn client_config(config: &MarketWatchConfig) -> Result<MarketWatchClientConfig> {
    let rate_limit = NonZeroU32::new(config.requests_per_minute)
        .ok_or_else(|| anyhow!("marketwatch.requests_per_minute must be greater than zero"))?;

    let mut client_config = MarketWatchClientConfig::default()
        .with_rate_limit(rate_limit)
        .with_timeout_secs(config.timeout_secs)
        .with_user_agent(config.user_agent.clone());
    client_config.www_url = config.www_url.clone();
    client_config.accounts_url = config.accounts_url.clone();
    client_config.sso_url = config.sso_url.clone();

    Ok(client_config)
}

/// Reads the credentials file and signs in to the configured game.
///
/// # Errors
/// Returns an error if the credentials are unreadable or sign-in fails.
pub async fn connect(config: &AppConfig, creds_path: &str) -> Result<MarketWatchClient> {
    let creds = Credentials::from_file(creds_path)?;
    tracing::info!(email = %creds.email, game = %creds.game, "Signing in");

    MarketWatchClient::login(
        client_config(&config.marketwatch)?,
        &creds.email,
        &creds.password,
        creds.game.clone(),
    )
    .await
    .with_context(|| format!("failed to sign in to game {}", creds.game))
}

/// Prints a value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_from_app_config() {
        let section = MarketWatchConfig {
            www_url: "http://localhost:1".to_string(),
            timeout_secs: 7,
            requests_per_minute: 15,
            ..MarketWatchConfig::default()
        };

        let config = client_config(&section).unwrap();
        assert_eq!(config.www_url, "http://localhost:1");
        assert_eq!(config.accounts_url, section.accounts_url);
        assert_eq!(config.timeout_secs, 7);
        assert_eq!(config.requests_per_minute.get(), 15);
        assert_eq!(config.user_agent, section.user_agent);
    }

    #[test]
    fn test_client_config_rejects_zero_rate() {
        let section = MarketWatchConfig {
            requests_per_minute: 0,
            ..MarketWatchConfig::default()
        };
        assert!(client_config(&section).is_err());
    }

    #[tokio::test]
    async fn test_connect_missing_credentials_file() {
        let err = connect(&AppConfig::default(), "/nonexistent/stockgame/creds")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("credentials"));
    }
}
