use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub marketwatch: MarketWatchConfig,
    /// Credentials file used when `--creds` is not given.
    pub credentials_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketWatchConfig {
    pub www_url: String,
    pub accounts_url: String,
    pub sso_url: String,
    pub timeout_secs: u64,
    pub requests_per_minute: u32,
    pub user_agent: String,
}

impl Default for MarketWatchConfig {
    fn default() -> Self {
        Self {
            www_url: "https://www.marketwatch.com".to_string(),
            accounts_url: "https://accounts.marketwatch.com".to_string(),
            sso_url: "https://sso.accounts.dowjones.com".to_string(),
            timeout_secs: 30,
            requests_per_minute: 60,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0"
                .to_string(),
        }
    }
}

impl AppConfig {
    /// Credentials file path, falling back to `credentials` in the working directory.
    #[must_use]
    pub fn credentials_path(&self) -> &str {
        if self.credentials_path.is_empty() {
            "credentials"
        } else {
            &self.credentials_path
        }
    }
}
