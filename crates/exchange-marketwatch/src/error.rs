//! Error types for the MarketWatch game client.
//!
//! Separates authentication, transport, markup and validation failures so
//! callers can tell a dead session from a page layout change.

use thiserror::Error;

/// Errors that can occur when interacting with MarketWatch.
#[derive(Debug, Error)]
pub enum MarketWatchError {
    /// Login flow failed.
    #[error("authentication error: {0}")]
    Authentication(String),

    /// The game page did not answer with a success status.
    #[error("game unavailable: {game} returned status {status_code}")]
    GameUnavailable {
        /// Game identifier.
        game: String,
        /// HTTP status code of the game page.
        status_code: u16,
    },

    /// Request returned a non-success status.
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Response body or reason.
        message: String,
    },

    /// Site asked us to slow down.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimit {
        /// Seconds to wait before retry.
        retry_after_secs: u64,
    },

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Expected markup was missing or could not be parsed.
    #[error("markup error: {0}")]
    Markup(String),

    /// Invalid order parameters.
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// Holdings download could not be read.
    #[error("CSV error: {0}")]
    Csv(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl MarketWatchError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a game unavailable error.
    pub fn game_unavailable(game: impl Into<String>, status_code: u16) -> Self {
        Self::GameUnavailable {
            game: game.into(),
            status_code,
        }
    }

    /// Creates a rate limit error.
    pub fn rate_limit(retry_after_secs: u64) -> Self {
        Self::RateLimit { retry_after_secs }
    }

    /// Creates a markup error for a missing or unparsable element.
    pub fn markup(what: impl Into<String>) -> Self {
        Self::Markup(what.into())
    }

    /// Returns true if the failure is likely to clear up on its own.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::RateLimit { .. } => true,
            Self::Api { status_code, .. } | Self::GameUnavailable { status_code, .. } => {
                *status_code >= 500
            }
            _ => false,
        }
    }

    /// Returns true if the session is no longer authenticated.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Authentication(_) => true,
            Self::Api { status_code, .. } => *status_code == 401 || *status_code == 403,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for MarketWatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else if err.is_decode() {
            Self::Serialization(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for MarketWatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<csv::Error> for MarketWatchError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<url::ParseError> for MarketWatchError {
    fn from(err: url::ParseError) -> Self {
        Self::Configuration(format!("invalid URL: {err}"))
    }
}

/// Result type alias for MarketWatch operations.
pub type Result<T> = std::result::Result<T, MarketWatchError>;
