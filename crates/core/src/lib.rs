pub mod config;
pub mod config_loader;
pub mod credentials;

pub use config::{AppConfig, MarketWatchConfig};
pub use config_loader::ConfigLoader;
pub use credentials::Credentials;
