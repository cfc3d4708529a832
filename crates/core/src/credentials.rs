//! Account credentials file.
//!
//! One `key=value` pair per line:
//!
//! ```text
//! email=trader@example.com
//! password=correct horse
//! game=my-class-game
//! ```
//!
//! Unknown keys and lines without `=` are ignored. Values run to the end of
//! the line, so a password may itself contain `=`.

use anyhow::{bail, Context, Result};
use secrecy::SecretString;
use std::path::Path;

/// Sign-in details for one game.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
    pub game: String,
}

impl Credentials {
    /// Reads and parses a credentials file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a key is missing.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read credentials file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid credentials file {}", path.display()))
    }

    /// Parses credentials from file contents.
    ///
    /// # Errors
    ///
    /// Returns an error if `email`, `password` or `game` is missing or empty.
    pub fn parse(text: &str) -> Result<Self> {
        let mut email = None;
        let mut password = None;
        let mut game = None;

        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            match key.trim() {
                "email" => email = Some(value.trim().to_string()),
                "password" => password = Some(value.to_string()),
                "game" => game = Some(value.trim().to_string()),
                _ => {}
            }
        }

        let email = required(email, "email")?;
        let password = required(password, "password")?;
        let game = required(game, "game")?;

        Ok(Self {
            email,
            password: SecretString::from(password),
            game,
        })
    }
}

fn required(value: Option<String>, key: &str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => bail!("`{key}` is empty"),
        None => bail!("missing `{key}`"),
    }
}
