use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, warn};

/// Environment variable (and settings key) holding the bot token.
pub const TOKEN_VAR: &str = "JOIN_TOKEN";

/// Environment variable overriding the settings file location.
pub const SETTINGS_PATH_VAR: &str = "JOIN_SETTINGS";

const DEFAULT_SETTINGS_PATH: &str = "settings.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JOIN_TOKEN is missing or invalid. Set it in the environment or in the settings file.")]
    MissingToken,
}

/// Bot API access token. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// One place a token may come from.
pub trait TokenSource {
    fn name(&self) -> String;
    fn token(&self) -> Option<String>;
}

/// Reads the token from a process environment variable.
pub struct EnvSource {
    var: &'static str,
}

impl EnvSource {
    pub fn new(var: &'static str) -> Self {
        Self { var }
    }
}

impl TokenSource for EnvSource {
    fn name(&self) -> String {
        format!("env:{}", self.var)
    }

    fn token(&self) -> Option<String> {
        std::env::var(self.var).ok()
    }
}

#[derive(Debug, Deserialize)]
struct Settings {
    #[serde(rename = "JOIN_TOKEN", alias = "join_token")]
    join_token: Option<String>,
}

/// Optional TOML settings file carrying `JOIN_TOKEN = "..."`.
///
/// A missing file is normal. An unreadable or malformed one is logged and
/// treated as missing.
pub struct SettingsFileSource {
    path: PathBuf,
}

impl SettingsFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Settings file named by `JOIN_SETTINGS`, or `settings.toml`.
    pub fn from_env() -> Self {
        let path = std::env::var(SETTINGS_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_PATH));
        Self::new(path)
    }

    fn parse(content: &str) -> Result<Option<String>, toml::de::Error> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings.join_token)
    }
}

impl TokenSource for SettingsFileSource {
    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn token(&self) -> Option<String> {
        if !self.path.exists() {
            debug!("No settings file at {}", self.path.display());
            return None;
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Ignoring unreadable settings file {}: {}", self.path.display(), e);
                return None;
            }
        };

        match Self::parse(&content) {
            Ok(token) => token,
            Err(e) => {
                warn!("Ignoring malformed settings file {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

/// The standard lookup order: environment first, then the settings file.
pub fn default_sources() -> Vec<Box<dyn TokenSource>> {
    vec![
        Box::new(EnvSource::new(TOKEN_VAR)),
        Box::new(SettingsFileSource::from_env()),
    ]
}

/// Resolve the token from the first source yielding a non-empty value.
pub fn load_token(sources: &[Box<dyn TokenSource>]) -> Result<AccessToken, ConfigError> {
    for source in sources {
        let Some(raw) = source.token() else {
            continue;
        };
        let token = raw.trim();
        if token.is_empty() {
            debug!("Token source {} is set but empty", source.name());
            continue;
        }
        debug!("Token resolved from {}", source.name());
        return Ok(AccessToken(token.to_string()));
    }

    Err(ConfigError::MissingToken)
}
