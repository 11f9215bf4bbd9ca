//! Server configuration loading from file and environment variables.

use conci_types::{GuestProfile, LoyaltyTier};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Concierge behaviour.
    #[serde(default)]
    pub concierge: ConciergeConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "conci_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Defaults for new sessions and limits on guest input.
#[derive(Debug, Clone, Deserialize)]
pub struct ConciergeConfig {
    /// Guest name assigned to a session before the operator sets one.
    #[serde(default = "default_guest_name")]
    pub default_guest_name: String,

    /// Loyalty tier assigned to a new session.
    #[serde(default)]
    pub default_tier: LoyaltyTier,

    /// Late-checkout eligibility assigned to a new session.
    #[serde(default = "default_late_checkout")]
    pub default_late_checkout: bool,

    /// Buffer size of the staff feed broadcast channel.
    #[serde(default = "default_feed_capacity")]
    pub feed_capacity: usize,

    /// Longest transcript accepted, in bytes.
    #[serde(default = "default_max_transcript_len")]
    pub max_transcript_len: usize,
}

impl ConciergeConfig {
    /// Guest profile a new session starts with.
    pub fn default_profile(&self) -> GuestProfile {
        GuestProfile::new(
            self.default_guest_name.clone(),
            self.default_tier,
            self.default_late_checkout,
        )
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_guest_name() -> String {
    "Alex".to_string()
}

fn default_late_checkout() -> bool {
    true
}

fn default_feed_capacity() -> usize {
    256
}

fn default_max_transcript_len() -> usize {
    2_048
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for ConciergeConfig {
    fn default() -> Self {
        Self {
            default_guest_name: default_guest_name(),
            default_tier: LoyaltyTier::default(),
            default_late_checkout: default_late_checkout(),
            feed_capacity: default_feed_capacity(),
            max_transcript_len: default_max_transcript_len(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `CONCI_HOST` overrides `server.host`
/// - `CONCI_PORT` overrides `server.port`
/// - `CONCI_LOG_LEVEL` overrides `logging.level`
/// - `CONCI_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `CONCI_DEFAULT_GUEST` overrides `concierge.default_guest_name`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = read_config_file(path)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn read_config_file(path: Option<&str>) -> Result<Config, ConfigError> {
    match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Ok(Config::default())
            }
            Err(e) => Err(ConfigError::FileRead(e)),
        },
        None => Ok(Config::default()),
    }
}

fn apply_env_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(host) = var("CONCI_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = var("CONCI_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(level) = var("CONCI_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = var("CONCI_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(name) = var("CONCI_DEFAULT_GUEST") {
        if !name.trim().is_empty() {
            config.concierge.default_guest_name = name;
        }
    }
}
