//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use whiteboard_core::{ChannelPalette, DomainError};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub publisher: PublisherConfig,
    pub dispatcher: DispatcherConfig,
    pub whiteboard: WhiteboardConfig,
    pub broker: ServerConfig,
    pub demo: DemoConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Where clients find the broker
#[derive(Debug, Clone, Deserialize)]
pub struct PublisherConfig {
    #[serde(default = "default_publisher_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_binding_name")]
    pub binding_name: String,
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
}

impl PublisherConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            host: default_publisher_host(),
            port: default_port(),
            binding_name: default_binding_name(),
            call_timeout_ms: default_call_timeout_ms(),
        }
    }
}

/// Outbound worker pool configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DispatcherConfig {
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
        }
    }
}

/// Channels, colors and canvas size
#[derive(Debug, Clone, Deserialize)]
pub struct WhiteboardConfig {
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,
    #[serde(default = "default_channels")]
    pub colors: Vec<String>,
    #[serde(default = "default_canvas_size")]
    pub width: u32,
    #[serde(default = "default_canvas_size")]
    pub height: u32,
}

impl WhiteboardConfig {
    /// Build the channel palette from the configured names and colors
    pub fn palette(&self) -> Result<ChannelPalette, DomainError> {
        ChannelPalette::from_names(&self.channels, &self.colors)
    }
}

impl Default for WhiteboardConfig {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            colors: default_channels(),
            width: default_canvas_size(),
            height: default_canvas_size(),
        }
    }
}

/// Server bind configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Headless demo client settings
///
/// `None` means "derive from the whiteboard channels".
#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    #[serde(default)]
    pub publish_channel: Option<String>,
    #[serde(default)]
    pub subscribe_channels: Option<Vec<String>>,
    #[serde(default = "default_demo_duration_secs")]
    pub duration_secs: u64,
}

impl DemoConfig {
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

// Default value functions
fn default_app_name() -> String {
    "whiteboard".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_publisher_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    1099
}

fn default_binding_name() -> String {
    "publisher".to_string()
}

fn default_call_timeout_ms() -> u64 {
    5000
}

fn default_worker_threads() -> usize {
    10
}

fn default_channels() -> Vec<String> {
    ["black", "red", "green", "blue"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_canvas_size() -> u32 {
    500
}

fn default_demo_duration_secs() -> u64 {
    10
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse `key` if set, otherwise fall back to `default`
fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default),
    }
}

/// A name that may be left unset but never set to blank
fn name_or<F>(lookup: &F, key: &'static str, default: fn() -> String) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if raw.trim().is_empty() => Err(ConfigError::MissingVar(key)),
        Some(raw) => Ok(raw.trim().to_string()),
        None => Ok(default()),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that cannot be used,
    /// or a host or binding name is set but blank
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let worker_threads = parse_or(&lookup, "DISPATCHER_WORKER_THREADS", default_worker_threads())?;
        if worker_threads == 0 {
            return Err(ConfigError::InvalidValue(
                "DISPATCHER_WORKER_THREADS",
                "0".to_string(),
            ));
        }

        let env = match lookup("APP_ENV") {
            Some(raw) => Environment::parse(&raw).ok_or(ConfigError::InvalidValue("APP_ENV", raw))?,
            None => default_env(),
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            publisher: PublisherConfig {
                host: name_or(&lookup, "PUBLISHER_HOST", default_publisher_host)?,
                port: parse_or(&lookup, "PUBLISHER_PORT", default_port())?,
                binding_name: name_or(&lookup, "PUBLISHER_BINDING_NAME", default_binding_name)?,
                call_timeout_ms: parse_or(
                    &lookup,
                    "PUBLISHER_CALL_TIMEOUT_MS",
                    default_call_timeout_ms(),
                )?,
            },
            dispatcher: DispatcherConfig { worker_threads },
            whiteboard: WhiteboardConfig {
                channels: lookup("WHITEBOARD_CHANNELS")
                    .map(|s| split_list(&s))
                    .unwrap_or_else(default_channels),
                colors: lookup("WHITEBOARD_COLORS")
                    .map(|s| split_list(&s))
                    .unwrap_or_else(default_channels),
                width: parse_or(&lookup, "CANVAS_WIDTH", default_canvas_size())?,
                height: parse_or(&lookup, "CANVAS_HEIGHT", default_canvas_size())?,
            },
            broker: ServerConfig {
                host: name_or(&lookup, "BROKER_HOST", default_host)?,
                port: parse_or(&lookup, "BROKER_PORT", default_port())?,
            },
            demo: DemoConfig {
                publish_channel: lookup("DEMO_PUBLISH_CHANNEL"),
                subscribe_channels: lookup("DEMO_SUBSCRIBE_CHANNELS").map(|s| split_list(&s)),
                duration_secs: parse_or(&lookup, "DEMO_DURATION_SECS", default_demo_duration_secs())?,
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
