//! Settings that shape how records are rendered and where they are sent.

use std::str::FromStr;
use std::time::Duration;

use chrono::{Local, Utc};
use thiserror::Error;

use crate::severity::Severity;

/// Display name used on messages when none is configured.
pub const DEFAULT_NAME: &str = "Default";
/// Time allowed to establish a connection to the webhook.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
/// Time allowed for a whole delivery, connection included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// `strftime` pattern of the `Timestamp` fact, e.g. `Sat, Oct 17 2026 14:03:09 UTC`.
pub const TIMESTAMP_PATTERN: &str = "%a, %b %d %Y %H:%M:%S %Z";

const ENV_URL: &str = "TEAMS_LOGGER_URL";
const ENV_LEVEL: &str = "TEAMS_LOGGER_LEVEL";
const ENV_STYLE: &str = "TEAMS_LOGGER_STYLE";
const ENV_NAME: &str = "TEAMS_LOGGER_NAME";
const ENV_SHOW_AVATARS: &str = "TEAMS_LOGGER_SHOW_AVATARS";
const ENV_SHOW_SEVERITY_COLOUR: &str = "TEAMS_LOGGER_SHOW_SEVERITY_COLOUR";
const ENV_BUBBLE: &str = "TEAMS_LOGGER_BUBBLE";
const ENV_TIMESTAMP: &str = "TEAMS_LOGGER_TIMESTAMP";

/// Errors raised while reading configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no webhook url configured, set `{0}`")]
    MissingUrl(&'static str),

    #[error("webhook url must start with http:// or https://, got `{0}`")]
    InvalidUrl(String),

    #[error("unknown severity `{0}`")]
    UnknownSeverity(String),

    #[error("unknown style `{0}`, expected `simple` or `card`")]
    UnknownStyle(String),

    #[error("unknown timestamp format `{0}`, expected `utc` or `local`")]
    UnknownTimestamp(String),

    #[error("`{key}` must be a boolean, got `{value}`")]
    InvalidFlag { key: &'static str, value: String },
}

/// The shape of the message posted for each record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Style {
    /// A single line of text.
    #[default]
    Simple,
    /// A card with facts and one section per error.
    Card,
}

impl FromStr for Style {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Style::Simple),
            "card" => Ok(Style::Card),
            _ => Err(ConfigError::UnknownStyle(s.to_string())),
        }
    }
}

/// The clock used for the `Timestamp` fact on cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimestampFormat {
    #[default]
    Utc,
    Local,
}

impl TimestampFormat {
    /// Formats the current time with [`TIMESTAMP_PATTERN`].
    pub fn now(self) -> String {
        match self {
            TimestampFormat::Utc => Utc::now().format(TIMESTAMP_PATTERN).to_string(),
            TimestampFormat::Local => Local::now().format(TIMESTAMP_PATTERN).to_string(),
        }
    }
}

impl FromStr for TimestampFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(TimestampFormat::Utc),
            "local" => Ok(TimestampFormat::Local),
            _ => Err(ConfigError::UnknownTimestamp(s.to_string())),
        }
    }
}

/// Everything the logger needs to render and deliver a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The webhook every message is posted to. Any secret is part of the url.
    pub url: String,
    /// Records below this severity are dropped.
    pub level: Severity,
    pub style: Style,
    /// Shown as the card title and as the prefix of simple messages.
    pub name: String,
    pub show_avatars: bool,
    pub show_severity_colour: bool,
    /// Whether a handled record should still be passed on to further handlers.
    pub bubble: bool,
    pub timestamp: TimestampFormat,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Config {
    /// A configuration posting to `url` with every other setting at its default.
    pub fn new<T>(url: T) -> Config
    where
        T: Into<String>,
    {
        Config {
            url: url.into(),
            level: Severity::Debug,
            style: Style::Simple,
            name: DEFAULT_NAME.to_string(),
            show_avatars: true,
            show_severity_colour: true,
            bubble: true,
            timestamp: TimestampFormat::Utc,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Reads the configuration from `TEAMS_LOGGER_*` environment variables.
    ///
    /// Only `TEAMS_LOGGER_URL` is required; anything unset keeps its default.
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`], but reads each variable through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(ENV_URL)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingUrl(ENV_URL))?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(url));
        }

        let mut config = Config::new(url);
        if let Some(level) = lookup(ENV_LEVEL) {
            config.level = level.parse()?;
        }
        if let Some(style) = lookup(ENV_STYLE) {
            config.style = style.parse()?;
        }
        if let Some(name) = lookup(ENV_NAME) {
            config.name = name;
        }
        if let Some(value) = lookup(ENV_SHOW_AVATARS) {
            config.show_avatars = parse_flag(ENV_SHOW_AVATARS, &value)?;
        }
        if let Some(value) = lookup(ENV_SHOW_SEVERITY_COLOUR) {
            config.show_severity_colour = parse_flag(ENV_SHOW_SEVERITY_COLOUR, &value)?;
        }
        if let Some(value) = lookup(ENV_BUBBLE) {
            config.bubble = parse_flag(ENV_BUBBLE, &value)?;
        }
        if let Some(timestamp) = lookup(ENV_TIMESTAMP) {
            config.timestamp = timestamp.parse()?;
        }
        Ok(config)
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: value.to_string(),
        }),
    }
}
