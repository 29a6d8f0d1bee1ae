//! Application configuration loaded from environment variables.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Slack configuration
    pub slack: SlackConfig,

    /// Bot configuration
    #[serde(default)]
    pub bot: BotConfig,

    /// PagerDuty on-call lookup (`?oncall`)
    #[serde(default)]
    pub pagerduty: PagerDutyConfig,

    /// OpenWeatherMap lookup (`?weather`)
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Jira issue creation (`?jiracreate`)
    #[serde(default)]
    pub jira: JiraConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackConfig {
    /// Bot token
    pub token: String,

    /// Web API base URL
    #[serde(default = "default_slack_api_url")]
    pub api_url: String,

    /// Web API request timeout
    #[serde(default = "default_slack_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PagerDutyConfig {
    /// API token; `?oncall` is disabled without one
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_pagerduty_api_url")]
    pub api_url: String,

    /// JSON file mapping channel names to escalation policies
    #[serde(default = "default_channels_file")]
    pub channels_file: PathBuf,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap app id; `?weather` is disabled without one
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_weather_api_url")]
    pub api_url: String,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraConfig {
    /// Jira base URL; `?jiracreate` is disabled without one
    #[serde(default)]
    pub base_url: Option<String>,

    /// Pre-encoded basic credential: base64(username:password)
    #[serde(default)]
    pub auth: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

/// Contents of the on-call channel file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OnCallChannels {
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

/// Escalation policy for one channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelConfig {
    /// Channel name, without the leading '#'
    pub name: String,
    pub escalation_policy_id: String,
}

// Default implementations
impl Default for BotConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for PagerDutyConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_pagerduty_api_url(),
            channels_file: default_channels_file(),
            timeout: default_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_weather_api_url(),
            timeout: default_timeout(),
        }
    }
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            auth: None,
            username: None,
            password: None,
            timeout: default_timeout(),
        }
    }
}

// Default value functions
fn default_slack_api_url() -> String {
    "https://slack.com/api".into()
}

fn default_slack_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_log_level() -> String {
    "info".into()
}

fn default_pagerduty_api_url() -> String {
    "https://api.pagerduty.com".into()
}

fn default_channels_file() -> PathBuf {
    PathBuf::from("./config/pagerduty-oncall.json")
}

fn default_weather_api_url() -> String {
    "http://api.openweathermap.org/data/2.5".into()
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

impl PagerDutyConfig {
    /// Read the channel to escalation policy mapping.
    pub fn load_channels(&self) -> Result<Vec<ChannelConfig>> {
        load_channels_file(&self.channels_file)
    }
}

fn load_channels_file(path: &Path) -> Result<Vec<ChannelConfig>> {
    let file: OnCallChannels = config::Config::builder()
        .add_source(config::File::from(path))
        .build()
        .with_context(|| format!("Error reading config file {}", path.display()))?
        .try_deserialize()
        .with_context(|| format!("Unable to decode {}", path.display()))?;

    Ok(file.channels)
}

impl JiraConfig {
    /// The basic credential to send, from `auth` or from `username`/`password`.
    pub fn basic_auth(&self) -> Option<String> {
        if let Some(auth) = &self.auth {
            return Some(auth.clone());
        }
        match (&self.username, &self.password) {
            (Some(user), Some(password)) => Some(STANDARD.encode(format!("{}:{}", user, password))),
            _ => None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_environment(config::Environment::default())
    }

    fn from_environment(environment: config::Environment) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(
                environment
                    .separator("__")
                    // Tokens and ids stay strings.
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
