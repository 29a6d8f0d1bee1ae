//! Weather command - current conditions for a US zip code.

use crate::commands::{check_status, UpstreamError};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use slackbot::{BotResult, CommandHandler, Invocation, ReplySink};
use std::time::Duration;
use tracing::{instrument, warn};

pub const TRIGGER: &str = "?weather";
pub const DESCRIPTION: &str = "Usage: ?weather zipcode";

pub struct WeatherHandler {
    client: Client,
    api_url: String,
    api_key: SecretString,
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    name: String,
    #[serde(default)]
    weather: Vec<Condition>,
    main: Readings,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct Readings {
    /// Kelvin
    temp: f64,
    humidity: f64,
}

impl WeatherResponse {
    fn summary(&self) -> String {
        let description = self
            .weather
            .first()
            .map(|c| c.description.as_str())
            .unwrap_or_default();

        format!(
            "Weather in {}: {}, {}°F, {}% humidity",
            self.name,
            description,
            kelvin_to_fahrenheit(self.main.temp) as i64,
            self.main.humidity as i64
        )
    }
}

fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    1.8 * (kelvin - 273.0) + 32.0
}

impl WeatherHandler {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: SecretString::new(api_key.into()),
        })
    }

    #[instrument(skip(self))]
    async fn current(&self, zip: &str) -> Result<WeatherResponse, UpstreamError> {
        let response = self
            .client
            .get(format!("{}/weather", self.api_url))
            .query(&[("zip", zip), ("appid", self.api_key.expose_secret().as_str())])
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }
}

#[async_trait]
impl CommandHandler for WeatherHandler {
    async fn handle(&self, reply: &dyn ReplySink, invocation: &Invocation) -> BotResult<()> {
        let Some(zip) = invocation.first_arg() else {
            return reply.reply(&invocation.channel_id, DESCRIPTION).await;
        };

        let text = match self.current(zip).await {
            Ok(weather) => weather.summary(),
            Err(e) => {
                warn!("Weather lookup for {} failed: {}", zip, e);
                match e.message() {
                    Some(message) => format!("Could not fetch weather for {}: {}", zip, message),
                    None => format!("Could not fetch weather for {}", zip),
                }
            }
        };

        reply.reply(&invocation.channel_id, &text).await
    }
}
