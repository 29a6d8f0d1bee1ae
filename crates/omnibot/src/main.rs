//! Omnibot - Main entry point.

use anyhow::Context;
use omnibot::commands;
use omnibot::config::Config;
use omnibot::error::AppResult;
use slack_client::SlackClient;
use slackbot::Bot;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.bot.log_level);

    info!("Starting omnibot...");

    let slack = SlackClient::new(&config.slack.api_url, &config.slack.token, config.slack.timeout)
        .context("Failed to create Slack client")?;

    // Credential check
    let identity = match slack.auth_test().await {
        Ok(identity) => identity,
        Err(e) => {
            error!("Slack auth.test failed: {}", e);
            return Err(e.into());
        }
    };
    info!(
        "Authenticated as @{} ({}) on {}",
        identity.user,
        identity.user_id,
        identity.team.as_deref().unwrap_or("unknown team")
    );

    let mut bot = Bot::new(Arc::new(slack));
    commands::register(&mut bot, &config)?;

    info!("Registered {} commands", bot.registry().len());
    info!("Listening for messages...");

    tokio::select! {
        result = bot.run() => {
            if let Err(e) = &result {
                error!("Bot stopped: {}", e);
            }
            result?;
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("Shutting down...");
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
