//! Application error types.

use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Slack error: {0}")]
    Slack(#[from] slack_client::SlackError),

    #[error("Bot error: {0}")]
    Bot(#[from] slackbot::BotError),
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;
