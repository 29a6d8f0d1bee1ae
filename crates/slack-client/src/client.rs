//! Slack Web API client.

use crate::error::SlackError;
use crate::types::*;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Page size requested from cursor-paginated endpoints.
const PAGE_LIMIT: usize = 200;

/// Maximum pages fetched per listing (50 x 200 = 10,000 entries).
const MAX_PAGES: usize = 50;

/// Slack Web API client.
///
/// The bot token is held as a `SecretString` and sent as a bearer credential.
#[derive(Clone)]
pub struct SlackClient {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl SlackClient {
    /// Create a new Slack client.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SlackError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: SecretString::new(token.into()),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    /// Verify the token and return the identity it belongs to.
    #[instrument(skip(self))]
    pub async fn auth_test(&self) -> Result<Identity, SlackError> {
        let response = self
            .client
            .post(self.url("auth.test"))
            .bearer_auth(self.token.expose_secret())
            .send()
            .await?;

        self.parse("auth.test", response).await
    }

    /// Start a real-time session and return its WebSocket URL.
    #[instrument(skip(self))]
    pub async fn rtm_connect(&self) -> Result<RtmConnect, SlackError> {
        let response = self
            .client
            .get(self.url("rtm.connect"))
            .bearer_auth(self.token.expose_secret())
            .send()
            .await?;

        self.parse("rtm.connect", response).await
    }

    /// List all public channels and private groups visible to the bot.
    #[instrument(skip(self))]
    pub async fn list_channels(&self) -> Result<Vec<Channel>, SlackError> {
        let channels = self
            .fetch_all(
                "conversations.list",
                &[
                    ("types", "public_channel,private_channel"),
                    ("exclude_archived", "true"),
                ],
                |page: ConversationsPage| (page.channels, page.response_metadata.cursor()),
            )
            .await?;

        debug!("Fetched {} channels", channels.len());
        Ok(channels)
    }

    /// List all workspace members.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, SlackError> {
        let users = self
            .fetch_all("users.list", &[], |page: UsersPage| {
                (page.members, page.response_metadata.cursor())
            })
            .await?;

        debug!("Fetched {} users", users.len());
        Ok(users)
    }

    /// Post a message to a channel.
    #[instrument(skip(self, text))]
    pub async fn post_message(&self, channel: &str, text: &str) -> Result<(), SlackError> {
        let request = PostMessageRequest { channel, text };

        let response = self
            .client
            .post(self.url("chat.postMessage"))
            .bearer_auth(self.token.expose_secret())
            .json(&request)
            .send()
            .await?;

        let _: Value = self.parse("chat.postMessage", response).await?;
        debug!("Posted message to {}", channel);
        Ok(())
    }

    /// Walk a cursor-paginated listing until the cursor runs out.
    async fn fetch_all<P, T, F>(
        &self,
        method: &str,
        params: &[(&str, &str)],
        extract: F,
    ) -> Result<Vec<T>, SlackError>
    where
        P: DeserializeOwned,
        F: Fn(P) -> (Vec<T>, Option<String>),
    {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        for page in 1..=MAX_PAGES {
            let mut query: Vec<(&str, String)> = params
                .iter()
                .map(|(k, v)| (*k, (*v).to_string()))
                .collect();
            query.push(("limit", PAGE_LIMIT.to_string()));
            if let Some(next) = &cursor {
                query.push(("cursor", next.clone()));
            }

            let response = self
                .client
                .get(self.url(method))
                .bearer_auth(self.token.expose_secret())
                .query(&query)
                .send()
                .await?;

            let (batch, next) = extract(self.parse(method, response).await?);
            items.extend(batch);

            cursor = next;
            if cursor.is_none() {
                break;
            }
            if page == MAX_PAGES {
                warn!(method, pages = MAX_PAGES, "Page limit reached; listing may be incomplete");
            }
        }

        Ok(items)
    }

    /// Check HTTP status and the `ok` flag, then decode the payload.
    async fn parse<T: DeserializeOwned>(
        &self,
        method: &str,
        response: Response,
    ) -> Result<T, SlackError> {
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SlackError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SlackError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        if body.get("ok").and_then(Value::as_bool) != Some(true) {
            let error = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string();
            warn!(method, error = %error, "Slack API call failed");
            return Err(SlackError::Api(error));
        }

        Ok(serde_json::from_value(body)?)
    }
}
