//! Startup snapshot of channel and user names.

use crate::error::{BotError, BotResult};
use async_trait::async_trait;
use slack_client::{Channel, SlackClient, User};
use std::collections::HashMap;
use tracing::info;

/// Source of the channel and user listings.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    async fn list_channels(&self) -> BotResult<Vec<Channel>>;
    async fn list_users(&self) -> BotResult<Vec<User>>;
}

#[async_trait]
impl DirectorySource for SlackClient {
    async fn list_channels(&self) -> BotResult<Vec<Channel>> {
        SlackClient::list_channels(self)
            .await
            .map_err(|e| BotError::Directory(format!("error fetching channels: {}", e)))
    }

    async fn list_users(&self) -> BotResult<Vec<User>> {
        SlackClient::list_users(self)
            .await
            .map_err(|e| BotError::Directory(format!("error fetching users: {}", e)))
    }
}

/// Id to name mappings, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    channels: HashMap<String, String>,
    users: HashMap<String, String>,
}

impl Directory {
    /// Fetch channels and users. Any failure is returned as-is; there is no retry.
    pub async fn load(source: &dyn DirectorySource) -> BotResult<Self> {
        let channels = source.list_channels().await?;
        let users = source.list_users().await?;

        let directory = Self::from_parts(channels, users);
        info!(
            channels = directory.channel_count(),
            users = directory.user_count(),
            "Directory loaded"
        );
        Ok(directory)
    }

    pub fn from_parts(
        channels: impl IntoIterator<Item = Channel>,
        users: impl IntoIterator<Item = User>,
    ) -> Self {
        Self {
            channels: channels.into_iter().map(|c| (c.id, c.name)).collect(),
            users: users.into_iter().map(|u| (u.id, u.name)).collect(),
        }
    }

    /// Channel name for an id, or `""` if unknown.
    pub fn channel_name(&self, id: &str) -> &str {
        self.channels.get(id).map(String::as_str).unwrap_or_default()
    }

    /// User name for an id, or `""` if unknown.
    pub fn user_name(&self, id: &str) -> &str {
        self.users.get(id).map(String::as_str).unwrap_or_default()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticSource {
        fail_users: bool,
    }

    #[async_trait]
    impl DirectorySource for StaticSource {
        async fn list_channels(&self) -> BotResult<Vec<Channel>> {
            Ok(vec![
                Channel {
                    id: "C1".into(),
                    name: "general".into(),
                },
                Channel {
                    id: "G1".into(),
                    name: "secret-ops".into(),
                },
            ])
        }

        async fn list_users(&self) -> BotResult<Vec<User>> {
            if self.fail_users {
                return Err(BotError::Directory("users unavailable".into()));
            }
            Ok(vec![User {
                id: "U1".into(),
                name: "alice".into(),
            }])
        }
    }

    #[tokio::test]
    async fn test_load_and_lookup() {
        let directory = Directory::load(&StaticSource { fail_users: false })
            .await
            .unwrap();

        assert_eq!(directory.channel_name("C1"), "general");
        assert_eq!(directory.channel_name("G1"), "secret-ops");
        assert_eq!(directory.user_name("U1"), "alice");
        assert_eq!(directory.channel_count(), 2);
        assert_eq!(directory.user_count(), 1);
    }

    #[tokio::test]
    async fn test_load_failure_is_returned() {
        let result = Directory::load(&StaticSource { fail_users: true }).await;
        assert!(matches!(result, Err(BotError::Directory(_))));
    }

    #[test]
    fn test_unknown_ids_resolve_empty() {
        let directory = Directory::from_parts(
            vec![Channel {
                id: "C1".into(),
                name: "general".into(),
            }],
            vec![],
        );

        assert_eq!(directory.channel_name("C999"), "");
        assert_eq!(directory.channel_name(""), "");
        assert_eq!(directory.user_name("U999"), "");
    }
}
