use {async_trait::async_trait, livewatch_common::ChannelId};

use crate::{error::SourceError, types::LiveSnapshot};

/// Reports whether a channel is broadcasting.
#[async_trait]
pub trait LiveStatusSource: Send + Sync {
    /// `Ok(None)` when the channel is offline or unknown to the platform.
    async fn live_snapshot(&self, channel: &ChannelId)
    -> Result<Option<LiveSnapshot>, SourceError>;

    /// Resolve a category id to its display name.
    async fn category_name(&self, category_id: &str) -> Result<Option<String>, SourceError>;
}
