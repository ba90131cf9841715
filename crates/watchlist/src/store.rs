//! Persistence trait for the watch list.

use async_trait::async_trait;

use crate::{Result, list::WatchList};

/// Durable backend for the watched channel set.
#[async_trait]
pub trait WatchListStore: Send + Sync {
    async fn load(&self) -> Result<WatchList>;
    async fn save(&self, list: &WatchList) -> Result<()>;
}
