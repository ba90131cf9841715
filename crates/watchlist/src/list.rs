use std::{
    collections::BTreeSet,
    sync::{Arc, RwLock},
};

use livewatch_common::ChannelId;

/// Watch list shared between the admin layer (writer) and the engine (reader).
///
/// Locked only for short synchronous sections, never across an `.await`.
pub type SharedWatchList = Arc<RwLock<WatchList>>;

/// Set of watched channels. Ordered so every pass visits channels in the
/// same sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchList {
    channels: BTreeSet<ChannelId>,
}

impl WatchList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the channel was already watched.
    pub fn insert(&mut self, channel: ChannelId) -> bool {
        self.channels.insert(channel)
    }

    /// Returns `false` when the channel was not watched.
    pub fn remove(&mut self, channel: &ChannelId) -> bool {
        self.channels.remove(channel)
    }

    pub fn contains(&self, channel: &ChannelId) -> bool {
        self.channels.contains(channel)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelId> {
        self.channels.iter()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Copy of the current members, taken once per reconciliation pass.
    pub fn snapshot(&self) -> Vec<ChannelId> {
        self.channels.iter().cloned().collect()
    }

    pub fn into_shared(self) -> SharedWatchList {
        Arc::new(RwLock::new(self))
    }
}

impl FromIterator<ChannelId> for WatchList {
    fn from_iter<I: IntoIterator<Item = ChannelId>>(iter: I) -> Self {
        Self {
            channels: iter.into_iter().collect(),
        }
    }
}
