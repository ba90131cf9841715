use std::collections::HashMap;

use livewatch_common::ChannelId;

use crate::types::MessageId;

/// Which message currently announces each live channel.
///
/// At most one record per channel. Owned by the engine; nothing else writes
/// to it. Not persisted: after a restart every live channel simply gets a
/// fresh message.
#[derive(Debug, Default, Clone)]
pub struct MessageRegistry {
    records: HashMap<ChannelId, MessageId>,
}

impl MessageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel: &ChannelId) -> Option<MessageId> {
        self.records.get(channel).copied()
    }

    /// Returns the id this record replaced, if any.
    pub fn insert(&mut self, channel: ChannelId, id: MessageId) -> Option<MessageId> {
        self.records.insert(channel, id)
    }

    pub fn remove(&mut self, channel: &ChannelId) -> Option<MessageId> {
        self.records.remove(channel)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Detached copy of all records, sorted by channel.
    pub fn records(&self) -> Vec<(ChannelId, MessageId)> {
        let mut out: Vec<_> = self
            .records
            .iter()
            .map(|(c, id)| (c.clone(), *id))
            .collect();
        out.sort();
        out
    }
}
