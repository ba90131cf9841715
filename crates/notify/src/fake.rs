//! In-memory source and surface for tests and dry runs. No network.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Mutex,
};

use {async_trait::async_trait, livewatch_common::ChannelId};

use crate::{
    error::{SourceError, SurfaceError},
    source::LiveStatusSource,
    surface::NotificationSurface,
    types::{LiveSnapshot, MessageId, NotificationPayload, PostedMessage},
};

#[derive(Debug, Clone)]
enum ChannelState {
    Live(LiveSnapshot),
    Failing(String),
}

/// Scripted [`LiveStatusSource`]. Channels not set live are offline.
#[derive(Default)]
pub struct FakeSource {
    channels: Mutex<HashMap<ChannelId, ChannelState>>,
    categories: Mutex<HashMap<String, String>>,
    queries: Mutex<Vec<ChannelId>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_live(&self, channel: &ChannelId, snapshot: LiveSnapshot) {
        self.lock_channels()
            .insert(channel.clone(), ChannelState::Live(snapshot));
    }

    pub fn set_offline(&self, channel: &ChannelId) {
        self.lock_channels().remove(channel);
    }

    /// Every query for `channel` fails until it is set live or offline again.
    pub fn set_failing(&self, channel: &ChannelId, reason: impl Into<String>) {
        self.lock_channels()
            .insert(channel.clone(), ChannelState::Failing(reason.into()));
    }

    pub fn set_category(&self, id: impl Into<String>, name: impl Into<String>) {
        self.categories
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.into(), name.into());
    }

    /// Channels queried so far, in order.
    pub fn queries(&self) -> Vec<ChannelId> {
        self.queries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn lock_channels(&self) -> std::sync::MutexGuard<'_, HashMap<ChannelId, ChannelState>> {
        self.channels.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl LiveStatusSource for FakeSource {
    async fn live_snapshot(
        &self,
        channel: &ChannelId,
    ) -> Result<Option<LiveSnapshot>, SourceError> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(channel.clone());
        match self.lock_channels().get(channel) {
            Some(ChannelState::Live(snapshot)) => Ok(Some(snapshot.clone())),
            Some(ChannelState::Failing(reason)) => Err(SourceError::message(reason.clone())),
            None => Ok(None),
        }
    }

    async fn category_name(&self, category_id: &str) -> Result<Option<String>, SourceError> {
        Ok(self
            .categories
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(category_id)
            .cloned())
    }
}

/// Call recorded by [`FakeSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceCall {
    Send(MessageId),
    Edit(MessageId),
    Delete(MessageId),
    Fetch(MessageId),
}

impl SurfaceCall {
    /// Whether the call changes what the channel shows.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Fetch(_))
    }
}

#[derive(Default)]
struct SurfaceState {
    next_id: u64,
    messages: BTreeMap<MessageId, NotificationPayload>,
    calls: Vec<SurfaceCall>,
    fail_sends: bool,
    fail_edits: bool,
    fail_deletes: bool,
    fail_fetches: bool,
}

/// In-memory [`NotificationSurface`] with sequential message ids.
#[derive(Default)]
pub struct FakeSurface {
    state: Mutex<SurfaceState>,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Remove a message behind the engine's back, as a moderator would.
    pub fn delete_externally(&self, id: MessageId) -> bool {
        self.lock().messages.remove(&id).is_some()
    }

    pub fn message(&self, id: MessageId) -> Option<NotificationPayload> {
        self.lock().messages.get(&id).cloned()
    }

    pub fn message_ids(&self) -> Vec<MessageId> {
        self.lock().messages.keys().copied().collect()
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.lock().calls.clone()
    }

    /// Calls other than fetches.
    pub fn mutations(&self) -> Vec<SurfaceCall> {
        self.lock()
            .calls
            .iter()
            .copied()
            .filter(SurfaceCall::is_mutation)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn fail_sends(&self, fail: bool) {
        self.lock().fail_sends = fail;
    }

    pub fn fail_edits(&self, fail: bool) {
        self.lock().fail_edits = fail;
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.lock().fail_deletes = fail;
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.lock().fail_fetches = fail;
    }
}

fn outage() -> SurfaceError {
    SurfaceError::message("simulated platform outage")
}

#[async_trait]
impl NotificationSurface for FakeSurface {
    async fn send(&self, payload: &NotificationPayload) -> Result<MessageId, SurfaceError> {
        let mut state = self.lock();
        if state.fail_sends {
            return Err(outage());
        }
        state.next_id += 1;
        let id = MessageId(state.next_id);
        state.messages.insert(id, payload.clone());
        state.calls.push(SurfaceCall::Send(id));
        Ok(id)
    }

    async fn edit(&self, id: MessageId, payload: &NotificationPayload) -> Result<(), SurfaceError> {
        let mut state = self.lock();
        state.calls.push(SurfaceCall::Edit(id));
        if state.fail_edits {
            return Err(outage());
        }
        match state.messages.get_mut(&id) {
            Some(existing) => {
                *existing = payload.clone();
                Ok(())
            },
            None => Err(SurfaceError::not_found(id)),
        }
    }

    async fn delete(&self, id: MessageId) -> Result<(), SurfaceError> {
        let mut state = self.lock();
        state.calls.push(SurfaceCall::Delete(id));
        if state.fail_deletes {
            return Err(outage());
        }
        match state.messages.remove(&id) {
            Some(_) => Ok(()),
            None => Err(SurfaceError::not_found(id)),
        }
    }

    async fn fetch(&self, id: MessageId) -> Result<PostedMessage, SurfaceError> {
        let mut state = self.lock();
        state.calls.push(SurfaceCall::Fetch(id));
        if state.fail_fetches {
            return Err(outage());
        }
        if state.messages.contains_key(&id) {
            Ok(PostedMessage { id })
        } else {
            Err(SurfaceError::not_found(id))
        }
    }
}
