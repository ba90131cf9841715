//! The reconciliation pass.
//!
//! Each call to [`ReconciliationEngine::reconcile`] is a complete, independent
//! pass: sweep records whose messages vanished, decide per watched channel,
//! then retire records for channels that are no longer watched. Failures are
//! contained per channel and collected into the returned [`TickReport`].

use std::sync::Arc;

use {
    chrono::{DateTime, Utc},
    livewatch_common::ChannelId,
    livewatch_watchlist::SharedWatchList,
    tracing::{debug, info, warn},
};

use crate::{
    error::ReconcileError,
    payload::{Elapsed, build_payload},
    registry::MessageRegistry,
    source::LiveStatusSource,
    surface::NotificationSurface,
    types::{MessageId, NotificationPayload},
};

/// Source of "now" for elapsed-time and payload timestamps.
pub type ClockFn = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// When a long-running broadcast gets a brand-new message instead of an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Re-post at every multiple of this many hours. `0` disables re-posting.
    pub interval_hours: u32,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self { interval_hours: 2 }
    }
}

impl RefreshPolicy {
    pub fn new(interval_hours: u32) -> Self {
        Self { interval_hours }
    }

    /// True only in the minute a refresh boundary is crossed.
    pub fn should_recreate(&self, elapsed: Elapsed) -> bool {
        let interval = u64::from(self.interval_hours);
        interval > 0 && elapsed.hours > 0 && elapsed.hours % interval == 0 && elapsed.minutes == 0
    }
}

/// What the engine did for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Offline and untracked.
    Idle,
    Created {
        message_id: MessageId,
    },
    Updated {
        message_id: MessageId,
    },
    /// Forced refresh: old message deleted, new one posted.
    Recreated {
        previous: MessageId,
        message_id: MessageId,
    },
    /// The tracked message was gone when editing; a new one was posted.
    Healed {
        previous: MessageId,
        message_id: MessageId,
    },
    Removed {
        message_id: MessageId,
    },
}

impl Action {
    /// The message announcing the channel after this action, if any.
    pub fn current_message(&self) -> Option<MessageId> {
        match self {
            Self::Created { message_id }
            | Self::Updated { message_id }
            | Self::Recreated { message_id, .. }
            | Self::Healed { message_id, .. } => Some(*message_id),
            Self::Idle | Self::Removed { .. } => None,
        }
    }
}

#[derive(Debug)]
pub struct ChannelReport {
    pub channel: ChannelId,
    pub outcome: Result<Action, ReconcileError>,
}

/// Result of one reconciliation pass.
#[derive(Debug)]
pub struct TickReport {
    pub started_at: DateTime<Utc>,
    /// Channels whose record was dropped because the message no longer existed.
    pub swept: Vec<ChannelId>,
    pub channels: Vec<ChannelReport>,
}

impl TickReport {
    pub fn failures(&self) -> impl Iterator<Item = &ChannelReport> {
        self.channels.iter().filter(|r| r.outcome.is_err())
    }

    pub fn outcome_for(&self, channel: &ChannelId) -> Option<&Result<Action, ReconcileError>> {
        self.channels
            .iter()
            .find(|r| &r.channel == channel)
            .map(|r| &r.outcome)
    }

    /// Shorthand for a successful outcome.
    pub fn action_for(&self, channel: &ChannelId) -> Option<Action> {
        match self.outcome_for(channel) {
            Some(Ok(action)) => Some(*action),
            _ => None,
        }
    }
}

/// Keeps exactly one live notification per live watched channel.
pub struct ReconciliationEngine {
    watch_list: SharedWatchList,
    source: Arc<dyn LiveStatusSource>,
    surface: Arc<dyn NotificationSurface>,
    registry: MessageRegistry,
    policy: RefreshPolicy,
    clock: ClockFn,
}

impl ReconciliationEngine {
    pub fn new(
        watch_list: SharedWatchList,
        source: Arc<dyn LiveStatusSource>,
        surface: Arc<dyn NotificationSurface>,
    ) -> Self {
        Self {
            watch_list,
            source,
            surface,
            registry: MessageRegistry::new(),
            policy: RefreshPolicy::default(),
            clock: Arc::new(Utc::now),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RefreshPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: ClockFn) -> Self {
        self.clock = clock;
        self
    }

    pub fn registry(&self) -> &MessageRegistry {
        &self.registry
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    pub fn watch_list(&self) -> &SharedWatchList {
        &self.watch_list
    }

    /// Run one full pass.
    pub async fn reconcile(&mut self) -> TickReport {
        let started_at = (self.clock)();
        let swept = self.sweep().await;

        // Fixed for the whole pass; admin edits land on the next tick.
        let watched = self.watched_channels();
        let mut channels = Vec::with_capacity(watched.len());
        for channel in &watched {
            let outcome = self.reconcile_channel(channel).await;
            log_outcome(channel, &outcome);
            channels.push(ChannelReport {
                channel: channel.clone(),
                outcome,
            });
        }

        let orphans: Vec<ChannelId> = self
            .registry
            .records()
            .into_iter()
            .map(|(channel, _)| channel)
            .filter(|channel| watched.binary_search(channel).is_err())
            .collect();
        for channel in orphans {
            debug!(channel = %channel, "channel no longer watched, retiring its notification");
            let outcome = self.retire(&channel).await;
            log_outcome(&channel, &outcome);
            channels.push(ChannelReport { channel, outcome });
        }

        let failed = channels.iter().filter(|r| r.outcome.is_err()).count();
        debug!(
            channels = channels.len(),
            swept = swept.len(),
            failed,
            tracked = self.registry.len(),
            "reconcile pass finished"
        );

        TickReport {
            started_at,
            swept,
            channels,
        }
    }

    fn watched_channels(&self) -> Vec<ChannelId> {
        self.watch_list
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .snapshot()
    }

    /// Drop records whose message was deleted by someone else.
    async fn sweep(&mut self) -> Vec<ChannelId> {
        let mut swept = Vec::new();
        for (channel, message_id) in self.registry.records() {
            match self.surface.fetch(message_id).await {
                Ok(_) => {},
                Err(e) if e.is_not_found() => {
                    info!(channel = %channel, message_id = %message_id, "notification deleted externally, dropping record");
                    self.registry.remove(&channel);
                    swept.push(channel);
                },
                Err(e) => {
                    warn!(channel = %channel, message_id = %message_id, error = %e, "could not verify notification");
                },
            }
        }
        swept
    }

    async fn reconcile_channel(&mut self, channel: &ChannelId) -> Result<Action, ReconcileError> {
        let snapshot = self
            .source
            .live_snapshot(channel)
            .await
            .map_err(|e| ReconcileError::query(channel, e))?;
        let Some(mut snapshot) = snapshot else {
            return self.retire(channel).await;
        };

        if snapshot.category_name.is_none()
            && let Some(category_id) = snapshot.category_id.as_deref()
        {
            snapshot.category_name = self
                .source
                .category_name(category_id)
                .await
                .map_err(|e| ReconcileError::query(channel, e))?;
        }

        let now = (self.clock)();
        let elapsed = Elapsed::between(snapshot.started_at, now);
        let payload = build_payload(channel, &snapshot, elapsed, now);

        let Some(previous) = self.registry.get(channel) else {
            let message_id = self.post(channel, &payload).await?;
            return Ok(Action::Created { message_id });
        };

        if self.policy.should_recreate(elapsed) {
            match self.surface.delete(previous).await {
                Ok(()) => {},
                Err(e) if e.is_not_found() => {
                    debug!(channel = %channel, message_id = %previous, "message already gone before refresh");
                },
                Err(e) => return Err(ReconcileError::delete(previous, e)),
            }
            self.registry.remove(channel);
            let message_id = self.post(channel, &payload).await?;
            return Ok(Action::Recreated {
                previous,
                message_id,
            });
        }

        match self.surface.edit(previous, &payload).await {
            Ok(()) => Ok(Action::Updated {
                message_id: previous,
            }),
            Err(e) if e.is_not_found() => {
                self.registry.remove(channel);
                let message_id = self.post(channel, &payload).await?;
                Ok(Action::Healed {
                    previous,
                    message_id,
                })
            },
            Err(e) => Err(ReconcileError::edit(previous, e)),
        }
    }

    async fn post(
        &mut self,
        channel: &ChannelId,
        payload: &NotificationPayload,
    ) -> Result<MessageId, ReconcileError> {
        let message_id = self
            .surface
            .send(payload)
            .await
            .map_err(ReconcileError::send)?;
        self.registry.insert(channel.clone(), message_id);
        Ok(message_id)
    }

    /// Remove the channel's notification. The record is dropped even when the
    /// delete fails so a dead id is never edited again.
    async fn retire(&mut self, channel: &ChannelId) -> Result<Action, ReconcileError> {
        let Some(message_id) = self.registry.remove(channel) else {
            return Ok(Action::Idle);
        };
        match self.surface.delete(message_id).await {
            Ok(()) => Ok(Action::Removed { message_id }),
            Err(e) if e.is_not_found() => Ok(Action::Removed { message_id }),
            Err(e) => Err(ReconcileError::delete(message_id, e)),
        }
    }
}

fn log_outcome(channel: &ChannelId, outcome: &Result<Action, ReconcileError>) {
    match outcome {
        Ok(Action::Idle) => {},
        Ok(Action::Created { message_id }) => {
            info!(channel = %channel, message_id = %message_id, "channel went live, notification posted");
        },
        Ok(Action::Updated { message_id }) => {
            debug!(channel = %channel, message_id = %message_id, "notification updated");
        },
        Ok(Action::Recreated {
            previous,
            message_id,
        }) => {
            info!(channel = %channel, previous = %previous, message_id = %message_id, "notification refreshed");
        },
        Ok(Action::Healed {
            previous,
            message_id,
        }) => {
            info!(channel = %channel, previous = %previous, message_id = %message_id, "notification was missing, posted a new one");
        },
        Ok(Action::Removed { message_id }) => {
            info!(channel = %channel, message_id = %message_id, "channel offline, notification removed");
        },
        Err(e) => {
            warn!(channel = %channel, error = %e, "reconcile failed for channel");
        },
    }
}
