use std::error::Error as StdError;

use {livewatch_common::ChannelId, thiserror::Error};

use crate::types::MessageId;

/// Failure reported by a [`LiveStatusSource`](crate::LiveStatusSource).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{message}")]
    Message { message: String },

    #[error("{context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl SourceError {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Failure reported by a [`NotificationSurface`](crate::NotificationSurface).
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The message does not exist (anymore).
    #[error("message {message_id} not found")]
    NotFound { message_id: MessageId },

    #[error("{message}")]
    Message { message: String },

    #[error("{context}: {source}")]
    Platform {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl SurfaceError {
    #[must_use]
    pub fn not_found(message_id: MessageId) -> Self {
        Self::NotFound { message_id }
    }

    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn platform(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Platform {
            context: context.into(),
            source: Box::new(source),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Why one channel could not be reconciled during a tick.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("live status query for {channel} failed: {source}")]
    PlatformQuery {
        channel: ChannelId,
        #[source]
        source: SourceError,
    },

    #[error("sending notification failed: {source}")]
    Send {
        #[source]
        source: SurfaceError,
    },

    #[error("editing message {message_id} failed: {source}")]
    Edit {
        message_id: MessageId,
        #[source]
        source: SurfaceError,
    },

    #[error("deleting message {message_id} failed: {source}")]
    Delete {
        message_id: MessageId,
        #[source]
        source: SurfaceError,
    },
}

impl ReconcileError {
    pub(crate) fn query(channel: &ChannelId, source: SourceError) -> Self {
        Self::PlatformQuery {
            channel: channel.clone(),
            source,
        }
    }

    pub(crate) fn send(source: SurfaceError) -> Self {
        Self::Send { source }
    }

    pub(crate) fn edit(message_id: MessageId, source: SurfaceError) -> Self {
        Self::Edit { message_id, source }
    }

    pub(crate) fn delete(message_id: MessageId, source: SurfaceError) -> Self {
        Self::Delete { message_id, source }
    }
}

/// Scheduler errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("reconcile service is already running")]
    AlreadyRunning,
}

pub type Result<T> = std::result::Result<T, Error>;
