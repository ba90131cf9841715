use async_trait::async_trait;

use crate::{
    error::SurfaceError,
    types::{MessageId, NotificationPayload, PostedMessage},
};

/// The single chat destination that holds live notifications.
///
/// `edit` and `fetch` must report a missing message as
/// [`SurfaceError::NotFound`]. `delete` may either swallow that case or
/// report it; callers treat both the same.
#[async_trait]
pub trait NotificationSurface: Send + Sync {
    async fn send(&self, payload: &NotificationPayload) -> Result<MessageId, SurfaceError>;

    async fn edit(&self, id: MessageId, payload: &NotificationPayload) -> Result<(), SurfaceError>;

    async fn delete(&self, id: MessageId) -> Result<(), SurfaceError>;

    async fn fetch(&self, id: MessageId) -> Result<PostedMessage, SurfaceError>;
}
