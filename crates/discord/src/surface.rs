use std::sync::Arc;

use {
    async_trait::async_trait,
    livewatch_notify::{
        MessageId, NotificationPayload, NotificationSurface, PostedMessage, SurfaceError,
    },
    serenity::all::{ChannelId, CreateMessage, EditMessage, Http, MessageId as DiscordMessageId},
};

use crate::{embed::build_embed, error::is_not_found};

/// The notification channel, reached over the Discord REST API.
pub struct DiscordSurface {
    http: Arc<Http>,
    channel: ChannelId,
}

impl DiscordSurface {
    pub fn new(http: Arc<Http>, channel: ChannelId) -> Self {
        Self { http, channel }
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }
}

fn to_discord(id: MessageId) -> DiscordMessageId {
    DiscordMessageId::new(id.get())
}

fn map_error(action: &str, id: Option<MessageId>, err: serenity::Error) -> SurfaceError {
    match id {
        Some(id) if is_not_found(&err) => SurfaceError::not_found(id),
        _ => SurfaceError::platform(action, err),
    }
}

#[async_trait]
impl NotificationSurface for DiscordSurface {
    async fn send(&self, payload: &NotificationPayload) -> Result<MessageId, SurfaceError> {
        let message = self
            .channel
            .send_message(&self.http, CreateMessage::new().embed(build_embed(payload)))
            .await
            .map_err(|e| map_error("send notification", None, e))?;
        Ok(MessageId(message.id.get()))
    }

    async fn edit(&self, id: MessageId, payload: &NotificationPayload) -> Result<(), SurfaceError> {
        self.channel
            .edit_message(
                &self.http,
                to_discord(id),
                EditMessage::new().embed(build_embed(payload)),
            )
            .await
            .map_err(|e| map_error("edit notification", Some(id), e))?;
        Ok(())
    }

    async fn delete(&self, id: MessageId) -> Result<(), SurfaceError> {
        self.channel
            .delete_message(&self.http, to_discord(id))
            .await
            .map_err(|e| map_error("delete notification", Some(id), e))
    }

    async fn fetch(&self, id: MessageId) -> Result<PostedMessage, SurfaceError> {
        let message = self
            .channel
            .message(&self.http, to_discord(id))
            .await
            .map_err(|e| map_error("fetch notification", Some(id), e))?;
        Ok(PostedMessage {
            id: MessageId(message.id.get()),
        })
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        chrono::{TimeZone, Utc},
        rstest::rstest,
        serenity::all::HttpBuilder,
    };

    const CHANNEL: u64 = 111;
    const MESSAGE: u64 = 222;
    const UNKNOWN_MESSAGE: &str = r#"{"message":"Unknown Message","code":10008}"#;
    const MISSING_ACCESS: &str = r#"{"message":"Missing Access","code":50001}"#;

    fn message_path() -> String {
        format!("/api/v10/channels/{CHANNEL}/messages/{MESSAGE}")
    }

    fn surface_for(server: &mockito::ServerGuard) -> DiscordSurface {
        let http = HttpBuilder::new("test-token")
            .proxy(server.url())
            .ratelimiter_disabled(true)
            .build();
        DiscordSurface::new(Arc::new(http), ChannelId::new(CHANNEL))
    }

    fn payload() -> NotificationPayload {
        NotificationPayload {
            title: "Any% run".into(),
            url: "https://twitch.tv/alice".into(),
            author_name: "Alice is live on Twitch!".into(),
            author_icon_url: None,
            image_url: "https://cdn/alice-1920x1080.jpg?t=0".into(),
            viewers: "42".into(),
            category: "Just Chatting".into(),
            live_for: "1h30m".into(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).single().unwrap(),
            colour: 0x9146FF,
        }
    }

    #[tokio::test]
    async fn fetch_of_deleted_message_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _get = server
            .mock("GET", message_path().as_str())
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(UNKNOWN_MESSAGE)
            .create_async()
            .await;

        let err = surface_for(&server)
            .fetch(MessageId(MESSAGE))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SurfaceError::NotFound { message_id } if message_id == MessageId(MESSAGE)
        ));
    }

    #[tokio::test]
    async fn edit_and_delete_of_deleted_message_are_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _patch = server
            .mock("PATCH", message_path().as_str())
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(UNKNOWN_MESSAGE)
            .create_async()
            .await;
        let _delete = server
            .mock("DELETE", message_path().as_str())
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(UNKNOWN_MESSAGE)
            .create_async()
            .await;

        let surface = surface_for(&server);
        assert!(
            surface
                .edit(MessageId(MESSAGE), &payload())
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(surface.delete(MessageId(MESSAGE)).await.unwrap_err().is_not_found());
    }

    #[rstest]
    #[case(403, MISSING_ACCESS)]
    #[case(500, r#"{"message":"500: Internal Server Error","code":0}"#)]
    #[tokio::test]
    async fn other_statuses_are_platform_errors(#[case] status: usize, #[case] body: &str) {
        let mut server = mockito::Server::new_async().await;
        let _patch = server
            .mock("PATCH", message_path().as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let err = surface_for(&server)
            .edit(MessageId(MESSAGE), &payload())
            .await
            .unwrap_err();
        assert!(matches!(err, SurfaceError::Platform { .. }));
    }

    #[tokio::test]
    async fn send_never_reports_not_found() {
        let mut server = mockito::Server::new_async().await;
        let path = format!("/api/v10/channels/{CHANNEL}/messages");
        let _post = server
            .mock("POST", path.as_str())
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"Unknown Channel","code":10003}"#)
            .create_async()
            .await;

        let err = surface_for(&server).send(&payload()).await.unwrap_err();
        assert!(matches!(err, SurfaceError::Platform { .. }));
    }

    #[test]
    fn non_http_errors_are_platform_errors() {
        let err = map_error(
            "edit notification",
            Some(MessageId(MESSAGE)),
            serenity::Error::Other("gateway closed"),
        );
        assert!(matches!(err, SurfaceError::Platform { .. }));
        assert!(!is_not_found(&serenity::Error::Other("gateway closed")));
    }
}
