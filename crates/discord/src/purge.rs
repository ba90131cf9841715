//! Startup cleanup of notifications left behind by a previous run.

use {
    livewatch_config::schema::MAX_PURGE_LIMIT,
    serenity::all::{ChannelId, GetMessages, Http, MessageId, UserId},
    tracing::{debug, warn},
};

use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub inspected: usize,
    pub deleted: usize,
    pub failed: usize,
}

/// Discord returns at most 100 messages per page.
pub fn clamp_limit(limit: u8) -> u8 {
    limit.clamp(1, MAX_PURGE_LIMIT)
}

/// Ids of the messages authored by `bot`, in input order.
pub fn own_messages(
    messages: impl IntoIterator<Item = (UserId, MessageId)>,
    bot: UserId,
) -> Vec<MessageId> {
    messages
        .into_iter()
        .filter(|(author, _)| *author == bot)
        .map(|(_, id)| id)
        .collect()
}

/// Delete the bot's own messages among the last `limit` in `channel`.
/// Individual delete failures are logged and counted.
pub async fn purge_own_messages(
    http: &Http,
    channel: ChannelId,
    bot: UserId,
    limit: u8,
) -> Result<PurgeReport> {
    let messages = channel
        .messages(http, GetMessages::new().limit(clamp_limit(limit)))
        .await?;
    let mut report = PurgeReport {
        inspected: messages.len(),
        ..PurgeReport::default()
    };

    let own = own_messages(messages.iter().map(|m| (m.author.id, m.id)), bot);
    for id in own {
        match channel.delete_message(http, id).await {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                warn!(message_id = %id, error = %e, "failed to delete old notification");
                report.failed += 1;
            },
        }
    }
    debug!(channel = %channel, ?report, "purge finished");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(50, 50)]
    #[case(100, 100)]
    #[case(250, 100)]
    fn limit_is_clamped(#[case] raw: u8, #[case] expected: u8) {
        assert_eq!(clamp_limit(raw), expected);
    }

    #[test]
    fn only_the_bots_messages_are_selected() {
        let bot = UserId::new(10);
        let someone = UserId::new(20);
        let messages = vec![
            (bot, MessageId::new(1)),
            (someone, MessageId::new(2)),
            (bot, MessageId::new(3)),
        ];
        assert_eq!(own_messages(messages, bot), vec![MessageId::new(1), MessageId::new(3)]);
    }
}
