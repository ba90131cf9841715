//! Discord event handler for serenity.
//!
//! On the first `READY` it publishes the slash commands, clears out old
//! notifications and starts the reconcile service. Command interactions are
//! answered ephemerally from the [`WatchListAdmin`].

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use {
    livewatch_config::DiscordConfig,
    livewatch_notify::ReconcileService,
    livewatch_watchlist::WatchListAdmin,
    serenity::{
        all::{
            ActivityData, ChannelId, Command, CommandInteraction, Context,
            CreateInteractionResponse, CreateInteractionResponseMessage, EventHandler,
            GatewayIntents, Interaction, Ready,
        },
        async_trait,
    },
    tracing::{debug, info, warn},
};

use crate::{
    bot::notification_channel,
    commands,
    error::Result,
    purge,
};

pub const DEFAULT_ACTIVITY: &str = "🎮 Watching streams";

/// Startup behaviour taken from `[discord]`.
#[derive(Debug, Clone)]
pub struct HandlerSettings {
    pub notification_channel: ChannelId,
    pub purge_on_start: bool,
    pub purge_limit: u8,
    pub activity: String,
}

impl HandlerSettings {
    pub fn from_config(config: &DiscordConfig) -> Result<Self> {
        Ok(Self {
            notification_channel: notification_channel(config)?,
            purge_on_start: config.purge_on_start,
            purge_limit: purge::clamp_limit(config.purge_limit),
            activity: config
                .activity
                .clone()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ACTIVITY.to_string()),
        })
    }
}

/// Handler for Discord gateway events.
pub struct LivewatchHandler {
    settings: HandlerSettings,
    admin: Arc<WatchListAdmin>,
    service: Arc<ReconcileService>,
    started: AtomicBool,
}

impl LivewatchHandler {
    pub fn new(
        settings: HandlerSettings,
        admin: Arc<WatchListAdmin>,
        service: Arc<ReconcileService>,
    ) -> Self {
        Self {
            settings,
            admin,
            service,
            started: AtomicBool::new(false),
        }
    }

    /// Slash commands arrive as interactions; no privileged intents needed.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
    }

    async fn answer(&self, interaction: &CommandInteraction) -> String {
        let command = match commands::to_admin_command(interaction) {
            Ok(command) => command,
            Err(e) => return e.to_string(),
        };
        match self.admin.dispatch(command).await {
            Ok(reply) => reply.content,
            Err(e) => {
                warn!(command = %interaction.data.name, error = %e, "watch list command failed");
                format!("Could not update the watch list: {e}")
            },
        }
    }
}

#[async_trait]
impl EventHandler for LivewatchHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            "discord bot ready"
        );

        ctx.set_activity(Some(ActivityData::custom(self.settings.activity.clone())));

        match Command::set_global_commands(&ctx.http, commands::definitions()).await {
            Ok(registered) => debug!(count = registered.len(), "slash commands registered"),
            Err(e) => warn!(error = %e, "failed to register slash commands"),
        }

        // READY fires again after every reconnect.
        if self.started.swap(true, Ordering::SeqCst) {
            debug!("gateway reconnected, reconcile service already running");
            return;
        }

        if self.settings.purge_on_start {
            match purge::purge_own_messages(
                &ctx.http,
                self.settings.notification_channel,
                ready.user.id,
                self.settings.purge_limit,
            )
            .await
            {
                Ok(report) => info!(
                    inspected = report.inspected,
                    deleted = report.deleted,
                    failed = report.failed,
                    "old notifications purged"
                ),
                Err(e) => warn!(error = %e, "startup purge failed"),
            }
        }

        if let Err(e) = self.service.start().await {
            warn!(error = %e, "reconcile service did not start");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        debug!(command = %command.data.name, user = %command.user.name, "slash command received");

        let content = self.answer(&command).await;
        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(content)
                .ephemeral(true),
        );
        if let Err(e) = command.create_response(&ctx.http, response).await {
            warn!(error = %e, "failed to answer slash command");
        }
    }
}
