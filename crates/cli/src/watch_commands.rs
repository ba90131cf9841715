use std::sync::Arc;

use {
    anyhow::Result,
    clap::Subcommand,
    livewatch_config::LivewatchConfig,
    livewatch_watchlist::{AdminCommand, WatchListAdmin, store_file::FileStore},
};

/// Offline edits. A running bot picks them up on its next start.
#[derive(Subcommand)]
pub enum WatchAction {
    /// Start watching a Twitch channel.
    Add { name: String },
    /// Stop watching a Twitch channel.
    Remove { name: String },
    /// Show the watched channels.
    List,
}

impl From<WatchAction> for AdminCommand {
    fn from(action: WatchAction) -> Self {
        match action {
            WatchAction::Add { name } => Self::Add(name),
            WatchAction::Remove { name } => Self::Remove(name),
            WatchAction::List => Self::List,
        }
    }
}

pub async fn handle_watch(action: WatchAction, config: &LivewatchConfig) -> Result<()> {
    let store = Arc::new(FileStore::new(&config.watch.list_path));
    let admin = WatchListAdmin::load(store).await?;
    let reply = admin.dispatch(action.into()).await?;
    println!("{}", to_plain_text(&reply.content));
    Ok(())
}

/// Strip the Discord markdown used in replies.
fn to_plain_text(content: &str) -> String {
    content.replace("**", "").replace("\\_", "_")
}
