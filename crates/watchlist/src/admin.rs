//! Administrative vocabulary over the watch list: add, remove, list.
//!
//! Every mutation is validated against current membership, persisted, and
//! answered with a reply meant only for the administrator who issued it.

use std::sync::Arc;

use {
    livewatch_common::ChannelId,
    tokio::sync::Mutex,
    tracing::{info, warn},
};

use crate::{
    Error, Result,
    list::{SharedWatchList, WatchList},
    store::WatchListStore,
};

pub const ADD_COMMAND: &str = "addstreamer";
pub const REMOVE_COMMAND: &str = "removestreamer";
pub const LIST_COMMAND: &str = "liststreamers";

/// Parsed administrative command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Add(String),
    Remove(String),
    List,
}

impl AdminCommand {
    /// Map a command name and its optional argument to a command.
    pub fn from_parts(name: &str, arg: Option<&str>) -> Result<Self> {
        let require_arg = || {
            arg.map(str::to_string)
                .ok_or_else(|| Error::message(format!("/{name} needs a channel name")))
        };
        match name {
            ADD_COMMAND => Ok(Self::Add(require_arg()?)),
            REMOVE_COMMAND => Ok(Self::Remove(require_arg()?)),
            LIST_COMMAND => Ok(Self::List),
            other => Err(Error::unknown_command(other)),
        }
    }
}

/// User-visible answer to an administrative command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub content: String,
    /// `false` when the command was refused (duplicate, missing entry).
    pub accepted: bool,
}

impl CommandReply {
    fn accepted(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            accepted: true,
        }
    }

    fn rejected(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            accepted: false,
        }
    }
}

/// Applies administrative commands to the shared watch list and persists
/// the result after every mutation.
pub struct WatchListAdmin {
    list: SharedWatchList,
    store: Arc<dyn WatchListStore>,
    // Serializes copy-persist-publish sequences.
    write_lock: Mutex<()>,
}

impl WatchListAdmin {
    pub fn new(list: SharedWatchList, store: Arc<dyn WatchListStore>) -> Self {
        Self {
            list,
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Load the persisted list and wrap it for sharing with the engine.
    pub async fn load(store: Arc<dyn WatchListStore>) -> Result<Self> {
        let list = store.load().await?;
        info!(count = list.len(), "watch list loaded");
        Ok(Self::new(list.into_shared(), store))
    }

    pub fn shared(&self) -> SharedWatchList {
        Arc::clone(&self.list)
    }

    pub async fn dispatch(&self, command: AdminCommand) -> Result<CommandReply> {
        match command {
            AdminCommand::Add(name) => self.add(&name).await,
            AdminCommand::Remove(name) => self.remove(&name).await,
            AdminCommand::List => Ok(self.list()),
        }
    }

    pub async fn add(&self, raw: &str) -> Result<CommandReply> {
        let channel = ChannelId::parse(raw).ok_or_else(|| Error::invalid_channel(raw))?;
        let _guard = self.write_lock.lock().await;

        let mut updated = self.current();
        if !updated.insert(channel.clone()) {
            return Ok(CommandReply::rejected(format!(
                "{} is already being watched.",
                channel.escaped()
            )));
        }
        if let Err(e) = self.store.save(&updated).await {
            warn!(channel = %channel, error = %e, "failed to persist watch list, add dropped");
            return Err(e);
        }
        self.publish(updated);

        info!(channel = %channel, "channel added to watch list");
        Ok(CommandReply::accepted(format!(
            "Added {} to the watch list.",
            channel.escaped()
        )))
    }

    pub async fn remove(&self, raw: &str) -> Result<CommandReply> {
        let channel = ChannelId::parse(raw).ok_or_else(|| Error::invalid_channel(raw))?;
        let _guard = self.write_lock.lock().await;

        let mut updated = self.current();
        if !updated.remove(&channel) {
            return Ok(CommandReply::rejected(format!(
                "{} is not on the watch list.",
                channel.escaped()
            )));
        }
        if let Err(e) = self.store.save(&updated).await {
            warn!(channel = %channel, error = %e, "failed to persist watch list, remove dropped");
            return Err(e);
        }
        self.publish(updated);

        info!(channel = %channel, "channel removed from watch list");
        Ok(CommandReply::accepted(format!(
            "Removed {} from the watch list.",
            channel.escaped()
        )))
    }

    /// Working copy for a mutation. Callers hold `write_lock`.
    fn current(&self) -> WatchList {
        self.list.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make a persisted list visible to readers.
    fn publish(&self, list: WatchList) {
        *self.list.write().unwrap_or_else(|e| e.into_inner()) = list;
    }

    pub fn list(&self) -> CommandReply {
        let list = self.list.read().unwrap_or_else(|e| e.into_inner());
        CommandReply::accepted(render_list(&list))
    }
}

fn render_list(list: &WatchList) -> String {
    if list.is_empty() {
        return "No channels are being watched.".to_string();
    }
    let lines: Vec<String> = list.iter().map(|c| format!("• {}", c.escaped())).collect();
    format!(
        "**Watched channels ({}):**\n{}",
        list.len(),
        lines.join("\n")
    )
}
