//! Types and error helpers shared across the livewatch crates.

pub mod error;
pub mod types;

pub use {error::FromMessage, types::ChannelId};
