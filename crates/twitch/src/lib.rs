//! Twitch Helix client implementing [`livewatch_notify::LiveStatusSource`].

pub mod client;
pub mod error;
pub mod helix;
mod token;

pub use {
    client::HelixClient,
    error::{Error, Result},
    helix::{HelixGame, HelixStream, HelixUser},
};
