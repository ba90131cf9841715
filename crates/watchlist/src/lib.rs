//! The set of watched channels, its persistence, and the administrative
//! commands that mutate it.
//! Persistent storage is a JSON array of channel names (`streamers.json`).

pub mod admin;
pub mod error;
pub mod list;
pub mod store;
pub mod store_file;
pub mod store_memory;

pub use {
    admin::{AdminCommand, CommandReply, WatchListAdmin},
    error::{Error, Result},
    list::{SharedWatchList, WatchList},
    store::WatchListStore,
};
