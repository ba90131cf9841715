//! Live notification reconciliation.
//!
//! On every tick the engine compares which watched channels are live with
//! which notification messages exist, then creates, edits, re-posts or
//! deletes messages until the two agree. The platforms on either side are
//! reached through the [`LiveStatusSource`] and [`NotificationSurface`]
//! traits; [`fake`] provides in-memory versions of both.

pub mod engine;
pub mod error;
pub mod fake;
pub mod payload;
pub mod registry;
pub mod service;
pub mod source;
pub mod surface;
pub mod types;

pub use {
    engine::{Action, ChannelReport, ClockFn, ReconciliationEngine, RefreshPolicy, TickReport},
    error::{Error, ReconcileError, Result, SourceError, SurfaceError},
    payload::{Elapsed, build_payload},
    registry::MessageRegistry,
    service::{ReconcileService, ServiceStatus},
    source::LiveStatusSource,
    surface::NotificationSurface,
    types::{LiveSnapshot, MessageId, NotificationPayload, PostedMessage},
};
