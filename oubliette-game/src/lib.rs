//! # Oubliette Game Integration
//!
//! Glue between the engine's event-driven game loop and the AI core in
//! `oubliette-core`:
//!
//! - [`bridge::AiBridge`] — subscribes to engine events on the
//!   [`EventBus`](oubliette_core::EventBus) and translates them into AI
//!   manager calls (spawn registration, death cleanup, turn notifications)
//! - [`engine::Engine`] — a thin turn driver that owns the bus, the
//!   component store and the manager, and exposes the render query
//!
//! Shared state lives behind `Arc<parking_lot::Mutex<_>>` so the bridge's
//! event handlers and the turn driver can both reach it.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bridge;
pub mod engine;

pub use bridge::AiBridge;
pub use engine::Engine;

use tracing_subscriber::EnvFilter;

/// Initialize structured logging from `RUST_LOG`. Safe to call more than
/// once; later calls are ignored.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
