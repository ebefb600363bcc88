//! # Oubliette AI Core
//!
//! Game-agnostic AI coordination layer for a tile-based roguelike.
//!
//! The crate is organised around a small number of cooperating parts:
//!
//! - [`store::ComponentStore`] — entity/component registry with indexed
//!   capability queries
//! - [`events::EventBus`] — publish/subscribe dispatch with cancellation and
//!   bounded history; [`events::ai`] layers typed AI events on top
//! - [`config::ConfigStore`] — hot-reloadable JSON definitions for factions,
//!   archetypes and behavior trees
//! - [`behavior`] — two interchangeable behavior execution systems (a cheap
//!   timer-driven selector and a personality/memory-driven tree interpreter)
//! - [`manager::AiManager`] — the coordination hub tying it all together
//!
//! Everything here runs single-threaded and cooperatively: one AI tick drains
//! queued events and updates registered systems in priority order. The only
//! background activity is the config file watcher, which merely enqueues
//! change notifications for the main loop to drain.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod behavior;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod faction;
pub mod manager;
pub mod metrics;
pub mod store;
pub mod types;

pub use config::ConfigStore;
pub use error::{AiError, Result};
pub use events::EventBus;
pub use manager::AiManager;
pub use store::ComponentStore;
pub use types::{AiState, EntityId, Location};
