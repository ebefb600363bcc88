//! Error types for the AI core.

use std::path::PathBuf;

use thiserror::Error;

use crate::components::ComponentKind;
use crate::types::EntityId;

/// Top-level error type for all AI core operations.
#[derive(Error, Debug)]
pub enum AiError {
    /// A configuration file does not exist under the config root.
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path relative to the config root.
        path: PathBuf,
    },

    /// A configuration file exists but is not valid JSON (or has the wrong shape).
    #[error("failed to parse configuration {path}: {source}")]
    ConfigParse {
        /// Path relative to the config root.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// I/O failure while reading a configuration file.
    #[error("i/o error reading {path}: {source}")]
    ConfigIo {
        /// Path relative to the config root.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file watcher could not be created or a watch could not be added.
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// An operation referenced an entity the store does not know about.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// An entity is missing a component an operation requires.
    #[error("entity {entity} missing component {kind:?}")]
    MissingComponent {
        /// The entity in question.
        entity: EntityId,
        /// The component kind that was absent.
        kind: ComponentKind,
    },

    /// A registered AI system failed during update, event handling or shutdown.
    #[error("ai system '{system}' failed: {source}")]
    System {
        /// Registered name of the system.
        system: String,
        /// Underlying failure.
        source: anyhow::Error,
    },
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, AiError>;
