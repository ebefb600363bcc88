//! Publish/subscribe event dispatch with cancellation and bounded history.
//!
//! All events travel in a single [`GameEvent`] envelope keyed by
//! [`EventKind`]. Handlers are `FnMut` closures registered per kind; a
//! failing handler is logged and skipped so one bad subscriber cannot take
//! down dispatch. Cancellable events stop propagating as soon as a handler
//! cancels them.

pub mod ai;

use std::collections::{HashMap, VecDeque};

use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use self::ai::AiEventKind;

/// Maximum number of events retained in the bus history.
pub const HISTORY_LIMIT: usize = 1000;

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// Engine-level event kinds emitted by the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreEventKind {
    /// A non-player entity entered the world.
    EntitySpawn,
    /// An entity died.
    EntityDeath,
    /// An entity moved to a new tile.
    EntityMove,
    /// Combat began between two entities.
    CombatStart,
    /// An attack landed.
    CombatHit,
    /// An attack missed.
    CombatMiss,
    /// A new dungeon level was generated.
    LevelGenerate,
    /// The player entered a level.
    LevelEnter,
    /// A room was carved during generation.
    RoomGenerate,
    /// The player gained a level.
    PlayerLevelUp,
    /// The player died.
    PlayerDeath,
    /// An item was picked up.
    ItemPickup,
    /// An item was used.
    ItemUse,
    /// An item was dropped.
    ItemDrop,
    /// A game turn is beginning.
    TurnStart,
    /// A game turn has finished.
    TurnEnd,
}

impl CoreEventKind {
    /// Stable string name used in logs and payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EntitySpawn => "entity_spawn",
            Self::EntityDeath => "entity_death",
            Self::EntityMove => "entity_move",
            Self::CombatStart => "combat_start",
            Self::CombatHit => "combat_hit",
            Self::CombatMiss => "combat_miss",
            Self::LevelGenerate => "level_generate",
            Self::LevelEnter => "level_enter",
            Self::RoomGenerate => "room_generate",
            Self::PlayerLevelUp => "player_level_up",
            Self::PlayerDeath => "player_death",
            Self::ItemPickup => "item_pickup",
            Self::ItemUse => "item_use",
            Self::ItemDrop => "item_drop",
            Self::TurnStart => "turn_start",
            Self::TurnEnd => "turn_end",
        }
    }
}

/// Any event kind the bus can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Engine-level event.
    Core(CoreEventKind),
    /// AI coordination event.
    Ai(AiEventKind),
}

impl EventKind {
    /// Stable string name used in logs and payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Core(kind) => kind.as_str(),
            Self::Ai(kind) => kind.as_str(),
        }
    }
}

impl From<CoreEventKind> for EventKind {
    fn from(kind: CoreEventKind) -> Self {
        Self::Core(kind)
    }
}

impl From<AiEventKind> for EventKind {
    fn from(kind: AiEventKind) -> Self {
        Self::Ai(kind)
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// An event traveling through the bus.
#[derive(Debug, Clone)]
pub struct GameEvent {
    /// What happened.
    pub kind: EventKind,
    /// Structured payload.
    pub data: Map<String, Value>,
    /// Drain ordering hint; higher is more urgent.
    pub priority: i32,
    /// Whether handlers may cancel this event.
    pub cancellable: bool,
    /// Whether a handler has cancelled this event.
    pub cancelled: bool,
    /// Which subsystem emitted the event.
    pub source: &'static str,
}

impl GameEvent {
    /// Create an event with an empty payload.
    #[must_use]
    pub fn new(kind: impl Into<EventKind>) -> Self {
        Self {
            kind: kind.into(),
            data: Map::new(),
            priority: 0,
            cancellable: false,
            cancelled: false,
            source: "core",
        }
    }

    /// Attach a payload field.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Set the drain priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Mark the event as cancellable by handlers.
    #[must_use]
    pub fn cancellable(mut self) -> Self {
        self.cancellable = true;
        self
    }

    /// Set the emitting subsystem.
    #[must_use]
    pub fn from_source(mut self, source: &'static str) -> Self {
        self.source = source;
        self
    }

    /// Read a payload field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Cancel the event, stopping further handler dispatch.
    ///
    /// Returns `false` (with a warning) if the event is not cancellable.
    pub fn cancel(&mut self) -> bool {
        if !self.cancellable {
            warn!(kind = self.kind.as_str(), "attempt to cancel non-cancellable event");
            return false;
        }
        self.cancelled = true;
        true
    }
}

// ---------------------------------------------------------------------------
// Bus
// ---------------------------------------------------------------------------

/// Token identifying a registered handler, for later unsubscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler = Box<dyn FnMut(&mut GameEvent) -> anyhow::Result<()>>;

/// Synchronous publish/subscribe dispatcher.
///
/// Handlers run in subscription order on the emitting thread. Every emitted
/// event (in its post-dispatch state) is recorded in a bounded history ring.
#[derive(Default)]
pub struct EventBus {
    next_handler: u64,
    handlers: HashMap<EventKind, Vec<(HandlerId, Handler)>>,
    history: VecDeque<GameEvent>,
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an event kind. Handlers for the same kind run
    /// in subscription order.
    pub fn subscribe<F>(&mut self, kind: impl Into<EventKind>, handler: F) -> HandlerId
    where
        F: FnMut(&mut GameEvent) -> anyhow::Result<()> + 'static,
    {
        let id = HandlerId(self.next_handler);
        self.next_handler += 1;
        self.handlers
            .entry(kind.into())
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Remove a previously registered handler. Returns whether it was found.
    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        let mut found = false;
        for handlers in self.handlers.values_mut() {
            let before = handlers.len();
            handlers.retain(|(handler_id, _)| *handler_id != id);
            found |= handlers.len() != before;
        }
        found
    }

    /// Drop all handlers for all kinds. History is preserved.
    pub fn clear_handlers(&mut self) {
        self.handlers.clear();
    }

    /// Number of handlers registered for a kind.
    #[must_use]
    pub fn handler_count(&self, kind: impl Into<EventKind>) -> usize {
        self.handlers.get(&kind.into()).map_or(0, Vec::len)
    }

    /// Dispatch an event to its handlers and record it in history.
    ///
    /// A handler returning an error is logged and skipped. If a handler
    /// cancels a cancellable event, remaining handlers do not run. The final
    /// state of the event is returned so callers can inspect cancellation and
    /// any fields handlers wrote back.
    pub fn emit(&mut self, mut event: GameEvent) -> GameEvent {
        debug!(kind = event.kind.as_str(), source = event.source, "emit");
        if let Some(handlers) = self.handlers.get_mut(&event.kind) {
            for (id, handler) in handlers.iter_mut() {
                if let Err(err) = handler(&mut event) {
                    error!(
                        kind = event.kind.as_str(),
                        handler = id.0,
                        error = %err,
                        "event handler failed"
                    );
                }
                if event.cancellable && event.cancelled {
                    debug!(kind = event.kind.as_str(), "event cancelled, stopping dispatch");
                    break;
                }
            }
        }
        self.history.push_back(event.clone());
        if self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
        event
    }

    /// Emit an event with no payload.
    pub fn emit_simple(&mut self, kind: impl Into<EventKind>) -> GameEvent {
        self.emit(GameEvent::new(kind))
    }

    /// The most recent events, oldest first, up to `limit`.
    #[must_use]
    pub fn history(&self, limit: usize) -> Vec<GameEvent> {
        let skip = self.history.len().saturating_sub(limit);
        self.history.iter().skip(skip).cloned().collect()
    }

    /// The most recent events of one kind, oldest first, up to `limit`.
    #[must_use]
    pub fn history_of(&self, kind: impl Into<EventKind>, limit: usize) -> Vec<GameEvent> {
        let kind = kind.into();
        let matching: Vec<&GameEvent> = self
            .history
            .iter()
            .filter(|event| event.kind == kind)
            .collect();
        let skip = matching.len().saturating_sub(limit);
        matching.into_iter().skip(skip).cloned().collect()
    }

    /// Total number of events currently retained in history.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("kinds", &self.handlers.len())
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}
