//! Session events
//!
//! A double-buffered queue of [`GameEvent`]s. The session writes events
//! during one tick and consumers read them during the next, so what a
//! consumer sees never depends on where in the tick it runs.
//!
//! # Example
//!
//! ```ignore
//! // Inside the session tick
//! self.events.push(GameEvent::PlayerCaught { enemy: 0, lives_left: 2 });
//!
//! // In a consumer, after the next tick
//! for event in session.events().iter() {
//!     if let GameEvent::PlayerCaught { lives_left, .. } = event {
//!         hud.set_lives(*lives_left);
//!     }
//! }
//! ```

use glam::IVec2;

use super::session::Outcome;
use crate::ai::PursuitState;
use crate::gameplay::ItemKind;

// ============================================================================
// Events
// ============================================================================

/// Things that happened during a tick.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GameEvent {
    // -------------------------------------------------------------------------
    // Enemy Events
    // -------------------------------------------------------------------------
    /// An enemy switched pursuit state.
    EnemyStateChanged {
        enemy: usize,
        from: PursuitState,
        to: PursuitState,
    },

    /// The unstick maneuver moved an enemy.
    EnemyUnstuck { enemy: usize, offset: IVec2 },

    /// An enemy touched the player.
    PlayerCaught { enemy: usize, lives_left: u32 },

    // -------------------------------------------------------------------------
    // Item Events
    // -------------------------------------------------------------------------
    /// An item went into the player's inventory.
    ItemPickedUp { item: ItemKind },

    /// A coin was collected.
    CoinCollected { total: u32 },

    /// A delivery zone consumed an item.
    ItemDelivered { item: ItemKind },

    // -------------------------------------------------------------------------
    // Order Events
    // -------------------------------------------------------------------------
    OrderPosted { id: u32 },

    OrderCompleted { id: u32, reward: u32 },

    OrderExpired { id: u32 },

    // -------------------------------------------------------------------------
    // Session Events
    // -------------------------------------------------------------------------
    /// Pause was toggled.
    PauseToggled { paused: bool },

    /// The level was won or lost.
    OutcomeChanged { outcome: Outcome },
}

// ============================================================================
// Queue
// ============================================================================

/// Events written during tick N, readable during tick N+1.
#[derive(Debug)]
pub struct EventQueue {
    /// Written this tick
    pending: Vec<GameEvent>,
    /// Written last tick
    processing: Vec<GameEvent>,
}

impl EventQueue {
    const DEFAULT_CAPACITY: usize = 32;

    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: Vec::with_capacity(capacity),
            processing: Vec::with_capacity(capacity),
        }
    }

    /// Queue an event for the next tick.
    #[inline]
    pub fn push(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    /// Make last tick's events readable and start a fresh batch.
    /// The session calls this first thing in every tick.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Events from the previous tick
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.processing.iter()
    }

    /// Take the previous tick's events
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.processing.drain(..)
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Events queued so far this tick
    #[must_use]
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drop everything, readable or pending
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
