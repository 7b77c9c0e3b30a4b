//! Outbound notifications.
//!
//! The engine only ever publishes; it never subscribes. Hosts implement
//! [`EventSink`] to route events onto whatever bus they run.

use crate::env::Occupant;
use crate::state::{CharacterHandle, Position};

/// High-level occurrences the engine reports while resolving abilities.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    /// A character's experience crossed a level threshold.
    LevelUp {
        character: CharacterHandle,
        level: u32,
    },

    /// Damage was applied. `attacker` is `None` for environmental damage.
    DamageDealt {
        attacker: Option<CharacterHandle>,
        target: CharacterHandle,
        amount: f32,
        lethal: bool,
    },

    /// A character's health reached zero.
    CharacterDied {
        character: CharacterHandle,
        position: Position,
        killer: Option<CharacterHandle>,
    },

    /// An attack was performed but the hit roll failed.
    AttackMissed {
        attacker: CharacterHandle,
        target: Occupant,
    },
}

/// Receiver for engine notifications.
pub trait EventSink {
    fn publish(&mut self, event: GameEvent);
}

/// Collects events in order; convenient for tests and replay capture.
impl EventSink for Vec<GameEvent> {
    fn publish(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Discards everything.
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _event: GameEvent) {}
}
