//! Input query oracle consumed by player-variant controller components.
//!
//! The engine never polls devices; the host answers "is this binding
//! currently triggered" and decides for itself what edge/level semantics a
//! binding has. AI-variant components never touch this oracle.

/// Logical input bindings the shipped controller components query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputKey {
    MoveNorth,
    MoveEast,
    MoveSouth,
    MoveWest,
    Attack,
    Kick,
    Warcry,
    Confirm,
    EndTurn,
}

/// Oracle answering input-binding queries.
pub trait InputOracle: Send + Sync {
    fn is_active(&self, key: InputKey) -> bool;
}
