//! Deterministic turn and ability resolution logic shared across hosts.
//!
//! `tactics-core` defines the canonical rules (turn rotation, the ability
//! and controller-component pairing, targeting, attribute progression) and
//! exposes pure APIs reusable by any host. All state mutation flows through
//! [`engine::TurnEngine`]; oracles supply the outside world and hosts
//! collect outcomes through [`events::EventSink`].
pub mod abilities;
pub mod ability;
pub mod attributes;
pub mod config;
pub mod engine;
pub mod env;
pub mod events;
pub mod state;
pub mod targeting;

pub use ability::{
    Ability, AbilityKind, AbilityPair, AbilityRegistry, AbilitySet, AbilitySetError,
    ControllerComponent, ControllerVariant, CooldownError, CooldownTimer, RegistryError,
};
pub use attributes::{AttributeError, AttributeProgression, MAX_LEVEL, level_for_experience};
pub use config::EngineConfig;
pub use engine::{PerformContext, TickOutcome, TurnEngine, TurnError, WorldView};
pub use env::{
    Env, GridOracle, InputKey, InputOracle, MapDimensions, ObstacleId, Occupant, OracleError,
    PcgRng, RngOracle, compute_seed,
};
pub use events::{EventSink, GameEvent, NullSink};
pub use state::{
    CardinalDirection, Character, CharacterArena, CharacterHandle, Position, TurnState, WorldState,
};
pub use targeting::{TargetingError, TargetingState, acquire_target};
