//! World and turn state owned by one play session.

mod arena;
mod character;
mod common;
mod turn;

pub use arena::{CharacterArena, CharacterHandle};
pub use character::{ALIVE_EPSILON, Character};
pub use common::{CardinalDirection, Position};
pub use turn::TurnState;

use crate::config::EngineConfig;

/// Complete mutable state of one session: the character arena plus the turn
/// rotation. All mutation flows through [`TurnEngine`].
///
/// [`TurnEngine`]: crate::engine::TurnEngine
#[derive(Default)]
pub struct WorldState {
    pub characters: CharacterArena,
    pub turn: TurnState,
    pub config: EngineConfig,
}

impl WorldState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            characters: CharacterArena::new(),
            turn: TurnState::new(),
            config,
        }
    }
}
