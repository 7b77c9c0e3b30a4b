//! Turn scheduling and ability resolution.
//!
//! The [`TurnEngine`] is the authoritative reducer for [`WorldState`]: the
//! rotation of turn-takers, the per-turn action-point pool, and the
//! one-ability-per-tick resolution pass all mutate state through it. The
//! engine is synchronous and single-threaded; a full tick completes inside
//! one caller-driven call.

mod resolve;
mod turns;

pub use resolve::{PerformContext, TickOutcome, WorldView};
pub use turns::TurnError;

use crate::state::{Character, CharacterHandle, WorldState};

/// Engine facade over one session's world state.
pub struct TurnEngine<'a> {
    state: &'a mut WorldState,
}

impl<'a> TurnEngine<'a> {
    pub fn new(state: &'a mut WorldState) -> Self {
        Self { state }
    }

    /// The handle whose turn is in progress, if it still resolves to a
    /// live, non-removed character.
    pub fn active_handle(&self) -> Option<CharacterHandle> {
        let handle = self.state.turn.active?;
        let character = self.state.characters.get(handle)?;
        (!character.is_removed()).then_some(handle)
    }

    pub fn active_character(&self) -> Option<&Character> {
        self.state.characters.get(self.active_handle()?)
    }

    pub fn is_characters_turn(&self, handle: CharacterHandle) -> bool {
        self.active_handle() == Some(handle)
    }

    pub fn action_points_remaining(&self) -> u32 {
        self.state.turn.action_points
    }

    pub fn total_turns(&self) -> u64 {
        self.state.turn.total_turns
    }
}
