//! Direction-based target acquisition.
//!
//! A character may own several targeted abilities but selects a target for
//! at most one "active" targeted ability at a time. [`TargetingState`] is
//! that per-character selection state; [`acquire_target`] is the shared
//! cardinal-ray search both player and AI controller variants run.

use arrayvec::ArrayVec;

use crate::ability::{Ability, AbilityKind, AbilitySet};
use crate::config::EngineConfig;
use crate::engine::WorldView;
use crate::env::Occupant;
use crate::state::CardinalDirection;

/// Errors raised by targeting-state lifecycle misuse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TargetingError {
    /// The targeted-ability list is computed exactly once, when the
    /// character is attached to the world. A second initialization means
    /// the pairing invariant was broken elsewhere.
    #[error("targeting state initialized twice")]
    AlreadyInitialized,
}

/// Per-character target-selection state shared by every targeted
/// controller component the character owns.
#[derive(Debug, Default)]
pub struct TargetingState {
    initialized: bool,
    targeted_kinds: ArrayVec<AbilityKind, { EngineConfig::MAX_ABILITIES }>,
    active: Option<AbilityKind>,
    target: Option<Occupant>,
    direction: Option<CardinalDirection>,
}

impl TargetingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the owned targeted-ability list from the ability set.
    ///
    /// # Errors
    ///
    /// Returns [`TargetingError::AlreadyInitialized`] on a second call.
    pub fn initialize(&mut self, abilities: &AbilitySet) -> Result<(), TargetingError> {
        if self.initialized {
            return Err(TargetingError::AlreadyInitialized);
        }
        self.targeted_kinds = abilities.targeted_kinds().collect();
        self.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Targeted ability kinds owned by the character, in priority order.
    pub fn targeted_kinds(&self) -> &[AbilityKind] {
        &self.targeted_kinds
    }

    /// The ability currently selected for targeting, if any.
    pub fn active(&self) -> Option<AbilityKind> {
        self.active
    }

    /// Switching the active ability does not clear an already-selected
    /// target; whether to recompute is the component's policy.
    pub fn set_active(&mut self, kind: AbilityKind) {
        self.active = Some(kind);
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    pub fn selection(&self) -> Option<(Occupant, CardinalDirection)> {
        Some((self.target?, self.direction?))
    }

    pub fn set_selection(&mut self, target: Occupant, direction: CardinalDirection) {
        self.target = Some(target);
        self.direction = Some(direction);
    }

    /// Resets target and direction to "none".
    pub fn clear_selection(&mut self) {
        self.target = None;
        self.direction = None;
    }
}

/// Searches the four cardinal directions from the owner's cell for the
/// nearest valid candidate.
///
/// Each ray stops at the first wall, map edge, or occupant; an occupant
/// that fails validation blocks its ray rather than letting the search see
/// past it. `start_after` rotates the search order so an explicit
/// re-trigger cycles to the next direction instead of re-finding the same
/// candidate. Returns `None` when all four directions are exhausted.
pub fn acquire_target(
    view: &WorldView<'_>,
    ability: &dyn Ability,
    start_after: Option<CardinalDirection>,
    wants: impl Fn(&WorldView<'_>, Occupant, CardinalDirection) -> bool,
) -> Option<(Occupant, CardinalDirection)> {
    let owner = view.owner_character()?;
    let origin = owner.position();
    let range = ability.range(owner.progression()).max(1);

    let offset = match start_after {
        Some(direction) => {
            CardinalDirection::ALL
                .iter()
                .position(|&d| d == direction)
                .map(|index| index + 1)
                .unwrap_or(0)
        }
        None => 0,
    };

    for step in 0..CardinalDirection::ALL.len() {
        let direction = CardinalDirection::ALL[(offset + step) % CardinalDirection::ALL.len()];
        let mut cell = origin;
        for _ in 0..range {
            cell = cell.stepped(direction, 1);
            if !view.in_bounds(cell) || view.is_wall(cell) {
                break;
            }
            let Some(occupant) = view.occupant_at(cell) else {
                continue;
            };
            if view.is_valid_candidate(occupant)
                && ability.can_perform_on(view, occupant, direction)
                && wants(view, occupant, direction)
            {
                return Some((occupant, direction));
            }
            // Nearest occupant blocks the ray even when rejected.
            break;
        }
    }
    None
}
