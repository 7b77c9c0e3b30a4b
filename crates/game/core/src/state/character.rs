//! Turn participants.

use crate::ability::AbilitySet;
use crate::attributes::AttributeProgression;
use crate::targeting::{TargetingError, TargetingState};

use super::Position;

/// Health at or below this value counts as dead.
pub const ALIVE_EPSILON: f32 = 1e-3;

/// One turn participant: identity, grid position, health, attribute
/// progression, and the abilities it owns.
///
/// Lifecycle: created detached, attached to the world exactly once (spawn),
/// mutated every tick while not removed, permanently excluded from future
/// turns once removed. A dead character (health below epsilon) is also
/// eventually removed.
pub struct Character {
    name: String,
    position: Position,
    health: f32,
    progression: AttributeProgression,
    abilities: AbilitySet,
    targeting: TargetingState,
    removed: bool,
}

impl Character {
    pub fn new(
        name: impl Into<String>,
        position: Position,
        progression: AttributeProgression,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            health: progression.max_health(),
            progression,
            abilities: AbilitySet::new(),
            targeting: TargetingState::new(),
            removed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn progression(&self) -> &AttributeProgression {
        &self.progression
    }

    pub fn progression_mut(&mut self) -> &mut AttributeProgression {
        &mut self.progression
    }

    pub fn abilities(&self) -> &AbilitySet {
        &self.abilities
    }

    pub fn abilities_mut(&mut self) -> &mut AbilitySet {
        &mut self.abilities
    }

    pub fn targeting(&self) -> &TargetingState {
        &self.targeting
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > ALIVE_EPSILON
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Flags the character for exclusion from future turns. The scheduler
    /// sweeps flagged characters out of the rotation and the world.
    pub fn mark_removed(&mut self) {
        self.removed = true;
    }

    /// Applies damage, clamping health at zero.
    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount.max(0.0)).max(0.0);
    }

    /// Computes the targeted-ability list from the owned set. Called once
    /// at spawn.
    pub(crate) fn initialize_targeting(&mut self) -> Result<(), TargetingError> {
        self.targeting.initialize(&self.abilities)
    }

    /// End-of-turn hook: cooldown countdowns tick exactly once per
    /// completed turn.
    pub(crate) fn on_turn_end(&mut self) {
        for pair in self.abilities.iter_mut() {
            let timer = pair.ability.cooldown_mut();
            if !timer.is_ready() {
                // Guarded by is_ready; reduce cannot fail here.
                let _ = timer.reduce();
            }
        }
    }

    /// Begin-of-turn hook: components reset their per-turn intent.
    pub(crate) fn on_turn_begin(&mut self) {
        for pair in self.abilities.iter_mut() {
            pair.component.on_turn_begin();
        }
    }

    /// Detaches the ability set and targeting state for the duration of one
    /// resolution pass, so abilities can mutate the world (including their
    /// owner) without aliasing themselves.
    pub(crate) fn take_resolution_state(&mut self) -> (AbilitySet, TargetingState) {
        (
            std::mem::take(&mut self.abilities),
            std::mem::take(&mut self.targeting),
        )
    }

    pub(crate) fn restore_resolution_state(
        &mut self,
        abilities: AbilitySet,
        targeting: TargetingState,
    ) {
        self.abilities = abilities;
        self.targeting = targeting;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_tracks_progression_and_clamps_at_zero() {
        let progression = AttributeProgression::new(1);
        let mut character = Character::new("grunt", Position::ORIGIN, progression);
        assert_eq!(character.health(), progression.max_health());
        assert!(character.is_alive());

        character.take_damage(progression.max_health() * 2.0);
        assert_eq!(character.health(), 0.0);
        assert!(!character.is_alive());
    }

    #[test]
    fn negative_damage_is_ignored() {
        let mut character =
            Character::new("grunt", Position::ORIGIN, AttributeProgression::new(1));
        let before = character.health();
        character.take_damage(-5.0);
        assert_eq!(character.health(), before);
    }
}
