//! Kick: push an adjacent character one tile and deal glancing damage.

use crate::ability::{Ability, AbilityKind, CooldownTimer};
use crate::attributes::AttributeProgression;
use crate::engine::{PerformContext, WorldView};
use crate::env::Occupant;
use crate::state::CardinalDirection;

/// Shoves the target one tile away from the owner and deals half melee
/// damage. Declines when the tile behind the target is blocked, so a kick
/// never lands without the push.
pub struct KickAbility {
    priority: i32,
    cooldown: CooldownTimer,
}

impl KickAbility {
    pub const DEFAULT_PRIORITY: i32 = 30;

    pub fn new() -> Self {
        Self {
            priority: Self::DEFAULT_PRIORITY,
            cooldown: CooldownTimer::new(),
        }
    }
}

impl Default for KickAbility {
    fn default() -> Self {
        Self::new()
    }
}

impl Ability for KickAbility {
    fn kind(&self) -> AbilityKind {
        AbilityKind::Kick
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    fn cost(&self, _progression: &AttributeProgression) -> u32 {
        1
    }

    fn cooldown_length(&self, _progression: &AttributeProgression) -> u32 {
        2
    }

    fn cooldown(&self) -> &CooldownTimer {
        &self.cooldown
    }

    fn cooldown_mut(&mut self) -> &mut CooldownTimer {
        &mut self.cooldown
    }

    fn is_targeted(&self) -> bool {
        true
    }

    fn can_perform_on(
        &self,
        _view: &WorldView<'_>,
        target: Occupant,
        _direction: CardinalDirection,
    ) -> bool {
        matches!(target, Occupant::Character(_))
    }

    fn perform(&mut self, ctx: &mut PerformContext<'_>) -> bool {
        let (Some(Occupant::Character(victim)), Some(direction)) = (ctx.target, ctx.direction)
        else {
            return false;
        };
        let Some(owner) = ctx.owner_character() else {
            return false;
        };
        let damage = owner.progression().melee_damage() * 0.5;

        let Some(character) = ctx.characters.get(victim) else {
            return false;
        };
        if !character.is_alive() || character.is_removed() {
            return false;
        }
        let shoved_to = character.position().stepped(direction, 1);
        if !ctx.in_bounds(shoved_to)
            || ctx.is_wall(shoved_to)
            || ctx.occupant_at(shoved_to).is_some()
        {
            return false;
        }

        if let Some(character) = ctx.characters.get_mut(victim) {
            character.set_position(shoved_to);
        }
        ctx.deal_damage(victim, damage);
        if ctx.is_hazardous(shoved_to) {
            let hazard = ctx.hazard_damage(shoved_to);
            if hazard > 0.0 {
                ctx.deal_environmental_damage(victim, hazard);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::abilities::testkit::spawn_with;
    use crate::ability::{AbilityKind, ControllerVariant};
    use crate::engine::TurnEngine;
    use crate::env::{Env, GridOracle, MapDimensions, Occupant};
    use crate::events::GameEvent;
    use crate::state::{Position, WorldState};

    struct Corridor;

    impl GridOracle for Corridor {
        fn dimensions(&self) -> MapDimensions {
            MapDimensions {
                width: 3,
                height: 1,
            }
        }

        fn occupant_at(&self, _position: Position) -> Option<Occupant> {
            None
        }

        fn is_wall(&self, _position: Position) -> bool {
            false
        }
    }

    #[test]
    fn kick_pushes_and_damages() {
        let mut state = WorldState::default();
        spawn_with(
            &mut state,
            "grunt",
            Position::ORIGIN,
            ControllerVariant::Ai,
            &[AbilityKind::Kick],
        );
        let victim = spawn_with(
            &mut state,
            "hero",
            Position::new(1, 0),
            ControllerVariant::Player,
            &[],
        );
        let env = Env::empty();
        let mut events: Vec<GameEvent> = Vec::new();

        let mut engine = TurnEngine::new(&mut state);
        let outcome = engine.tick(&env, &mut events);

        assert_eq!(outcome.performed, Some(AbilityKind::Kick));
        drop(engine);
        let hero = state.characters.get(victim).unwrap();
        assert_eq!(hero.position(), Position::new(2, 0));
        let half = hero.progression().melee_damage() * 0.5;
        assert_eq!(hero.health(), hero.progression().max_health() - half);
    }

    #[test]
    fn kick_declines_when_the_push_is_blocked() {
        let mut state = WorldState::default();
        spawn_with(
            &mut state,
            "grunt",
            Position::new(1, 0),
            ControllerVariant::Ai,
            &[AbilityKind::Kick],
        );
        let victim = spawn_with(
            &mut state,
            "hero",
            Position::new(2, 0),
            ControllerVariant::Player,
            &[],
        );
        // Map edge right behind the victim.
        let map = Corridor;
        let env = Env::new(Some(&map), None, None);
        let mut events: Vec<GameEvent> = Vec::new();

        let mut engine = TurnEngine::new(&mut state);
        let outcome = engine.tick(&env, &mut events);

        assert_eq!(outcome.performed, None);
        drop(engine);
        let hero = state.characters.get(victim).unwrap();
        assert_eq!(hero.position(), Position::new(2, 0));
        assert_eq!(hero.health(), hero.progression().max_health());
    }
}
