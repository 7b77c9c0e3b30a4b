//! Melee attack with a level-scaled hit roll.

use crate::ability::{Ability, AbilityKind, CooldownTimer};
use crate::attributes::AttributeProgression;
use crate::engine::{PerformContext, WorldView};
use crate::env::Occupant;
use crate::events::GameEvent;
use crate::state::CardinalDirection;

const HIT_ROLL_CONTEXT: u64 = 1;

/// Damages one targeted character. A failed hit roll still consumes the
/// action and starts the cooldown; only the damage is skipped.
pub struct AttackAbility {
    priority: i32,
    cooldown: CooldownTimer,
}

impl AttackAbility {
    pub const DEFAULT_PRIORITY: i32 = 20;

    pub fn new() -> Self {
        Self {
            priority: Self::DEFAULT_PRIORITY,
            cooldown: CooldownTimer::new(),
        }
    }
}

impl Default for AttackAbility {
    fn default() -> Self {
        Self::new()
    }
}

impl Ability for AttackAbility {
    fn kind(&self) -> AbilityKind {
        AbilityKind::Attack
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
        1
    }

    fn cooldown(&self) -> &CooldownTimer {
        &self.cooldown
    }

    fn cooldown_mut(&mut self) -> &mut CooldownTimer {
        &mut self.cooldown
    }

    fn range(&self, progression: &AttributeProgression) -> u32 {
        progression.attack_range()
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
        let Some(Occupant::Character(victim)) = ctx.target else {
            return false;
        };
        let Some(owner) = ctx.owner_character() else {
            return false;
        };
        let progression = *owner.progression();
        let origin = owner.position();

        let in_range = ctx
            .characters
            .get(victim)
            .map(|character| {
                character.is_alive()
                    && !character.is_removed()
                    && origin.distance_to(character.position()) <= progression.attack_range()
            })
            .unwrap_or(false);
        if !in_range {
            return false;
        }

        let roll = ctx.roll_d100(HIT_ROLL_CONTEXT);
        if roll > progression.hit_chance_percent() {
            let attacker = ctx.owner();
            ctx.events.publish(GameEvent::AttackMissed {
                attacker,
                target: Occupant::Character(victim),
            });
            return true;
        }
        ctx.deal_damage(victim, progression.melee_damage());
        true
    }
}
