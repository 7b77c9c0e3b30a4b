//! Warcry: an untargeted burst hitting every cardinally adjacent character.

use crate::ability::{Ability, AbilityKind, ControllerComponent, ControllerVariant, CooldownTimer};
use crate::attributes::AttributeProgression;
use crate::engine::{PerformContext, WorldView};
use crate::env::{InputKey, Occupant};
use crate::state::{CardinalDirection, CharacterHandle};
use crate::targeting::TargetingState;

fn adjacent_characters(
    origin: crate::state::Position,
    find: impl Fn(crate::state::Position) -> Option<Occupant>,
) -> impl Iterator<Item = CharacterHandle> {
    CardinalDirection::ALL.into_iter().filter_map(move |direction| {
        match find(origin.stepped(direction, 1)) {
            Some(Occupant::Character(handle)) => Some(handle),
            _ => None,
        }
    })
}

/// Hits every cardinally adjacent character at once. Costs two action
/// points and declines when nobody is adjacent.
pub struct WarcryAbility {
    priority: i32,
    cooldown: CooldownTimer,
}

impl WarcryAbility {
    pub const DEFAULT_PRIORITY: i32 = 40;

    pub fn new() -> Self {
        Self {
            priority: Self::DEFAULT_PRIORITY,
            cooldown: CooldownTimer::new(),
        }
    }
}

impl Default for WarcryAbility {
    fn default() -> Self {
        Self::new()
    }
}

impl Ability for WarcryAbility {
    fn kind(&self) -> AbilityKind {
        AbilityKind::Warcry
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    fn cost(&self, _progression: &AttributeProgression) -> u32 {
        2
    }

    fn cooldown_length(&self, _progression: &AttributeProgression) -> u32 {
        3
    }

    fn cooldown(&self) -> &CooldownTimer {
        &self.cooldown
    }

    fn cooldown_mut(&mut self) -> &mut CooldownTimer {
        &mut self.cooldown
    }

    fn perform(&mut self, ctx: &mut PerformContext<'_>) -> bool {
        let Some(owner) = ctx.owner_character() else {
            return false;
        };
        let damage = owner.progression().warcry_damage();
        let origin = owner.position();

        let victims: Vec<CharacterHandle> =
            adjacent_characters(origin, |cell| ctx.occupant_at(cell)).collect();
        if victims.is_empty() {
            return false;
        }
        for victim in victims {
            ctx.deal_damage(victim, damage);
        }
        true
    }
}

/// Fires on the warcry binding.
pub struct PlayerWarcryComponent {
    want: bool,
}

impl PlayerWarcryComponent {
    pub fn new() -> Self {
        Self { want: false }
    }
}

impl Default for PlayerWarcryComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerComponent for PlayerWarcryComponent {
    fn ability_kind(&self) -> AbilityKind {
        AbilityKind::Warcry
    }

    fn variant(&self) -> ControllerVariant {
        ControllerVariant::Player
    }

    fn update_input(
        &mut self,
        view: &WorldView<'_>,
        _ability: &dyn Ability,
        _targeting: &mut TargetingState,
    ) {
        self.want = view.key_active(InputKey::Warcry);
    }

    fn wants_to_act(&self, _targeting: &TargetingState) -> bool {
        self.want
    }

    fn notify_performed(&mut self, _targeting: &mut TargetingState) {
        self.want = false;
    }

    fn on_turn_begin(&mut self) {
        self.want = false;
    }
}

/// Fires when at least two valid characters stand adjacent, so a single
/// neighbor is still handled by the cheaper single-target attack.
pub struct AiWarcryComponent {
    want: bool,
}

impl AiWarcryComponent {
    pub fn new() -> Self {
        Self { want: false }
    }
}

impl Default for AiWarcryComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerComponent for AiWarcryComponent {
    fn ability_kind(&self) -> AbilityKind {
        AbilityKind::Warcry
    }

    fn variant(&self) -> ControllerVariant {
        ControllerVariant::Ai
    }

    fn update_input(
        &mut self,
        view: &WorldView<'_>,
        _ability: &dyn Ability,
        _targeting: &mut TargetingState,
    ) {
        let Some(owner) = view.owner_character() else {
            self.want = false;
            return;
        };
        let adjacent = adjacent_characters(owner.position(), |cell| view.occupant_at(cell))
            .filter(|&handle| view.is_valid_candidate(Occupant::Character(handle)))
            .count();
        self.want = adjacent >= 2;
    }

    fn wants_to_act(&self, _targeting: &TargetingState) -> bool {
        self.want
    }

    fn notify_performed(&mut self, _targeting: &mut TargetingState) {
        self.want = false;
    }

    fn on_turn_begin(&mut self) {
        self.want = false;
    }
}
