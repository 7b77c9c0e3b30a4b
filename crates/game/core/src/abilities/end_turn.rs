//! Explicit turn surrender. Sorts last so it only runs when nothing else
//! fired this tick.

use crate::ability::{Ability, AbilityKind, ControllerComponent, ControllerVariant, CooldownTimer};
use crate::attributes::AttributeProgression;
use crate::engine::{PerformContext, WorldView};
use crate::env::InputKey;
use crate::targeting::TargetingState;

/// Zero-cost ability that asks the scheduler to advance the rotation.
pub struct EndTurnAbility {
    priority: i32,
    cooldown: CooldownTimer,
}

impl EndTurnAbility {
    pub const DEFAULT_PRIORITY: i32 = 100;

    pub fn new() -> Self {
        Self {
            priority: Self::DEFAULT_PRIORITY,
            cooldown: CooldownTimer::new(),
        }
    }
}

impl Default for EndTurnAbility {
    fn default() -> Self {
        Self::new()
    }
}

impl Ability for EndTurnAbility {
    fn kind(&self) -> AbilityKind {
        AbilityKind::EndTurn
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    fn cost(&self, _progression: &AttributeProgression) -> u32 {
        0
    }

    fn cooldown_length(&self, _progression: &AttributeProgression) -> u32 {
        0
    }

    fn cooldown(&self) -> &CooldownTimer {
        &self.cooldown
    }

    fn cooldown_mut(&mut self) -> &mut CooldownTimer {
        &mut self.cooldown
    }

    fn perform(&mut self, ctx: &mut PerformContext<'_>) -> bool {
        ctx.request_end_turn();
        true
    }
}

/// Ends the turn on the end-turn binding.
pub struct PlayerEndTurnComponent {
    want: bool,
}

impl PlayerEndTurnComponent {
    pub fn new() -> Self {
        Self { want: false }
    }
}

impl Default for PlayerEndTurnComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerComponent for PlayerEndTurnComponent {
    fn ability_kind(&self) -> AbilityKind {
        AbilityKind::EndTurn
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
        self.want = view.key_active(InputKey::EndTurn);
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

/// Always wants to act. Because end-turn sorts after every other ability,
/// an AI turn ends exactly when nothing higher-priority fires.
pub struct AiEndTurnComponent;

impl AiEndTurnComponent {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AiEndTurnComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerComponent for AiEndTurnComponent {
    fn ability_kind(&self) -> AbilityKind {
        AbilityKind::EndTurn
    }

    fn variant(&self) -> ControllerVariant {
        ControllerVariant::Ai
    }

    fn update_input(
        &mut self,
        _view: &WorldView<'_>,
        _ability: &dyn Ability,
        _targeting: &mut TargetingState,
    ) {
    }

    fn wants_to_act(&self, _targeting: &TargetingState) -> bool {
        true
    }

    fn notify_performed(&mut self, _targeting: &mut TargetingState) {}
}

#[cfg(test)]
mod tests {
    use crate::abilities::testkit::{ScriptedInput, spawn_with};
    use crate::ability::{AbilityKind, ControllerVariant};
    use crate::engine::TurnEngine;
    use crate::env::{Env, InputKey};
    use crate::events::GameEvent;
    use crate::state::{Position, WorldState};

    #[test]
    fn player_end_turn_advances_the_rotation() {
        let mut state = WorldState::default();
        let first = spawn_with(
            &mut state,
            "a",
            Position::ORIGIN,
            ControllerVariant::Player,
            &[AbilityKind::EndTurn],
        );
        let second = spawn_with(
            &mut state,
            "b",
            Position::new(5, 5),
            ControllerVariant::Player,
            &[AbilityKind::EndTurn],
        );
        let input = ScriptedInput::pressing(&[InputKey::EndTurn]);
        let env = Env::new(None, Some(&input), None);
        let mut events: Vec<GameEvent> = Vec::new();

        let mut engine = TurnEngine::new(&mut state);
        assert!(engine.is_characters_turn(first));

        let outcome = engine.tick(&env, &mut events);
        assert_eq!(outcome.performed, Some(AbilityKind::EndTurn));
        assert!(outcome.turn_advanced);
        assert!(engine.is_characters_turn(second));
    }

    #[test]
    fn lone_ai_character_cycles_its_own_turns() {
        let mut state = WorldState::default();
        let only = spawn_with(
            &mut state,
            "grunt",
            Position::ORIGIN,
            ControllerVariant::Ai,
            &[AbilityKind::EndTurn],
        );
        let env = Env::empty();
        let mut events: Vec<GameEvent> = Vec::new();

        let mut engine = TurnEngine::new(&mut state);
        let turns_before = engine.total_turns();
        let outcome = engine.tick(&env, &mut events);

        assert!(outcome.turn_advanced);
        assert!(engine.is_characters_turn(only));
        assert_eq!(engine.total_turns(), turns_before + 1);
    }
}
