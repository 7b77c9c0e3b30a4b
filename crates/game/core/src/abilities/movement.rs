//! Single-tile movement.

use crate::ability::{Ability, AbilityKind, ControllerComponent, ControllerVariant, CooldownTimer};
use crate::attributes::AttributeProgression;
use crate::engine::{PerformContext, WorldView};
use crate::env::InputKey;
use crate::state::CardinalDirection;
use crate::targeting::TargetingState;

/// Moves the owner one tile in the direction its component chose.
///
/// Declines when the destination is out of bounds, a wall, or occupied.
/// Stepping onto hazardous terrain applies the tile's damage to the owner.
pub struct MoveAbility {
    priority: i32,
    cooldown: CooldownTimer,
}

impl MoveAbility {
    pub const DEFAULT_PRIORITY: i32 = 10;

    pub fn new() -> Self {
        Self {
            priority: Self::DEFAULT_PRIORITY,
            cooldown: CooldownTimer::new(),
        }
    }
}

impl Default for MoveAbility {
    fn default() -> Self {
        Self::new()
    }
}

impl Ability for MoveAbility {
    fn kind(&self) -> AbilityKind {
        AbilityKind::Move
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
        0
    }

    fn cooldown(&self) -> &CooldownTimer {
        &self.cooldown
    }

    fn cooldown_mut(&mut self) -> &mut CooldownTimer {
        &mut self.cooldown
    }

    fn perform(&mut self, ctx: &mut PerformContext<'_>) -> bool {
        let Some(direction) = ctx.direction else {
            return false;
        };
        let Some(owner) = ctx.owner_character() else {
            return false;
        };
        let destination = owner.position().stepped(direction, 1);
        if !ctx.in_bounds(destination)
            || ctx.is_wall(destination)
            || ctx.occupant_at(destination).is_some()
        {
            return false;
        }
        let handle = ctx.owner();
        if let Some(owner) = ctx.owner_character_mut() {
            owner.set_position(destination);
        }
        if ctx.is_hazardous(destination) {
            let damage = ctx.hazard_damage(destination);
            if damage > 0.0 {
                ctx.deal_environmental_damage(handle, damage);
            }
        }
        true
    }
}

/// Maps the four movement bindings to a desired direction.
pub struct PlayerMoveComponent {
    desired: Option<CardinalDirection>,
}

impl PlayerMoveComponent {
    const BINDINGS: [(InputKey, CardinalDirection); 4] = [
        (InputKey::MoveNorth, CardinalDirection::North),
        (InputKey::MoveEast, CardinalDirection::East),
        (InputKey::MoveSouth, CardinalDirection::South),
        (InputKey::MoveWest, CardinalDirection::West),
    ];

    pub fn new() -> Self {
        Self { desired: None }
    }
}

impl Default for PlayerMoveComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerComponent for PlayerMoveComponent {
    fn ability_kind(&self) -> AbilityKind {
        AbilityKind::Move
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
        self.desired = Self::BINDINGS
            .iter()
            .find(|(key, _)| view.key_active(*key))
            .map(|&(_, direction)| direction);
    }

    fn wants_to_act(&self, _targeting: &TargetingState) -> bool {
        self.desired.is_some()
    }

    fn direction(&self, _targeting: &TargetingState) -> Option<CardinalDirection> {
        self.desired
    }

    fn notify_performed(&mut self, _targeting: &mut TargetingState) {
        self.desired = None;
    }

    fn on_turn_begin(&mut self) {
        self.desired = None;
    }
}

/// Chases the nearest live character, stopping once cardinally adjacent.
pub struct AiMoveComponent {
    desired: Option<CardinalDirection>,
}

impl AiMoveComponent {
    pub fn new() -> Self {
        Self { desired: None }
    }
}

impl Default for AiMoveComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerComponent for AiMoveComponent {
    fn ability_kind(&self) -> AbilityKind {
        AbilityKind::Move
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
        self.desired = None;
        let Some(owner) = view.owner_character() else {
            return;
        };
        let origin = owner.position();

        // Nearest live character by Chebyshev distance; the arena's index
        // order breaks ties so the choice is deterministic.
        let mut quarry = None;
        for (handle, character) in view.characters.iter() {
            if handle == view.owner || character.is_removed() || !character.is_alive() {
                continue;
            }
            let distance = origin.distance_to(character.position());
            if quarry.map(|(best, _)| distance < best).unwrap_or(true) {
                quarry = Some((distance, character.position()));
            }
        }
        let Some((_, goal)) = quarry else {
            return;
        };

        let dx = goal.x - origin.x;
        let dy = goal.y - origin.y;
        if dx.abs() + dy.abs() <= 1 {
            // Already cardinally adjacent; attacking beats shuffling.
            return;
        }

        let horizontal = (dx != 0).then(|| {
            if dx > 0 {
                CardinalDirection::East
            } else {
                CardinalDirection::West
            }
        });
        let vertical = (dy != 0).then(|| {
            if dy > 0 {
                CardinalDirection::South
            } else {
                CardinalDirection::North
            }
        });
        let preferred = if dx.abs() >= dy.abs() {
            [horizontal, vertical]
        } else {
            [vertical, horizontal]
        };
        self.desired = preferred.into_iter().flatten().find(|&direction| {
            let destination = origin.stepped(direction, 1);
            view.in_bounds(destination)
                && !view.is_wall(destination)
                && view.occupant_at(destination).is_none()
        });
    }

    fn wants_to_act(&self, _targeting: &TargetingState) -> bool {
        self.desired.is_some()
    }

    fn direction(&self, _targeting: &TargetingState) -> Option<CardinalDirection> {
        self.desired
    }

    fn notify_performed(&mut self, _targeting: &mut TargetingState) {
        self.desired = None;
    }

    fn on_turn_begin(&mut self) {
        self.desired = None;
    }
}

#[cfg(test)]
mod tests {
    use crate::abilities::testkit::{ScriptedInput, spawn_with};
    use crate::ability::{AbilityKind, ControllerVariant};
    use crate::engine::TurnEngine;
    use crate::env::Env;
    use crate::events::GameEvent;
    use crate::state::{Position, WorldState};

    #[test]
    fn player_moves_one_tile_per_tick() {
        let mut state = WorldState::default();
        let handle = spawn_with(
            &mut state,
            "hero",
            Position::ORIGIN,
            ControllerVariant::Player,
            &[AbilityKind::Move],
        );
        let input = ScriptedInput::pressing(&[crate::env::InputKey::MoveEast]);
        let env = Env::new(None, Some(&input), None);
        let mut events: Vec<GameEvent> = Vec::new();

        let mut engine = TurnEngine::new(&mut state);
        let before = engine.action_points_remaining();
        let outcome = engine.tick(&env, &mut events);

        assert_eq!(outcome.performed, Some(AbilityKind::Move));
        assert_eq!(engine.action_points_remaining(), before - 1);
        drop(engine);
        assert_eq!(
            state.characters.get(handle).unwrap().position(),
            Position::new(1, 0)
        );
    }

    #[test]
    fn move_declines_into_an_occupied_tile() {
        let mut state = WorldState::default();
        let mover = spawn_with(
            &mut state,
            "hero",
            Position::ORIGIN,
            ControllerVariant::Player,
            &[AbilityKind::Move],
        );
        spawn_with(
            &mut state,
            "blocker",
            Position::new(1, 0),
            ControllerVariant::Ai,
            &[],
        );
        let input = ScriptedInput::pressing(&[crate::env::InputKey::MoveEast]);
        let env = Env::new(None, Some(&input), None);
        let mut events: Vec<GameEvent> = Vec::new();

        let mut engine = TurnEngine::new(&mut state);
        let outcome = engine.tick(&env, &mut events);

        assert_eq!(outcome.performed, None);
        drop(engine);
        assert_eq!(
            state.characters.get(mover).unwrap().position(),
            Position::ORIGIN
        );
    }

    #[test]
    fn ai_chases_the_nearest_character() {
        let mut state = WorldState::default();
        let chaser = spawn_with(
            &mut state,
            "grunt",
            Position::ORIGIN,
            ControllerVariant::Ai,
            &[AbilityKind::Move],
        );
        spawn_with(
            &mut state,
            "hero",
            Position::new(3, 0),
            ControllerVariant::Player,
            &[],
        );
        let env = Env::empty();
        let mut events: Vec<GameEvent> = Vec::new();

        let mut engine = TurnEngine::new(&mut state);
        let outcome = engine.tick(&env, &mut events);

        assert_eq!(outcome.performed, Some(AbilityKind::Move));
        drop(engine);
        assert_eq!(
            state.characters.get(chaser).unwrap().position(),
            Position::new(1, 0)
        );
    }

    #[test]
    fn ai_stays_put_when_adjacent() {
        let mut state = WorldState::default();
        let chaser = spawn_with(
            &mut state,
            "grunt",
            Position::ORIGIN,
            ControllerVariant::Ai,
            &[AbilityKind::Move],
        );
        spawn_with(
            &mut state,
            "hero",
            Position::new(0, 1),
            ControllerVariant::Player,
            &[],
        );
        let env = Env::empty();
        let mut events: Vec<GameEvent> = Vec::new();

        let mut engine = TurnEngine::new(&mut state);
        let outcome = engine.tick(&env, &mut events);

        assert_eq!(outcome.performed, None);
        drop(engine);
        assert_eq!(
            state.characters.get(chaser).unwrap().position(),
            Position::ORIGIN
        );
    }
}
