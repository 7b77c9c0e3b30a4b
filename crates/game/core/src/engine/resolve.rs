//! The per-tick ability resolution pass.
//!
//! Per active character, per tick, exactly one ability may perform:
//! abilities are visited in ascending priority, on-cooldown entries are
//! skipped, the bound component refreshes its intent, and the first
//! wanted, affordable ability gets to run. A successful perform debits the
//! pool, starts the cooldown, and ends the pass; a decline falls through
//! to the next-priority ability.

use crate::ability::AbilityKind;
use crate::env::{Env, InputKey, Occupant, compute_seed};
use crate::events::{EventSink, GameEvent};
use crate::state::{CardinalDirection, Character, CharacterArena, CharacterHandle, Position};

use super::TurnEngine;

/// What a single resolution tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The ability that performed this tick, if any.
    pub performed: Option<AbilityKind>,

    /// Whether the tick ended with the rotation advancing (end-turn
    /// ability, or forfeiture by a dead/removed active character).
    pub turn_advanced: bool,
}

/// Read-only view of the world handed to controller components while they
/// refresh intent.
pub struct WorldView<'a> {
    pub characters: &'a CharacterArena,
    pub env: &'a Env<'a>,
    pub owner: CharacterHandle,
    pub action_points: u32,
    seed: u64,
}

impl<'a> WorldView<'a> {
    pub(crate) fn new(
        characters: &'a CharacterArena,
        env: &'a Env<'a>,
        owner: CharacterHandle,
        action_points: u32,
        seed: u64,
    ) -> Self {
        Self {
            characters,
            env,
            owner,
            action_points,
            seed,
        }
    }

    pub fn owner_character(&self) -> Option<&Character> {
        self.characters.get(self.owner)
    }

    /// Occupant of a cell: live characters first, then the grid oracle's
    /// static obstacles.
    pub fn occupant_at(&self, position: Position) -> Option<Occupant> {
        occupant_at(self.characters, self.env, position)
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        in_bounds(self.env, position)
    }

    pub fn is_wall(&self, position: Position) -> bool {
        self.env
            .map()
            .map(|map| map.is_wall(position))
            .unwrap_or(false)
    }

    /// Candidate validity shared by every targeted ability: characters
    /// count while alive and not removed (never the owner itself),
    /// obstacles while not removed.
    pub fn is_valid_candidate(&self, occupant: Occupant) -> bool {
        match occupant {
            Occupant::Character(handle) => {
                handle != self.owner
                    && self
                        .characters
                        .get(handle)
                        .map(|character| character.is_alive() && !character.is_removed())
                        .unwrap_or(false)
            }
            Occupant::Obstacle(obstacle) => self
                .env
                .map()
                .map(|map| !map.is_obstacle_removed(obstacle))
                .unwrap_or(false),
        }
    }

    /// Whether an input binding is currently triggered. Absent oracle
    /// (AI-only hosts, tests) reads as inactive.
    pub fn key_active(&self, key: InputKey) -> bool {
        self.env
            .input()
            .map(|input| input.is_active(key))
            .unwrap_or(false)
    }

    /// Deterministic d100 for this tick; `context` separates multiple
    /// rolls within one decision.
    pub fn roll_d100(&self, context: u64) -> u32 {
        match self.env.rng() {
            Ok(rng) => rng.roll_d100(self.seed.wrapping_add(context)),
            Err(_) => 100,
        }
    }
}

/// Mutable context handed to an ability's `perform`.
///
/// Carries a snapshot of the component's intent (target, direction) so the
/// ability never has to reach back into its component.
pub struct PerformContext<'a> {
    pub target: Option<Occupant>,
    pub direction: Option<CardinalDirection>,
    pub characters: &'a mut CharacterArena,
    pub env: &'a Env<'a>,
    pub events: &'a mut dyn EventSink,
    owner: CharacterHandle,
    seed: u64,
    end_turn_requested: bool,
}

impl<'a> PerformContext<'a> {
    pub fn owner(&self) -> CharacterHandle {
        self.owner
    }

    pub fn owner_character(&self) -> Option<&Character> {
        self.characters.get(self.owner)
    }

    pub fn owner_character_mut(&mut self) -> Option<&mut Character> {
        self.characters.get_mut(self.owner)
    }

    pub fn occupant_at(&self, position: Position) -> Option<Occupant> {
        occupant_at(self.characters, self.env, position)
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        in_bounds(self.env, position)
    }

    pub fn is_wall(&self, position: Position) -> bool {
        self.env
            .map()
            .map(|map| map.is_wall(position))
            .unwrap_or(false)
    }

    pub fn is_hazardous(&self, position: Position) -> bool {
        self.env
            .map()
            .map(|map| map.is_hazardous(position))
            .unwrap_or(false)
    }

    pub fn hazard_damage(&self, position: Position) -> f32 {
        self.env
            .map()
            .map(|map| map.hazard_damage(position))
            .unwrap_or(0.0)
    }

    pub fn roll_d100(&self, context: u64) -> u32 {
        match self.env.rng() {
            Ok(rng) => rng.roll_d100(self.seed.wrapping_add(context)),
            Err(_) => 100,
        }
    }

    /// Asks the scheduler to advance the rotation once this ability's
    /// bookkeeping completes. Used by end-turn abilities.
    pub fn request_end_turn(&mut self) {
        self.end_turn_requested = true;
    }

    /// Applies damage from the owner to a character, publishing
    /// `DamageDealt` and, on a kill, `CharacterDied` plus any `LevelUp`
    /// the experience award triggers. Returns true when the hit was
    /// lethal.
    pub fn deal_damage(&mut self, target: CharacterHandle, amount: f32) -> bool {
        self.apply_damage(Some(self.owner), target, amount)
    }

    /// Damage with no attacking character (hazardous terrain).
    pub fn deal_environmental_damage(&mut self, target: CharacterHandle, amount: f32) -> bool {
        self.apply_damage(None, target, amount)
    }

    fn apply_damage(
        &mut self,
        attacker: Option<CharacterHandle>,
        target: CharacterHandle,
        amount: f32,
    ) -> bool {
        let Some(victim) = self.characters.get_mut(target) else {
            return false;
        };
        victim.take_damage(amount);
        let lethal = !victim.is_alive();
        let position = victim.position();
        let reward = victim.progression().experience_reward();
        self.events.publish(GameEvent::DamageDealt {
            attacker,
            target,
            amount,
            lethal,
        });
        if lethal {
            victim.mark_removed();
            self.events.publish(GameEvent::CharacterDied {
                character: target,
                position,
                killer: attacker,
            });
            if let Some(killer) = attacker {
                if let Some(character) = self.characters.get_mut(killer) {
                    if let Some(level) = character.progression_mut().award_experience(reward) {
                        self.events.publish(GameEvent::LevelUp {
                            character: killer,
                            level,
                        });
                    }
                }
            }
        }
        lethal
    }
}

fn occupant_at(
    characters: &CharacterArena,
    env: &Env<'_>,
    position: Position,
) -> Option<Occupant> {
    characters
        .iter()
        .find(|(_, character)| {
            !character.is_removed() && character.is_alive() && character.position() == position
        })
        .map(|(handle, _)| Occupant::Character(handle))
        .or_else(|| env.map().ok().and_then(|map| map.occupant_at(position)))
}

fn in_bounds(env: &Env<'_>, position: Position) -> bool {
    env.map()
        .map(|map| map.dimensions().contains(position))
        .unwrap_or(true)
}

impl<'a> TurnEngine<'a> {
    /// Runs one resolution tick for the active character.
    ///
    /// A dead or removed active character forfeits its turn instead. When
    /// nothing is eligible the tick ends with no effect and the scheduler
    /// stays on the same character; the next tick is the natural retry
    /// point.
    pub fn tick(&mut self, env: &Env<'_>, events: &mut dyn EventSink) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        let Some(active) = self.active_handle() else {
            // Active slot vacated (removal mid-turn) or rotation empty.
            if self.state.turn.cursor.is_some() {
                self.next_turn();
                outcome.turn_advanced = true;
            }
            return outcome;
        };
        let alive = self
            .state
            .characters
            .get(active)
            .map(|character| character.is_alive())
            .unwrap_or(false);
        if !alive {
            self.update();
            outcome.turn_advanced = true;
            return outcome;
        }

        let Some(character) = self.state.characters.get_mut(active) else {
            return outcome;
        };
        let progression = *character.progression();
        let (mut abilities, mut targeting) = character.take_resolution_state();

        let seed = compute_seed(
            self.state.config.seed,
            self.state.turn.nonce,
            u64::from(active.index()),
            self.state.turn.total_turns,
        );

        let mut end_turn = false;
        for index in abilities.ordered_indices() {
            let Some(pair) = abilities.pair_mut(index) else {
                continue;
            };
            let ability = pair.ability.as_mut();
            let component = pair.component.as_mut();

            if !ability.cooldown().is_ready() {
                continue;
            }

            {
                let view = WorldView::new(
                    &self.state.characters,
                    env,
                    active,
                    self.state.turn.action_points,
                    seed,
                );
                component.update_input(&view, ability, &mut targeting);
                if !component.wants_to_act(&targeting) {
                    continue;
                }
            }

            let cost = ability.cost(&progression);
            if cost > self.state.turn.action_points {
                continue;
            }

            let target = component.target(&targeting);
            let direction = component.direction(&targeting);
            let performed = {
                let mut ctx = PerformContext {
                    target,
                    direction,
                    characters: &mut self.state.characters,
                    env,
                    events,
                    owner: active,
                    seed,
                    end_turn_requested: false,
                };
                let performed = ability.perform(&mut ctx);
                end_turn = ctx.end_turn_requested;
                performed
            };
            if !performed {
                continue;
            }

            self.state.turn.nonce += 1;
            // Affordability was checked above; debit directly.
            self.state.turn.action_points -= cost;
            let cooldown = ability.cooldown_length(&progression);
            if cooldown > 0 {
                ability.cooldown_mut().start(cooldown);
            }
            component.notify_performed(&mut targeting);
            outcome.performed = Some(ability.kind());
            break;
        }

        if let Some(character) = self.state.characters.get_mut(active) {
            character.restore_resolution_state(abilities, targeting);
        }

        if end_turn {
            self.next_turn();
            outcome.turn_advanced = true;
        }
        outcome
    }
}
