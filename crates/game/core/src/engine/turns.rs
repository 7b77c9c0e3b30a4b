//! Rotation bookkeeping: spawn, advance, spend, remove, sweep.

use crate::state::{Character, CharacterHandle};

use super::TurnEngine;

/// Errors that can occur during turn operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    /// Negative spends and overdrafts are caller contract violations; the
    /// pool is left unchanged.
    #[error("cannot spend {requested} action points with {remaining} remaining")]
    InvalidSpend { requested: i32, remaining: u32 },

    /// The handle does not resolve to an attached character.
    #[error("character {0} is not attached to the world")]
    NoSuchCharacter(CharacterHandle),

    /// The character's targeting state was initialized before spawn.
    #[error("targeting state was already initialized")]
    TargetingAlreadyInitialized,
}

impl<'a> TurnEngine<'a> {
    /// Inserts a character into the rotation.
    ///
    /// Spawning into an empty rotation immediately makes the newcomer
    /// active: the turn counter restarts and the implicit `next_turn()`
    /// counts one full turn. Ordinary insertion places the newcomer at the
    /// cursor position and shifts the cursor by one slot, so the active
    /// character's turn is undisturbed.
    pub fn spawn(&mut self, mut character: Character) -> Result<CharacterHandle, TurnError> {
        character
            .initialize_targeting()
            .map_err(|_| TurnError::TargetingAlreadyInitialized)?;
        let handle = self.state.characters.insert(character);
        match self.state.turn.cursor {
            None => {
                let turn = &mut self.state.turn;
                turn.rotation.push(handle);
                turn.cursor = Some(turn.rotation.len() - 1);
                turn.active = None;
                turn.total_turns = 0;
                self.next_turn();
            }
            Some(cursor) => {
                let turn = &mut self.state.turn;
                turn.rotation.insert(cursor, handle);
                turn.cursor = Some(cursor + 1);
            }
        }
        Ok(handle)
    }

    /// Ends the active turn and begins the next one.
    ///
    /// Ordering is a correctness invariant: the end-of-turn cooldown
    /// countdown runs strictly before the cursor advances, and cursor
    /// re-validation runs strictly before the action-point pool is reset
    /// for the new active character. On an empty rotation this is a no-op.
    pub fn next_turn(&mut self) {
        if let (Some(cursor), Some(active)) = (self.state.turn.cursor, self.state.turn.active) {
            // When the active character was removed mid-turn the rotation
            // already shifted the next participant under the cursor;
            // advancing again would skip it.
            let still_current = self.state.turn.rotation.get(cursor) == Some(&active);
            if still_current {
                if let Some(character) = self.state.characters.get_mut(active) {
                    if !character.is_removed() {
                        character.on_turn_end();
                    }
                }
                let len = self.state.turn.rotation.len();
                self.state.turn.cursor = Some((cursor + 1) % len);
            }
        }
        self.revalidate_cursor();
        self.begin_turn();
    }

    /// Debits the per-turn pool.
    ///
    /// # Errors
    ///
    /// [`TurnError::InvalidSpend`] for negative amounts or spends that
    /// would drive the pool below zero. Exactly zero is a valid terminal
    /// value.
    pub fn spend_action_points(&mut self, amount: i32) -> Result<(), TurnError> {
        let remaining = self.state.turn.action_points;
        if amount < 0 || amount as u32 > remaining {
            return Err(TurnError::InvalidSpend {
                requested: amount,
                remaining,
            });
        }
        self.state.turn.action_points = remaining - amount as u32;
        Ok(())
    }

    /// Removes a character from the rotation and flags it for the sweep.
    ///
    /// Removing the active character does not advance the turn by itself;
    /// the next participant is chosen by the subsequent `next_turn()`.
    pub fn remove(&mut self, handle: CharacterHandle) -> Result<(), TurnError> {
        let character = self
            .state
            .characters
            .get_mut(handle)
            .ok_or(TurnError::NoSuchCharacter(handle))?;
        character.mark_removed();
        self.drop_from_rotation(handle);
        Ok(())
    }

    /// Per-tick maintenance: sweeps removed characters out of the world and
    /// forfeits the turn of an active character that is removed or dead.
    pub fn update(&mut self) {
        // Dead characters are flagged before the sweep list is collected,
        // so a single pass both forfeits the turn and removes the corpse.
        for (_, character) in self.state.characters.iter_mut() {
            if !character.is_alive() {
                character.mark_removed();
            }
        }

        let forfeit = match self.state.turn.active {
            Some(active) => self
                .state
                .characters
                .get(active)
                .map(|character| character.is_removed())
                .unwrap_or(true),
            None => false,
        };

        let swept: Vec<CharacterHandle> = self
            .state
            .characters
            .iter()
            .filter(|(_, character)| character.is_removed())
            .map(|(handle, _)| handle)
            .collect();
        for handle in &swept {
            self.drop_from_rotation(*handle);
        }
        for handle in swept {
            self.state.characters.remove(handle);
        }

        if forfeit {
            self.next_turn();
        } else if self.state.turn.active.is_none() && self.state.turn.cursor.is_some() {
            // The active slot was vacated by a removal; advance into the
            // next participant.
            self.next_turn();
        }
    }

    /// Deletes a handle from the rotation, keeping the cursor on the same
    /// logical character.
    fn drop_from_rotation(&mut self, handle: CharacterHandle) {
        let turn = &mut self.state.turn;
        let Some(index) = turn.rotation.iter().position(|&entry| entry == handle) else {
            return;
        };
        turn.rotation.remove(index);
        let was_active = turn.active == Some(handle);
        if was_active {
            turn.active = None;
        }
        if let Some(cursor) = turn.cursor {
            if turn.rotation.is_empty() {
                turn.cursor = None;
                turn.active = None;
            } else if index < cursor {
                turn.cursor = Some(cursor - 1);
            } else if index == cursor {
                turn.cursor = Some(cursor % turn.rotation.len());
            }
        }
        if was_active {
            // Re-validate in place; the next participant is chosen by the
            // subsequent next_turn(), not by removal.
            self.revalidate_cursor();
        }
    }

    /// Walks the cursor forward past removed entries, deleting them. If
    /// every entry is removed the rotation collapses to empty.
    fn revalidate_cursor(&mut self) {
        loop {
            let Some(cursor) = self.state.turn.cursor else {
                return;
            };
            if self.state.turn.rotation.is_empty() {
                self.state.turn.cursor = None;
                self.state.turn.active = None;
                return;
            }
            let cursor = cursor % self.state.turn.rotation.len();
            self.state.turn.cursor = Some(cursor);
            let handle = self.state.turn.rotation[cursor];
            let removed = self
                .state
                .characters
                .get(handle)
                .map(|character| character.is_removed())
                .unwrap_or(true);
            if !removed {
                return;
            }
            self.state.turn.rotation.remove(cursor);
            if self.state.turn.active == Some(handle) {
                self.state.turn.active = None;
            }
        }
    }

    /// Starts the turn of the character under the cursor: resets the
    /// action-point pool from its attributes and fires the begin-of-turn
    /// hook.
    fn begin_turn(&mut self) {
        let Some(cursor) = self.state.turn.cursor else {
            self.state.turn.active = None;
            self.state.turn.action_points = 0;
            return;
        };
        let handle = self.state.turn.rotation[cursor];
        self.state.turn.active = Some(handle);
        self.state.turn.total_turns += 1;
        if let Some(character) = self.state.characters.get_mut(handle) {
            self.state.turn.action_points = character.progression().action_points_per_turn();
            character.on_turn_begin();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeProgression;
    use crate::env::{PcgRng, RngOracle};
    use crate::state::{Position, WorldState};

    fn character(name: &str) -> Character {
        Character::new(name, Position::ORIGIN, AttributeProgression::new(1))
    }

    fn active_name(state: &WorldState) -> Option<String> {
        let engine_view = state.turn.active?;
        state
            .characters
            .get(engine_view)
            .map(|c| c.name().to_owned())
    }

    #[test]
    fn first_spawn_becomes_active_and_counts_one_turn() {
        let mut state = WorldState::default();
        let mut engine = TurnEngine::new(&mut state);

        let a = engine.spawn(character("a")).unwrap();
        assert!(engine.is_characters_turn(a));
        assert_eq!(engine.total_turns(), 1);
        assert_eq!(
            engine.action_points_remaining(),
            AttributeProgression::new(1).action_points_per_turn()
        );
    }

    #[test]
    fn three_character_round_trip() {
        let mut state = WorldState::default();
        let mut engine = TurnEngine::new(&mut state);

        let a = engine.spawn(character("a")).unwrap();
        let b = engine.spawn(character("b")).unwrap();
        let c = engine.spawn(character("c")).unwrap();

        assert!(engine.is_characters_turn(a));
        engine.next_turn();
        assert!(engine.is_characters_turn(b));
        engine.next_turn();
        assert!(engine.is_characters_turn(c));
        engine.next_turn();
        assert!(engine.is_characters_turn(a));
    }

    #[test]
    fn single_occupant_rotation_repeats_indefinitely() {
        let mut state = WorldState::default();
        let mut engine = TurnEngine::new(&mut state);
        let a = engine.spawn(character("a")).unwrap();

        for _ in 0..100 {
            assert!(engine.is_characters_turn(a));
            engine.next_turn();
            assert!(engine.is_characters_turn(a));
        }
        assert_eq!(engine.total_turns(), 101);
    }

    #[test]
    fn action_point_pool_is_exact_at_the_boundary() {
        let mut state = WorldState::default();
        let mut engine = TurnEngine::new(&mut state);
        engine.spawn(character("a")).unwrap();

        // Level 1 grants 2 action points.
        assert_eq!(engine.action_points_remaining(), 2);
        engine.spend_action_points(1).unwrap();
        assert_eq!(engine.action_points_remaining(), 1);
        engine.spend_action_points(1).unwrap();
        assert_eq!(engine.action_points_remaining(), 0);

        let result = engine.spend_action_points(1);
        assert_eq!(
            result,
            Err(TurnError::InvalidSpend {
                requested: 1,
                remaining: 0,
            })
        );
        assert_eq!(engine.action_points_remaining(), 0);
    }

    #[test]
    fn negative_spend_is_invalid_and_leaves_pool_unchanged() {
        let mut state = WorldState::default();
        let mut engine = TurnEngine::new(&mut state);
        engine.spawn(character("a")).unwrap();

        let result = engine.spend_action_points(-1);
        assert_eq!(
            result,
            Err(TurnError::InvalidSpend {
                requested: -1,
                remaining: 2,
            })
        );
        assert_eq!(engine.action_points_remaining(), 2);
    }

    #[test]
    fn removing_before_cursor_keeps_active_character() {
        let mut state = WorldState::default();
        let mut engine = TurnEngine::new(&mut state);
        let a = engine.spawn(character("a")).unwrap();
        let b = engine.spawn(character("b")).unwrap();
        let c = engine.spawn(character("c")).unwrap();

        engine.next_turn();
        assert!(engine.is_characters_turn(b));

        // a sits before the cursor; removing it must not disturb b's turn.
        engine.remove(a).unwrap();
        assert!(engine.is_characters_turn(b));
        engine.next_turn();
        assert!(engine.is_characters_turn(c));
        engine.next_turn();
        assert!(engine.is_characters_turn(b));
    }

    #[test]
    fn removing_the_active_character_defers_to_next_turn() {
        let mut state = WorldState::default();
        let mut engine = TurnEngine::new(&mut state);
        let a = engine.spawn(character("a")).unwrap();
        let b = engine.spawn(character("b")).unwrap();
        let c = engine.spawn(character("c")).unwrap();

        assert!(engine.is_characters_turn(a));
        engine.remove(a).unwrap();

        // Removal itself chooses nobody.
        assert!(engine.active_handle().is_none());
        assert!(!engine.is_characters_turn(b));

        engine.next_turn();
        assert!(engine.is_characters_turn(b));
        engine.next_turn();
        assert!(engine.is_characters_turn(c));
        engine.next_turn();
        assert!(engine.is_characters_turn(b));
    }

    #[test]
    fn removing_everyone_empties_the_rotation() {
        let mut state = WorldState::default();
        let mut engine = TurnEngine::new(&mut state);
        let a = engine.spawn(character("a")).unwrap();
        let b = engine.spawn(character("b")).unwrap();

        engine.remove(b).unwrap();
        engine.remove(a).unwrap();
        engine.next_turn();

        assert!(engine.active_handle().is_none());
        assert_eq!(engine.action_points_remaining(), 0);

        // The scheduler is inert until the next spawn.
        let total = engine.total_turns();
        engine.next_turn();
        assert_eq!(engine.total_turns(), total);

        let d = engine.spawn(character("d")).unwrap();
        assert!(engine.is_characters_turn(d));
    }

    #[test]
    fn spawn_mid_rotation_inserts_before_active() {
        let mut state = WorldState::default();
        let mut engine = TurnEngine::new(&mut state);
        let a = engine.spawn(character("a")).unwrap();
        let b = engine.spawn(character("b")).unwrap();

        engine.next_turn();
        assert!(engine.is_characters_turn(b));

        // Spawn while b is active: b's turn is undisturbed and the
        // newcomer slots in at the cursor, acting before b next time.
        let c = engine.spawn(character("c")).unwrap();
        assert!(engine.is_characters_turn(b));

        engine.next_turn();
        assert!(engine.is_characters_turn(a));
        engine.next_turn();
        assert!(engine.is_characters_turn(c));
        engine.next_turn();
        assert!(engine.is_characters_turn(b));
    }

    #[test]
    fn update_sweeps_removed_characters_out_of_the_world() {
        let mut state = WorldState::default();
        let mut engine = TurnEngine::new(&mut state);
        let a = engine.spawn(character("a")).unwrap();
        let b = engine.spawn(character("b")).unwrap();

        engine.remove(b).unwrap();
        engine.update();

        assert!(engine.is_characters_turn(a));
        drop(engine);
        assert!(!state.characters.contains(b));
        assert_eq!(state.characters.len(), 1);
    }

    #[test]
    fn update_forfeits_a_dead_active_characters_turn() {
        let mut state = WorldState::default();
        let mut engine = TurnEngine::new(&mut state);
        let a = engine.spawn(character("a")).unwrap();
        let b = engine.spawn(character("b")).unwrap();
        drop(engine);

        if let Some(active) = state.characters.get_mut(a) {
            active.take_damage(1_000.0);
        }
        let mut engine = TurnEngine::new(&mut state);
        engine.update();

        assert!(engine.is_characters_turn(b));
        drop(engine);
        assert!(!state.characters.contains(a));
    }

    #[test]
    fn update_sweeps_a_dead_bystander_in_one_pass() {
        let mut state = WorldState::default();
        let mut engine = TurnEngine::new(&mut state);
        let a = engine.spawn(character("a")).unwrap();
        let b = engine.spawn(character("b")).unwrap();
        drop(engine);

        // b dies without anyone calling remove(); a single update() must
        // both flag and sweep the corpse.
        if let Some(bystander) = state.characters.get_mut(b) {
            bystander.take_damage(1_000.0);
        }
        let mut engine = TurnEngine::new(&mut state);
        engine.update();

        assert!(engine.is_characters_turn(a));
        drop(engine);
        assert!(!state.characters.contains(b));
        assert!(!state.turn.rotation.contains(&b));
    }

    #[test]
    fn random_removal_walk_preserves_relative_order() {
        let names = ["a", "b", "c", "d", "e", "f"];
        let mut state = WorldState::default();
        let mut engine = TurnEngine::new(&mut state);
        let mut handles = Vec::new();
        for name in names {
            handles.push((engine.spawn(character(name)).unwrap(), name));
        }
        drop(engine);

        let rng = PcgRng;
        let mut alive: Vec<(CharacterHandle, &str)> = handles.clone();
        for step in 0..200u64 {
            if alive.len() > 1 && rng.roll_d100(step) <= 30 {
                // Remove a random non-active survivor.
                let candidates: Vec<usize> = (0..alive.len())
                    .filter(|&i| Some(alive[i].0) != state.turn.active)
                    .collect();
                let pick = candidates
                    [(rng.next_u32(step.wrapping_mul(7919)) as usize) % candidates.len()];
                let (handle, _) = alive.remove(pick);
                TurnEngine::new(&mut state).remove(handle).unwrap();
            }

            let before = active_name(&state);
            TurnEngine::new(&mut state).next_turn();
            let after = active_name(&state).expect("rotation never empties in this walk");

            // The new active character is always a survivor, and the
            // rotation preserves spawn-relative order: the successor of the
            // previous active among survivors is exactly who acts next.
            assert!(alive.iter().any(|(_, name)| *name == after));
            if let Some(before) = before {
                let order: Vec<&str> = alive.iter().map(|(_, name)| *name).collect();
                if let Some(prev_index) = order.iter().position(|&n| n == before) {
                    let expected = order[(prev_index + 1) % order.len()];
                    assert_eq!(after, expected);
                }
            }
        }
    }
}
