//! Generational slot arena for characters.
//!
//! The turn rotation stores [`CharacterHandle`]s instead of indices into a
//! raw array, so removing a participant can never leave a dangling cursor:
//! a freed slot bumps its generation and every stale handle simply stops
//! resolving.

use std::fmt;

use super::character::Character;

/// Stable handle to a character slot in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterHandle {
    index: u32,
    generation: u32,
}

impl CharacterHandle {
    /// Slot index, used only for deterministic seed derivation.
    pub fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Display for CharacterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

struct Slot {
    generation: u32,
    character: Option<Character>,
}

/// Owns every character attached to the world.
///
/// Slots are reused after removal; the generation counter guarantees a
/// handle minted for a previous occupant never resolves to the new one.
#[derive(Default)]
pub struct CharacterArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl CharacterArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a character and returns its handle. A character is attached
    /// exactly once; the arena takes ownership.
    pub fn insert(&mut self, character: Character) -> CharacterHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.character = Some(character);
            CharacterHandle {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                character: Some(character),
            });
            CharacterHandle {
                index,
                generation: 0,
            }
        }
    }

    pub fn get(&self, handle: CharacterHandle) -> Option<&Character> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.character.as_ref()
    }

    pub fn get_mut(&mut self, handle: CharacterHandle) -> Option<&mut Character> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.character.as_mut()
    }

    /// Frees the slot and returns the character. The slot's generation is
    /// bumped so the handle (and any copies of it) go stale.
    pub fn remove(&mut self, handle: CharacterHandle) -> Option<Character> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let character = slot.character.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        Some(character)
    }

    pub fn contains(&self, handle: CharacterHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Live characters in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (CharacterHandle, &Character)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let character = slot.character.as_ref()?;
            let handle = CharacterHandle {
                index: index as u32,
                generation: slot.generation,
            };
            Some((handle, character))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (CharacterHandle, &mut Character)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            let character = slot.character.as_mut()?;
            let handle = CharacterHandle {
                index: index as u32,
                generation,
            };
            Some((handle, character))
        })
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.character.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mutable access to two distinct characters at once, used when an
    /// effect touches both its source and its target.
    pub fn get2_mut(
        &mut self,
        first: CharacterHandle,
        second: CharacterHandle,
    ) -> Option<(&mut Character, &mut Character)> {
        if first.index == second.index {
            return None;
        }
        let (low, high, swapped) = if first.index < second.index {
            (first, second, false)
        } else {
            (second, first, true)
        };
        let (head, tail) = self.slots.split_at_mut(high.index as usize);
        let low_slot = head.get_mut(low.index as usize)?;
        let high_slot = tail.first_mut()?;
        if low_slot.generation != low.generation || high_slot.generation != high.generation {
            return None;
        }
        let low_character = low_slot.character.as_mut()?;
        let high_character = high_slot.character.as_mut()?;
        if swapped {
            Some((high_character, low_character))
        } else {
            Some((low_character, high_character))
        }
    }
}
