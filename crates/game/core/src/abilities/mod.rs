//! The shipped ability roster.
//!
//! Each submodule pairs one ability shape with its player and AI controller
//! components. Attack and kick share the generic targeted components from
//! [`targeted`] since their decision logic is identical; only the ability
//! half differs.

mod attack;
mod end_turn;
mod kick;
mod movement;
mod targeted;
mod warcry;

pub use attack::AttackAbility;
pub use end_turn::{AiEndTurnComponent, EndTurnAbility, PlayerEndTurnComponent};
pub use kick::KickAbility;
pub use movement::{AiMoveComponent, MoveAbility, PlayerMoveComponent};
pub use targeted::{AiTargetedComponent, PlayerTargetedComponent};
pub use warcry::{AiWarcryComponent, PlayerWarcryComponent, WarcryAbility};

#[cfg(test)]
pub(crate) mod testkit {
    use std::collections::HashSet;

    use crate::ability::{AbilityKind, ControllerVariant, registry::default_registry};
    use crate::attributes::AttributeProgression;
    use crate::engine::TurnEngine;
    use crate::env::{InputKey, InputOracle, RngOracle};
    use crate::state::{Character, CharacterHandle, Position, WorldState};

    /// Input oracle reporting exactly the listed bindings as active.
    pub struct ScriptedInput {
        active: HashSet<InputKey>,
    }

    impl ScriptedInput {
        pub fn pressing(keys: &[InputKey]) -> Self {
            Self {
                active: keys.iter().copied().collect(),
            }
        }
    }

    impl InputOracle for ScriptedInput {
        fn is_active(&self, key: InputKey) -> bool {
            self.active.contains(&key)
        }
    }

    /// Rng oracle ignoring the seed. `FixedRng(0)` rolls 1 on a d100 (always
    /// hits), `FixedRng(99)` rolls 100 (always misses).
    pub struct FixedRng(pub u32);

    impl RngOracle for FixedRng {
        fn next_u32(&self, _seed: u64) -> u32 {
            self.0
        }
    }

    /// Spawns a level-1 character owning the given abilities, instantiated
    /// from the default registry with the given controller variant.
    pub fn spawn_with(
        state: &mut WorldState,
        name: &str,
        position: Position,
        variant: ControllerVariant,
        kinds: &[AbilityKind],
    ) -> CharacterHandle {
        let mut character = Character::new(name, position, AttributeProgression::new(1));
        let registry = default_registry();
        for &kind in kinds {
            let ability = registry.new_ability(kind).unwrap();
            let component = registry.new_component(kind, variant).unwrap();
            character.abilities_mut().add(ability, component).unwrap();
        }
        TurnEngine::new(state).spawn(character).unwrap()
    }
}
