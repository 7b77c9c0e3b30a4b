//! Controller components: the decision-making half of an ability pair.

use super::{Ability, AbilityKind};
use crate::engine::WorldView;
use crate::env::Occupant;
use crate::state::CardinalDirection;
use crate::targeting::TargetingState;

/// Which decision policy drives a component. The registry uses the key form
/// to register player and AI variants under the same ability.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ControllerVariant {
    Player,
    Ai,
}

impl ControllerVariant {
    pub fn as_key(self) -> &'static str {
        self.into()
    }
}

/// Decision-maker bound to exactly one ability for its whole lifetime.
///
/// Components hold transient per-tick state only: desired target, desired
/// direction, a "wants to act" flag. Shared target-selection state lives in
/// the owning character's [`TargetingState`] and is threaded through every
/// call, because at most one targeted ability is active for selection at a
/// time.
pub trait ControllerComponent {
    /// The ability shape this component is compatible with. Pairing with
    /// any other shape is rejected at construction.
    fn ability_kind(&self) -> AbilityKind;

    fn variant(&self) -> ControllerVariant;

    /// Refreshes intent for the current tick. `ability` is the bound
    /// ability (needed for range and candidate checks during target
    /// acquisition).
    fn update_input(
        &mut self,
        view: &WorldView<'_>,
        ability: &dyn Ability,
        targeting: &mut TargetingState,
    );

    fn wants_to_act(&self, targeting: &TargetingState) -> bool;

    fn target(&self, _targeting: &TargetingState) -> Option<Occupant> {
        None
    }

    fn direction(&self, _targeting: &TargetingState) -> Option<CardinalDirection> {
        None
    }

    /// Policy-level veto over a candidate the targeting search proposes.
    fn wants_perform_on(
        &self,
        _view: &WorldView<'_>,
        _target: Occupant,
        _direction: CardinalDirection,
    ) -> bool {
        true
    }

    /// Called after the bound ability performed successfully; clears
    /// transient target/intent state.
    fn notify_performed(&mut self, targeting: &mut TargetingState);

    /// Begin-of-turn hook for resetting per-turn intent.
    fn on_turn_begin(&mut self) {}
}
