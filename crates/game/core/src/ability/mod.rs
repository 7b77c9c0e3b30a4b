//! The two-sided ability contract.
//!
//! An [`Ability`] describes *what* can happen; its bound
//! [`ControllerComponent`] decides *when* it should happen. The two halves
//! are keyed by the shared [`AbilityKind`] discriminant, and only the
//! registry (or [`AbilitySet::add`], which checks kinds) can pair them, so
//! a component can never end up driving an ability of a different shape.
//!
//! [`AbilitySet::add`]: set::AbilitySet::add

pub mod controller;
pub mod cooldown;
pub mod registry;
pub mod set;

pub use controller::{ControllerComponent, ControllerVariant};
pub use cooldown::{CooldownError, CooldownTimer};
pub use registry::{AbilityRegistry, RegistryError};
pub use set::{AbilityPair, AbilitySet, AbilitySetError};

use crate::attributes::AttributeProgression;
use crate::engine::{PerformContext, WorldView};
use crate::env::Occupant;
use crate::state::CardinalDirection;

/// Discriminant shared by an ability and its controller component.
///
/// The snake_case string form doubles as the default registry key.
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
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityKind {
    Move,
    Attack,
    Kick,
    Warcry,
    EndTurn,
}

/// A unit of possible game effect owned by exactly one character.
///
/// Mutable state is limited to the cooldown timer and the priority integer;
/// cost, cooldown length, and range derive from the owner's attributes.
pub trait Ability {
    fn kind(&self) -> AbilityKind;

    /// Resolution order, ascending. End-turn abilities sort last by
    /// convention.
    fn priority(&self) -> i32;

    fn set_priority(&mut self, priority: i32);

    /// Action points debited from the turn pool when performed.
    fn cost(&self, progression: &AttributeProgression) -> u32;

    /// Turns the ability stays unavailable after performing. Zero means no
    /// cooldown.
    fn cooldown_length(&self, progression: &AttributeProgression) -> u32;

    fn cooldown(&self) -> &CooldownTimer;

    fn cooldown_mut(&mut self) -> &mut CooldownTimer;

    /// Reach of the target search, in tiles along a cardinal ray.
    fn range(&self, _progression: &AttributeProgression) -> u32 {
        1
    }

    /// Whether this ability acts on another object and therefore takes part
    /// in target selection.
    fn is_targeted(&self) -> bool {
        false
    }

    /// Shape-level eligibility of a candidate. The targeting search has
    /// already checked liveness and removal; this hook restricts the kind of
    /// occupant the ability accepts.
    fn can_perform_on(
        &self,
        _view: &WorldView<'_>,
        _target: Occupant,
        _direction: CardinalDirection,
    ) -> bool {
        false
    }

    /// Executes the effect. Returns `false` when the ability declines (the
    /// target became invalid between intent and execution, the destination
    /// is blocked, ...). Declining is a normal outcome, not an error: the
    /// resolution loop moves on to the next-priority ability.
    fn perform(&mut self, ctx: &mut PerformContext<'_>) -> bool;
}
