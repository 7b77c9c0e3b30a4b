//! Per-character registry of (ability, controller component) pairs.

use arrayvec::ArrayVec;

use super::registry::{AbilityRegistry, RegistryError};
use super::{Ability, AbilityKind, ControllerComponent};
use crate::config::EngineConfig;

/// Errors raised by ability-set operations.
#[derive(Debug, thiserror::Error)]
pub enum AbilitySetError {
    /// The ability and component disagree on their shape. Pairs are only
    /// compatible when both halves share one [`AbilityKind`].
    #[error("component for {component} cannot drive a {ability} ability")]
    KindMismatch {
        ability: AbilityKind,
        component: AbilityKind,
    },

    /// At most one instance of a given ability shape per character.
    #[error("character already owns a {0} ability")]
    DuplicateKind(AbilityKind),

    /// The set holds at most [`EngineConfig::MAX_ABILITIES`] pairs.
    #[error("ability set is full")]
    CapacityExceeded,

    /// Lookup by instance found no matching registration: the ability
    /// detached from its set somewhere. Programming error, not repaired.
    #[error("ability instance of kind {0} is not registered in this set")]
    Detached(AbilityKind),

    /// Cloning needs registry factories for every template pair.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// One owned ability bound to its controller component.
pub struct AbilityPair {
    pub ability: Box<dyn Ability>,
    pub component: Box<dyn ControllerComponent>,
}

/// The abilities one character owns, keyed by shape.
///
/// Iteration is always ascending by ability priority, ties broken by
/// insertion order. Lookups are linear; a character owns a few dozen
/// abilities at most.
#[derive(Default)]
pub struct AbilitySet {
    entries: ArrayVec<AbilityPair, { EngineConfig::MAX_ABILITIES }>,
}

impl AbilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pair, keyed by the ability's shape.
    ///
    /// # Errors
    ///
    /// [`AbilitySetError::KindMismatch`] if the halves disagree on shape,
    /// [`AbilitySetError::DuplicateKind`] if the character already owns an
    /// ability of this shape.
    pub fn add(
        &mut self,
        ability: Box<dyn Ability>,
        component: Box<dyn ControllerComponent>,
    ) -> Result<(), AbilitySetError> {
        let kind = ability.kind();
        if component.ability_kind() != kind {
            return Err(AbilitySetError::KindMismatch {
                ability: kind,
                component: component.ability_kind(),
            });
        }
        if self.ability(kind).is_some() {
            return Err(AbilitySetError::DuplicateKind(kind));
        }
        self.entries
            .try_push(AbilityPair { ability, component })
            .map_err(|_| AbilitySetError::CapacityExceeded)
    }

    pub fn ability(&self, kind: AbilityKind) -> Option<&dyn Ability> {
        self.entries
            .iter()
            .find(|pair| pair.ability.kind() == kind)
            .map(|pair| pair.ability.as_ref())
    }

    pub fn ability_mut(&mut self, kind: AbilityKind) -> Option<&mut (dyn Ability + '_)> {
        for pair in self.entries.iter_mut() {
            if pair.ability.kind() == kind {
                return Some(pair.ability.as_mut());
            }
        }
        None
    }

    pub fn component(&self, kind: AbilityKind) -> Option<&dyn ControllerComponent> {
        self.entries
            .iter()
            .find(|pair| pair.ability.kind() == kind)
            .map(|pair| pair.component.as_ref())
    }

    /// Lookup by ability *instance* rather than shape.
    ///
    /// # Errors
    ///
    /// [`AbilitySetError::Detached`] when the instance was never registered
    /// here (same-shape instances from another set do not count).
    pub fn component_responsible_for(
        &self,
        ability: &dyn Ability,
    ) -> Result<&dyn ControllerComponent, AbilitySetError> {
        self.entries
            .iter()
            .find(|pair| std::ptr::addr_eq(pair.ability.as_ref(), ability))
            .map(|pair| pair.component.as_ref())
            .ok_or(AbilitySetError::Detached(ability.kind()))
    }

    /// Constructs fresh pairs matching a template set's shapes, copying
    /// each ability's priority. Used when instantiating a playable
    /// character from a prototype; the clone shares no mutable state with
    /// the template.
    pub fn clone_abilities_from(
        &mut self,
        template: &AbilitySet,
        registry: &AbilityRegistry,
    ) -> Result<(), AbilitySetError> {
        for pair in template.iter_ordered() {
            let kind = pair.ability.kind();
            let mut ability = registry.new_ability(kind)?;
            ability.set_priority(pair.ability.priority());
            let component = registry.new_component(kind, pair.component.variant())?;
            self.add(ability, component)?;
        }
        Ok(())
    }

    /// Pairs in resolution order: ascending priority, stable on ties.
    pub fn iter_ordered(&self) -> impl Iterator<Item = &AbilityPair> {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by_key(|&index| self.entries[index].ability.priority());
        order.into_iter().map(|index| &self.entries[index])
    }

    /// Entry indices in resolution order, for callers that need mutable
    /// access pair by pair.
    pub(crate) fn ordered_indices(
        &self,
    ) -> ArrayVec<usize, { EngineConfig::MAX_ABILITIES }> {
        let mut order: ArrayVec<usize, { EngineConfig::MAX_ABILITIES }> =
            (0..self.entries.len()).collect();
        order.sort_by_key(|&index| self.entries[index].ability.priority());
        order
    }

    pub(crate) fn pair_mut(&mut self, index: usize) -> Option<&mut AbilityPair> {
        self.entries.get_mut(index)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AbilityPair> {
        self.entries.iter_mut()
    }

    /// Kinds of the owned targeted abilities, in resolution order.
    pub fn targeted_kinds(&self) -> impl Iterator<Item = AbilityKind> + '_ {
        self.iter_ordered()
            .filter(|pair| pair.ability.is_targeted())
            .map(|pair| pair.ability.kind())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::{AttackAbility, MoveAbility};
    use crate::ability::ControllerVariant;
    use crate::ability::registry::default_registry;

    fn component_for(kind: AbilityKind) -> Box<dyn ControllerComponent> {
        default_registry()
            .new_component(kind, ControllerVariant::Ai)
            .unwrap()
    }

    #[test]
    fn mismatched_pair_is_rejected() {
        let mut set = AbilitySet::new();
        let result = set.add(Box::new(MoveAbility::new()), component_for(AbilityKind::Attack));
        assert!(matches!(
            result,
            Err(AbilitySetError::KindMismatch {
                ability: AbilityKind::Move,
                component: AbilityKind::Attack,
            })
        ));
        assert!(set.is_empty());
    }

    #[test]
    fn duplicate_shape_is_rejected() {
        let mut set = AbilitySet::new();
        set.add(Box::new(MoveAbility::new()), component_for(AbilityKind::Move))
            .unwrap();
        let result = set.add(Box::new(MoveAbility::new()), component_for(AbilityKind::Move));
        assert!(matches!(result, Err(AbilitySetError::DuplicateKind(AbilityKind::Move))));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn iteration_is_priority_ordered_with_stable_ties() {
        let mut set = AbilitySet::new();
        let mut attack = AttackAbility::new();
        attack.set_priority(5);
        let mut mv = MoveAbility::new();
        mv.set_priority(5);
        set.add(Box::new(attack), component_for(AbilityKind::Attack))
            .unwrap();
        set.add(Box::new(mv), component_for(AbilityKind::Move)).unwrap();

        let kinds: Vec<_> = set.iter_ordered().map(|pair| pair.ability.kind()).collect();
        // Equal priorities keep insertion order.
        assert_eq!(kinds, vec![AbilityKind::Attack, AbilityKind::Move]);
    }

    #[test]
    fn foreign_instance_lookup_is_detached() {
        let mut set = AbilitySet::new();
        set.add(Box::new(MoveAbility::new()), component_for(AbilityKind::Move))
            .unwrap();

        let registered = set.ability(AbilityKind::Move).unwrap();
        assert!(set.component_responsible_for(registered).is_ok());

        // Same shape, different instance.
        let foreign = MoveAbility::new();
        assert!(matches!(
            set.component_responsible_for(&foreign),
            Err(AbilitySetError::Detached(AbilityKind::Move))
        ));
    }

    #[test]
    fn clone_produces_independent_pairs() {
        let registry = default_registry();
        let mut template = AbilitySet::new();
        let mut attack = AttackAbility::new();
        attack.set_priority(42);
        template
            .add(Box::new(attack), component_for(AbilityKind::Attack))
            .unwrap();
        template
            .add(Box::new(MoveAbility::new()), component_for(AbilityKind::Move))
            .unwrap();

        let mut clone = AbilitySet::new();
        clone.clone_abilities_from(&template, &registry).unwrap();

        assert_eq!(clone.len(), template.len());
        assert_eq!(clone.ability(AbilityKind::Attack).unwrap().priority(), 42);

        // Mutating the clone's cooldown never touches the template.
        clone
            .ability_mut(AbilityKind::Attack)
            .unwrap()
            .cooldown_mut()
            .start(3);
        assert!(template.ability(AbilityKind::Attack).unwrap().cooldown().is_ready());
        assert!(!clone.ability(AbilityKind::Attack).unwrap().cooldown().is_ready());
    }
}
