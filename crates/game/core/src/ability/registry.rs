//! Process-wide table of ability and component shapes.
//!
//! The registry is an explicit value built once at startup and passed by
//! reference to whatever needs it (the persistence layer validates and
//! constructs ability/component pairs loaded from configuration through
//! it). There is no global static and no load-order dependency.
//!
//! Construction-time pairing is enforced here: a component factory can only
//! be registered under an ability whose kind it reports, so every pair the
//! registry mints is compatible by construction.

use std::collections::HashMap;

use super::{Ability, AbilityKind, ControllerComponent, ControllerVariant};

/// Factory producing a fresh ability instance.
pub type AbilityFactory = Box<dyn Fn() -> Box<dyn Ability> + Send + Sync>;

/// Factory producing a fresh controller component instance.
pub type ComponentFactory = Box<dyn Fn() -> Box<dyn ControllerComponent> + Send + Sync>;

/// Errors raised during registration and lookup.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no ability registered under key {0:?}")]
    UnknownAbilityKey(String),

    #[error("no component {component:?} registered under ability {ability:?}")]
    UnknownComponentKey { ability: String, component: String },

    #[error("no ability of kind {0} registered")]
    UnknownKind(AbilityKind),

    #[error("no {variant} component registered for ability kind {kind}")]
    UnknownVariant {
        kind: AbilityKind,
        variant: ControllerVariant,
    },

    #[error("key {0:?} is already registered")]
    DuplicateKey(String),

    #[error("factory for key {key:?} produces kind {found}, expected {expected}")]
    KindMismatch {
        key: String,
        expected: AbilityKind,
        found: AbilityKind,
    },
}

struct AbilityEntry {
    kind: AbilityKind,
    factory: AbilityFactory,
    components: HashMap<String, ComponentFactory>,
}

/// String-keyed registry of ability shapes and their component shapes.
///
/// Read-only after initialization; all mutation happens through the
/// registration builder during startup.
#[derive(Default)]
pub struct AbilityRegistry {
    entries: HashMap<String, AbilityEntry>,
}

impl AbilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an ability shape under `key` and returns a builder for its
    /// component sub-registrations.
    ///
    /// The factory is probed once so a factory producing the wrong kind is
    /// caught at startup, not at instantiation.
    pub fn register_ability(
        &mut self,
        key: impl Into<String>,
        kind: AbilityKind,
        factory: AbilityFactory,
    ) -> Result<AbilityBuilder<'_>, RegistryError> {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return Err(RegistryError::DuplicateKey(key));
        }
        let probe = factory();
        if probe.kind() != kind {
            return Err(RegistryError::KindMismatch {
                key,
                expected: kind,
                found: probe.kind(),
            });
        }
        self.entries.insert(
            key.clone(),
            AbilityEntry {
                kind,
                factory,
                components: HashMap::new(),
            },
        );
        let entry = self
            .entries
            .get_mut(&key)
            .ok_or(RegistryError::UnknownAbilityKey(key))?;
        Ok(AbilityBuilder { entry })
    }

    /// The ability shape registered under `key`.
    pub fn ability_kind(&self, key: &str) -> Result<AbilityKind, RegistryError> {
        self.entry(key).map(|entry| entry.kind)
    }

    /// The shared shape of a registered (ability key, component key) pair.
    /// Succeeding here proves the two keys name a compatible pair.
    pub fn component_kind(
        &self,
        ability_key: &str,
        component_key: &str,
    ) -> Result<AbilityKind, RegistryError> {
        let entry = self.entry(ability_key)?;
        if !entry.components.contains_key(component_key) {
            return Err(RegistryError::UnknownComponentKey {
                ability: ability_key.to_owned(),
                component: component_key.to_owned(),
            });
        }
        Ok(entry.kind)
    }

    /// Constructs a guaranteed-compatible (ability, component) pair.
    pub fn instantiate(
        &self,
        ability_key: &str,
        component_key: &str,
    ) -> Result<(Box<dyn Ability>, Box<dyn ControllerComponent>), RegistryError> {
        let entry = self.entry(ability_key)?;
        let component_factory = entry.components.get(component_key).ok_or_else(|| {
            RegistryError::UnknownComponentKey {
                ability: ability_key.to_owned(),
                component: component_key.to_owned(),
            }
        })?;
        Ok(((entry.factory)(), component_factory()))
    }

    /// Fresh ability of the given kind, regardless of registry key.
    pub fn new_ability(&self, kind: AbilityKind) -> Result<Box<dyn Ability>, RegistryError> {
        let entry = self.entry_for_kind(kind)?;
        Ok((entry.factory)())
    }

    /// Fresh component of the given kind and controller variant.
    pub fn new_component(
        &self,
        kind: AbilityKind,
        variant: ControllerVariant,
    ) -> Result<Box<dyn ControllerComponent>, RegistryError> {
        let entry = self.entry_for_kind(kind)?;
        let factory = entry
            .components
            .get(variant.as_key())
            .ok_or(RegistryError::UnknownVariant { kind, variant })?;
        Ok(factory())
    }

    /// The factory that can reproduce the given ability instance's shape.
    pub fn ability_factory(&self, ability: &dyn Ability) -> Result<&AbilityFactory, RegistryError> {
        self.entry_for_kind(ability.kind()).map(|entry| &entry.factory)
    }

    /// The factory that can reproduce the component bound to the given
    /// ability instance.
    ///
    /// # Errors
    ///
    /// Fails when the component reports a different shape than the ability,
    /// or when its variant was never registered for that shape.
    pub fn component_factory(
        &self,
        ability: &dyn Ability,
        component: &dyn ControllerComponent,
    ) -> Result<&ComponentFactory, RegistryError> {
        let kind = ability.kind();
        if component.ability_kind() != kind {
            return Err(RegistryError::UnknownVariant {
                kind,
                variant: component.variant(),
            });
        }
        let entry = self.entry_for_kind(kind)?;
        entry
            .components
            .get(component.variant().as_key())
            .ok_or(RegistryError::UnknownVariant {
                kind,
                variant: component.variant(),
            })
    }

    fn entry(&self, key: &str) -> Result<&AbilityEntry, RegistryError> {
        self.entries
            .get(key)
            .ok_or_else(|| RegistryError::UnknownAbilityKey(key.to_owned()))
    }

    fn entry_for_kind(&self, kind: AbilityKind) -> Result<&AbilityEntry, RegistryError> {
        self.entries
            .values()
            .find(|entry| entry.kind == kind)
            .ok_or(RegistryError::UnknownKind(kind))
    }
}

/// Chainable sub-registration of component shapes under one ability key.
pub struct AbilityBuilder<'r> {
    entry: &'r mut AbilityEntry,
}

impl<'r> AbilityBuilder<'r> {
    /// Registers a component factory under this ability.
    ///
    /// The factory is probed once; a component reporting a different
    /// ability kind is rejected so incompatible pairs cannot be minted
    /// later.
    pub fn register_component(
        self,
        key: impl Into<String>,
        factory: ComponentFactory,
    ) -> Result<Self, RegistryError> {
        let key = key.into();
        if self.entry.components.contains_key(&key) {
            return Err(RegistryError::DuplicateKey(key));
        }
        let probe = factory();
        if probe.ability_kind() != self.entry.kind {
            return Err(RegistryError::KindMismatch {
                key,
                expected: self.entry.kind,
                found: probe.ability_kind(),
            });
        }
        self.entry.components.insert(key, factory);
        Ok(self)
    }
}

/// Builds the registry for the shipped ability roster, with player and AI
/// controller variants for each.
pub fn default_registry() -> AbilityRegistry {
    use crate::abilities::{
        AiEndTurnComponent, AiMoveComponent, AiTargetedComponent, AiWarcryComponent,
        AttackAbility, EndTurnAbility, KickAbility, MoveAbility, PlayerEndTurnComponent,
        PlayerMoveComponent, PlayerTargetedComponent, PlayerWarcryComponent, WarcryAbility,
    };

    let mut registry = AbilityRegistry::new();

    // The shipped roster registers under the kinds' snake_case names; a
    // registration failure here is a programming error in this function,
    // and the expect calls only ever run during startup wiring.
    let player = ControllerVariant::Player.as_key();
    let ai = ControllerVariant::Ai.as_key();

    registry
        .register_ability(
            <&'static str>::from(AbilityKind::Move),
            AbilityKind::Move,
            Box::new(|| Box::new(MoveAbility::new())),
        )
        .and_then(|builder| {
            builder.register_component(player, Box::new(|| Box::new(PlayerMoveComponent::new())))
        })
        .and_then(|builder| {
            builder.register_component(ai, Box::new(|| Box::new(AiMoveComponent::new())))
        })
        .expect("move registration is statically consistent");

    registry
        .register_ability(
            <&'static str>::from(AbilityKind::Attack),
            AbilityKind::Attack,
            Box::new(|| Box::new(AttackAbility::new())),
        )
        .and_then(|builder| {
            builder.register_component(
                player,
                Box::new(|| Box::new(PlayerTargetedComponent::new(AbilityKind::Attack))),
            )
        })
        .and_then(|builder| {
            builder.register_component(
                ai,
                Box::new(|| Box::new(AiTargetedComponent::new(AbilityKind::Attack))),
            )
        })
        .expect("attack registration is statically consistent");

    registry
        .register_ability(
            <&'static str>::from(AbilityKind::Kick),
            AbilityKind::Kick,
            Box::new(|| Box::new(KickAbility::new())),
        )
        .and_then(|builder| {
            builder.register_component(
                player,
                Box::new(|| Box::new(PlayerTargetedComponent::new(AbilityKind::Kick))),
            )
        })
        .and_then(|builder| {
            builder.register_component(
                ai,
                Box::new(|| Box::new(AiTargetedComponent::new(AbilityKind::Kick))),
            )
        })
        .expect("kick registration is statically consistent");

    registry
        .register_ability(
            <&'static str>::from(AbilityKind::Warcry),
            AbilityKind::Warcry,
            Box::new(|| Box::new(WarcryAbility::new())),
        )
        .and_then(|builder| {
            builder
                .register_component(player, Box::new(|| Box::new(PlayerWarcryComponent::new())))
        })
        .and_then(|builder| {
            builder.register_component(ai, Box::new(|| Box::new(AiWarcryComponent::new())))
        })
        .expect("warcry registration is statically consistent");

    registry
        .register_ability(
            <&'static str>::from(AbilityKind::EndTurn),
            AbilityKind::EndTurn,
            Box::new(|| Box::new(EndTurnAbility::new())),
        )
        .and_then(|builder| {
            builder
                .register_component(player, Box::new(|| Box::new(PlayerEndTurnComponent::new())))
        })
        .and_then(|builder| {
            builder.register_component(ai, Box::new(|| Box::new(AiEndTurnComponent::new())))
        })
        .expect("end_turn registration is statically consistent");

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::{AiMoveComponent, AttackAbility, MoveAbility};

    #[test]
    fn keys_resolve_to_kinds() {
        let registry = default_registry();
        assert_eq!(registry.ability_kind("move").unwrap(), AbilityKind::Move);
        assert_eq!(
            registry.component_kind("attack", "ai").unwrap(),
            AbilityKind::Attack
        );
        assert!(matches!(
            registry.ability_kind("fireball"),
            Err(RegistryError::UnknownAbilityKey(_))
        ));
    }

    #[test]
    fn instantiate_mints_matching_pairs() {
        let registry = default_registry();
        for key in ["move", "attack", "kick", "warcry", "end_turn"] {
            let (ability, component) = registry.instantiate(key, "player").unwrap();
            assert_eq!(ability.kind(), component.ability_kind());
        }
    }

    #[test]
    fn mismatched_component_factory_is_rejected_at_registration() {
        let mut registry = AbilityRegistry::new();
        let result = registry
            .register_ability(
                "attack",
                AbilityKind::Attack,
                Box::new(|| Box::new(AttackAbility::new())),
            )
            .and_then(|builder| {
                // A move component cannot drive an attack ability.
                builder.register_component("ai", Box::new(|| Box::new(AiMoveComponent::new())))
            });
        assert!(matches!(result, Err(RegistryError::KindMismatch { .. })));
    }

    #[test]
    fn mismatched_ability_factory_is_rejected_at_registration() {
        let mut registry = AbilityRegistry::new();
        let result = registry.register_ability(
            "attack",
            AbilityKind::Attack,
            Box::new(|| Box::new(MoveAbility::new())),
        );
        assert!(matches!(result, Err(RegistryError::KindMismatch { .. })));
    }

    #[test]
    fn factories_resolve_by_instance() {
        let registry = default_registry();
        let (ability, component) = registry.instantiate("kick", "ai").unwrap();
        let rebuilt = registry.ability_factory(ability.as_ref()).unwrap()();
        assert_eq!(rebuilt.kind(), AbilityKind::Kick);
        let rebuilt = registry
            .component_factory(ability.as_ref(), component.as_ref())
            .unwrap()();
        assert_eq!(rebuilt.ability_kind(), AbilityKind::Kick);
    }
}
