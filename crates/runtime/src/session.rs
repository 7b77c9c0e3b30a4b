//! Session driver: owns the world, the oracle bindings, and the bus.

use tactics_core::{
    AbilityRegistry, AbilitySetError, AttributeProgression, Character, CharacterHandle,
    ControllerVariant, EngineConfig, Env, GridOracle, InputOracle, PcgRng, Position, RegistryError,
    RngOracle, TickOutcome, TurnEngine, TurnError, WorldState,
    ability::{AbilityKind, registry::default_registry},
};

use crate::events::{BusSink, EventBus, Topic};

/// Errors surfaced by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    AbilitySet(#[from] AbilitySetError),
}

/// One running play session: world state, oracle bindings, the ability
/// registry, and the event bus.
///
/// The session is the synchronous heart the host drives tick by tick;
/// everything async (subscribers draining the bus) lives outside it.
pub struct Session {
    state: WorldState,
    registry: AbilityRegistry,
    bus: EventBus,
    sink: BusSink,
    map: Option<Box<dyn GridOracle>>,
    input: Option<Box<dyn InputOracle>>,
    rng: Box<dyn RngOracle>,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// The bus this session publishes onto; clone it to subscribe from
    /// other tasks.
    pub fn bus(&self) -> EventBus {
        self.bus.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> tokio::sync::broadcast::Receiver<tactics_core::GameEvent> {
        self.bus.subscribe(topic)
    }

    pub fn world(&self) -> &WorldState {
        &self.state
    }

    pub fn registry(&self) -> &AbilityRegistry {
        &self.registry
    }

    pub fn active_character(&self) -> Option<CharacterHandle> {
        self.state.turn.active
    }

    pub fn total_turns(&self) -> u64 {
        self.state.turn.total_turns
    }

    pub fn action_points_remaining(&self) -> u32 {
        self.state.turn.action_points
    }

    /// Builds a character owning the given abilities (instantiated from the
    /// registry with the given controller variant) and inserts it into the
    /// rotation.
    pub fn spawn_character(
        &mut self,
        name: &str,
        position: Position,
        level: u32,
        variant: ControllerVariant,
        kinds: &[AbilityKind],
    ) -> Result<CharacterHandle, SessionError> {
        let mut character = Character::new(name, position, AttributeProgression::new(level));
        for &kind in kinds {
            let ability = self.registry.new_ability(kind)?;
            let component = self.registry.new_component(kind, variant)?;
            character.abilities_mut().add(ability, component)?;
        }
        let handle = TurnEngine::new(&mut self.state).spawn(character)?;
        tracing::info!(%handle, name, ?variant, "character joined the rotation");
        Ok(handle)
    }

    /// Removes a character from the rotation.
    pub fn remove_character(&mut self, handle: CharacterHandle) -> Result<(), SessionError> {
        TurnEngine::new(&mut self.state).remove(handle)?;
        tracing::info!(%handle, "character removed");
        Ok(())
    }

    /// Runs one resolution tick for the active character.
    pub fn tick(&mut self) -> TickOutcome {
        let env = Env::new(
            self.map.as_deref(),
            self.input.as_deref(),
            Some(self.rng.as_ref()),
        );
        let outcome = TurnEngine::new(&mut self.state).tick(&env, &mut self.sink);
        if outcome.performed.is_some() || outcome.turn_advanced {
            tracing::debug!(
                performed = ?outcome.performed,
                turn_advanced = outcome.turn_advanced,
                total_turns = self.state.turn.total_turns,
                "tick resolved"
            );
        }
        outcome
    }

    /// Forces the rotation to advance, ending the active turn.
    pub fn advance_turn(&mut self) {
        TurnEngine::new(&mut self.state).next_turn();
        tracing::debug!(
            active = ?self.state.turn.active,
            total_turns = self.state.turn.total_turns,
            "turn advanced"
        );
    }

    /// Sweeps removed characters and forfeits dead active turns.
    pub fn update(&mut self) {
        TurnEngine::new(&mut self.state).update();
    }
}

/// Builder for [`Session`]; oracles not supplied stay absent, which the
/// engine treats as "unbounded map, no input, no randomness".
pub struct SessionBuilder {
    config: EngineConfig,
    event_capacity: usize,
    registry: Option<AbilityRegistry>,
    map: Option<Box<dyn GridOracle>>,
    input: Option<Box<dyn InputOracle>>,
    rng: Option<Box<dyn RngOracle>>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            event_capacity: 100,
            registry: None,
            map: None,
            input: None,
            rng: None,
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config = EngineConfig::with_seed(seed);
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Replaces the default ability registry.
    pub fn registry(mut self, registry: AbilityRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn map(mut self, map: impl GridOracle + 'static) -> Self {
        self.map = Some(Box::new(map));
        self
    }

    pub fn input(mut self, input: impl InputOracle + 'static) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    pub fn rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    pub fn build(self) -> Session {
        let bus = EventBus::with_capacity(self.event_capacity);
        Session {
            state: WorldState::new(self.config),
            registry: self.registry.unwrap_or_else(default_registry),
            sink: BusSink::new(bus.clone()),
            bus,
            map: self.map,
            input: self.input,
            rng: self.rng.unwrap_or_else(|| Box::new(PcgRng)),
        }
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
