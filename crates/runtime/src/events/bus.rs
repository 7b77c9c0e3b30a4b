//! Topic-based event bus.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;

use tactics_core::{EventSink, GameEvent};

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Topic {
    /// Damage, deaths, misses.
    Combat,
    /// Experience and level changes.
    Progression,
}

/// The topic an engine event is routed onto.
pub fn topic_of(event: &GameEvent) -> Topic {
    match event {
        GameEvent::LevelUp { .. } => Topic::Progression,
        GameEvent::DamageDealt { .. }
        | GameEvent::CharacterDied { .. }
        | GameEvent::AttackMissed { .. } => Topic::Combat,
    }
}

/// Topic-based event bus.
///
/// Consumers subscribe to specific topics and only receive events they care
/// about. Delivery is best-effort: publishing to a topic without subscribers
/// is normal, and slow subscribers lose the oldest events (broadcast
/// semantics).
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<GameEvent>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic.
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with the specified capacity per topic.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut channels = HashMap::new();
        for topic in [Topic::Combat, Topic::Progression] {
            channels.insert(topic, broadcast::channel(capacity).0);
        }
        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publishes an event onto its topic.
    pub fn publish(&self, event: GameEvent) {
        let topic = topic_of(&event);
        if let Some(tx) = self.channels.get(&topic) {
            if tx.send(event).is_err() {
                // No subscribers for this topic; normal, not an error.
                tracing::trace!(?topic, "no subscribers for topic");
            }
        }
    }

    /// Subscribes to a single topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<GameEvent> {
        self.channels
            .get(&topic)
            .expect("every topic channel is created at construction")
            .subscribe()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapter letting the synchronous engine publish onto the bus.
pub struct BusSink {
    bus: EventBus,
}

impl BusSink {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl EventSink for BusSink {
    fn publish(&mut self, event: GameEvent) {
        self.bus.publish(event);
    }
}
