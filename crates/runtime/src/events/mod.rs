//! Topic-routed fan-out of engine events to host subscribers.

mod bus;

pub use bus::{BusSink, EventBus, Topic, topic_of};
