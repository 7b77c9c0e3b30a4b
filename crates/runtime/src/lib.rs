//! Host glue around the deterministic engine.
//!
//! `tactics-runtime` owns everything the pure core refuses to: the
//! topic-routed broadcast bus subscribers drain from async tasks, the
//! tracing instrumentation, and the [`Session`] driver that binds a world to
//! its oracles and steps it tick by tick.
pub mod events;
pub mod session;

pub use events::{BusSink, EventBus, Topic};
pub use session::{Session, SessionBuilder, SessionError};
