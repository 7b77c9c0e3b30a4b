//! Traits describing the engine's external collaborators.
//!
//! Oracles expose grid geometry, input bindings, and deterministic
//! randomness. The [`Env`] aggregate bundles them so the engine can reach
//! everything it needs without hard coupling to concrete implementations;
//! every field is optional so tests can run with exactly the oracles they
//! exercise.

mod input;
mod map;
mod rng;

pub use input::{InputKey, InputOracle};
pub use map::{GridOracle, MapDimensions, ObstacleId, Occupant};
pub use rng::{PcgRng, RngOracle, compute_seed};

/// An oracle the engine needed was not provided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("grid oracle not available")]
    MapNotAvailable,
    #[error("input oracle not available")]
    InputNotAvailable,
    #[error("rng oracle not available")]
    RngNotAvailable,
}

/// Aggregates the read-only oracles required by ability resolution.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    map: Option<&'a dyn GridOracle>,
    input: Option<&'a dyn InputOracle>,
    rng: Option<&'a dyn RngOracle>,
}

impl<'a> Env<'a> {
    pub fn new(
        map: Option<&'a dyn GridOracle>,
        input: Option<&'a dyn InputOracle>,
        rng: Option<&'a dyn RngOracle>,
    ) -> Self {
        Self { map, input, rng }
    }

    pub fn with_all(
        map: &'a dyn GridOracle,
        input: &'a dyn InputOracle,
        rng: &'a dyn RngOracle,
    ) -> Self {
        Self::new(Some(map), Some(input), Some(rng))
    }

    pub fn empty() -> Self {
        Self {
            map: None,
            input: None,
            rng: None,
        }
    }

    /// Returns the grid oracle, or an error if not available.
    pub fn map(&self) -> Result<&'a dyn GridOracle, OracleError> {
        self.map.ok_or(OracleError::MapNotAvailable)
    }

    /// Returns the input oracle, or an error if not available.
    pub fn input(&self) -> Result<&'a dyn InputOracle, OracleError> {
        self.input.ok_or(OracleError::InputNotAvailable)
    }

    /// Returns the rng oracle, or an error if not available.
    pub fn rng(&self) -> Result<&'a dyn RngOracle, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }
}
