/// Engine configuration constants and tunable parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Base seed for all deterministic randomness (AI decisions, hit rolls).
    /// Two sessions with the same seed and input replay identically.
    pub seed: u64,
}

impl EngineConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum abilities one character can own (one per shape).
    pub const MAX_ABILITIES: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SEED: u64 = 0x5eed_0f_7ac71c5;

    pub fn new() -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
