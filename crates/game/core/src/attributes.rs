//! Attribute progression and per-level lookup tables.
//!
//! Every numeric knob the engine reads (action points, costs, cooldown
//! lengths, ranges, damage) is a function of the owning character's level.
//! The tables live here as const arrays; the rest of the engine treats the
//! returned values as opaque inputs.

/// Errors raised by attribute queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    /// Experience totals are never negative; a negative query is a caller
    /// contract violation.
    #[error("experience must not be negative (got {0})")]
    NegativeExperience(i64),
}

/// Highest reachable level. Tables are indexed by `level - 1` and clamp at
/// the top entry.
pub const MAX_LEVEL: u32 = 10;

const LEVEL_COUNT: usize = MAX_LEVEL as usize;

/// Cumulative experience required to reach each level. Index 0 is level 1.
const XP_THRESHOLDS: [u32; LEVEL_COUNT] = [0, 100, 250, 450, 700, 1000, 1400, 1900, 2500, 3200];

/// Experience awarded for defeating a character of a given level.
const XP_REWARDS: [u32; LEVEL_COUNT] = [50, 65, 80, 100, 125, 150, 180, 215, 255, 300];

/// Action points granted at the start of each turn.
const ACTION_POINTS: [u32; LEVEL_COUNT] = [2, 2, 3, 3, 3, 4, 4, 4, 5, 5];

/// Maximum health (endurance progression).
const MAX_HEALTH: [f32; LEVEL_COUNT] = [
    20.0, 26.0, 33.0, 41.0, 50.0, 60.0, 71.0, 83.0, 96.0, 110.0,
];

/// Melee damage (strength progression).
const MELEE_DAMAGE: [f32; LEVEL_COUNT] = [
    5.0, 6.0, 7.5, 9.0, 11.0, 13.0, 15.5, 18.0, 21.0, 25.0,
];

/// Percent chance for a melee attack to land.
const HIT_CHANCE: [u32; LEVEL_COUNT] = [70, 72, 75, 78, 80, 83, 85, 88, 90, 92];

/// Warcry damage applied to each adjacent enemy.
const WARCRY_DAMAGE: [f32; LEVEL_COUNT] = [
    3.0, 3.5, 4.5, 5.5, 6.5, 8.0, 9.5, 11.0, 13.0, 15.0,
];

/// Attack range in tiles.
const ATTACK_RANGE: [u32; LEVEL_COUNT] = [1, 1, 1, 1, 2, 2, 2, 2, 2, 3];

/// Returns the level a cumulative experience total corresponds to.
///
/// # Errors
///
/// Returns [`AttributeError::NegativeExperience`] for negative totals.
pub fn level_for_experience(experience: i64) -> Result<u32, AttributeError> {
    if experience < 0 {
        return Err(AttributeError::NegativeExperience(experience));
    }
    let experience = experience as u32;
    let level = XP_THRESHOLDS
        .iter()
        .take_while(|&&threshold| threshold <= experience)
        .count() as u32;
    Ok(level.max(1))
}

/// Level and accumulated experience of one character.
///
/// Owned by the character; all engine-facing numbers derive from `level`
/// through the const tables above.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeProgression {
    level: u32,
    experience: u32,
}

impl AttributeProgression {
    pub fn new(level: u32) -> Self {
        let level = level.clamp(1, MAX_LEVEL);
        Self {
            level,
            experience: XP_THRESHOLDS[(level - 1) as usize],
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    /// Adds experience and returns the new level if this award crossed a
    /// threshold. The caller publishes the level-up event.
    pub fn award_experience(&mut self, amount: u32) -> Option<u32> {
        self.experience = self.experience.saturating_add(amount);
        // Experience is unsigned here; the fallible query exists for the
        // external profile layer which stores signed totals.
        let level = level_for_experience(i64::from(self.experience))
            .unwrap_or(self.level)
            .min(MAX_LEVEL);
        if level > self.level {
            self.level = level;
            Some(level)
        } else {
            None
        }
    }

    fn table_index(&self) -> usize {
        (self.level.clamp(1, MAX_LEVEL) - 1) as usize
    }

    pub fn action_points_per_turn(&self) -> u32 {
        ACTION_POINTS[self.table_index()]
    }

    pub fn max_health(&self) -> f32 {
        MAX_HEALTH[self.table_index()]
    }

    pub fn melee_damage(&self) -> f32 {
        MELEE_DAMAGE[self.table_index()]
    }

    pub fn hit_chance_percent(&self) -> u32 {
        HIT_CHANCE[self.table_index()]
    }

    pub fn warcry_damage(&self) -> f32 {
        WARCRY_DAMAGE[self.table_index()]
    }

    pub fn attack_range(&self) -> u32 {
        ATTACK_RANGE[self.table_index()]
    }

    /// Experience a victor receives for defeating a character at this level.
    pub fn experience_reward(&self) -> u32 {
        XP_REWARDS[self.table_index()]
    }
}

impl Default for AttributeProgression {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_experience_is_invalid() {
        assert_eq!(
            level_for_experience(-1),
            Err(AttributeError::NegativeExperience(-1))
        );
    }

    #[test]
    fn thresholds_map_to_levels() {
        assert_eq!(level_for_experience(0).unwrap(), 1);
        assert_eq!(level_for_experience(99).unwrap(), 1);
        assert_eq!(level_for_experience(100).unwrap(), 2);
        assert_eq!(level_for_experience(250).unwrap(), 3);
        assert_eq!(level_for_experience(1_000_000).unwrap(), MAX_LEVEL);
    }

    #[test]
    fn awarding_experience_reports_level_ups_once() {
        let mut progression = AttributeProgression::new(1);
        assert_eq!(progression.award_experience(99), None);
        assert_eq!(progression.award_experience(1), Some(2));
        assert_eq!(progression.level(), 2);
        assert_eq!(progression.award_experience(1), None);
    }

    #[test]
    fn tables_scale_with_level() {
        let low = AttributeProgression::new(1);
        let high = AttributeProgression::new(MAX_LEVEL);
        assert!(high.action_points_per_turn() > low.action_points_per_turn());
        assert!(high.max_health() > low.max_health());
        assert!(high.melee_damage() > low.melee_damage());
        assert!(high.attack_range() > low.attack_range());
    }
}
