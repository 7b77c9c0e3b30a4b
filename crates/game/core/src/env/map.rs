//! Read-only grid geometry and static occupancy.

use crate::state::{CharacterHandle, Position};

/// Identifier for a static, non-character occupant (crate, boulder,
/// destructible wall segment). Owned by the world layer, opaque here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstacleId(pub u32);

/// Something occupying a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Occupant {
    Character(CharacterHandle),
    Obstacle(ObstacleId),
}

/// Level bounds in tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }
}

/// Oracle answering grid queries: what occupies a cell, whether a cell is a
/// wall or dangerous, and the level bounds.
///
/// Character occupancy is resolved from the arena by the engine; this
/// oracle only reports static terrain and obstacles.
pub trait GridOracle: Send + Sync {
    fn dimensions(&self) -> MapDimensions;

    /// Static occupant at a cell, if any.
    fn occupant_at(&self, position: Position) -> Option<Occupant>;

    fn is_wall(&self, position: Position) -> bool;

    /// Whether entering this cell hurts (lava, spikes, ...).
    fn is_hazardous(&self, _position: Position) -> bool {
        false
    }

    /// Damage dealt on entering a hazardous cell.
    fn hazard_damage(&self, _position: Position) -> f32 {
        0.0
    }

    /// Obstacles can be destroyed by the excluded world layer; a removed
    /// obstacle is no longer a valid target.
    fn is_obstacle_removed(&self, _obstacle: ObstacleId) -> bool {
        false
    }
}
