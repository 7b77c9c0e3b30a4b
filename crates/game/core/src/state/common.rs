use std::fmt;

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position `distance` tiles away in the given direction.
    pub fn stepped(self, direction: CardinalDirection, distance: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx * distance,
            y: self.y + dy * distance,
        }
    }

    /// Chebyshev distance; adjacency on the grid includes diagonals only for
    /// range checks, cardinal search never produces diagonal candidates.
    pub fn distance_to(self, other: Position) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four grid directions used by movement and target search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardinalDirection {
    North,
    East,
    South,
    West,
}

impl CardinalDirection {
    /// Search order for target acquisition: clockwise starting north.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Unit tile offset for this direction. North decreases `y`.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepping_follows_direction_deltas() {
        let origin = Position::ORIGIN;
        assert_eq!(origin.stepped(CardinalDirection::North, 2), Position::new(0, -2));
        assert_eq!(origin.stepped(CardinalDirection::East, 1), Position::new(1, 0));
        assert_eq!(origin.stepped(CardinalDirection::South, 3), Position::new(0, 3));
        assert_eq!(origin.stepped(CardinalDirection::West, 1), Position::new(-1, 0));
    }

    #[test]
    fn distance_is_chebyshev() {
        assert_eq!(Position::new(1, 1).distance_to(Position::new(3, 2)), 2);
        assert_eq!(Position::new(0, 0).distance_to(Position::new(0, 0)), 0);
    }

    #[test]
    fn opposites_round_trip() {
        for direction in CardinalDirection::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }
}
