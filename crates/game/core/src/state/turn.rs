use super::CharacterHandle;

/// Turn rotation state managed by the scheduler.
///
/// The rotation holds handles into the character arena; the cursor always
/// points at a non-removed entry, or the rotation is empty (`cursor` is
/// `None`, the empty sentinel). `active` is the handle whose turn is in
/// progress; it goes `None` when the active character is removed mid-turn,
/// which tells `next_turn()` that the rotation already shifted the next
/// participant under the cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Ordered cycle of turn-takers.
    pub rotation: Vec<CharacterHandle>,

    /// Index of the active slot, `None` while the rotation is empty.
    pub cursor: Option<usize>,

    /// The character whose turn is in progress.
    pub active: Option<CharacterHandle>,

    /// Remaining action-point budget for the active turn.
    pub action_points: u32,

    /// Monotonically increasing count of turns begun.
    pub total_turns: u64,

    /// Sequential identifier incremented on every performed ability,
    /// mixed into the deterministic random seeds.
    pub nonce: u64,
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            rotation: Vec::new(),
            cursor: None,
            active: None,
            action_points: 0,
            total_turns: 0,
            nonce: 0,
        }
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}
