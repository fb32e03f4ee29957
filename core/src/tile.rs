use serde::{Deserialize, Serialize};

/// Player-visible state of one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Flagged,
    Revealed(u8),
    Exploded,
}

impl CellState {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_))
    }

    /// Revealed and exploded cells never change again until a new board.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Revealed(_) | Self::Exploded)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}
