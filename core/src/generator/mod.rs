use crate::*;
pub use random::*;

mod random;

/// Source of the mine layout used when a board is armed.
pub trait MineGenerator {
    fn generate(self, size: Coord) -> Result<MineLayout>;
}

/// Arms exactly the given cells, for replaying or injecting a known board.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMineGenerator<'a> {
    mines: &'a [CellId],
}

impl<'a> FixedMineGenerator<'a> {
    pub fn new(mines: &'a [CellId]) -> Self {
        Self { mines }
    }
}

impl MineGenerator for FixedMineGenerator<'_> {
    fn generate(self, size: Coord) -> Result<MineLayout> {
        MineLayout::from_mines(size, self.mines)
    }
}
