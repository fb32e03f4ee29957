#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use snapshot::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod snapshot;
mod tile;
mod types;

/// Where the mines are on a square board.
///
/// `mines` and `clearable` partition `1..=size²`. Both keep the order they
/// were produced in so a saved board comes back verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    size: Coord,
    mine_mask: Array2<bool>,
    mines: Vec<CellId>,
    clearable: Vec<CellId>,
}

impl MineLayout {
    /// Builds a layout from explicit mine ids, clearable cells in ascending order.
    pub fn from_mines(size: Coord, mines: &[CellId]) -> Result<Self> {
        if size < MIN_SIZE {
            return Err(GameError::InvalidSize(size));
        }

        let mut placed = Vec::with_capacity(mines.len());
        for &id in mines {
            if !is_valid_cell(size, id) {
                return Err(GameError::InvalidCell(id));
            }
            if !placed.contains(&id) {
                placed.push(id);
            }
        }

        let mut layout = Self::from_partition(size, placed, Vec::new());
        layout.clearable = (1..=total_cells(size)).filter(|&id| !layout.mined(id)).collect();
        Ok(layout)
    }

    /// Takes both lists as given. Callers guarantee they partition the board.
    pub(crate) fn from_partition(size: Coord, mines: Vec<CellId>, clearable: Vec<CellId>) -> Self {
        let mut mine_mask: Array2<bool> = Array2::default([usize::from(size); 2]);
        for &id in &mines {
            mine_mask[grid(size, id).to_nd_index()] = true;
        }
        Self {
            size,
            mine_mask,
            mines,
            clearable,
        }
    }

    pub fn validate_cell(&self, id: CellId) -> Result<CellId> {
        if is_valid_cell(self.size, id) {
            Ok(id)
        } else {
            Err(GameError::InvalidCell(id))
        }
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    pub fn total_cells(&self) -> CellCount {
        total_cells(self.size)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mines.len() as CellCount
    }

    pub fn mines(&self) -> &[CellId] {
        &self.mines
    }

    pub fn clearable(&self) -> &[CellId] {
        &self.clearable
    }

    pub fn armed(&self, id: CellId) -> bool {
        is_valid_cell(self.size, id) && self.mined(id)
    }

    /// Number of mines around `id`, between 0 and 8. `id` must be on the
    /// board; [`Board::scan`] is the checked entry point.
    pub(crate) fn scan(&self, id: CellId) -> u8 {
        self.neighbors(id).filter(|&pos| self.mined(pos)).count() as u8
    }

    pub fn neighbors(&self, id: CellId) -> NeighborIter {
        neighbors(self.size, id)
    }

    fn mined(&self, id: CellId) -> bool {
        self.mine_mask[grid(self.size, id).to_nd_index()]
    }
}


#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Result of an explicit completion check.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Won,
    Lost,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_mines_partitions_the_board() {
        let layout = MineLayout::from_mines(8, &[2, 1, 2]).unwrap();

        assert_eq!(layout.mines(), &[2, 1]);
        assert_eq!(layout.clearable().len(), 62);
        assert!(!layout.clearable().contains(&1));
        assert!(!layout.clearable().contains(&2));
        assert!(layout.armed(1));
        assert!(!layout.armed(3));
        assert!(!layout.armed(0));
        assert!(!layout.armed(65));
    }

    #[test]
    fn from_mines_rejects_small_boards() {
        assert_eq!(
            MineLayout::from_mines(4, &[1]),
            Err(GameError::InvalidSize(4))
        );
    }

    #[test]
    fn from_mines_rejects_out_of_range_ids() {
        assert_eq!(
            MineLayout::from_mines(8, &[0]),
            Err(GameError::InvalidCell(0))
        );
        assert_eq!(
            MineLayout::from_mines(8, &[65]),
            Err(GameError::InvalidCell(65))
        );
    }

    #[test]
    fn scan_counts_adjacent_mines() {
        let layout = MineLayout::from_mines(8, &[1, 2]).unwrap();

        assert_eq!(layout.scan(10), 2);
        assert_eq!(layout.scan(9), 2);
        assert_eq!(layout.scan(3), 1);
        assert_eq!(layout.scan(1), 1);
        assert_eq!(layout.scan(64), 0);
    }

    #[test]
    fn scan_is_at_most_eight() {
        let ring = [1, 2, 3, 9, 11, 17, 18, 19];
        let layout = MineLayout::from_mines(8, &ring).unwrap();

        assert_eq!(layout.scan(10), 8);
    }
}
