/// Board side length, and 1-based row/column positions.
pub type Coord = u8;

/// 1-based sequential cell index, row-major: `(row - 1) * size + col`.
pub type CellId = u16;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional 1-based coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Smallest supported board side.
pub const MIN_SIZE: Coord = 8;

/// Largest supported board side, `MAX_SIZE²` still fits a [`CellId`].
pub const MAX_SIZE: Coord = Coord::MAX;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [usize::from(self.0) - 1, usize::from(self.1) - 1]
    }
}

pub const fn total_cells(size: Coord) -> CellCount {
    let size = size as CellCount;
    size * size
}

/// Ten mines per 8x8 area, rounded down: 8 -> 10, 16 -> 40, 24 -> 90.
pub const fn mine_count_for(size: Coord) -> CellCount {
    let size = size as u32;
    (size * size * 10 / 64) as CellCount
}

/// Picks the board side for a new game.
///
/// A missing request keeps `fallback`, anything outside
/// `MIN_SIZE..=MAX_SIZE` is clamped.
pub fn resolve_size(requested: Option<usize>, fallback: Coord) -> Coord {
    match requested {
        None => fallback.clamp(MIN_SIZE, MAX_SIZE),
        Some(size) if size < usize::from(MIN_SIZE) => {
            log::warn!("Board size {} below minimum, using {}", size, MIN_SIZE);
            MIN_SIZE
        }
        Some(size) if size > usize::from(MAX_SIZE) => {
            log::warn!("Board size {} above maximum, using {}", size, MAX_SIZE);
            MAX_SIZE
        }
        Some(size) => size as Coord,
    }
}

/// Maps a cell id to its `(row, col)`.
///
/// Only meaningful for `id` in `1..=size²`, callers validate first.
pub const fn grid(size: Coord, id: CellId) -> Coord2 {
    let n = size as CellId;
    let mut row = id / n + 1;
    let mut col = id % n;
    // ids on a row boundary belong to the last column of the previous row
    if col == 0 {
        col = n;
        row -= 1;
    }
    (row as Coord, col as Coord)
}

pub const fn cell_id(size: Coord, (row, col): Coord2) -> CellId {
    (row as CellId - 1) * size as CellId + col as CellId
}

pub const fn is_valid_cell(size: Coord, id: CellId) -> bool {
    id >= 1 && id <= total_cells(size)
}

pub fn neighbors(size: Coord, id: CellId) -> NeighborIter {
    NeighborIter::new(grid(size, id), size)
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it stays on the board.
fn apply_delta(coords: Coord2, delta: (i8, i8), size: Coord) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;

    let next_row = row.checked_add_signed(d_row)?;
    if next_row == 0 || next_row > size {
        return None;
    }

    let next_col = col.checked_add_signed(d_col)?;
    if next_col == 0 || next_col > size {
        return None;
    }

    Some((next_row, next_col))
}

/// Iterates the in-bounds ids around a cell, up to eight of them.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    size: Coord,
    index: u8,
}

impl NeighborIter {
    fn new(center: Coord2, size: Coord) -> Self {
        Self {
            center,
            size,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = CellId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item = apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.size);
            self.index += 1;

            if let Some(coords) = next_item {
                return Some(cell_id(self.size, coords));
            }
        }
    }
}
