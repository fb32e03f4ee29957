use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Saved game record, all positions are 1-based cell ids.
///
/// Kept in wide integers so that a corrupt save is reported as such instead
/// of being truncated on the way in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub size: u32,
    pub mine_positions: Vec<u32>,
    pub clearable_positions: Vec<u32>,
    pub revealed_positions: Vec<u32>,
}

impl Snapshot {
    /// Checks the record against itself and returns the layout and the
    /// revealed cells it describes.
    pub fn validate(&self) -> core::result::Result<(MineLayout, Vec<CellId>), SnapshotError> {
        let size = match Coord::try_from(self.size) {
            Ok(size) if size >= MIN_SIZE => size,
            _ => return Err(SnapshotError::SizeOutOfRange(self.size)),
        };

        let mut seen = BTreeSet::new();
        let mines = collect_ids(size, &self.mine_positions, &mut seen)?;
        let clearable = collect_ids(size, &self.clearable_positions, &mut seen)?;
        let expected = u32::from(total_cells(size));
        if seen.len() as u32 != expected {
            return Err(SnapshotError::IncompletePartition {
                expected,
                actual: seen.len() as u32,
            });
        }

        let layout = MineLayout::from_partition(size, mines, clearable);
        let revealed = collect_ids(size, &self.revealed_positions, &mut BTreeSet::new())?;
        if let Some(&mine) = revealed.iter().find(|&&id| layout.armed(id)) {
            return Err(SnapshotError::RevealedMine(mine.into()));
        }

        Ok((layout, revealed))
    }
}

fn collect_ids(
    size: Coord,
    positions: &[u32],
    seen: &mut BTreeSet<CellId>,
) -> core::result::Result<Vec<CellId>, SnapshotError> {
    positions
        .iter()
        .map(|&position| {
            let id = CellId::try_from(position)
                .ok()
                .filter(|&id| is_valid_cell(size, id))
                .ok_or(SnapshotError::PositionOutOfRange(position))?;
            if seen.insert(id) {
                Ok(id)
            } else {
                Err(SnapshotError::DuplicatePosition(position))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn snapshot() -> Snapshot {
        Snapshot {
            size: 8,
            mine_positions: vec![1, 2],
            clearable_positions: (3..=64).collect(),
            revealed_positions: vec![10],
        }
    }

    #[test]
    fn valid_snapshot_keeps_lists_verbatim() {
        let mut saved = snapshot();
        saved.mine_positions = vec![2, 1];
        saved.clearable_positions.reverse();

        let (layout, revealed) = saved.validate().unwrap();

        assert_eq!(layout.mines(), &[2, 1]);
        assert_eq!(layout.clearable().first(), Some(&64));
        assert_eq!(revealed, [10]);
    }

    #[test]
    fn rejects_bad_size() {
        let mut saved = snapshot();
        saved.size = 7;
        assert_eq!(saved.validate(), Err(SnapshotError::SizeOutOfRange(7)));

        saved.size = 256;
        assert_eq!(saved.validate(), Err(SnapshotError::SizeOutOfRange(256)));
    }

    #[test]
    fn rejects_positions_off_the_board() {
        let mut saved = snapshot();
        saved.revealed_positions.push(65);
        assert_eq!(saved.validate(), Err(SnapshotError::PositionOutOfRange(65)));

        let mut saved = snapshot();
        saved.mine_positions.push(0);
        assert_eq!(saved.validate(), Err(SnapshotError::PositionOutOfRange(0)));

        let mut saved = snapshot();
        saved.mine_positions.push(70_000);
        assert_eq!(
            saved.validate(),
            Err(SnapshotError::PositionOutOfRange(70_000))
        );
    }

    #[test]
    fn rejects_overlap_and_gaps() {
        let mut saved = snapshot();
        saved.clearable_positions.push(1);
        assert_eq!(saved.validate(), Err(SnapshotError::DuplicatePosition(1)));

        let mut saved = snapshot();
        saved.clearable_positions.pop();
        assert_eq!(
            saved.validate(),
            Err(SnapshotError::IncompletePartition {
                expected: 64,
                actual: 63
            })
        );
    }

    #[test]
    fn rejects_revealed_mines_and_repeats() {
        let mut saved = snapshot();
        saved.revealed_positions.push(2);
        assert_eq!(saved.validate(), Err(SnapshotError::RevealedMine(2)));

        let mut saved = snapshot();
        saved.revealed_positions.push(10);
        assert_eq!(saved.validate(), Err(SnapshotError::DuplicatePosition(10)));
    }

    #[test]
    fn uses_camel_case_field_names() {
        let json = serde_json::to_value(snapshot()).unwrap();

        assert_eq!(json["size"], 8);
        assert_eq!(json["minePositions"], serde_json::json!([1, 2]));
        assert_eq!(json["revealedPositions"], serde_json::json!([10]));
        assert_eq!(json["clearablePositions"].as_array().unwrap().len(), 62);
    }
}
