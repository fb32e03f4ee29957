use alloc::vec::Vec;

use super::*;

/// Uniform placement without replacement: each mine is drawn out of the
/// list of remaining candidates, and whatever is left over is clearable.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, size: Coord) -> Result<MineLayout> {
        use rand::prelude::*;

        if size < MIN_SIZE {
            return Err(GameError::InvalidSize(size));
        }

        let mine_count = mine_count_for(size);
        let mut candidates: Vec<CellId> = (1..=total_cells(size)).collect();
        let mut mines = Vec::with_capacity(mine_count.into());

        let mut rng = SmallRng::seed_from_u64(self.seed);
        while mines.len() < usize::from(mine_count) {
            if candidates.is_empty() {
                log::warn!("Ran out of cells after placing {} mines", mines.len());
                break;
            }
            let pick = rng.random_range(0..candidates.len());
            mines.push(candidates.remove(pick));
        }

        log::debug!(
            "Armed {} mines on a {}x{} board (seed {})",
            mines.len(),
            size,
            size,
            self.seed
        );
        Ok(MineLayout::from_partition(size, mines, candidates))
    }
}
