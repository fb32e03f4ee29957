use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use bitflags::bitflags;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Ready,
    Active,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Ready
    }
}

bitflags! {
    /// Player actions currently available on the board.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Actions: u8 {
        const CHEAT    = 1;
        const VALIDATE = 1 << 1;
        const SAVE     = 1 << 2;
    }
}

/// State changes, queued in the order they happened until drained.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BoardEvent {
    /// A fresh board replaced everything, redraw all cells.
    Created { size: Coord },
    CellChanged { id: CellId, view: CellState },
    Locked,
    Unlocked,
    CheatToggled(bool),
    Won,
    Lost,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    layout: MineLayout,
    cells: Array2<CellState>,
    revealed_count: CellCount,
    state: EngineState,
    locked: bool,
    cheat: bool,
    actions: Actions,
    events: Vec<BoardEvent>,
}

impl Board {
    /// Starts a game with a layout from `generator`, see [`Board::create`].
    pub fn new(size: Option<usize>, generator: impl MineGenerator) -> Result<Self> {
        let size = resolve_size(size, MIN_SIZE);
        Ok(Self::with_layout(generator.generate(size)?))
    }

    pub fn with_layout(layout: MineLayout) -> Self {
        let size = layout.size();
        Self {
            layout,
            cells: Array2::default([usize::from(size); 2]),
            revealed_count: 0,
            state: EngineState::Ready,
            locked: false,
            cheat: false,
            actions: Actions::CHEAT | Actions::VALIDATE,
            events: Vec::from([BoardEvent::Created { size }]),
        }
    }

    /// Throws the current game away and arms a fresh, fully hidden board.
    ///
    /// A missing size keeps the current one; sizes out of range are clamped.
    pub fn create(&mut self, size: Option<usize>, generator: impl MineGenerator) -> Result<()> {
        let size = resolve_size(size, self.size());
        self.arm_sized(size, generator)?;
        log::debug!("New {}x{} board", size, size);

        self.cheat = false;
        self.unlock();
        Ok(())
    }

    /// Replaces the mine layout for the current size and hides every cell
    /// again.
    pub fn arm(&mut self, generator: impl MineGenerator) -> Result<()> {
        self.arm_sized(self.size(), generator)
    }

    /// Nothing changes when the generator fails.
    fn arm_sized(&mut self, size: Coord, generator: impl MineGenerator) -> Result<()> {
        let layout = generator.generate(size)?;
        debug_assert_eq!(layout.size(), size);

        self.layout = layout;
        self.cells = Array2::default([usize::from(size); 2]);
        self.revealed_count = 0;
        self.state = EngineState::Ready;
        self.actions.remove(Actions::SAVE);
        self.events.push(BoardEvent::Created { size });
        Ok(())
    }

    pub fn size(&self) -> Coord {
        self.layout.size()
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_cheating(&self) -> bool {
        self.cheat
    }

    pub fn actions(&self) -> Actions {
        self.actions
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn grid(&self, id: CellId) -> Result<Coord2> {
        Ok(grid(self.size(), self.layout.validate_cell(id)?))
    }

    pub fn cell_id(&self, coords: Coord2) -> Result<CellId> {
        let size = self.size();
        match coords {
            (1.., 1..) if coords.0 <= size && coords.1 <= size => Ok(cell_id(size, coords)),
            (row, col) => Err(GameError::InvalidCoords(row, col)),
        }
    }

    pub fn armed(&self, id: CellId) -> bool {
        self.layout.armed(id)
    }

    pub fn scan(&self, id: CellId) -> Result<u8> {
        Ok(self.layout.scan(self.layout.validate_cell(id)?))
    }

    pub fn cell_at(&self, id: CellId) -> Result<CellState> {
        Ok(self.cell(self.layout.validate_cell(id)?))
    }

    /// What the player should see at `id`, with the cheat overlay applied.
    pub fn cell_view(&self, id: CellId) -> Result<CellState> {
        let id = self.layout.validate_cell(id)?;
        Ok(self.view(id))
    }

    /// Hands over every event queued since the last drain.
    ///
    /// The queue is only emptied here, so a front end that listens for
    /// changes must drain after each move. Callers that poll `cell_view`
    /// instead can drain and drop.
    pub fn drain_events(&mut self) -> impl Iterator<Item = BoardEvent> + '_ {
        self.events.drain(..)
    }

    pub fn reveal(&mut self, id: CellId) -> Result<RevealOutcome> {
        let id = self.layout.validate_cell(id)?;

        if !self.is_playable() || !self.cell(id).is_hidden() {
            return Ok(RevealOutcome::NoChange);
        }

        self.revealed_count += 1;
        self.actions.insert(Actions::SAVE);
        if self.state.is_ready() {
            self.state = EngineState::Active;
        }

        if self.layout.armed(id) {
            for mine in self.layout.mines().to_vec() {
                self.set_cell(mine, CellState::Exploded);
            }
            log::debug!("Cell {} was armed, game lost", id);
            self.finish(Verdict::Lost);
            return Ok(RevealOutcome::HitMine);
        }

        let count = self.layout.scan(id);
        self.set_cell(id, CellState::Revealed(count));
        if count == 0 {
            self.cascade(id);
        }

        if usize::from(self.revealed_count) == self.layout.clearable().len() {
            log::debug!("All {} clearable cells revealed", self.revealed_count);
            self.finish(Verdict::Won);
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    /// Opens the zero-count region around `origin`, breadth first.
    fn cascade(&mut self, origin: CellId) {
        let mut visited = BTreeSet::from([origin]);
        let mut to_visit: VecDeque<_> = self.layout.neighbors(origin).collect();

        while let Some(id) = to_visit.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            if let Some(0) = self.probe(id) {
                to_visit.extend(self.layout.neighbors(id).filter(|pos| !visited.contains(pos)));
            }
        }
        log::trace!("Cascade from {} visited {} cells", origin, visited.len());
    }

    /// Reveals one cascade target and returns its count, or `None` when the
    /// cell is flagged, already open, or armed.
    fn probe(&mut self, id: CellId) -> Option<u8> {
        if !self.cell(id).is_hidden() || self.layout.armed(id) {
            return None;
        }
        let count = self.layout.scan(id);
        self.set_cell(id, CellState::Revealed(count));
        self.revealed_count += 1;
        Some(count)
    }

    pub fn flag(&mut self, id: CellId) -> Result<MarkOutcome> {
        let id = self.layout.validate_cell(id)?;
        let state = self.cell(id);
        if !self.is_playable() || state.is_terminal() {
            return Ok(MarkOutcome::NoChange);
        }

        let next = if state.is_hidden() {
            CellState::Flagged
        } else {
            CellState::Hidden
        };
        self.set_cell(id, next);
        Ok(MarkOutcome::Changed)
    }

    /// Explicit completion check: every clearable cell must be open.
    ///
    /// Ends the game either way; returns `None` on a locked board.
    pub fn validate(&mut self) -> Option<Verdict> {
        if self.locked {
            return None;
        }

        let verdict = if self
            .layout
            .clearable()
            .iter()
            .all(|&id| self.cell(id).is_revealed())
        {
            Verdict::Won
        } else {
            Verdict::Lost
        };
        log::debug!("Validation: {:?}", verdict);
        self.finish(verdict);
        Some(verdict)
    }

    /// Toggles showing every mine as exploded. Returns the new overlay state,
    /// or `None` on a locked board.
    pub fn cheat(&mut self) -> Option<bool> {
        if self.locked {
            return None;
        }

        self.cheat = !self.cheat;
        self.events.push(BoardEvent::CheatToggled(self.cheat));
        for mine in self.layout.mines().to_vec() {
            let view = self.view(mine);
            self.events.push(BoardEvent::CellChanged { id: mine, view });
        }
        Some(self.cheat)
    }

    pub fn lock(&mut self) {
        if self.locked {
            return;
        }
        self.actions.remove(Actions::CHEAT | Actions::VALIDATE | Actions::SAVE);
        self.locked = true;
        self.events.push(BoardEvent::Locked);
    }

    /// Nothing to save right after unlocking, so SAVE stays off until a move.
    pub fn unlock(&mut self) {
        if !self.locked {
            return;
        }
        self.actions.insert(Actions::CHEAT | Actions::VALIDATE);
        self.actions.remove(Actions::SAVE);
        self.locked = false;
        self.events.push(BoardEvent::Unlocked);
    }

    /// The player's save action: a snapshot only when there is unsaved
    /// progress on an unlocked board.
    pub fn save(&mut self) -> Option<Snapshot> {
        if !self.actions.contains(Actions::SAVE) {
            return None;
        }
        self.actions.remove(Actions::SAVE);
        Some(self.snapshot())
    }

    /// Serializes the board as it stands.
    ///
    /// Only cells showing a count are listed as revealed. A mine that was
    /// hit counts towards `revealed_count` but is not listed, and lock and
    /// finished state are not part of a snapshot, so restoring a lost board
    /// gives an unlocked board with one fewer revealed cell. The player's
    /// [`Board::save`] is never offered on a finished board.
    pub fn snapshot(&self) -> Snapshot {
        let revealed = (1..=self.layout.total_cells()).filter(|&id| self.cell(id).is_revealed());
        Snapshot {
            size: self.size().into(),
            mine_positions: self.layout.mines().iter().map(|&id| id.into()).collect(),
            clearable_positions: self.layout.clearable().iter().map(|&id| id.into()).collect(),
            revealed_positions: revealed.map(u32::from).collect(),
        }
    }

    /// Rebuilds a board from a snapshot, mines and clearable cells verbatim.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self> {
        let (layout, revealed) = snapshot.validate()?;
        let mut board = Self::with_layout(layout);

        for id in revealed {
            let count = board.layout.scan(id);
            let coords = board.coords(id);
            board.cells[coords] = CellState::Revealed(count);
            board.revealed_count += 1;
        }
        if board.revealed_count > 0 {
            board.state = EngineState::Active;
        }
        log::debug!(
            "Loaded {}x{} board with {} revealed cells",
            board.size(),
            board.size(),
            board.revealed_count
        );
        Ok(board)
    }

    /// Replaces this board with a saved one. Nothing changes on error.
    pub fn load(&mut self, snapshot: &Snapshot) -> Result<()> {
        let mut board = Self::from_snapshot(snapshot)?;
        let mut events = core::mem::take(&mut self.events);
        events.append(&mut board.events);
        board.events = events;
        *self = board;
        Ok(())
    }

    fn is_playable(&self) -> bool {
        !self.locked && !self.state.is_finished()
    }

    fn finish(&mut self, verdict: Verdict) {
        let (state, event) = match verdict {
            Verdict::Won => (EngineState::Won, BoardEvent::Won),
            Verdict::Lost => (EngineState::Lost, BoardEvent::Lost),
        };
        self.state = state;
        self.events.push(event);
        self.lock();
    }

    fn coords(&self, id: CellId) -> [usize; 2] {
        grid(self.size(), id).to_nd_index()
    }

    fn cell(&self, id: CellId) -> CellState {
        self.cells[self.coords(id)]
    }

    fn set_cell(&mut self, id: CellId, state: CellState) {
        let coords = self.coords(id);
        self.cells[coords] = state;
        let view = self.view(id);
        self.events.push(BoardEvent::CellChanged { id, view });
    }

    fn view(&self, id: CellId) -> CellState {
        match self.cell(id) {
            CellState::Hidden | CellState::Flagged if self.cheat && self.layout.armed(id) => {
                CellState::Exploded
            }
            state => state,
        }
    }
}
