use chrono::{DateTime, Utc};
use rand::prelude::*;
use sweeper_core::{self as game, Board, RandomMineGenerator, RevealOutcome, Verdict};

use crate::command::{Command, HELP, Target};
use crate::render;
use crate::store::SnapshotStore;

/// What the front end should show after a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Board,
    Message(String),
    /// The game just ended; ask whether to start another one.
    Finished(Verdict),
    Quit,
}

/// One player at the terminal: the board, where saves go, and the seed
/// sequence for new games.
pub struct Session<S> {
    board: Board,
    store: S,
    rng: SmallRng,
}

impl<S: SnapshotStore> Session<S> {
    pub fn new(size: usize, seed: u64, store: S) -> game::Result<Self> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = Board::new(Some(size), RandomMineGenerator::new(rng.random()))?;
        Ok(Self { board, store, rng })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn has_saved_game(&self, now: DateTime<Utc>) -> bool {
        self.store.has_saved(now)
    }

    pub fn render(&self) -> String {
        format!("{}{}", render::render(&self.board), render::status(&self.board))
    }

    pub fn execute(&mut self, command: Command, now: DateTime<Utc>) -> Response {
        let response = match command {
            Command::Reveal(target) => self.reveal(target),
            Command::Flag(target) => match self.resolve(target).and_then(|id| self.board.flag(id)) {
                Ok(outcome) if outcome.has_update() => Response::Board,
                Ok(_) => Response::Message("That cell cannot be flagged".to_owned()),
                Err(err) => Response::Message(err.to_string()),
            },
            Command::New(size) => self.new_game(size),
            Command::Cheat => match self.board.cheat() {
                Some(_) => Response::Board,
                None => Response::Message("The board is locked".to_owned()),
            },
            Command::Validate => match self.board.validate() {
                Some(verdict) => Response::Finished(verdict),
                None => Response::Message("The board is locked".to_owned()),
            },
            Command::Save => self.save(now),
            Command::Load => self.load(now),
            Command::Help => Response::Message(HELP.to_owned()),
            Command::Quit => Response::Quit,
        };

        for event in self.board.drain_events() {
            log::trace!("board event: {:?}", event);
        }
        response
    }

    /// Answer to the "new game?" prompt after a finished game.
    pub fn conclude(&mut self, new_game: bool) -> Response {
        if new_game {
            self.new_game(None)
        } else {
            self.board.lock();
            Response::Board
        }
    }

    fn resolve(&self, target: Target) -> game::Result<game::CellId> {
        match target {
            Target::Id(id) => self.board.grid(id).map(|_| id),
            Target::Coords(row, col) => self.board.cell_id((row, col)),
        }
    }

    fn reveal(&mut self, target: Target) -> Response {
        match self.resolve(target).and_then(|id| self.board.reveal(id)) {
            Ok(RevealOutcome::HitMine) => Response::Finished(Verdict::Lost),
            Ok(RevealOutcome::Won) => Response::Finished(Verdict::Won),
            Ok(_) => Response::Board,
            Err(err) => Response::Message(err.to_string()),
        }
    }

    fn new_game(&mut self, size: Option<usize>) -> Response {
        let generator = RandomMineGenerator::new(self.rng.random());
        match self.board.create(size, generator) {
            Ok(()) => Response::Board,
            Err(err) => Response::Message(err.to_string()),
        }
    }

    fn save(&mut self, now: DateTime<Utc>) -> Response {
        let Some(snapshot) = self.board.save() else {
            return Response::Message("Nothing new to save".to_owned());
        };
        match self.store.save(&snapshot, now) {
            Ok(()) => Response::Message("Game saved".to_owned()),
            Err(err) => {
                log::error!("Could not save game: {:?}", err);
                Response::Message(format!("Could not save game: {}", err))
            }
        }
    }

    fn load(&mut self, now: DateTime<Utc>) -> Response {
        let snapshot = match self.store.load(now) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return Response::Message("No saved game".to_owned()),
            Err(err) => {
                log::error!("Could not read saved game: {:?}", err);
                return Response::Message(format!("Could not load game: {}", err));
            }
        };
        match self.board.load(&snapshot) {
            Ok(()) => Response::Board,
            Err(err) => {
                log::error!("Refusing saved game: {}", err);
                Response::Message(format!("Could not load game: {}", err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use game::{CellState, EngineState, Snapshot};

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(0).unwrap()
    }

    fn session() -> Session<MemoryStore> {
        Session::new(8, 5, MemoryStore::default()).unwrap()
    }

    /// A safe cell next to a mine, so revealing it opens just that cell.
    fn numbered_cell(session: &Session<MemoryStore>) -> game::CellId {
        let board = session.board();
        *board
            .layout()
            .clearable()
            .iter()
            .find(|&&id| board.scan(id).unwrap() > 0)
            .unwrap()
    }

    #[test]
    fn seed_makes_games_repeatable() {
        let a = session();
        let b = session();

        assert_eq!(a.board().layout(), b.board().layout());
    }

    #[test]
    fn reveal_by_coords_and_by_id() {
        let mut session = session();
        let id = numbered_cell(&session);
        let (row, col) = session.board().grid(id).unwrap();

        let response = session.execute(Command::Reveal(Target::Coords(row, col)), t0());
        assert_eq!(response, Response::Board);
        assert!(session.board().cell_at(id).unwrap().is_revealed());
        assert_eq!(session.board().revealed_count(), 1);

        assert_eq!(
            session.execute(Command::Reveal(Target::Id(0)), t0()),
            Response::Message("Cell 0 is not on the board".to_owned())
        );
        assert_eq!(
            session.execute(Command::Flag(Target::Coords(9, 9)), t0()),
            Response::Message("Row 9, column 9 is not on the board".to_owned())
        );
    }

    #[test]
    fn hitting_a_mine_finishes_and_declining_keeps_the_lock() {
        let mut session = session();
        let mine = session.board().layout().mines()[0];

        assert_eq!(
            session.execute(Command::Reveal(Target::Id(mine)), t0()),
            Response::Finished(Verdict::Lost)
        );
        assert_eq!(session.conclude(false), Response::Board);
        assert!(session.board().is_locked());
        assert_eq!(
            session.execute(Command::Cheat, t0()),
            Response::Message("The board is locked".to_owned())
        );
    }

    #[test]
    fn accepting_a_new_game_unlocks() {
        let mut session = session();
        session.execute(Command::Validate, t0());
        assert!(session.board().is_locked());

        session.conclude(true);

        assert!(!session.board().is_locked());
        assert_eq!(session.board().state(), EngineState::Ready);
    }

    #[test]
    fn new_game_keeps_size_unless_asked() {
        let mut session = session();

        session.execute(Command::New(Some(16)), t0());
        assert_eq!(session.board().size(), 16);

        session.execute(Command::New(None), t0());
        assert_eq!(session.board().size(), 16);

        session.execute(Command::New(Some(1)), t0());
        assert_eq!(session.board().size(), 8);
    }

    #[test]
    fn save_and_load_restore_progress() {
        let mut session = session();
        assert!(!session.has_saved_game(t0()));
        assert_eq!(
            session.execute(Command::Load, t0()),
            Response::Message("No saved game".to_owned())
        );
        assert_eq!(
            session.execute(Command::Save, t0()),
            Response::Message("Nothing new to save".to_owned())
        );

        let id = numbered_cell(&session);
        session.execute(Command::Reveal(Target::Id(id)), t0());
        let saved = session.board().snapshot();
        assert_eq!(
            session.execute(Command::Save, t0()),
            Response::Message("Game saved".to_owned())
        );
        assert!(session.has_saved_game(t0()));

        session.execute(Command::New(None), t0());
        assert_eq!(session.execute(Command::Load, t0()), Response::Board);
        assert_eq!(session.board().snapshot(), saved);
        assert!(session.board().cell_at(id).unwrap().is_revealed());
    }

    #[test]
    fn corrupt_save_leaves_board_alone() {
        let mut store = MemoryStore::default();
        let corrupt = Snapshot {
            size: 8,
            mine_positions: vec![1],
            clearable_positions: vec![2, 3],
            revealed_positions: vec![],
        };
        store.save(&corrupt, t0()).unwrap();
        let mut session = Session::new(8, 5, store).unwrap();
        let before = session.board().snapshot();

        let response = session.execute(Command::Load, t0());

        assert_eq!(
            response,
            Response::Message(
                "Could not load game: Invalid snapshot: mines and clearable cells cover 3 of 64 cells"
                    .to_owned()
            )
        );
        assert_eq!(session.board().snapshot(), before);
    }

    #[test]
    fn flagging_an_open_cell_is_refused() {
        let mut session = session();
        let id = numbered_cell(&session);

        assert_eq!(session.execute(Command::Flag(Target::Id(id)), t0()), Response::Board);
        assert_eq!(session.board().cell_at(id).unwrap(), CellState::Flagged);
        session.execute(Command::Flag(Target::Id(id)), t0());
        session.execute(Command::Reveal(Target::Id(id)), t0());

        assert_eq!(
            session.execute(Command::Flag(Target::Id(id)), t0()),
            Response::Message("That cell cannot be flagged".to_owned())
        );
    }

    #[test]
    fn cheat_toggle_changes_the_view_only() {
        let mut session = session();
        let mine = session.board().layout().mines()[0];

        session.execute(Command::Cheat, t0());
        assert_eq!(session.board().cell_view(mine).unwrap(), CellState::Exploded);
        assert_eq!(session.board().cell_at(mine).unwrap(), CellState::Hidden);
        assert!(session.render().ends_with("[Play]"));
    }
}
