use sweeper_core::{Board, CellState};

fn glyph(view: CellState) -> char {
    match view {
        CellState::Hidden => '#',
        CellState::Flagged => 'F',
        CellState::Exploded => '*',
        CellState::Revealed(0) => '.',
        CellState::Revealed(count) => char::from(b'0' + count),
    }
}

/// Draws the board with column numbers on top and row numbers on the left.
pub fn render(board: &Board) -> String {
    let size = board.size();
    let width = size.to_string().len();
    let mut out = format!("{:width$} ", "");

    for col in 1..=size {
        out.push_str(&format!(" {col:>width$}"));
    }
    out.push('\n');

    for row in 1..=size {
        out.push_str(&format!("{row:>width$} "));
        for col in 1..=size {
            let glyph = board
                .cell_id((row, col))
                .and_then(|id| board.cell_view(id))
                .map_or('?', glyph);
            out.push_str(&format!(" {glyph:>width$}"));
        }
        out.push('\n');
    }
    out
}

/// One line summary of progress and the actions currently on offer.
pub fn status(board: &Board) -> String {
    let layout = board.layout();
    let mut actions: Vec<String> = board
        .actions()
        .iter_names()
        .map(|(name, _)| name.to_ascii_lowercase())
        .collect();
    if board.is_locked() {
        actions.push("locked".to_owned());
    }

    format!(
        "{}/{} cleared, {} mines | {} | [{}]",
        board.revealed_count(),
        layout.clearable().len(),
        layout.mine_count(),
        actions.join(" "),
        if board.is_cheating() { "Play" } else { "Cheat" },
    )
}
