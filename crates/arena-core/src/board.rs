//! Board engine: pure functions over the 3x3 grid.
//!
//! The board is a row-major array of nine [`Cell`]s. Nothing here holds
//! state; every operation takes a board and returns a result, so the
//! engine can be tested in isolation from series bookkeeping.
//!
//! Lines are always scanned in the same order (rows, then columns, then
//! diagonals) so the reported winning line is deterministic.

use arena_types::{Cell, Mark, Outcome};

use crate::error::{ArenaError, MoveRejection};

/// A 3x3 board in row-major order.
pub type Board = [Cell; 9];

/// Number of cells on the board.
pub const CELLS: u8 = 9;

/// The eight winning lines, in scan order.
pub const LINES: [[u8; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Check that a requested cell is on the board.
///
/// Clients send cells as plain integers; anything outside `0..9` is
/// refused here instead of failing to decode.
///
/// # Errors
///
/// Returns [`ArenaError::IllegalMove`] with [`MoveRejection::OutOfRange`].
pub fn cell_index(cell: i32) -> Result<u8, ArenaError> {
    u8::try_from(cell)
        .ok()
        .filter(|index| *index < CELLS)
        .ok_or(ArenaError::IllegalMove {
            cell,
            reason: MoveRejection::OutOfRange,
        })
}

/// A board with every cell empty.
pub const fn empty() -> Board {
    [Cell::Empty; 9]
}

/// Place `mark` on `cell`, returning the new board.
///
/// The input board is left untouched.
///
/// # Errors
///
/// Returns [`ArenaError::IllegalMove`] if `cell` is not in `0..9` or is
/// already taken.
pub fn apply(board: &Board, cell: u8, mark: Mark) -> Result<Board, ArenaError> {
    let mut next = *board;
    let slot = next
        .get_mut(usize::from(cell))
        .ok_or(ArenaError::IllegalMove {
            cell: i32::from(cell),
            reason: MoveRejection::OutOfRange,
        })?;

    if !slot.is_empty() {
        return Err(ArenaError::IllegalMove {
            cell: i32::from(cell),
            reason: MoveRejection::Occupied,
        });
    }

    *slot = Cell::from(mark);
    Ok(next)
}

/// Mark occupying all three cells of `line`, if any.
fn line_owner(board: &Board, line: [u8; 3]) -> Option<Mark> {
    let [a, b, c] = line.map(|i| board.get(usize::from(i)).copied().unwrap_or_default());
    a.mark().filter(|_| a == b && b == c)
}

/// Cells of the first completed line in scan order.
pub fn winning_triple(board: &Board) -> Option<[u8; 3]> {
    LINES
        .into_iter()
        .find(|line| line_owner(board, *line).is_some())
}

/// Result of the round shown on `board`, or `None` while it can go on.
///
/// A completed line wins even when it was completed on the last free
/// cell.
pub fn evaluate(board: &Board) -> Option<Outcome> {
    if let Some(mark) = LINES
        .into_iter()
        .find_map(|line| line_owner(board, line))
    {
        return Some(mark.win());
    }

    if board.iter().all(|cell| !cell.is_empty()) {
        Some(Outcome::Draw)
    } else {
        None
    }
}
