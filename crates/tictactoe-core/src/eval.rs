//! Static evaluation of non-terminal boards.

use crate::board::{Board, Symbol, WIN_LINES};

/// Weight of a line by how many cells one side holds in it
fn line_weight(count: usize) -> i32 {
    match count {
        1 => 1,
        2 => 10,
        _ => 0,
    }
}

/// Score a board from `perspective`'s point of view.
///
/// Lines holding both symbols are dead and count 0. Every other line adds
/// +1/+10 for one/two own symbols and subtracts the same for the opponent.
pub fn evaluate_board(board: &Board, perspective: Symbol) -> i32 {
    let opponent = perspective.opponent();

    WIN_LINES
        .iter()
        .map(|line| {
            let ours = line
                .iter()
                .filter(|&&i| board.get_index(i) == Some(perspective))
                .count();
            let theirs = line
                .iter()
                .filter(|&&i| board.get_index(i) == Some(opponent))
                .count();

            if ours > 0 && theirs > 0 {
                0
            } else {
                line_weight(ours) - line_weight(theirs)
            }
        })
        .sum()
}
