//! Plain-text board rendering.

use crate::board::{Board, CellKind, Position};

/// Draw `board` one row per line, cells separated by a space.
///
/// The highlighted position is drawn as `X` and invalid cells as `_`.
pub fn render(board: &Board, highlight: Option<Position>) -> String {
    let n = board.size() as i32;
    let mut out = String::with_capacity(board.size() * (board.size() * 2 + 1));

    for row in 0..n {
        let line: Vec<String> = (0..n)
            .map(|col| {
                let p = Position::new(row, col);
                if Some(p) == highlight {
                    return "X".to_string();
                }
                match board.cell(p) {
                    Ok(CellKind::Invalid) | Err(_) => "_".to_string(),
                    Ok(kind) => kind.value().to_string(),
                }
            })
            .collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}
