//! Tic-tac-toe window engine.
//!
//! The human plays X against an assistant-driven opponent. Move legality
//! and winner evaluation live here; the runtime owns the opponent's delayed
//! turn and passes the assistant's suggested cell in for validation.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Player mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    /// The X mark.
    X,
    /// The O mark.
    O,
}

impl Mark {
    /// The opposing mark.
    pub const fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

/// Terminal game outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    /// X completed a line.
    X,
    /// O completed a line.
    O,
    /// The board filled with no line.
    Draw,
}

impl From<Mark> for Winner {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Self::X,
            Mark::O => Self::O,
        }
    }
}

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Evaluates a board for a completed line or a draw.
pub fn evaluate(board: &[Option<Mark>; 9]) -> Option<Winner> {
    for [a, b, c] in LINES {
        if let Some(mark) = board[a] {
            if board[b] == Some(mark) && board[c] == Some(mark) {
                return Some(mark.into());
            }
        }
    }
    if board.iter().all(|cell| cell.is_some()) {
        return Some(Winner::Draw);
    }
    None
}

/// Tic-tac-toe window state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicTacToeState {
    /// Cells 0..=8, top-left to bottom-right.
    pub board: [Option<Mark>; 9],
    /// Mark owned by the human player.
    pub player_mark: Mark,
    /// Mark owned by the opponent.
    pub ai_mark: Mark,
    /// Whose turn it is.
    pub current_player: Mark,
    /// Whether the game has ended.
    pub is_game_over: bool,
    /// Outcome once the game ends.
    pub winner: Option<Winner>,
}

impl Default for TicTacToeState {
    fn default() -> Self {
        Self {
            board: [None; 9],
            player_mark: Mark::X,
            ai_mark: Mark::O,
            current_player: Mark::X,
            is_game_over: false,
            winner: None,
        }
    }
}

impl TicTacToeState {
    /// Whether the human may move right now.
    pub fn is_human_turn(&self) -> bool {
        !self.is_game_over && self.current_player == self.player_mark
    }

    /// Places the current player's mark in `index`.
    ///
    /// Returns `false` without changing anything when the game is over, the
    /// index is out of range, or the cell is occupied. On success the winner
    /// is re-evaluated and the turn passes.
    pub fn apply_move(&mut self, index: usize) -> bool {
        if self.is_game_over || index >= 9 || self.board[index].is_some() {
            return false;
        }
        self.board[index] = Some(self.current_player);
        self.winner = evaluate(&self.board);
        self.is_game_over = self.winner.is_some();
        self.current_player = self.current_player.other();
        true
    }

    /// Indices of empty cells.
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..9).filter(|&i| self.board[i].is_none()).collect()
    }

    /// Chooses the opponent's cell from an assistant suggestion.
    ///
    /// The suggestion must parse as an index of an empty cell; anything else
    /// falls back to a uniformly random empty cell. Returns `None` only when
    /// the board is full.
    pub fn resolve_opponent_cell<R: Rng>(
        &self,
        suggestion: Option<&str>,
        rng: &mut R,
    ) -> Option<usize> {
        if let Some(raw) = suggestion {
            if let Ok(index) = raw.trim().parse::<usize>() {
                if index < 9 && self.board[index].is_none() {
                    return Some(index);
                }
            }
        }
        self.empty_cells().choose(rng).copied()
    }

    /// Builds the opponent prompt for the current board.
    pub fn opponent_prompt(&self) -> String {
        let cells: Vec<String> = self
            .board
            .iter()
            .map(|cell| match cell {
                Some(Mark::X) => "'X'".to_string(),
                Some(Mark::O) => "'O'".to_string(),
                None => "null".to_string(),
            })
            .collect();
        let mark = match self.ai_mark {
            Mark::X => "X",
            Mark::O => "O",
        };
        format!(
            "You are playing Tic-Tac-Toe. It's your turn. Your mark is '{mark}'. \
             The board is a 9-element array (0-8, top-left to bottom-right). \
             Current board: [{}]. Respond with ONLY the number of the cell you want.",
            cells.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn moves_alternate_turns() {
        let mut state = TicTacToeState::default();
        assert!(state.is_human_turn());
        assert!(state.apply_move(4));
        assert_eq!(state.board[4], Some(Mark::X));
        assert_eq!(state.current_player, Mark::O);
        assert!(!state.is_human_turn());
    }

    #[test]
    fn occupied_and_out_of_range_cells_are_rejected() {
        let mut state = TicTacToeState::default();
        assert!(state.apply_move(0));
        assert!(!state.apply_move(0));
        assert!(!state.apply_move(9));
        assert_eq!(state.current_player, Mark::O);
    }

    #[test]
    fn row_win_ends_the_game() {
        let mut state = TicTacToeState::default();
        for index in [0, 3, 1, 4, 2] {
            assert!(state.apply_move(index));
        }
        assert_eq!(state.winner, Some(Winner::X));
        assert!(state.is_game_over);
        assert!(!state.apply_move(5));
    }

    #[test]
    fn diagonal_win_is_detected() {
        let mut state = TicTacToeState::default();
        for index in [0, 1, 4, 2, 8] {
            assert!(state.apply_move(index));
        }
        assert_eq!(state.winner, Some(Winner::X));
    }

    #[test]
    fn full_board_without_line_is_a_draw() {
        let mut state = TicTacToeState::default();
        // X X O / O O X / X O X
        for index in [0, 2, 1, 3, 5, 4, 6, 7, 8] {
            assert!(state.apply_move(index));
        }
        assert_eq!(state.winner, Some(Winner::Draw));
        assert!(state.is_game_over);
    }

    #[test]
    fn valid_suggestion_is_used_verbatim() {
        let state = TicTacToeState::default();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(state.resolve_opponent_cell(Some(" 6 "), &mut rng), Some(6));
    }

    #[test]
    fn unusable_suggestions_fall_back_to_an_empty_cell() {
        let mut state = TicTacToeState::default();
        state.apply_move(4);
        let mut rng = StdRng::seed_from_u64(7);
        for suggestion in [Some("4"), Some("nine"), Some("42"), None] {
            let cell = state
                .resolve_opponent_cell(suggestion, &mut rng)
                .expect("board has room");
            assert!(state.board[cell].is_none());
        }
    }

    #[test]
    fn full_board_yields_no_opponent_cell() {
        let mut state = TicTacToeState::default();
        for index in [0, 2, 1, 3, 5, 4, 6, 7, 8] {
            state.apply_move(index);
        }
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(state.resolve_opponent_cell(None, &mut rng), None);
    }

    #[test]
    fn state_serializes_with_wire_field_names() {
        let mut state = TicTacToeState::default();
        state.apply_move(0);
        let value = serde_json::to_value(&state).expect("serialize");
        assert_eq!(value["board"][0], "X");
        assert_eq!(value["board"][1], serde_json::Value::Null);
        assert_eq!(value["currentPlayer"], "O");
        assert_eq!(value["isGameOver"], false);
    }

    #[test]
    fn opponent_prompt_renders_the_board() {
        let mut state = TicTacToeState::default();
        state.apply_move(0);
        let prompt = state.opponent_prompt();
        assert!(prompt.contains("Your mark is 'O'"));
        assert!(prompt.contains("['X', null, null"));
    }
}
