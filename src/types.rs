// Board primitives for queue-driven ultimate tic-tac-toe
// A game is a 3x3 grid of 3x3 sub-boards; everything here is a plain value type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of cells in a 3x3 grid (sub-board or global board)
pub const GRID_CELLS: usize = 9;

/// The 8 winning lines of a 3x3 grid: 3 rows, 3 columns, 2 diagonals
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Board position names, row-major
pub const BOARD_NAMES: [&str; GRID_CELLS] = [
    "Top-Left",
    "Top-Center",
    "Top-Right",
    "Mid-Left",
    "Center",
    "Mid-Right",
    "Bot-Left",
    "Bot-Center",
    "Bot-Right",
];

/// Cell position names within a sub-board, row-major
pub const CELL_NAMES: [&str; GRID_CELLS] = [
    "top-left",
    "top-center",
    "top-right",
    "mid-left",
    "center",
    "mid-right",
    "bottom-left",
    "bottom-center",
    "bottom-right",
];

/// Player symbols in turn order
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    #[serde(rename = "X")]
    X,
    #[serde(rename = "O")]
    O,
    #[serde(rename = "△")]
    Triangle,
    #[serde(rename = "□")]
    Square,
}

impl Player {
    /// All symbols in seating order
    pub const ALL: [Player; 4] = [Player::X, Player::O, Player::Triangle, Player::Square];

    /// Returns the player seated at `index`, if any
    pub fn from_index(index: usize) -> Option<Player> {
        Self::ALL.get(index).copied()
    }

    /// Seat index of this player (0..=3)
    pub fn index(self) -> usize {
        match self {
            Player::X => 0,
            Player::O => 1,
            Player::Triangle => 2,
            Player::Square => 3,
        }
    }

    /// Persisted symbol string
    pub fn symbol(self) -> &'static str {
        match self {
            Player::X => "X",
            Player::O => "O",
            Player::Triangle => "△",
            Player::Square => "□",
        }
    }

    /// Parses a persisted symbol string
    pub fn from_symbol(symbol: &str) -> Option<Player> {
        Self::ALL.iter().copied().find(|p| p.symbol() == symbol)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A cell is either empty or holds a player's mark
pub type Cell = Option<Player>;

/// Returns the player owning a full line of `cells`, if any
pub fn line_winner(cells: &[Cell; GRID_CELLS]) -> Option<Player> {
    LINES.iter().find_map(|&[a, b, c]| match cells[a] {
        Some(p) if cells[b] == Some(p) && cells[c] == Some(p) => Some(p),
        _ => None,
    })
}

/// One 3x3 sub-board, row-major
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SmallBoard(pub [Cell; GRID_CELLS]);

impl SmallBoard {
    pub fn cells(&self) -> &[Cell; GRID_CELLS] {
        &self.0
    }

    pub fn get(&self, cell: usize) -> Cell {
        self.0[cell]
    }

    /// Returns a copy with `player` placed at `cell`
    pub fn with_mark(&self, cell: usize, player: Player) -> SmallBoard {
        let mut cells = self.0;
        cells[cell] = Some(player);
        SmallBoard(cells)
    }

    pub fn winner(&self) -> Option<Player> {
        line_winner(&self.0)
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    /// Indices of empty cells in ascending order
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| i)
    }
}

/// The 3x3 matrix of sub-board winners
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GlobalBoard(pub [Cell; GRID_CELLS]);

impl GlobalBoard {
    pub fn markers(&self) -> &[Cell; GRID_CELLS] {
        &self.0
    }

    pub fn get(&self, board: usize) -> Cell {
        self.0[board]
    }

    pub fn with_winner(&self, board: usize, player: Player) -> GlobalBoard {
        let mut markers = self.0;
        markers[board] = Some(player);
        GlobalBoard(markers)
    }

    pub fn winner(&self) -> Option<Player> {
        line_winner(&self.0)
    }
}

/// Terminal status of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    InProgress,
    Won(Player),
    Draw,
}

impl Outcome {
    pub fn is_over(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// A move descriptor: which sub-board (big row/col) and which cell (small row/col)
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub big_row: u8,
    pub big_col: u8,
    pub small_row: u8,
    pub small_col: u8,
}

impl Move {
    pub fn new(big_row: u8, big_col: u8, small_row: u8, small_col: u8) -> Self {
        Move {
            big_row,
            big_col,
            small_row,
            small_col,
        }
    }

    /// Builds a move from a board index and a cell index (both 0..9)
    pub fn from_indices(board: usize, cell: usize) -> Self {
        Move {
            big_row: (board / 3) as u8,
            big_col: (board % 3) as u8,
            small_row: (cell / 3) as u8,
            small_col: (cell % 3) as u8,
        }
    }

    /// True if every coordinate is within 0..=2
    pub fn in_bounds(&self) -> bool {
        self.big_row < 3 && self.big_col < 3 && self.small_row < 3 && self.small_col < 3
    }

    pub fn board_index(&self) -> usize {
        self.big_row as usize * 3 + self.big_col as usize
    }

    pub fn cell_index(&self) -> usize {
        self.small_row as usize * 3 + self.small_col as usize
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.in_bounds() {
            return write!(
                f,
                "({},{})/({},{})",
                self.big_row, self.big_col, self.small_row, self.small_col
            );
        }
        write!(
            f,
            "{} {}",
            BOARD_NAMES[self.board_index()],
            CELL_NAMES[self.cell_index()]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_index_roundtrip() {
        for (i, p) in Player::ALL.iter().enumerate() {
            assert_eq!(p.index(), i);
            assert_eq!(Player::from_index(i), Some(*p));
            assert_eq!(Player::from_symbol(p.symbol()), Some(*p));
        }
        assert_eq!(Player::from_index(4), None);
        assert_eq!(Player::from_symbol("Z"), None);
    }

    #[test]
    fn test_line_winner_diagonal() {
        let mut cells = [None; GRID_CELLS];
        cells[2] = Some(Player::O);
        cells[4] = Some(Player::O);
        cells[6] = Some(Player::O);
        assert_eq!(line_winner(&cells), Some(Player::O));

        cells[6] = Some(Player::X);
        assert_eq!(line_winner(&cells), None);
    }

    #[test]
    fn test_small_board_full_and_empty_cells() {
        let board = SmallBoard::default().with_mark(4, Player::X);
        assert!(!board.is_full());
        assert_eq!(board.empty_cells().count(), 8);
        assert!(!board.empty_cells().any(|c| c == 4));

        let full = SmallBoard([Some(Player::X); GRID_CELLS]);
        assert!(full.is_full());
        assert_eq!(full.empty_cells().count(), 0);
    }

    #[test]
    fn test_move_indices() {
        let mv = Move::from_indices(5, 7);
        assert_eq!(mv, Move::new(1, 2, 2, 1));
        assert_eq!(mv.board_index(), 5);
        assert_eq!(mv.cell_index(), 7);
        assert_eq!(mv.to_string(), "Mid-Right bottom-center");
        assert!(!Move::new(3, 0, 0, 0).in_bounds());
    }
}
