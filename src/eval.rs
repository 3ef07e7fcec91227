// Heuristic evaluation from the engine's point of view
//
// Positive scores favour the engine-controlled player. Line bands on the global
// grid are orders of magnitude larger than sub-board bands so that board-level
// control outweighs cell-level tactics.

use crate::config::{LineBands, PlayersConfig, ScoresConfig};
use crate::game::GameState;
use crate::types::{Cell, GlobalBoard, Outcome, Player, SmallBoard, GRID_CELLS, LINES};

/// The two sides of an engine-vs-human game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Perspective {
    pub engine: Player,
    pub opponent: Player,
}

impl Perspective {
    pub fn new(engine: Player, opponent: Player) -> Self {
        Perspective { engine, opponent }
    }

    pub fn from_config(players: &PlayersConfig) -> Self {
        Perspective::new(players.engine, players.human)
    }

    /// +1 for the engine, -1 for the opponent, 0 for anyone else
    pub fn sign(&self, player: Player) -> i32 {
        if player == self.engine {
            1
        } else if player == self.opponent {
            -1
        } else {
            0
        }
    }

    fn classify(&self, cell: Cell) -> Mark {
        match cell {
            None => Mark::Empty,
            Some(p) if p == self.engine => Mark::Own,
            Some(p) if p == self.opponent => Mark::Opponent,
            Some(_) => Mark::Blocked,
        }
    }
}

/// Cell classification for line scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Own,
    Opponent,
    Empty,
    /// Third-party mark or a dead (drawn) sub-board
    Blocked,
}

/// Sums line bands over the 8 lines of a classified grid
fn score_lines(marks: &[Mark; GRID_CELLS], own: &LineBands, opponent: &LineBands) -> i32 {
    LINES
        .iter()
        .map(|line| {
            let (mut mine, mut theirs, mut empty) = (0, 0, 0);
            for &i in line {
                match marks[i] {
                    Mark::Own => mine += 1,
                    Mark::Opponent => theirs += 1,
                    Mark::Empty => empty += 1,
                    Mark::Blocked => {}
                }
            }
            match (mine, theirs) {
                (m, 0) if m > 0 => own.for_count(m, empty),
                (0, t) if t > 0 => -opponent.for_count(t, empty),
                _ => 0,
            }
        })
        .sum()
}

/// Static evaluator bound to one perspective
#[derive(Debug, Clone)]
pub struct Evaluator {
    scores: ScoresConfig,
    perspective: Perspective,
}

impl Evaluator {
    pub fn new(scores: ScoresConfig, perspective: Perspective) -> Self {
        Evaluator {
            scores,
            perspective,
        }
    }

    pub fn perspective(&self) -> Perspective {
        self.perspective
    }

    pub fn scores(&self) -> &ScoresConfig {
        &self.scores
    }

    /// Scores a state with no remaining-depth adjustment
    pub fn evaluate(&self, state: &GameState) -> i32 {
        self.evaluate_with_depth(state, 0)
    }

    /// Scores a state; terminal scores grow with `remaining_depth` so that
    /// quicker wins and slower losses are preferred
    pub fn evaluate_with_depth(&self, state: &GameState, remaining_depth: u8) -> i32 {
        match state.outcome() {
            Outcome::Won(winner) => {
                let magnitude =
                    self.scores.win + self.scores.depth_bonus * remaining_depth as i32;
                if winner == self.perspective.engine {
                    magnitude
                } else {
                    -magnitude
                }
            }
            Outcome::Draw => self.scores.draw,
            Outcome::InProgress => {
                let mut score = 0;
                for board in 0..GRID_CELLS {
                    if state.is_playable(board) {
                        score += self.board_score(state.board(board))
                            * self.scores.cell_weights[board];
                    }
                }
                score += self.global_score(state.global(), state.boards());
                score += self.strategic_score(state);
                score
            }
        }
    }

    /// Line and positional score of a single sub-board
    pub fn board_score(&self, board: &SmallBoard) -> i32 {
        let mut marks = [Mark::Empty; GRID_CELLS];
        let mut positional = 0;
        for (i, &cell) in board.cells().iter().enumerate() {
            marks[i] = self.perspective.classify(cell);
            if let Some(p) = cell {
                positional += self.perspective.sign(p) * self.scores.cell_weights[i];
            }
        }
        score_lines(&marks, &self.scores.small_own, &self.scores.small_opponent) + positional
    }

    /// Line and positional score of the global win matrix
    pub fn global_score(&self, global: &GlobalBoard, boards: &[SmallBoard; GRID_CELLS]) -> i32 {
        let mut marks = [Mark::Empty; GRID_CELLS];
        let mut positional = 0;
        for (i, &marker) in global.markers().iter().enumerate() {
            marks[i] = match marker {
                None if boards[i].is_full() => Mark::Blocked,
                _ => self.perspective.classify(marker),
            };
            if let Some(p) = marker {
                positional += self.perspective.sign(p)
                    * self.scores.global_board_weight
                    * self.scores.cell_weights[i];
            }
        }
        score_lines(&marks, &self.scores.global_own, &self.scores.global_opponent) + positional
    }

    /// Wildcard holder and forced-board adjustments
    fn strategic_score(&self, state: &GameState) -> i32 {
        let mover = self.perspective.sign(state.current_player());
        if mover == 0 {
            return 0;
        }
        if state.has_wildcard() {
            return mover * self.scores.wildcard_bonus;
        }
        match state.next_board() {
            // Whoever leads the forced board benefits from play being funnelled there
            Some(board) if state.is_playable(board) => {
                self.board_score(state.board(board)).signum() * self.scores.funnel_bonus
            }
            _ => 0,
        }
    }
}
