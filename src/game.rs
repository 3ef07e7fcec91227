// Turn-order state machine
//
// GameState is an immutable value: apply_move never edits its input and always
// hands back a fresh state. An invalid move yields a state equal to the input.

use rand::Rng;

use crate::queue::{MasterQueue, QueueCursor};
use crate::types::{GlobalBoard, Move, Outcome, Player, SmallBoard, GRID_CELLS};

/// Fewest and most seats a game supports
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Complete state of one game
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    boards: [SmallBoard; GRID_CELLS],
    global: GlobalBoard,
    num_players: usize,
    current_player_index: usize,
    queue: MasterQueue,
    cursor: QueueCursor,
    outcome: Outcome,
}

impl GameState {
    /// Starts a fresh game with a newly shuffled master queue
    ///
    /// # Arguments
    /// * `num_players` - Seats in play, clamped to 2..=4
    /// * `starting_index` - Seat to move first; None picks one at random
    /// * `rng` - Source for the queue shuffle and random start
    pub fn new<R: Rng + ?Sized>(
        num_players: usize,
        starting_index: Option<usize>,
        rng: &mut R,
    ) -> Self {
        let num_players = num_players.clamp(MIN_PLAYERS, MAX_PLAYERS);
        let start = match starting_index {
            Some(i) => i % num_players,
            None => rng.random_range(0..num_players),
        };
        let queue = MasterQueue::shuffled(rng);
        Self::with_queue(num_players, start, queue)
    }

    /// Starts a fresh game over an explicit queue
    pub fn with_queue(num_players: usize, starting_index: usize, queue: MasterQueue) -> Self {
        let num_players = num_players.clamp(MIN_PLAYERS, MAX_PLAYERS);
        GameState {
            boards: [SmallBoard::default(); GRID_CELLS],
            global: GlobalBoard::default(),
            num_players,
            current_player_index: starting_index % num_players,
            queue,
            cursor: QueueCursor::default(),
            outcome: Outcome::InProgress,
        }
    }

    /// Reassembles a state from already-validated parts (used by the loader)
    pub(crate) fn from_parts(
        boards: [SmallBoard; GRID_CELLS],
        global: GlobalBoard,
        num_players: usize,
        current_player_index: usize,
        queue: MasterQueue,
        cursor: QueueCursor,
        outcome: Outcome,
    ) -> Self {
        GameState {
            boards,
            global,
            num_players,
            current_player_index,
            queue,
            cursor,
            outcome,
        }
    }

    pub fn boards(&self) -> &[SmallBoard; GRID_CELLS] {
        &self.boards
    }

    pub fn board(&self, index: usize) -> &SmallBoard {
        &self.boards[index]
    }

    pub fn global(&self) -> &GlobalBoard {
        &self.global
    }

    pub fn num_players(&self) -> usize {
        self.num_players
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    /// Symbol of the player to move
    pub fn current_player(&self) -> Player {
        Player::ALL[self.current_player_index]
    }

    pub fn queue(&self) -> &MasterQueue {
        &self.queue
    }

    pub fn cursor(&self) -> QueueCursor {
        self.cursor
    }

    pub fn queue_position(&self) -> usize {
        self.cursor.position()
    }

    pub fn has_wildcard(&self) -> bool {
        self.cursor.has_wildcard()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_over()
    }

    /// A sub-board is playable if nobody has won it and it has an empty cell
    pub fn is_playable(&self, board: usize) -> bool {
        is_playable(&self.global, &self.boards, board)
    }

    pub fn playable_boards(&self) -> [bool; GRID_CELLS] {
        playable_mask(&self.global, &self.boards)
    }

    /// Board the queue designates for the next move (None under a wildcard or
    /// once the queue is exhausted). Display value only; legality degrades to
    /// free choice if this board is unplayable.
    pub fn next_board(&self) -> Option<usize> {
        self.cursor.target(&self.queue)
    }

    /// Boards the current player may play in
    pub fn candidate_boards(&self) -> Vec<usize> {
        if self.is_over() {
            return Vec::new();
        }
        match self.cursor.target(&self.queue) {
            Some(board) if self.is_playable(board) => vec![board],
            _ => (0..GRID_CELLS).filter(|&b| self.is_playable(b)).collect(),
        }
    }

    /// All legal moves, one per empty cell of each candidate board
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for board in self.candidate_boards() {
            moves.extend(
                self.boards[board]
                    .empty_cells()
                    .map(|cell| Move::from_indices(board, cell)),
            );
        }
        moves
    }

    /// True if at least one legal move exists. Every candidate board is
    /// playable and so has an empty cell.
    pub fn has_legal_moves(&self) -> bool {
        !self.is_over() && (0..GRID_CELLS).any(|b| self.is_playable(b))
    }

    /// Applies `mv` for the current player, or returns None if it is illegal
    pub fn try_apply_move(&self, mv: Move) -> Option<GameState> {
        if self.is_over() || !mv.in_bounds() {
            return None;
        }
        let board_index = mv.board_index();
        let cell_index = mv.cell_index();

        if self.boards[board_index].get(cell_index).is_some() {
            return None;
        }
        if self.global.get(board_index).is_some() {
            return None;
        }
        if let Some(required) = self.cursor.target(&self.queue) {
            if required != board_index && self.is_playable(required) {
                return None;
            }
        }

        let mover = self.current_player();
        let mut boards = self.boards;
        let small = boards[board_index].with_mark(cell_index, mover);
        boards[board_index] = small;

        let local_winner = small.winner();
        let global = match local_winner {
            Some(winner) => self.global.with_winner(board_index, winner),
            None => self.global,
        };
        let board_completed = local_winner.is_some() || small.is_full();
        let global_winner = global.winner();

        let playable = playable_mask(&global, &boards);
        let cursor = self.cursor.advance(&self.queue, board_completed, &playable);

        let mut next = GameState {
            boards,
            global,
            num_players: self.num_players,
            current_player_index: (self.current_player_index + 1) % self.num_players,
            queue: self.queue.clone(),
            cursor,
            outcome: Outcome::InProgress,
        };

        next.outcome = match global_winner {
            Some(winner) => Outcome::Won(winner),
            None if !next.has_legal_moves() => Outcome::Draw,
            None => Outcome::InProgress,
        };

        Some(next)
    }

    /// Applies `mv`; an illegal move returns a state equal to `self`
    pub fn apply_move(&self, mv: Move) -> GameState {
        self.try_apply_move(mv).unwrap_or_else(|| self.clone())
    }
}

fn is_playable(global: &GlobalBoard, boards: &[SmallBoard; GRID_CELLS], board: usize) -> bool {
    global.get(board).is_none() && !boards[board].is_full()
}

fn playable_mask(global: &GlobalBoard, boards: &[SmallBoard; GRID_CELLS]) -> [bool; GRID_CELLS] {
    let mut mask = [false; GRID_CELLS];
    for (board, slot) in mask.iter_mut().enumerate() {
        *slot = is_playable(global, boards, board);
    }
    mask
}
