// Serialization adapter between GameState and the persisted row-store record
//
// The record mirrors the JSON document kept by the external store. Loading is
// strict about structural fields and lenient only about fields newer records add:
// queue position, wildcard flag, and the 81-slot master queue.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::game::{GameState, MAX_PLAYERS, MIN_PLAYERS};
use crate::policy::Difficulty;
use crate::queue::{MasterQueue, QueueCursor, QUEUE_LEN};
use crate::types::{Cell, GlobalBoard, Outcome, Player, SmallBoard, GRID_CELLS};

const DRAW: &str = "draw";

/// Validation failures when loading a persisted state
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("invalid game state: malformed record: {0}")]
    Malformed(String),
    #[error("invalid game state: expected 9 sub-boards, found {0}")]
    BoardCount(usize),
    #[error("invalid game state: sub-board {board} has {len} cells, expected 9")]
    BoardLength { board: usize, len: usize },
    #[error("invalid game state: globalWins has {0} markers, expected 9")]
    GlobalLength(usize),
    #[error("invalid game state: nextBoard {0} outside 0..=8")]
    NextBoard(i64),
    #[error("invalid game state: numPlayers {0} not in 2..=4")]
    NumPlayers(i64),
    #[error("invalid game state: currentPlayerIndex {index} out of range for {num_players} players")]
    CurrentPlayer { index: i64, num_players: usize },
    #[error("invalid game state: unrecognized gameOver value {0:?}")]
    GameOver(String),
    #[error("invalid game state: queuePosition {0} outside 0..=81")]
    QueuePosition(i64),
    #[error("invalid game state: masterQueue must hold 81 board indices in 0..=8")]
    MasterQueue,
    #[error("invalid game state: masterSequence must hold 9 board indices in 0..=8")]
    MasterSequence,
}

/// Persistence-neutral record of a game state
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SerializedState {
    pub boards: Vec<Vec<Cell>>,
    pub global_wins: Vec<Cell>,
    #[serde(default)]
    pub next_board: Option<i64>,
    pub num_players: i64,
    pub current_player_index: i64,
    #[serde(default)]
    pub game_over: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_wildcard: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_queue: Option<Vec<i64>>,
    /// Older records: 9-slot repeating sequence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_sequence: Option<Vec<i64>>,
    /// Older records: pointer into the 9-slot sequence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_position: Option<i64>,
}

/// Converts a state into its persisted record
pub fn serialize(state: &GameState) -> SerializedState {
    SerializedState {
        boards: state.boards().iter().map(|b| b.cells().to_vec()).collect(),
        global_wins: state.global().markers().to_vec(),
        next_board: state.next_board().map(|b| b as i64),
        num_players: state.num_players() as i64,
        current_player_index: state.current_player_index() as i64,
        game_over: match state.outcome() {
            Outcome::InProgress => None,
            Outcome::Won(player) => Some(player.symbol().to_string()),
            Outcome::Draw => Some(DRAW.to_string()),
        },
        queue_position: Some(state.queue_position() as i64),
        has_wildcard: Some(state.has_wildcard()),
        master_queue: Some(state.queue().slots().iter().map(|&b| b as i64).collect()),
        master_sequence: None,
        sequence_position: None,
    }
}

/// Validates a persisted record and rebuilds the state
pub fn deserialize(record: SerializedState) -> Result<GameState, StateError> {
    if record.boards.len() != GRID_CELLS {
        return Err(StateError::BoardCount(record.boards.len()));
    }
    let mut boards = [SmallBoard::default(); GRID_CELLS];
    for (i, raw) in record.boards.iter().enumerate() {
        let cells: [Cell; GRID_CELLS] = raw.as_slice().try_into().map_err(|_| {
            StateError::BoardLength {
                board: i,
                len: raw.len(),
            }
        })?;
        boards[i] = SmallBoard(cells);
    }

    let markers: [Cell; GRID_CELLS] = record
        .global_wins
        .as_slice()
        .try_into()
        .map_err(|_| StateError::GlobalLength(record.global_wins.len()))?;
    let global = GlobalBoard(markers);

    if let Some(next) = record.next_board {
        if !(0..GRID_CELLS as i64).contains(&next) {
            return Err(StateError::NextBoard(next));
        }
    }

    if !(MIN_PLAYERS as i64..=MAX_PLAYERS as i64).contains(&record.num_players) {
        return Err(StateError::NumPlayers(record.num_players));
    }
    let num_players = record.num_players as usize;

    if !(0..num_players as i64).contains(&record.current_player_index) {
        return Err(StateError::CurrentPlayer {
            index: record.current_player_index,
            num_players,
        });
    }
    let current_player_index = record.current_player_index as usize;

    let outcome = match record.game_over.as_deref() {
        None => Outcome::InProgress,
        Some(DRAW) => Outcome::Draw,
        Some(symbol) => Player::from_symbol(symbol)
            .map(Outcome::Won)
            .ok_or_else(|| StateError::GameOver(symbol.to_string()))?,
    };

    let position = record
        .queue_position
        .or(record.sequence_position)
        .unwrap_or(0);
    if !(0..=QUEUE_LEN as i64).contains(&position) {
        return Err(StateError::QueuePosition(position));
    }
    let cursor = QueueCursor::new(position as usize, record.has_wildcard.unwrap_or(false));

    let queue = match (&record.master_queue, &record.master_sequence) {
        (Some(slots), _) => to_indices(slots)
            .and_then(|s| MasterQueue::from_slots(&s))
            .ok_or(StateError::MasterQueue)?,
        (None, Some(sequence)) => to_indices(sequence)
            .and_then(|s| MasterQueue::from_legacy_sequence(&s))
            .ok_or(StateError::MasterSequence)?,
        (None, None) => MasterQueue::identity(),
    };

    Ok(GameState::from_parts(
        boards,
        global,
        num_players,
        current_player_index,
        queue,
        cursor,
        outcome,
    ))
}

fn to_indices(raw: &[i64]) -> Option<Vec<u8>> {
    raw.iter().map(|&b| u8::try_from(b).ok()).collect()
}

/// Parses and validates a record from a JSON value
pub fn from_value(value: Value) -> Result<GameState, StateError> {
    let record: SerializedState =
        serde_json::from_value(value).map_err(|e| StateError::Malformed(e.to_string()))?;
    deserialize(record)
}

/// Parses and validates a record from JSON text
pub fn from_json(text: &str) -> Result<GameState, StateError> {
    let record: SerializedState =
        serde_json::from_str(text).map_err(|e| StateError::Malformed(e.to_string()))?;
    deserialize(record)
}

/// Serializes a state to JSON text
pub fn to_json(state: &GameState) -> Result<String, StateError> {
    serde_json::to_string(&serialize(state)).map_err(|e| StateError::Malformed(e.to_string()))
}

/// Session mode stored alongside a saved game
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// One human against the engine
    Single,
    Two,
    Three,
    Four,
}

impl GameMode {
    pub fn num_players(self) -> usize {
        match self {
            GameMode::Single | GameMode::Two => 2,
            GameMode::Three => 3,
            GameMode::Four => 4,
        }
    }
}

/// Row shape exchanged with the external game store
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SavedGame {
    pub id: String,
    pub state: SerializedState,
    pub mode: GameMode,
    pub difficulty: Option<Difficulty>,
    pub updated_at: String,
}

impl SavedGame {
    /// Snapshots `state`, stamping the current time
    pub fn new(
        id: impl Into<String>,
        state: &GameState,
        mode: GameMode,
        difficulty: Option<Difficulty>,
    ) -> Self {
        SavedGame {
            id: id.into(),
            state: serialize(state),
            mode,
            difficulty,
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Rebuilds the stored state
    pub fn restore(&self) -> Result<GameState, StateError> {
        deserialize(self.state.clone())
    }
}
