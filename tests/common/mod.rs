// Positions shared by the integration tests

use serde_json::{json, Value};

use queue_ultimate_ttt::game::GameState;
use queue_ultimate_ttt::persistence::from_value;

/// X holds the top-left and center boards and two cells of the bottom-right
/// board, which the queue designates next. Only (8, 2) wins the game.
pub fn diagonal_threat() -> GameState {
    let empty = json!([null, null, null, null, null, null, null, null, null]);
    let mut boards: Vec<Value> = vec![empty; 9];
    boards[0] = json!(["X", "X", "X", null, "O", null, null, "O", null]);
    boards[1] = json!(["O", "O", null, null, null, null, null, null, null]);
    boards[4] = json!(["X", "X", "X", null, null, "O", null, null, null]);
    boards[8] = json!(["X", "X", null, null, "O", null, null, null, null]);
    let queue: Vec<i64> = (0..81).map(|i| i % 9).collect();

    from_value(json!({
        "boards": boards,
        "globalWins": ["X", null, null, null, "X", null, null, null, null],
        "numPlayers": 2,
        "currentPlayerIndex": 0,
        "queuePosition": 8,
        "masterQueue": queue,
    }))
    .unwrap()
}
