use std::sync::Mutex;

use once_cell::sync::Lazy;
use wasm_bindgen::prelude::*;

use crate::game::GameInstance;
use crate::types::{Move, StartOptions};

/// The single live game owned by the boundary layer.
static GAME: Lazy<Mutex<Option<GameInstance>>> = Lazy::new(|| Mutex::new(None));

/// Starts a new game from `options` (see `StartOptions`) and returns the
/// initial `GameState`. When the configured player side is black, the
/// predictor's opening turn is played before returning.
#[wasm_bindgen]
pub fn start_game(options: JsValue) -> Result<JsValue, JsValue> {
    let options: StartOptions = serde_wasm_bindgen::from_value(options)?;
    let mut game = GameInstance::new_with_default_predictor(
        options.config,
        options.game_type,
        options.white_name,
        options.black_name,
    );
    if game.is_ai_turn() {
        game.play_predicted_turn().map_err(to_js_err)?;
    }

    let state = state_to_js(&game)?;
    let mut slot = lock_game()?;
    *slot = Some(game);
    Ok(state)
}

/// Current `GameState`.
#[wasm_bindgen]
pub fn game_state() -> Result<JsValue, JsValue> {
    with_game(|game| state_to_js(game))
}

/// Moves the controller accepts right now, for UI highlighting.
#[wasm_bindgen]
pub fn legal_moves() -> Result<JsValue, JsValue> {
    with_game(|game| serde_wasm_bindgen::to_value(&game.current_legal_moves()).map_err(Into::into))
}

/// Forwards one cell click; illegal clicks leave the state unchanged.
/// Returns the resulting `GameState`.
#[wasm_bindgen]
pub fn click_cell(x: i32, y: i32) -> Result<JsValue, JsValue> {
    with_game(|game| {
        game.click(x, y);
        state_to_js(game)
    })
}

/// Submits a move programmatically; unlike `click_cell`, misuse is
/// reported as an error.
#[wasm_bindgen]
pub fn submit_move(from_x: u8, from_y: u8, to_x: u8, to_y: u8) -> Result<JsValue, JsValue> {
    with_game(|game| {
        game.submit_move(Move::new(from_x, from_y, to_x, to_y))
            .map_err(to_js_err)?;
        state_to_js(game)
    })
}

/// Plays the predictor's turn; valid only in a PVE game when the
/// automated side is to move.
#[wasm_bindgen]
pub fn predicted_turn() -> Result<JsValue, JsValue> {
    with_game(|game| {
        game.play_predicted_turn().map_err(to_js_err)?;
        state_to_js(game)
    })
}

/// `GameOutcome` of a finished game (`null` while it is running),
/// including the score records for the leaderboard collaborator.
#[wasm_bindgen]
pub fn game_outcome() -> Result<JsValue, JsValue> {
    with_game(|game| serde_wasm_bindgen::to_value(&game.outcome()).map_err(Into::into))
}

/// Resets the current game to its starting position.
#[wasm_bindgen]
pub fn restart_game() -> Result<JsValue, JsValue> {
    with_game(|game| {
        game.restart();
        state_to_js(game)
    })
}

fn with_game(f: impl FnOnce(&mut GameInstance) -> Result<JsValue, JsValue>) -> Result<JsValue, JsValue> {
    let mut slot = lock_game()?;
    let game = slot
        .as_mut()
        .ok_or_else(|| JsValue::from_str("no game in progress"))?;
    f(game)
}

fn lock_game() -> Result<std::sync::MutexGuard<'static, Option<GameInstance>>, JsValue> {
    GAME.lock()
        .map_err(|_| JsValue::from_str("game state poisoned"))
}

fn state_to_js(game: &GameInstance) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&game.to_game_state()).map_err(Into::into)
}

fn to_js_err(message: String) -> JsValue {
    JsValue::from_str(&message)
}
