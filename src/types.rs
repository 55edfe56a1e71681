use serde::{Deserialize, Serialize};

/// A playing side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

/// Whether a checker is still a regular piece or has been crowned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Regular,
    Crowned,
}

/// A checker occupying one cell. Empty cells are `None` on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checker {
    pub side: Side,
    pub rank: Rank,
}

impl Checker {
    pub fn new(side: Side, rank: Rank) -> Self {
        Self { side, rank }
    }

    pub fn regular(side: Side) -> Self {
        Self::new(side, Rank::Regular)
    }

    pub fn crowned(side: Side) -> Self {
        Self::new(side, Rank::Crowned)
    }

    /// Cell code used in serialized board arrays.
    /// Contract:
    /// - 0 = empty (never produced here, see `GameState::board`).
    /// - 1 = white regular, 2 = white crowned.
    /// - 3 = black regular, 4 = black crowned.
    pub fn code(self) -> u8 {
        match (self.side, self.rank) {
            (Side::White, Rank::Regular) => 1,
            (Side::White, Rank::Crowned) => 2,
            (Side::Black, Rank::Regular) => 3,
            (Side::Black, Rank::Crowned) => 4,
        }
    }
}

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: u8,
    pub y: u8,
}

impl Point {
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

/// An (origin, destination) pair. Whether it captures is determined by
/// replaying it against a board, not stored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Move {
    pub from_x: u8,
    pub from_y: u8,
    pub to_x: u8,
    pub to_y: u8,
}

impl Move {
    pub fn new(from_x: u8, from_y: u8, to_x: u8, to_y: u8) -> Self {
        Self {
            from_x,
            from_y,
            to_x,
            to_y,
        }
    }

    pub fn from(&self) -> Point {
        Point::new(self.from_x, self.from_y)
    }

    pub fn to(&self) -> Point {
        Point::new(self.to_x, self.to_y)
    }
}

/// Selects whether the non-human turn is played by the predictor or by a
/// second human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Pve,
    Pvp,
}

/// Controller phase exposed for the UI.
/// Contract:
/// - `TurnInProgress` means an automated turn is pending and the host
///   should invoke the predicted turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingSelection,
    AwaitingDestination,
    TurnInProgress,
    GameOver,
}

/// Engine configuration. Every field has a default; hosts override only
/// what they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub x_size: u8,
    pub y_size: u8,
    pub max_prediction_depth: u8,
    /// Side occupied by the single human in a PVE game. Affects nothing
    /// about legality, only which side the predictor plays.
    pub player_side: Side,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            x_size: 8,
            y_size: 8,
            max_prediction_depth: crate::ai::predictor::MAX_PREDICTION_DEPTH,
            player_side: Side::White,
        }
    }
}

/// Input to `start_game`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartOptions {
    #[serde(default)]
    pub config: GameConfig,
    pub game_type: GameType,
    #[serde(default)]
    pub white_name: String,
    #[serde(default)]
    pub black_name: String,
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameState {
    /// Row-major cell codes, `y * x_size + x` (see `Checker::code`).
    pub board: Vec<u8>,
    pub x_size: u8,
    pub y_size: u8,
    pub current_turn: Side,
    pub phase: Phase,
    pub white_score: u8,
    pub black_score: u8,
    pub selected: Option<Point>,
    /// Contract:
    /// - Moves applied by the most recently completed action, in order;
    ///   a predicted turn may contribute several.
    /// - Empty until the first move of a game.
    pub last_turn: Vec<Move>,
    /// Cells emptied by `last_turn`'s captures. Empty for quiet moves.
    pub captured: Vec<Point>,
    pub is_game_over: bool,
}

/// One `(player name, score)` pair emitted for the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: i32,
}

/// Final result after game over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameOutcome {
    pub winner: Side,
    pub records: Vec<ScoreEntry>,
}
