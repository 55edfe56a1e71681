use crate::ai::predictor::{RatioPredictor, TurnPredictor};
use crate::board::Board;
use crate::types::{
    GameConfig, GameOutcome, GameState, GameType, Move, Phase, Point, ScoreEntry, Side,
};

/// One running game: board ownership, whose turn it is, forced
/// multi-capture tracking, and end-of-game detection. Rendering and score
/// persistence stay outside; they consume `GameState` and `GameOutcome`.
pub struct GameInstance {
    board: Board,
    config: GameConfig,
    game_type: GameType,
    white_name: String,
    black_name: String,
    current_turn: Side,
    selected: Option<Point>,
    /// Square a started multi-capture must continue from.
    forced_from: Option<Point>,
    last_turn: Vec<Move>,
    captured: Vec<Point>,
    is_game_over: bool,
    outcome: Option<GameOutcome>,
    predictor: Box<dyn TurnPredictor>,
}

impl GameInstance {
    pub fn new(
        config: GameConfig,
        game_type: GameType,
        white_name: String,
        black_name: String,
        predictor: Box<dyn TurnPredictor>,
    ) -> Self {
        Self {
            board: Board::new(config.x_size, config.y_size),
            config,
            game_type,
            white_name,
            black_name,
            current_turn: Side::White,
            selected: None,
            forced_from: None,
            last_turn: Vec::new(),
            captured: Vec::new(),
            is_game_over: false,
            outcome: None,
            predictor,
        }
    }

    pub fn new_with_default_predictor(
        config: GameConfig,
        game_type: GameType,
        white_name: String,
        black_name: String,
    ) -> Self {
        let predictor = Box::new(RatioPredictor::from_clock(config.max_prediction_depth));
        Self::new(config, game_type, white_name, black_name, predictor)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_turn(&self) -> Side {
        self.current_turn
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    /// True when the predictor owns the side to move.
    pub fn is_ai_turn(&self) -> bool {
        !self.is_game_over
            && self.game_type == GameType::Pve
            && self.current_turn == self.config.player_side.opposite()
    }

    pub fn phase(&self) -> Phase {
        if self.is_game_over {
            Phase::GameOver
        } else if self.is_ai_turn() {
            Phase::TurnInProgress
        } else if self.selected.is_some() {
            Phase::AwaitingDestination
        } else {
            Phase::AwaitingSelection
        }
    }

    /// Moves the controller accepts right now: the side's legal moves,
    /// narrowed to the forced piece's required moves during a
    /// multi-capture continuation. The UI highlights exactly this list.
    pub fn current_legal_moves(&self) -> Vec<Move> {
        if self.is_game_over {
            return Vec::new();
        }
        match self.forced_from {
            Some(from) => self
                .board
                .required_moves(self.current_turn)
                .into_iter()
                .filter(|mv| mv.from() == from)
                .collect(),
            None => self.board.legal_moves(self.current_turn),
        }
    }

    /// Cell-click entry point: clicking an own piece selects it; clicking
    /// anywhere else tries (selection -> click) as a move. Out-of-bounds,
    /// foreign-turn, and illegal inputs are silently ignored. In a PVE
    /// game the predicted reply runs as soon as the human's turn ends.
    pub fn click(&mut self, x: i32, y: i32) {
        if self.is_game_over || self.is_ai_turn() || !self.board.is_within(x, y) {
            return;
        }

        let cell = Point::new(x as u8, y as u8);
        if self
            .board
            .occupant(x, y)
            .is_some_and(|checker| checker.side == self.current_turn)
        {
            self.selected = Some(cell);
            return;
        }

        let Some(selected) = self.selected else {
            return;
        };
        let mv = Move::new(selected.x, selected.y, cell.x, cell.y);
        if !self.current_legal_moves().contains(&mv) {
            return;
        }

        self.play_validated_move(mv);
        if self.is_ai_turn() {
            let _ = self.play_predicted_turn();
        }
    }

    /// Programmatic move entry for embedding hosts. Unlike `click`, misuse
    /// is reported instead of swallowed.
    pub fn submit_move(&mut self, mv: Move) -> Result<(), String> {
        if self.is_game_over {
            return Err("game is already over".to_string());
        }
        if self.is_ai_turn() {
            return Err("it is not the player's turn".to_string());
        }
        if !self.current_legal_moves().contains(&mv) {
            return Err("illegal move".to_string());
        }

        self.play_validated_move(mv);
        Ok(())
    }

    /// Plays one complete predicted turn for the automated side, applying
    /// the returned sequence move by move to the live board. An empty
    /// sequence means the side is stuck and falls through to the
    /// end-of-game check.
    pub fn play_predicted_turn(&mut self) -> Result<(), String> {
        if self.is_game_over {
            return Err("game is already over".to_string());
        }
        if !self.is_ai_turn() {
            return Err("it is not the predictor's turn".to_string());
        }

        let side = self.current_turn;
        let turn = self.predictor.predict_turn(&self.board, side);

        let mut captured = Vec::new();
        for &mv in &turn {
            captured.extend(self.board.apply(mv));
        }
        self.last_turn = turn;
        self.captured = captured;
        self.selected = None;
        self.forced_from = None;
        self.current_turn = side.opposite();

        self.check_for_game_over();
        Ok(())
    }

    /// Starts over with a fresh board; players, game type, and predictor
    /// are kept.
    pub fn restart(&mut self) {
        self.board = Board::new(self.config.x_size, self.config.y_size);
        self.current_turn = Side::White;
        self.selected = None;
        self.forced_from = None;
        self.last_turn.clear();
        self.captured.clear();
        self.is_game_over = false;
        self.outcome = None;
    }

    pub fn to_game_state(&self) -> GameState {
        GameState {
            board: self.board.to_array(),
            x_size: self.board.x_size(),
            y_size: self.board.y_size(),
            current_turn: self.current_turn,
            phase: self.phase(),
            white_score: self.board.white_score(),
            black_score: self.board.black_score(),
            selected: self.selected,
            last_turn: self.last_turn.clone(),
            captured: self.captured.clone(),
            is_game_over: self.is_game_over,
        }
    }

    fn play_validated_move(&mut self, mv: Move) {
        let side = self.current_turn;
        let captured = self.board.apply(mv);
        let has_captured = !captured.is_empty();
        self.last_turn = vec![mv];
        self.captured = captured;
        self.selected = None;

        let has_follow_up = self
            .board
            .required_moves(side)
            .into_iter()
            .any(|required| required.from() == mv.to());

        if has_captured && has_follow_up {
            self.forced_from = Some(mv.to());
        } else {
            self.forced_from = None;
            self.current_turn = side.opposite();
        }

        self.check_for_game_over();
    }

    /// A side with zero legal moves has lost. Both sides are checked
    /// after every completed move, white first, since a player can be
    /// stalemated by the opponent's move.
    fn check_for_game_over(&mut self) {
        let mut records = Vec::new();
        let mut winner = None;

        if self.board.legal_moves(Side::White).is_empty() {
            records.push(match self.game_type {
                GameType::Pve => ScoreEntry {
                    name: self.white_name.clone(),
                    score: i32::from(self.board.white_score())
                        - i32::from(self.board.black_score()),
                },
                GameType::Pvp => ScoreEntry {
                    name: self.black_name.clone(),
                    score: i32::from(self.board.black_score()),
                },
            });
            winner = Some(Side::Black);
        }

        if self.board.legal_moves(Side::Black).is_empty() {
            records.push(ScoreEntry {
                name: self.white_name.clone(),
                score: i32::from(self.board.white_score()),
            });
            winner = Some(Side::White);
        }

        if let Some(winner) = winner {
            self.is_game_over = true;
            self.outcome = Some(GameOutcome { winner, records });
        }
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, current_turn: Side) {
        self.board = board;
        self.current_turn = current_turn;
        self.selected = None;
        self.forced_from = None;
        self.last_turn.clear();
        self.captured.clear();
        self.is_game_over = false;
        self.outcome = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Checker;

    struct ScriptedPredictor {
        turn: Vec<Move>,
    }

    impl TurnPredictor for ScriptedPredictor {
        fn predict_turn(&mut self, _board: &Board, _side: Side) -> Vec<Move> {
            self.turn.clone()
        }
    }

    fn board_with(pieces: &[(u8, u8, Checker)]) -> Board {
        let mut board = Board::empty(8, 8);
        for &(x, y, checker) in pieces {
            board.set(x, y, Some(checker));
        }
        board
    }

    fn mv(from_x: u8, from_y: u8, to_x: u8, to_y: u8) -> Move {
        Move::new(from_x, from_y, to_x, to_y)
    }

    fn pvp_game() -> GameInstance {
        GameInstance::new_with_default_predictor(
            GameConfig::default(),
            GameType::Pvp,
            "ada".to_string(),
            "bob".to_string(),
        )
    }

    fn pve_game(turn: Vec<Move>) -> GameInstance {
        GameInstance::new(
            GameConfig::default(),
            GameType::Pve,
            "ada".to_string(),
            String::new(),
            Box::new(ScriptedPredictor { turn }),
        )
    }

    #[test]
    fn initial_state_is_correct() {
        let game = pvp_game();
        let state = game.to_game_state();

        assert_eq!(state.current_turn, Side::White);
        assert_eq!(state.phase, Phase::AwaitingSelection);
        assert_eq!(state.white_score, 8);
        assert_eq!(state.black_score, 8);
        assert!(!state.is_game_over);
        assert!(state.last_turn.is_empty());
        assert!(state.selected.is_none());
    }

    #[test]
    fn t02_illegal_submission_returns_error() {
        let mut game = pvp_game();

        let err = game.submit_move(mv(0, 0, 1, 1)).unwrap_err();

        assert!(err.contains("illegal move"));
    }

    #[test]
    fn click_selects_then_moves_and_flips_the_turn() {
        let mut game = pvp_game();

        game.click(1, 6);
        assert_eq!(game.to_game_state().selected, Some(Point::new(1, 6)));
        assert_eq!(game.phase(), Phase::AwaitingDestination);

        game.click(2, 5);

        let state = game.to_game_state();
        assert_eq!(state.current_turn, Side::Black);
        assert_eq!(state.last_turn, vec![mv(1, 6, 2, 5)]);
        assert!(state.captured.is_empty());
        assert!(state.selected.is_none());
    }

    #[test]
    fn click_silently_ignores_illegal_input() {
        let mut game = pvp_game();
        let before = game.to_game_state();

        game.click(-1, 3);
        game.click(8, 8);
        game.click(4, 4);
        assert_eq!(game.to_game_state(), before);

        // A selected piece plus an unreachable destination changes nothing
        // but the selection either.
        game.click(1, 6);
        game.click(4, 4);
        let state = game.to_game_state();
        assert_eq!(state.selected, Some(Point::new(1, 6)));
        assert_eq!(state.current_turn, Side::White);
        assert_eq!(state.board, before.board);
    }

    #[test]
    fn forced_continuation_keeps_the_side_and_restricts_moves() {
        let mut game = pvp_game();
        game.set_board_for_test(
            board_with(&[
                (2, 5, Checker::regular(Side::White)),
                (6, 5, Checker::regular(Side::White)),
                (3, 4, Checker::regular(Side::Black)),
                (5, 2, Checker::regular(Side::Black)),
                (0, 1, Checker::regular(Side::Black)),
            ]),
            Side::White,
        );

        game.submit_move(mv(2, 5, 4, 3)).unwrap();

        assert_eq!(game.current_turn(), Side::White);
        assert_eq!(game.current_legal_moves(), vec![mv(4, 3, 6, 1)]);
        assert!(game.submit_move(mv(6, 5, 5, 4)).is_err());

        game.submit_move(mv(4, 3, 6, 1)).unwrap();

        assert_eq!(game.current_turn(), Side::Black);
        assert!(!game.is_game_over());
    }

    #[test]
    fn capture_without_follow_up_flips_the_turn() {
        let mut game = pvp_game();
        game.set_board_for_test(
            board_with(&[
                (2, 5, Checker::regular(Side::White)),
                (3, 4, Checker::regular(Side::Black)),
                (6, 1, Checker::regular(Side::Black)),
            ]),
            Side::White,
        );

        game.submit_move(mv(2, 5, 4, 3)).unwrap();

        assert_eq!(game.current_turn(), Side::Black);
        assert_eq!(game.to_game_state().captured, vec![Point::new(3, 4)]);
    }

    #[test]
    fn stalemated_side_loses_even_after_the_opponents_move() {
        let mut game = pvp_game();
        // Black still has a piece, but (7, 7) has no forward room.
        game.set_board_for_test(
            board_with(&[
                (0, 5, Checker::regular(Side::White)),
                (7, 7, Checker::regular(Side::Black)),
            ]),
            Side::White,
        );

        game.submit_move(mv(0, 5, 1, 4)).unwrap();

        assert!(game.is_game_over());
        let outcome = game.outcome().unwrap();
        assert_eq!(outcome.winner, Side::White);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].name, "ada");
        assert_eq!(outcome.records[0].score, 1);
    }

    #[test]
    fn pve_white_loss_records_the_score_difference() {
        let mut game = pve_game(vec![mv(5, 2, 4, 3)]);
        // White's lone piece in the corner cannot move once black replies.
        game.set_board_for_test(
            board_with(&[
                (0, 0, Checker::regular(Side::White)),
                (5, 2, Checker::regular(Side::Black)),
                (3, 2, Checker::regular(Side::Black)),
            ]),
            Side::Black,
        );

        game.play_predicted_turn().unwrap();

        assert!(game.is_game_over());
        let outcome = game.outcome().unwrap();
        assert_eq!(outcome.winner, Side::Black);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].name, "ada");
        assert_eq!(outcome.records[0].score, 1 - 2);
    }

    #[test]
    fn pvp_white_loss_records_the_winners_raw_count() {
        let mut game = pvp_game();
        game.set_board_for_test(
            board_with(&[
                (0, 0, Checker::regular(Side::White)),
                (5, 2, Checker::regular(Side::Black)),
                (3, 2, Checker::regular(Side::Black)),
            ]),
            Side::Black,
        );

        game.submit_move(mv(5, 2, 4, 3)).unwrap();

        assert!(game.is_game_over());
        let outcome = game.outcome().unwrap();
        assert_eq!(outcome.winner, Side::Black);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].name, "bob");
        assert_eq!(outcome.records[0].score, 2);
    }

    #[test]
    fn black_loss_records_whites_raw_count_in_both_modes() {
        for game_type in [GameType::Pvp, GameType::Pve] {
            let mut game = GameInstance::new_with_default_predictor(
                GameConfig::default(),
                game_type,
                "ada".to_string(),
                "bob".to_string(),
            );
            game.set_board_for_test(
                board_with(&[
                    (0, 5, Checker::regular(Side::White)),
                    (2, 5, Checker::regular(Side::White)),
                    (7, 7, Checker::regular(Side::Black)),
                ]),
                Side::White,
            );

            game.submit_move(mv(0, 5, 1, 4)).unwrap();

            let outcome = game.outcome().unwrap();
            assert_eq!(outcome.winner, Side::White);
            assert_eq!(outcome.records.len(), 1);
            assert_eq!(outcome.records[0].name, "ada");
            assert_eq!(outcome.records[0].score, 2);
        }
    }

    #[test]
    fn pve_click_plays_the_predicted_reply_immediately() {
        let mut game = pve_game(vec![mv(2, 1, 3, 2)]);

        game.click(1, 6);
        game.click(2, 5);

        let state = game.to_game_state();
        assert_eq!(state.current_turn, Side::White);
        assert_eq!(state.last_turn, vec![mv(2, 1, 3, 2)]);
        assert_eq!(
            game.board().occupant(3, 2),
            Some(Checker::regular(Side::Black))
        );
    }

    #[test]
    fn pve_rejects_submissions_during_the_predictors_turn() {
        let mut game = pve_game(Vec::new());
        game.set_board_for_test(Board::default(), Side::Black);

        let err = game.submit_move(mv(2, 1, 3, 2)).unwrap_err();

        assert!(err.contains("not the player's turn"));
    }

    #[test]
    fn stuck_predictor_side_loses_without_a_move() {
        let mut game = pve_game(Vec::new());
        game.set_board_for_test(
            board_with(&[
                (0, 5, Checker::regular(Side::White)),
                (7, 7, Checker::regular(Side::Black)),
            ]),
            Side::Black,
        );

        game.play_predicted_turn().unwrap();

        assert!(game.is_game_over());
        assert_eq!(game.outcome().unwrap().winner, Side::White);
    }

    #[test]
    fn restart_reinitializes_the_board_and_state() {
        let mut game = pvp_game();
        game.set_board_for_test(
            board_with(&[
                (0, 5, Checker::regular(Side::White)),
                (7, 7, Checker::regular(Side::Black)),
            ]),
            Side::White,
        );
        game.submit_move(mv(0, 5, 1, 4)).unwrap();
        assert!(game.is_game_over());

        game.restart();

        let state = game.to_game_state();
        assert!(!state.is_game_over);
        assert!(game.outcome().is_none());
        assert_eq!(state.current_turn, Side::White);
        assert_eq!(state.white_score, 8);
        assert_eq!(state.black_score, 8);
        assert!(state.last_turn.is_empty());
    }
}
