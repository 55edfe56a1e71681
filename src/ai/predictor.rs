use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use web_time::{SystemTime, UNIX_EPOCH};

use crate::board::Board;
use crate::types::{Move, Side};

/// Default number of turn changes explored per prediction.
pub const MAX_PREDICTION_DEPTH: u8 = 3;

/// Selects the move sequence played by an automated side.
pub trait TurnPredictor: Send + Sync {
    /// One complete turn for `side`: a single move, or a chained
    /// multi-capture by the same piece. Empty when `side` has no legal
    /// move, which the controller reads as the loss signal. The board is
    /// never mutated; exploration happens on copies.
    fn predict_turn(&mut self, board: &Board, side: Side) -> Vec<Move>;
}

/// Depth-limited exhaustive predictor. Not minimax: both sides' replies
/// are expanded under the same maximize-own-ratio criterion from the root
/// side's perspective, and ties are broken uniformly at random.
pub struct RatioPredictor<R: Rng> {
    max_depth: u8,
    rng: R,
}

impl<R: Rng + Send + Sync> RatioPredictor<R> {
    pub fn new(max_depth: u8, rng: R) -> Self {
        Self { max_depth, rng }
    }
}

impl RatioPredictor<SmallRng> {
    /// Production predictor, seeded from the wall clock.
    pub fn from_clock(max_depth: u8) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0);
        Self::new(max_depth, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send + Sync> TurnPredictor for RatioPredictor<R> {
    fn predict_turn(&mut self, board: &Board, side: Side) -> Vec<Move> {
        let branches = enumerate_turns(board, side, 0, self.max_depth, &[], None);

        let mut best = 0.0_f64;
        let mut optimal: Vec<&Vec<TaggedMove>> = Vec::new();
        for branch in &branches {
            let score = branch_score(board, branch, side);
            if score > best {
                best = score;
                optimal.clear();
                optimal.push(branch);
            } else if score == best {
                optimal.push(branch);
            }
        }

        let Some(chosen) = optimal.choose(&mut self.rng) else {
            return Vec::new();
        };

        // The branch may include opponent replies used only for scoring;
        // only the root side's leading run is played.
        chosen
            .iter()
            .take_while(|tagged| tagged.side == side)
            .map(|tagged| tagged.mv)
            .collect()
    }
}

/// One explored move together with the side that made it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TaggedMove {
    mv: Move,
    side: Side,
}

/// Enumerates every complete move sequence reachable from `board` within
/// `max_depth` turn changes. A capturing move with a follow-up capture
/// from its destination keeps the same side and depth, restricted to the
/// moved piece's required moves; every other move ends the turn. Each
/// call returns a freshly built list, so sibling explorations never
/// observe each other's state.
fn enumerate_turns(
    board: &Board,
    side: Side,
    depth: u8,
    max_depth: u8,
    prefix: &[TaggedMove],
    continuation: Option<Vec<Move>>,
) -> Vec<Vec<TaggedMove>> {
    let moves_list = match continuation {
        Some(required) => required,
        None => board.legal_moves(side),
    };

    if moves_list.is_empty() || depth == max_depth {
        return if prefix.is_empty() {
            Vec::new()
        } else {
            vec![prefix.to_vec()]
        };
    }

    let mut branches = Vec::new();
    for mv in moves_list {
        let mut next = board.clone();
        let captured = !next.apply(mv).is_empty();

        let mut extended = prefix.to_vec();
        extended.push(TaggedMove { mv, side });

        let follow_ups: Vec<Move> = next
            .required_moves(side)
            .into_iter()
            .filter(|required| required.from() == mv.to())
            .collect();

        if captured && !follow_ups.is_empty() {
            branches.extend(enumerate_turns(
                &next,
                side,
                depth,
                max_depth,
                &extended,
                Some(follow_ups),
            ));
        } else {
            branches.extend(enumerate_turns(
                &next,
                side.opposite(),
                depth + 1,
                max_depth,
                &extended,
                None,
            ));
        }
    }

    branches
}

/// Material ratio for `side` after replaying `branch` on a copy of
/// `board`. A wiped-out enemy scores positive infinity, so a winning
/// branch always dominates.
fn branch_score(board: &Board, branch: &[TaggedMove], side: Side) -> f64 {
    let mut replay = board.clone();
    for tagged in branch {
        replay.apply(tagged.mv);
    }

    let own = replay.side_score(side);
    let enemy = replay.side_score(side.opposite());
    if enemy == 0 {
        f64::INFINITY
    } else {
        f64::from(own) / f64::from(enemy)
    }
}
