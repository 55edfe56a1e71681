use crate::types::{Checker, Move, Point, Rank, Side};

/// The four diagonal unit offsets. The first two point toward decreasing
/// row (white's direction of advance), the last two toward increasing row
/// (black's).
const MOVE_OFFSETS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Checkers board: a `x_size * y_size` grid of cells with origin at the
/// top-left. `Clone` produces a fully independent copy; the predictor
/// relies on that to explore continuations without touching the live board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    x_size: u8,
    y_size: u8,
    cells: Vec<Option<Checker>>,
}

impl Board {
    /// Creates the standard starting position: each side's two back ranks
    /// of regular pieces on the dark squares, facing rows empty. Black
    /// occupies the top ranks, white the bottom ones.
    pub fn new(x_size: u8, y_size: u8) -> Self {
        let mut board = Self::empty(x_size, y_size);
        for y in 0..y_size {
            for x in 0..x_size {
                if (x + y) % 2 != 1 {
                    continue;
                }
                if y < 2 {
                    board.set(x, y, Some(Checker::regular(Side::Black)));
                } else if y + 2 >= y_size {
                    board.set(x, y, Some(Checker::regular(Side::White)));
                }
            }
        }
        board
    }

    /// Creates a board with every cell empty.
    pub fn empty(x_size: u8, y_size: u8) -> Self {
        Self {
            x_size,
            y_size,
            cells: vec![None; x_size as usize * y_size as usize],
        }
    }

    pub fn x_size(&self) -> u8 {
        self.x_size
    }

    pub fn y_size(&self) -> u8 {
        self.y_size
    }

    pub fn is_within(&self, x: i32, y: i32) -> bool {
        (0..self.x_size as i32).contains(&x) && (0..self.y_size as i32).contains(&y)
    }

    /// Occupant of `(x, y)`, `None` for an empty cell. Out-of-bounds
    /// coordinates read as empty rather than faulting.
    pub fn occupant(&self, x: i32, y: i32) -> Option<Checker> {
        if !self.is_within(x, y) {
            return None;
        }
        self.cells[self.index(x as u8, y as u8)]
    }

    /// Replaces the occupant of `(x, y)`. An out-of-bounds coordinate is
    /// a construction bug; it trips a debug assertion and is otherwise
    /// ignored.
    pub fn set(&mut self, x: u8, y: u8, occupant: Option<Checker>) {
        debug_assert!(
            self.is_within(x as i32, y as i32),
            "cell ({x}, {y}) is out of bounds"
        );
        if !self.is_within(x as i32, y as i32) {
            return;
        }
        let index = self.index(x, y);
        self.cells[index] = occupant;
    }

    pub fn white_score(&self) -> u8 {
        self.side_score(Side::White)
    }

    pub fn black_score(&self) -> u8 {
        self.side_score(Side::Black)
    }

    /// Number of surviving checkers of `side`; crowned pieces count the
    /// same as regular ones.
    pub fn side_score(&self, side: Side) -> u8 {
        self.cells
            .iter()
            .flatten()
            .filter(|checker| checker.side == side)
            .count() as u8
    }

    /// Converts the board to row-major cell codes (see `Checker::code`,
    /// 0 = empty).
    pub fn to_array(&self) -> Vec<u8> {
        self.cells
            .iter()
            .map(|cell| cell.map_or(0, Checker::code))
            .collect()
    }

    /// Row a regular checker of `side` is crowned on.
    pub fn promotion_row(&self, side: Side) -> u8 {
        match side {
            Side::White => 0,
            Side::Black => self.y_size - 1,
        }
    }

    /// Legal moves for `side` under the mandatory-capture rule: the
    /// capture list when any capture exists, the quiet-move list otherwise.
    pub fn legal_moves(&self, side: Side) -> Vec<Move> {
        let required = self.required_moves(side);
        if required.is_empty() {
            self.optional_moves(side)
        } else {
            required
        }
    }

    /// Capturing moves for `side`.
    pub fn required_moves(&self, side: Side) -> Vec<Move> {
        let mut moves = Vec::new();

        for y in 0..self.y_size as i32 {
            for x in 0..self.x_size as i32 {
                let Some(checker) = self.occupant(x, y) else {
                    continue;
                };
                if checker.side != side {
                    continue;
                }

                match checker.rank {
                    Rank::Regular => {
                        for (dx, dy) in MOVE_OFFSETS {
                            let (land_x, land_y) = (x + dx * 2, y + dy * 2);
                            if !self.is_within(land_x, land_y) {
                                continue;
                            }
                            let jumped = self.occupant(x + dx, y + dy);
                            if jumped.is_some_and(|c| c.side == side.opposite())
                                && self.occupant(land_x, land_y).is_none()
                            {
                                moves.push(Move::new(x as u8, y as u8, land_x as u8, land_y as u8));
                            }
                        }
                    }
                    Rank::Crowned => {
                        for (dx, dy) in MOVE_OFFSETS {
                            self.crowned_captures_along(x, y, dx, dy, side, &mut moves);
                        }
                    }
                }
            }
        }

        moves
    }

    /// Non-capturing moves for `side`: regular pieces step to the two
    /// forward diagonals, crowned pieces slide until the first blocker.
    pub fn optional_moves(&self, side: Side) -> Vec<Move> {
        let mut moves = Vec::new();

        for y in 0..self.y_size as i32 {
            for x in 0..self.x_size as i32 {
                let Some(checker) = self.occupant(x, y) else {
                    continue;
                };
                if checker.side != side {
                    continue;
                }

                match checker.rank {
                    Rank::Regular => {
                        for &(dx, dy) in forward_offsets(side) {
                            let (to_x, to_y) = (x + dx, y + dy);
                            if self.is_within(to_x, to_y) && self.occupant(to_x, to_y).is_none() {
                                moves.push(Move::new(x as u8, y as u8, to_x as u8, to_y as u8));
                            }
                        }
                    }
                    Rank::Crowned => {
                        for (dx, dy) in MOVE_OFFSETS {
                            let mut shift = 1;
                            loop {
                                let (to_x, to_y) = (x + dx * shift, y + dy * shift);
                                if !self.is_within(to_x, to_y)
                                    || self.occupant(to_x, to_y).is_some()
                                {
                                    break;
                                }
                                moves.push(Move::new(x as u8, y as u8, to_x as u8, to_y as u8));
                                shift += 1;
                            }
                        }
                    }
                }
            }
        }

        moves
    }

    /// Executes `mv`: promotes a regular piece reaching its far rank,
    /// relocates the occupant, and clears every occupied cell strictly
    /// between origin and destination. Returns the cleared (captured)
    /// cells; the same sweep covers both the 2-cell regular jump and
    /// arbitrary-length crowned captures.
    pub fn apply(&mut self, mv: Move) -> Vec<Point> {
        let (from_x, from_y) = (mv.from_x as i32, mv.from_y as i32);
        let (to_x, to_y) = (mv.to_x as i32, mv.to_y as i32);
        let dx = (to_x - from_x).signum();
        let dy = (to_y - from_y).signum();
        debug_assert!(dx != 0 && dy != 0, "moves must be diagonal");

        let mut moved = self.occupant(from_x, from_y);
        if let Some(checker) = moved.as_mut()
            && checker.rank == Rank::Regular
            && mv.to_y == self.promotion_row(checker.side)
        {
            checker.rank = Rank::Crowned;
        }

        self.set(mv.from_x, mv.from_y, None);
        self.set(mv.to_x, mv.to_y, moved);

        let mut captured = Vec::new();
        let (mut x, mut y) = (from_x + dx, from_y + dy);
        while (x, y) != (to_x, to_y) && self.is_within(x, y) {
            if self.occupant(x, y).is_some() {
                self.set(x as u8, y as u8, None);
                captured.push(Point::new(x as u8, y as u8));
            }
            x += dx;
            y += dy;
        }

        captured
    }

    /// Capture destinations for a crowned piece at `(x, y)` along one
    /// direction: skip empties, abort on an own piece, and after exactly
    /// one enemy piece emit every empty cell until the ray is blocked.
    fn crowned_captures_along(
        &self,
        x: i32,
        y: i32,
        dx: i32,
        dy: i32,
        side: Side,
        moves: &mut Vec<Move>,
    ) {
        let mut passed_enemy = false;
        let mut shift = 1;
        loop {
            let (to_x, to_y) = (x + dx * shift, y + dy * shift);
            if !self.is_within(to_x, to_y) {
                return;
            }
            match self.occupant(to_x, to_y) {
                Some(other) if !passed_enemy => {
                    if other.side == side {
                        return;
                    }
                    passed_enemy = true;
                }
                Some(_) => return,
                None if passed_enemy => {
                    moves.push(Move::new(x as u8, y as u8, to_x as u8, to_y as u8));
                }
                None => {}
            }
            shift += 1;
        }
    }

    fn index(&self, x: u8, y: u8) -> usize {
        y as usize * self.x_size as usize + x as usize
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(8, 8)
    }
}

fn forward_offsets(side: Side) -> &'static [(i32, i32)] {
    match side {
        Side::White => &MOVE_OFFSETS[..2],
        Side::Black => &MOVE_OFFSETS[2..],
    }
}
