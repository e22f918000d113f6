use super::{
    Color, IdAllocator, Move, Outcome, Piece, PieceId, Rank, RuleConfig, Square, GRID_SIZE,
};

/// Everything needed to reverse one real move or attack exactly.
#[derive(Clone, Debug)]
pub struct UnmakeInfo {
    pub(crate) mv: Move,
    pub(crate) color: Color,
    /// Cells touched by the move with their previous occupants.
    pub(crate) cells: [(Square, Option<PieceId>); 3],
    pub(crate) cell_count: usize,
    /// Pre-move snapshots of the mover and the defender.
    pub(crate) mover: Piece,
    pub(crate) defender: Option<Piece>,
    pub(crate) tray_len: usize,
    pub(crate) outcome: Option<Outcome>,
}

impl UnmakeInfo {
    #[must_use]
    pub fn mv(&self) -> Move {
        self.mv
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Attack result, `None` for a plain move.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }
}

/// The authoritative game state.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) rules: RuleConfig,
    pub(crate) pieces: Vec<Piece>,
    pub(crate) grid: [Option<PieceId>; GRID_SIZE],
    pub(crate) tray: Vec<PieceId>,
    pub(crate) history: Vec<UnmakeInfo>,
    pub(crate) turn: Color,
}

impl Board {
    /// A board with both full armies waiting in the tray.
    #[must_use]
    pub fn new(rules: RuleConfig) -> Self {
        let mut ids = IdAllocator::new();
        let mut pieces = Vec::with_capacity(80);
        for color in Color::BOTH {
            for rank in Rank::ARMY {
                for _ in 0..rank.count() {
                    if let Some(id) = ids.allocate() {
                        pieces.push(Piece::new(id, color, rank));
                    }
                }
            }
        }
        let tray = pieces.iter().map(Piece::id).collect();
        Board {
            rules,
            pieces,
            grid: [None; GRID_SIZE],
            tray,
            history: Vec::new(),
            turn: Color::Red,
        }
    }

    #[must_use]
    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    /// Side to move.
    #[must_use]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[must_use]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.pieces[id.index()]
    }

    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.grid[sq.index()].map(|id| self.piece(id))
    }

    pub(crate) fn id_at(&self, sq: Square) -> Option<PieceId> {
        self.grid[sq.index()]
    }

    /// Every piece on the board with its cell.
    pub fn pieces_on_board(&self) -> impl Iterator<Item = (Square, &Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Captured and unplaced pieces.
    pub fn tray(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.tray.iter().map(move |&id| self.piece(id))
    }

    #[must_use]
    pub fn tray_len(&self) -> usize {
        self.tray.len()
    }

    /// Executed moves, oldest first.
    pub fn history(&self) -> impl DoubleEndedIterator<Item = &UnmakeInfo> + '_ {
        self.history.iter()
    }

    #[must_use]
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|u| u.mv)
    }

    /// True once the first move has been played.
    #[must_use]
    pub fn has_started(&self) -> bool {
        !self.history.is_empty()
    }

    /// Count pieces of `color` and `rank` across grid and tray.
    #[must_use]
    pub fn army_count(&self, color: Color, rank: Rank) -> usize {
        self.pieces
            .iter()
            .filter(|p| p.color() == color && p.rank() == rank)
            .count()
    }

    pub(crate) fn set_cell(&mut self, sq: Square, id: Option<PieceId>) {
        self.grid[sq.index()] = id;
    }
}
