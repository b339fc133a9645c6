use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use rustc_hash::FxHashMap;

use crate::{
    color::Color,
    coord::Coord,
    history::MoveRecord,
    piece::{MoveFlags, Piece, PieceKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Move,
    Capture,
    Castling,
}
impl Display for MoveKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MoveKind::Move => write!(f, "move")?,
            MoveKind::Capture => write!(f, "capture")?,
            MoveKind::Castling => write!(f, "castling")?,
        }
        Ok(())
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    Rejected { start: Coord, end: Coord },
    BadPromotionChoice(PieceKind),
    BadCastlingColumn(Coord),
    NoPromotablePawn,
}
impl Display for MoveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::Rejected { start, end } => {
                write!(f, "invalid move from {start} to {end}")?;
            }
            MoveError::BadPromotionChoice(kind) => {
                write!(f, "a pawn cannot be promoted to a {kind}")?;
            }
            MoveError::BadCastlingColumn(coord) => {
                write!(f, "castling rook must stand on column 0 or 7, found {coord}")?;
            }
            MoveError::NoPromotablePawn => {
                write!(f, "no pawn stands on a promotion row")?;
            }
        }
        Ok(())
    }
}
impl Error for MoveError {}

// Owns the coordinate -> piece mapping; absence of a key means an empty
// square. Classification never mutates, application never happens without
// a fresh classification.
#[derive(Debug, Clone)]
pub struct Board {
    position: FxHashMap<Coord, Piece>,
    turn: Color,
    winner: Option<Color>,
    debug: bool,
}
impl Board {
    pub fn new() -> Self {
        Board {
            position: FxHashMap::default(),
            turn: Color::White,
            winner: None,
            debug: false,
        }
    }
    pub fn start(&mut self) {
        self.position.clear();
        self.winner = None;
        for color in [Color::White, Color::Black] {
            for (col, kind) in (0u8..).zip(PieceKind::STARTING_BACK_ROW) {
                self.position
                    .insert(Coord::new(col, color.home_row()), Piece::new(color, kind));
            }
            for col in 0..8 {
                self.position.insert(
                    Coord::new(col, color.pawn_row()),
                    Piece::new(color, PieceKind::Pawn),
                );
            }
        }
        self.turn = Color::White;
    }
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }
    pub fn turn(&self) -> Color {
        self.turn
    }
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }
    pub fn piece_at(&self, coord: Coord) -> Option<Piece> {
        self.position.get(&coord).copied()
    }
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> {
        self.position.iter().map(|(coord, piece)| (*coord, *piece))
    }
    pub fn classify(&self, start: Coord, end: Coord) -> Option<MoveKind> {
        let piece = self.piece_at(start)?;
        if piece.color != self.turn {
            return None;
        }
        match self.piece_at(end) {
            Some(target) => (target.color != piece.color
                && piece.accepts(start, end, MoveFlags::CAPTURE))
            .then_some(MoveKind::Capture),
            None => {
                if piece.kind == PieceKind::Rook
                    && piece.accepts(start, end, MoveFlags::CASTLING)
                    && self.king_and_rook_unmoved(start)
                    && self
                        .clear_between_king_and_rook(start)
                        .is_ok_and(|clear| clear)
                {
                    Some(MoveKind::Castling)
                } else if piece.accepts(start, end, MoveFlags::PLAIN) {
                    Some(MoveKind::Move)
                } else {
                    None
                }
            }
        }
    }
    // All-or-nothing: classification happens before the first mutation.
    pub fn apply(&mut self, start: Coord, end: Coord) -> Result<MoveKind, MoveError> {
        let kind = self
            .classify(start, end)
            .ok_or(MoveError::Rejected { start, end })?;
        if self.debug {
            eprintln!("{start} -> {end} classified as {kind}");
        }
        match kind {
            MoveKind::Move => self.relocate(start, end),
            MoveKind::Capture => {
                self.position.remove(&end);
                self.relocate(start, end);
            }
            MoveKind::Castling => self.castle(start, end),
        }
        self.update_winner();
        Ok(kind)
    }
    pub fn advance_turn(&mut self) {
        self.turn = !self.turn;
    }
    pub fn find_promotable_pawn(&self) -> Option<Coord> {
        [Color::Black, Color::White].into_iter().find_map(|color| {
            let row = color.promotion_row();
            (0..8).map(|col| Coord::new(col, row)).find(|coord| {
                self.piece_at(*coord)
                    .is_some_and(|piece| piece.kind == PieceKind::Pawn && piece.color == color)
            })
        })
    }
    // The replacement piece takes the colour of the side to move, which is
    // still the promoting player since the turn advances after promotion.
    pub fn promote(&mut self, coord: Coord, kind: PieceKind) -> Result<(), MoveError> {
        if !PieceKind::PROMOTION_CHOICES.contains(&kind) {
            return Err(MoveError::BadPromotionChoice(kind));
        }
        self.position.remove(&coord);
        self.position.insert(coord, Piece::new(self.turn, kind));
        Ok(())
    }
    // Castling's secondary king relocation and `has_moved` flags are not
    // reversed; the stored pre-move pieces cover captures and promotions.
    pub fn undo(&mut self, record: &MoveRecord) {
        self.relocate(record.end, record.start);
        if record.kind == MoveKind::Capture
            && let Some(captured) = record.captured
        {
            self.position.insert(record.end, captured);
        }
        if record.promoted.is_some() {
            self.position.insert(record.start, record.moved);
        }
    }
    // Ranked from row 7 down to row 0; empty squares render as empty labels.
    pub fn display(&self) -> Vec<Vec<String>> {
        (0..8)
            .rev()
            .map(|row| {
                (0..8)
                    .map(|col| {
                        self.piece_at(Coord::new(col, row))
                            .map(|piece| piece.label().iter().collect())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }
    pub fn classified_moves(&self) -> Vec<(Coord, Coord, MoveKind)> {
        let mut moves = Vec::new();
        for (start, piece) in &self.position {
            if piece.color != self.turn {
                continue;
            }
            for col in 0..8 {
                for row in 0..8 {
                    let end = Coord::new(col, row);
                    if let Some(kind) = self.classify(*start, end) {
                        moves.push((*start, end, kind));
                    }
                }
            }
        }
        moves
    }
    fn relocate(&mut self, start: Coord, end: Coord) {
        if let Some(mut piece) = self.position.remove(&start) {
            piece.has_moved = true;
            self.position.insert(end, piece);
        }
    }
    fn castle(&mut self, start: Coord, end: Coord) {
        self.relocate(start, end);
        let row = start.row;
        match start.col {
            0 => self.relocate(Coord::new(4, row), Coord::new(2, row)),
            7 => self.relocate(Coord::new(4, row), Coord::new(6, row)),
            _ => {}
        }
    }
    fn king_and_rook_unmoved(&self, rook_coord: Coord) -> bool {
        let Some(rook) = self.piece_at(rook_coord) else {
            return false;
        };
        self.piece_at(Coord::new(4, rook_coord.row))
            .is_some_and(|king| {
                king.kind == PieceKind::King
                    && king.color == rook.color
                    && !king.has_moved
                    && !rook.has_moved
            })
    }
    fn clear_between_king_and_rook(&self, rook_coord: Coord) -> Result<bool, MoveError> {
        let columns: &[u8] = match rook_coord.col {
            0 => &[1, 2, 3],
            7 => &[5, 6],
            _ => return Err(MoveError::BadCastlingColumn(rook_coord)),
        };
        Ok(columns
            .iter()
            .all(|col| self.piece_at(Coord::new(*col, rook_coord.row)).is_none()))
    }
    fn alive(&self, color: Color, kind: PieceKind) -> bool {
        self.pieces()
            .any(|(_, piece)| piece.color == color && piece.kind == kind)
    }
    // Once set the winner stays set, even if play continues.
    fn update_winner(&mut self) {
        if !self.alive(Color::White, PieceKind::King) {
            self.winner = Some(Color::Black);
        } else if !self.alive(Color::Black, PieceKind::King) {
            self.winner = Some(Color::White);
        }
    }
}
#[cfg(test)]
mod test {
    use crate::{
        board::{Board, MoveError, MoveKind},
        color::Color,
        coord::Coord,
        history::MoveRecord,
        piece::{Piece, PieceKind},
    };

    fn started() -> Board {
        let mut board = Board::new();
        board.start();
        board
    }

    #[test]
    fn starting_position_has_thirty_two_unmoved_pieces() {
        let board = started();
        assert_eq!(board.pieces().count(), 32);
        assert!(board.pieces().all(|(_, piece)| !piece.has_moved));
        assert_eq!(board.turn(), Color::White);
        assert_eq!(board.winner(), None);
    }
    #[test]
    fn classify_rejects_empty_start_and_opponent_pieces() {
        let board = started();
        assert_eq!(board.classify(Coord::new(3, 3), Coord::new(3, 4)), None);
        // black pawn while it is white's turn
        assert_eq!(board.classify(Coord::new(0, 6), Coord::new(0, 5)), None);
    }
    #[test]
    fn two_step_pawn_advance_is_not_a_move() {
        let board = started();
        assert_eq!(board.classify(Coord::new(4, 1), Coord::new(4, 3)), None);
        assert_eq!(
            board.classify(Coord::new(4, 1), Coord::new(4, 2)),
            Some(MoveKind::Move)
        );
    }
    #[test]
    fn same_colour_destination_is_rejected() {
        let board = started();
        assert_eq!(board.classify(Coord::new(0, 0), Coord::new(0, 1)), None);
    }
    #[test]
    fn sliders_ignore_blockers_on_the_way() {
        let board = started();
        // the rook on 00 slides over its own pawn on 01
        assert_eq!(
            board.classify(Coord::new(0, 0), Coord::new(0, 5)),
            Some(MoveKind::Move)
        );
    }
    #[test]
    fn capture_needs_matching_geometry() {
        let mut board = Board::new();
        board.position.insert(
            Coord::new(0, 0),
            Piece::new(Color::White, PieceKind::Rook),
        );
        board.position.insert(
            Coord::new(0, 5),
            Piece::new(Color::Black, PieceKind::Pawn),
        );
        board.position.insert(
            Coord::new(5, 3),
            Piece::new(Color::Black, PieceKind::Pawn),
        );
        assert_eq!(
            board.classify(Coord::new(0, 0), Coord::new(0, 5)),
            Some(MoveKind::Capture)
        );
        assert_eq!(board.classify(Coord::new(0, 0), Coord::new(5, 3)), None);
    }
    #[test]
    fn apply_capture_removes_the_target() {
        let mut board = Board::new();
        board.position.insert(
            Coord::new(0, 0),
            Piece::new(Color::White, PieceKind::Rook),
        );
        board.position.insert(
            Coord::new(0, 5),
            Piece::new(Color::Black, PieceKind::Pawn),
        );
        assert_eq!(
            board.apply(Coord::new(0, 0), Coord::new(0, 5)),
            Ok(MoveKind::Capture)
        );
        let rook = board.piece_at(Coord::new(0, 5)).unwrap();
        assert_eq!(rook.kind, PieceKind::Rook);
        assert!(rook.has_moved);
        assert_eq!(board.piece_at(Coord::new(0, 0)), None);
        assert_eq!(board.pieces().count(), 1);
    }
    #[test]
    fn apply_rejects_unclassified_moves_without_mutating() {
        let mut board = started();
        assert_eq!(
            board.apply(Coord::new(0, 0), Coord::new(5, 5)),
            Err(MoveError::Rejected {
                start: Coord::new(0, 0),
                end: Coord::new(5, 5),
            })
        );
        assert_eq!(board.pieces().count(), 32);
        assert!(board.pieces().all(|(_, piece)| !piece.has_moved));
    }
    fn castling_board(color: Color) -> Board {
        let mut board = Board::new();
        board.turn = color;
        let row = color.home_row();
        board
            .position
            .insert(Coord::new(4, row), Piece::new(color, PieceKind::King));
        board
            .position
            .insert(Coord::new(0, row), Piece::new(color, PieceKind::Rook));
        board
            .position
            .insert(Coord::new(7, row), Piece::new(color, PieceKind::Rook));
        board
    }
    #[test]
    fn castling_relocates_rook_and_king_together() {
        for color in [Color::White, Color::Black] {
            let row = color.home_row();
            // kingside
            let mut board = castling_board(color);
            assert_eq!(
                board.classify(Coord::new(7, row), Coord::new(5, row)),
                Some(MoveKind::Castling)
            );
            board.apply(Coord::new(7, row), Coord::new(5, row)).unwrap();
            assert_eq!(
                board.piece_at(Coord::new(5, row)).unwrap().kind,
                PieceKind::Rook
            );
            assert_eq!(
                board.piece_at(Coord::new(6, row)).unwrap().kind,
                PieceKind::King
            );
            assert!(board.piece_at(Coord::new(5, row)).unwrap().has_moved);
            assert!(board.piece_at(Coord::new(6, row)).unwrap().has_moved);
            // queenside
            let mut board = castling_board(color);
            assert_eq!(
                board.classify(Coord::new(0, row), Coord::new(3, row)),
                Some(MoveKind::Castling)
            );
            board.apply(Coord::new(0, row), Coord::new(3, row)).unwrap();
            assert_eq!(
                board.piece_at(Coord::new(3, row)).unwrap().kind,
                PieceKind::Rook
            );
            assert_eq!(
                board.piece_at(Coord::new(2, row)).unwrap().kind,
                PieceKind::King
            );
        }
    }
    #[test]
    fn castling_requires_unmoved_king_and_rook() {
        let mut board = castling_board(Color::White);
        // march the king out and back
        board.apply(Coord::new(4, 0), Coord::new(4, 1)).unwrap();
        board.apply(Coord::new(4, 1), Coord::new(4, 0)).unwrap();
        assert_eq!(
            board.classify(Coord::new(7, 0), Coord::new(5, 0)),
            Some(MoveKind::Move)
        );

        let mut board = castling_board(Color::White);
        board.apply(Coord::new(0, 0), Coord::new(0, 3)).unwrap();
        board.apply(Coord::new(0, 3), Coord::new(0, 0)).unwrap();
        assert_eq!(
            board.classify(Coord::new(0, 0), Coord::new(3, 0)),
            Some(MoveKind::Move)
        );
        // the untouched rook still castles
        assert_eq!(
            board.classify(Coord::new(7, 0), Coord::new(5, 0)),
            Some(MoveKind::Castling)
        );
    }
    #[test]
    fn castling_requires_empty_squares_between() {
        let mut board = castling_board(Color::White);
        board
            .position
            .insert(Coord::new(6, 0), Piece::new(Color::White, PieceKind::Knight));
        // falls back to a plain rook move since no squares block the slide
        assert_eq!(
            board.classify(Coord::new(7, 0), Coord::new(5, 0)),
            Some(MoveKind::Move)
        );
        board
            .position
            .insert(Coord::new(1, 0), Piece::new(Color::White, PieceKind::Knight));
        assert_eq!(
            board.classify(Coord::new(0, 0), Coord::new(3, 0)),
            Some(MoveKind::Move)
        );
    }
    #[test]
    fn castling_clearance_refuses_non_corner_rooks() {
        let board = castling_board(Color::White);
        assert_eq!(
            board.clear_between_king_and_rook(Coord::new(3, 0)),
            Err(MoveError::BadCastlingColumn(Coord::new(3, 0)))
        );
    }
    #[test]
    fn winner_is_set_when_a_king_disappears() {
        let mut board = Board::new();
        board.position.insert(
            Coord::new(3, 3),
            Piece::new(Color::White, PieceKind::Queen),
        );
        board
            .position
            .insert(Coord::new(3, 5), Piece::new(Color::Black, PieceKind::King));
        board
            .position
            .insert(Coord::new(0, 0), Piece::new(Color::White, PieceKind::King));
        board
            .position
            .insert(Coord::new(7, 7), Piece::new(Color::Black, PieceKind::Rook));
        board.apply(Coord::new(3, 3), Coord::new(3, 5)).unwrap();
        assert_eq!(board.winner(), Some(Color::White));
        // play continues and the winner stays set
        board.advance_turn();
        board.apply(Coord::new(7, 7), Coord::new(7, 0)).unwrap();
        assert_eq!(board.winner(), Some(Color::White));
    }
    #[test]
    fn promotable_pawn_is_found_on_the_opponent_home_row() {
        let mut board = started();
        assert_eq!(board.find_promotable_pawn(), None);
        board.turn = Color::Black;
        board.position.insert(
            Coord::new(3, 0),
            Piece::new(Color::Black, PieceKind::Pawn),
        );
        assert_eq!(board.find_promotable_pawn(), Some(Coord::new(3, 0)));
        board.promote(Coord::new(3, 0), PieceKind::Queen).unwrap();
        let queen = board.piece_at(Coord::new(3, 0)).unwrap();
        assert_eq!(queen.kind, PieceKind::Queen);
        assert_eq!(queen.color, Color::Black);
        assert_eq!(board.find_promotable_pawn(), None);
    }
    #[test]
    fn promotion_refuses_kings_and_pawns() {
        let mut board = Board::new();
        board.turn = Color::White;
        board.position.insert(
            Coord::new(2, 7),
            Piece::new(Color::White, PieceKind::Pawn),
        );
        assert_eq!(
            board.promote(Coord::new(2, 7), PieceKind::King),
            Err(MoveError::BadPromotionChoice(PieceKind::King))
        );
        assert_eq!(
            board.promote(Coord::new(2, 7), PieceKind::Pawn),
            Err(MoveError::BadPromotionChoice(PieceKind::Pawn))
        );
        assert_eq!(
            board.piece_at(Coord::new(2, 7)).unwrap().kind,
            PieceKind::Pawn
        );
    }
    #[test]
    fn undo_restores_moved_and_captured_pieces() {
        let mut board = Board::new();
        let rook = Piece::new(Color::White, PieceKind::Rook);
        let pawn = Piece::new(Color::Black, PieceKind::Pawn);
        board.position.insert(Coord::new(0, 0), rook);
        board.position.insert(Coord::new(0, 5), pawn);
        board.apply(Coord::new(0, 0), Coord::new(0, 5)).unwrap();
        let record = MoveRecord {
            start: Coord::new(0, 0),
            end: Coord::new(0, 5),
            kind: MoveKind::Capture,
            moved: rook,
            captured: Some(pawn),
            promoted: None,
        };
        board.undo(&record);
        assert_eq!(board.piece_at(Coord::new(0, 0)).unwrap().kind, PieceKind::Rook);
        assert_eq!(board.piece_at(Coord::new(0, 5)), Some(pawn));
    }
    #[test]
    fn display_ranks_row_seven_first() {
        let board = started();
        let grid = board.display();
        assert_eq!(grid[0][0], "BR");
        assert_eq!(grid[1][4], "BP");
        assert_eq!(grid[4][0], "");
        assert_eq!(grid[6][7], "WP");
        assert_eq!(grid[7][4], "WK");
    }
}
