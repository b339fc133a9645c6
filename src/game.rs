use crate::{
    board::{Board, MoveError},
    coord::Coord,
    history::{EmptyHistory, MoveHistory, MoveRecord},
    piece::PieceKind,
};

const UNDO_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Played {
    pub record: MoveRecord,
    pub promotion: Option<Coord>,
}
// One session: a board plus its bounded undo history. Moves run through
// classify -> record -> apply -> (promote) -> advance turn.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    history: MoveHistory,
}
impl Game {
    pub fn new() -> Self {
        let mut board = Board::new();
        board.start();
        Game {
            board,
            history: MoveHistory::new(UNDO_CAPACITY),
        }
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn set_debug(&mut self, debug: bool) {
        self.board.set_debug(debug);
    }
    pub fn play(&mut self, start: Coord, end: Coord) -> Result<Played, MoveError> {
        let (Some(kind), Some(moved)) = (self.board.classify(start, end), self.board.piece_at(start))
        else {
            return Err(MoveError::Rejected { start, end });
        };
        let record = MoveRecord {
            start,
            end,
            kind,
            moved,
            captured: self.board.piece_at(end),
            promoted: None,
        };
        self.history.push(record);
        self.board.apply(start, end)?;
        let promotion = self.board.find_promotable_pawn();
        if promotion.is_some() {
            // the turn stays with the mover until the promotion choice is made
            self.history.set_promotion(promotion);
        } else {
            self.board.advance_turn();
        }
        Ok(Played { record, promotion })
    }
    pub fn promote(&mut self, kind: PieceKind) -> Result<Coord, MoveError> {
        let coord = self
            .board
            .find_promotable_pawn()
            .ok_or(MoveError::NoPromotablePawn)?;
        self.board.promote(coord, kind)?;
        self.board.advance_turn();
        Ok(coord)
    }
    pub fn undo_last(&mut self) -> Result<MoveRecord, EmptyHistory> {
        let record = self.history.pop().ok_or(EmptyHistory)?;
        // a move awaiting its promotion choice never advanced the turn
        let pending = self.board.find_promotable_pawn().is_some();
        self.board.undo(&record);
        if !pending {
            self.board.advance_turn();
        }
        Ok(record)
    }
}
