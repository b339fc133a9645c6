use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use crate::{color::Color, coord::Coord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceKind {
    pub const PROMOTION_CHOICES: [Self; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];
    pub const STARTING_BACK_ROW: [Self; 8] = [
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
    ];
    pub fn initial(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
    pub fn from_promotion_letter(c: char) -> Result<Self, UnknownPromotionLetter> {
        let piece = match c {
            'q' | 'Q' => PieceKind::Queen,
            'r' | 'R' => PieceKind::Rook,
            'b' | 'B' => PieceKind::Bishop,
            'n' | 'N' => PieceKind::Knight,
            c => return Err(UnknownPromotionLetter(c)),
        };
        Ok(piece)
    }
}
impl Display for PieceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Pawn => write!(f, "pawn")?,
            PieceKind::Knight => write!(f, "knight")?,
            PieceKind::Bishop => write!(f, "bishop")?,
            PieceKind::Rook => write!(f, "rook")?,
            PieceKind::Queen => write!(f, "queen")?,
            PieceKind::King => write!(f, "king")?,
        }
        Ok(())
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnknownPromotionLetter(pub char);
impl Display for UnknownPromotionLetter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "found `{}`, expected one of `q`, `r`, `b`, or `n`",
            self.0
        )?;
        Ok(())
    }
}
impl Error for UnknownPromotionLetter {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MoveFlags {
    pub capture: bool,
    pub castling: bool,
}
impl MoveFlags {
    pub const PLAIN: Self = MoveFlags {
        capture: false,
        castling: false,
    };
    pub const CAPTURE: Self = MoveFlags {
        capture: true,
        castling: false,
    };
    pub const CASTLING: Self = MoveFlags {
        capture: false,
        castling: true,
    };
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
    pub has_moved: bool,
}
impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Piece {
            color,
            kind,
            has_moved: false,
        }
    }
    pub fn label(self) -> [char; 2] {
        [self.color.initial(), self.kind.initial()]
    }
    // Pure geometry: board occupancy and turn ownership are checked elsewhere.
    pub fn accepts(self, start: Coord, end: Coord, flags: MoveFlags) -> bool {
        let delta = end - start;
        match self.kind {
            PieceKind::King => delta.dist() == 1,
            PieceKind::Queen => delta.is_straight() || delta.is_diagonal(),
            PieceKind::Bishop => delta.is_diagonal(),
            PieceKind::Knight => {
                delta.dist() == 3
                    && (1..3).contains(&delta.dx.unsigned_abs())
                    && (1..3).contains(&delta.dy.unsigned_abs())
            }
            PieceKind::Rook if flags.castling => self.accepts_castling(start, end),
            PieceKind::Rook => delta.is_straight(),
            PieceKind::Pawn => {
                let required_dx = i8::from(flags.capture);
                delta.dx == required_dx && delta.dy == self.color.forward()
            }
        }
    }
    fn accepts_castling(self, start: Coord, end: Coord) -> bool {
        let home = self.color.home_row();
        start.row == home
            && end.row == home
            && matches!((start.col, end.col), (0, 3) | (7, 5))
    }
}
impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)?;
        Ok(())
    }
}
