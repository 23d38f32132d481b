//! FEN (Forsyth-Edwards Notation) parsing.

use crate::{Color, Piece, Square};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 to 6 fields, got {0}")]
    InvalidFieldCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid move counter: {0}")]
    InvalidCounter(String),
}

/// A position decoded from FEN.
///
/// Holds the decoded fields only; turning them into a playable board state
/// is left to the rules engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenPosition {
    /// Occupied squares, in FEN reading order (rank 8 first).
    pub pieces: Vec<(Square, Piece, Color)>,
    pub side_to_move: Color,
    /// Castling letters as written, a subset of "KQkq" ("" when none).
    pub castling: String,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenPosition {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string. The two move counters may be omitted.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(FenError::InvalidFieldCount(fields.len()));
        }

        let pieces = Self::parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = Self::parse_castling(fields[2])?;
        let en_passant = Self::parse_en_passant(fields[3])?;

        let halfmove_clock = Self::parse_counter(fields.get(4).copied(), 0)?;
        let fullmove_number = Self::parse_counter(fields.get(5).copied(), 1)?;

        Ok(FenPosition {
            pieces,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Returns true if the castling field contains `letter`.
    pub fn has_castling(&self, letter: char) -> bool {
        self.castling.contains(letter)
    }

    fn parse_placement(placement: &str) -> Result<Vec<(Square, Piece, Color)>, FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut pieces = Vec::with_capacity(32);
        for (i, rank) in ranks.iter().enumerate() {
            let row = 7 - i as u8;
            let mut col = 0u8;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    col = col.saturating_add(skip as u8);
                } else if let Some((piece, color)) = Piece::from_fen_char(c) {
                    let sq = Square::new(row, col).ok_or_else(|| {
                        FenError::InvalidPiecePlacement(format!("rank {} overflows", row + 1))
                    })?;
                    pieces.push((sq, piece, color));
                    col = col.saturating_add(1);
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        row + 1
                    )));
                }
            }
            if col != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    row + 1,
                    col
                )));
            }
        }
        Ok(pieces)
    }

    fn parse_castling(castling: &str) -> Result<String, FenError> {
        if castling == "-" {
            return Ok(String::new());
        }
        for c in castling.chars() {
            if !"KQkq".contains(c) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "invalid character '{}'",
                    c
                )));
            }
        }
        Ok(castling.to_string())
    }

    fn parse_en_passant(ep: &str) -> Result<Option<Square>, FenError> {
        if ep == "-" {
            return Ok(None);
        }
        match Square::from_algebraic(ep) {
            Some(sq) if sq.row() == 2 || sq.row() == 5 => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(ep.to_string())),
        }
    }

    fn parse_counter(field: Option<&str>, default: u32) -> Result<u32, FenError> {
        match field {
            None => Ok(default),
            Some(s) => s
                .parse::<u32>()
                .map_err(|_| FenError::InvalidCounter(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_startpos() {
        let fen = FenPosition::parse(FenPosition::STARTPOS).unwrap();
        assert_eq!(fen.pieces.len(), 32);
        assert_eq!(fen.side_to_move, Color::White);
        assert_eq!(fen.castling, "KQkq");
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.fullmove_number, 1);
    }

    #[test]
    fn placement_reading_order() {
        let fen = FenPosition::parse("k7/8/8/8/8/8/8/7K w - - 0 1").unwrap();
        assert_eq!(
            fen.pieces,
            vec![
                (Square::from_algebraic("a8").unwrap(), Piece::King, Color::Black),
                (Square::from_algebraic("h1").unwrap(), Piece::King, Color::White),
            ]
        );
    }

    #[test]
    fn counters_optional() {
        let fen = FenPosition::parse("8/8/8/8/8/8/8/8 b Kq e3").unwrap();
        assert_eq!(fen.side_to_move, Color::Black);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert!(fen.has_castling('K'));
        assert!(!fen.has_castling('Q'));
        assert_eq!(fen.en_passant, Square::from_algebraic("e3"));
    }

    #[test]
    fn rejects_bad_fields() {
        assert!(matches!(
            FenPosition::parse("invalid"),
            Err(FenError::InvalidFieldCount(1))
        ));
        assert!(matches!(
            FenPosition::parse("8/8/8/8/8/8/8/8 x KQkq - 0 1"),
            Err(FenError::InvalidActiveColor(_))
        ));
        assert!(matches!(
            FenPosition::parse("8/8/8/8/8/8/8/8 w XYZ - 0 1"),
            Err(FenError::InvalidCastlingRights(_))
        ));
        assert!(matches!(
            FenPosition::parse("8/8/8/8/8/8/8/8 w - e4 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            FenPosition::parse("8/8/8/8/8/8/8/8 w - - abc 1"),
            Err(FenError::InvalidCounter(_))
        ));
    }

    #[test]
    fn rejects_bad_placement() {
        assert!(matches!(
            FenPosition::parse("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            FenPosition::parse("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            FenPosition::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            FenPosition::parse("7/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn error_display_names_the_field() {
        let err = FenError::InvalidActiveColor("x".to_string());
        assert!(err.to_string().contains("'x'"));
        let err = FenError::InvalidFieldCount(3);
        assert!(err.to_string().contains('3'));
    }
}
