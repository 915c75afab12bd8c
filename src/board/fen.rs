// src/board/fen.rs
// Minimal FEN adapter: text in, `Setup` out, and back again for debugging.

use super::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color, Piece, Setup};
use crate::square::Square;
use std::str::FromStr;

/// Uppercase = White, lowercase = Black.
fn glyph_to_piece(ch: char) -> Option<(Color, Piece)> {
    let color = if ch.is_ascii_uppercase() { Color::White } else { Color::Black };
    let piece = match ch.to_ascii_lowercase() {
        'p' => Piece::Pawn,
        'n' => Piece::Knight,
        'b' => Piece::Bishop,
        'r' => Piece::Rook,
        'q' => Piece::Queen,
        'k' => Piece::King,
        _ => return None,
    };
    Some((color, piece))
}

fn piece_glyph(color: Color, piece: Piece) -> char {
    let lower = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    match color {
        Color::White => lower.to_ascii_uppercase(),
        Color::Black => lower,
    }
}

impl Setup {
    /// Parse the first four FEN fields. Move clocks, if present, are ignored.
    pub fn from_fen(fen: &str) -> Result<Self, String> {
        let mut parts = fen.split_whitespace();
        let placement = parts.next().ok_or("FEN is empty")?;
        let side = parts.next().ok_or("FEN missing side to move")?;
        let castling = parts.next().unwrap_or("-");
        let ep = parts.next().unwrap_or("-");

        let mut setup = Setup::empty();

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(format!("FEN placement must have 8 ranks, got {}", ranks.len()));
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file: u8 = 0;
            for ch in rank_str.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(format!("Invalid empty-run '{}' in FEN", ch));
                    }
                    file += skip as u8;
                } else {
                    let (color, piece) = glyph_to_piece(ch)
                        .ok_or_else(|| format!("Invalid piece glyph '{}' in FEN", ch))?;
                    if file > 7 {
                        return Err(format!("Rank {} overflows in FEN", rank + 1));
                    }
                    setup.put(Square::from_rank_file(rank, file), color, piece);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(format!("Rank {} does not describe 8 files", rank + 1));
            }
        }

        setup.side_to_move = match side {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(format!("Invalid side to move '{}'", other)),
        };

        if castling != "-" {
            for ch in castling.chars() {
                setup.castling |= match ch {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    other => return Err(format!("Invalid castling glyph '{}'", other)),
                };
            }
        }

        if ep != "-" {
            setup.en_passant = Some(Square::from_str(ep)?);
        }

        Ok(setup)
    }
}

impl Board {
    /// Replace this board with the position described by `fen`.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), String> {
        *self = Board::from_str(fen)?;
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.piece_at(Square::from_rank_file(rank, file)) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            out.push((b'0' + empty) as char);
                            empty = 0;
                        }
                        out.push(piece_glyph(color, piece));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push((b'0' + empty) as char);
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(if self.side_to_move() == Color::White { 'w' } else { 'b' });
        out.push(' ');

        let rights = [(CASTLE_WK, 'K'), (CASTLE_WQ, 'Q'), (CASTLE_BK, 'k'), (CASTLE_BQ, 'q')];
        let before = out.len();
        for (flag, glyph) in rights {
            if self.has_castling(flag) {
                out.push(glyph);
            }
        }
        if out.len() == before {
            out.push('-');
        }

        out.push(' ');
        match self.en_passant {
            Some(sq) => out.push_str(&sq.to_string()),
            None => out.push('-'),
        }
        out.push_str(" 0 1");
        out
    }
}
