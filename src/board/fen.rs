//! FEN parsing and serialization.

use super::fen_tables::{CHAR_TO_PC, PC_TO_CHAR};
use super::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color, Piece};
use crate::square::Square;

impl Board {
    /// Replaces `self` with the position described by `fen`.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), String> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(format!(
                "FEN needs at least 4 fields (placement, side, castling, en passant), got {}",
                fields.len()
            ));
        }

        let mut board = Board::new_empty();
        let mut placement: [[u64; 6]; 2] = [[0; 6]; 2];

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(format!(
                "FEN piece placement needs 8 ranks separated by '/', got {}",
                ranks.len()
            ));
        }

        for (rank_from_top, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_from_top;
            let mut file: usize = 0;
            for ch in rank_str.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    file += skip as usize;
                } else {
                    if file >= 8 {
                        return Err(format!("FEN rank '{rank_str}' overflows past the h-file"));
                    }
                    let (piece, color) = CHAR_TO_PC[ch as usize]
                        .ok_or_else(|| format!("invalid FEN piece glyph '{ch}'"))?;
                    let sq = (rank * 8 + file) as u8;
                    placement[color as usize][piece as usize] |= 1u64 << sq;
                    file += 1;
                }
            }
            if file != 8 {
                return Err(format!(
                    "FEN rank '{rank_str}' does not account for all 8 files"
                ));
            }
        }

        const PIECES: [Piece; 6] = [
            Piece::Pawn,
            Piece::Knight,
            Piece::Bishop,
            Piece::Rook,
            Piece::Queen,
            Piece::King,
        ];
        for &color in &[Color::White, Color::Black] {
            for &piece in &PIECES {
                let bb = placement[color as usize][piece as usize];
                if bb != 0 {
                    board.set_bb(color, piece, bb);
                }
            }
        }

        board.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(format!("invalid side-to-move field '{other}'")),
        };

        let mut castling = 0u8;
        if fields[2] != "-" {
            for ch in fields[2].chars() {
                castling |= match ch {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    other => return Err(format!("invalid castling glyph '{other}'")),
                };
            }
        }
        board.castling_rights = castling;

        board.en_passant = match fields[3] {
            "-" => None,
            sq => Some(parse_square(sq)?),
        };

        board.halfmove_clock = fields.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
        board.fullmove_number = fields.get(5).and_then(|s| s.parse().ok()).unwrap_or(1);

        board.refresh_zobrist();

        *self = board;
        Ok(())
    }

    /// Renders the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(64);

        for rank_from_top in 0..8u8 {
            let rank = 7 - rank_from_top;
            let mut empty_run = 0u32;
            for file in 0..8u8 {
                let sq = Square::from_file_rank(file, rank);
                match self.piece_at(sq) {
                    Some((color, piece)) => {
                        if empty_run > 0 {
                            out.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        out.push(PC_TO_CHAR[(color as usize) * 6 + piece as usize]);
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                out.push_str(&empty_run.to_string());
            }
            if rank_from_top != 7 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(if self.side_to_move == Color::White {
            'w'
        } else {
            'b'
        });

        out.push(' ');
        if self.castling_rights == 0 {
            out.push('-');
        } else {
            if self.has_castling(CASTLE_WK) {
                out.push('K');
            }
            if self.has_castling(CASTLE_WQ) {
                out.push('Q');
            }
            if self.has_castling(CASTLE_BK) {
                out.push('k');
            }
            if self.has_castling(CASTLE_BQ) {
                out.push('q');
            }
        }

        out.push(' ');
        match self.en_passant {
            Some(sq) => out.push_str(&sq.to_string()),
            None => out.push('-'),
        }

        out.push(' ');
        out.push_str(&self.halfmove_clock.to_string());
        out.push(' ');
        out.push_str(&self.fullmove_number.to_string());

        out
    }
}

fn parse_square(s: &str) -> Result<Square, String> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return Err(format!("invalid square '{s}'"));
    }
    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(format!("invalid square '{s}'"));
    }
    Ok(Square::from_file_rank(file - b'a', rank - b'1'))
}
