use super::*;

#[test]
fn new_board_has_expected_material() {
    let b = Board::new();
    assert_eq!(b.pieces(Piece::Pawn, Color::White).count_ones(), 8);
    assert_eq!(b.pieces(Piece::Pawn, Color::Black).count_ones(), 8);
    assert_eq!(b.pieces(Piece::King, Color::White).count_ones(), 1);
    assert_eq!(b.pieces(Piece::King, Color::Black).count_ones(), 1);
    assert_eq!(b.occupied().count_ones(), 32);
}

#[test]
fn new_board_has_all_castling_rights() {
    let b = Board::new();
    assert!(b.has_kingside_castle(Color::White));
    assert!(b.has_queenside_castle(Color::White));
    assert!(b.has_kingside_castle(Color::Black));
    assert!(b.has_queenside_castle(Color::Black));
}

#[test]
fn new_empty_board_has_no_pieces() {
    let b = Board::new_empty();
    assert_eq!(b.occupied(), 0);
    assert_eq!(b.castling_rights, 0);
    assert_eq!(b.en_passant, None);
}

#[test]
fn validate_detects_overlapping_bitboards() {
    let mut b = Board::new_empty();
    b.set_bb(Color::White, Piece::Pawn, 1u64 << 20);
    b.set_bb(Color::White, Piece::Knight, 1u64 << 20);
    assert!(b.validate().is_err());
}

#[test]
fn validate_accepts_starting_position() {
    assert!(Board::new().validate().is_ok());
}

#[test]
fn set_bb_keeps_zobrist_in_sync() {
    let mut b = Board::new();
    b.assert_hash();
    b.set_bb(Color::White, Piece::Pawn, 0);
    b.assert_hash();
}

#[test]
fn king_square_finds_correct_square() {
    let b = Board::new();
    assert_eq!(b.king_square(Color::White).to_string(), "e1");
    assert_eq!(b.king_square(Color::Black).to_string(), "e8");
}

#[test]
fn has_major_pieces_is_false_once_stripped() {
    let mut b = Board::new_empty();
    b.set_bb(Color::White, Piece::King, 1u64 << 4);
    b.set_bb(Color::White, Piece::Pawn, 0x0000_0000_0000_FF00);
    assert!(!b.has_major_pieces(Color::White));
    b.set_bb(Color::White, Piece::Knight, 1u64 << 1);
    assert!(b.has_major_pieces(Color::White));
}

#[test]
fn repetition_count_tracks_history_matches() {
    let mut b = Board::new();
    let start_hash = b.zobrist;
    assert_eq!(b.repetition_count(), 1);
    assert!(!b.is_threefold());

    b.history.push(start_hash);
    assert_eq!(b.repetition_count(), 2);

    b.history.push(start_hash);
    assert_eq!(b.repetition_count(), 3);
    assert!(b.is_threefold());
}

#[test]
fn is_repetition_matches_any_history_entry() {
    let mut b = Board::new();
    assert!(!b.is_repetition());
    b.history.push(b.zobrist);
    assert!(b.is_repetition());
}

#[test]
fn color_opposite_round_trips() {
    assert_eq!(Color::White.opposite(), Color::Black);
    assert_eq!(Color::Black.opposite(), Color::White);
    assert_eq!(!Color::White, Color::Black);
}

#[test]
fn default_board_is_empty() {
    assert_eq!(Board::default().occupied(), 0);
}

#[test]
fn display_round_trips_through_from_str() {
    let b = Board::new();
    let rendered = b.to_string();
    let parsed: Board = rendered.parse().expect("valid fen");
    assert_eq!(parsed.zobrist, b.zobrist);
}
