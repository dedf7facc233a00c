//! Validated chess position built from a FEN string.

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Position as _};

use crate::error::AnalysisError;

/// A legal chess position. Equality and hashing go through the canonical
/// FEN, so the same position written two ways compares equal and lands on
/// the same cache entry.
#[derive(Debug, Clone)]
pub struct Position {
    board: Chess,
    fen: String,
}

impl Position {
    /// Parse a FEN string, rejecting both syntax errors and illegal
    /// positions. The stored FEN is re-rendered from the parsed board.
    pub fn from_fen(fen: &str) -> Result<Self, AnalysisError> {
        let trimmed = fen.trim();
        let parsed: Fen = trimmed
            .parse()
            .map_err(|e| AnalysisError::InvalidFen(format!("{trimmed}: {e}")))?;
        let board = parsed
            .into_position::<Chess>(CastlingMode::Standard)
            .map_err(|e| AnalysisError::InvalidFen(format!("{trimmed}: {e}")))?;
        let fen = Fen::from_position(&board, EnPassantMode::Legal).to_string();
        Ok(Self { board, fen })
    }

    /// Canonical FEN of this position.
    pub fn fen(&self) -> &str {
        &self.fen
    }

    pub fn turn(&self) -> Color {
        self.board.turn()
    }

    /// Side to move as it appears in reports: "white" or "black".
    pub fn turn_name(&self) -> &'static str {
        match self.board.turn() {
            Color::White => "white",
            Color::Black => "black",
        }
    }

    pub fn legal_move_count(&self) -> usize {
        self.board.legal_moves().len()
    }

    /// Render a UCI move in SAN for display. Moves that do not parse or are
    /// not legal here come back as the raw UCI string.
    pub fn san(&self, uci: &str) -> String {
        uci_to_san(&self.board, uci).unwrap_or_else(|| uci.to_string())
    }
}

fn uci_to_san(pos: &Chess, uci_str: &str) -> Option<String> {
    let uci_move: UciMove = uci_str.parse().ok()?;
    let legal_move = uci_move.to_move(pos).ok()?;
    Some(San::from_move(pos, legal_move).to_string())
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.fen == other.fen
    }
}

impl Eq for Position {}

impl std::hash::Hash for Position {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.fen.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_parses_starting_position() {
        let pos = Position::from_fen(START_FEN).unwrap();
        assert_eq!(pos.fen(), START_FEN);
        assert_eq!(pos.turn_name(), "white");
        assert_eq!(pos.legal_move_count(), 20);
    }

    #[test]
    fn test_trims_whitespace() {
        let pos = Position::from_fen(&format!("  {START_FEN}\n")).unwrap();
        assert_eq!(pos.fen(), START_FEN);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            Position::from_fen("not a fen"),
            Err(AnalysisError::InvalidFen(_))
        ));
    }

    #[test]
    fn test_rejects_illegal_position() {
        // Parses as FEN but has no kings
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 1"),
            Err(AnalysisError::InvalidFen(_))
        ));
    }

    #[test]
    fn test_canonicalizes_unreachable_en_passant() {
        // After 1.e4 the e3 square is recorded but no pawn can capture there,
        // so the canonical FEN drops it and both spellings compare equal.
        let with_ep =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
                .unwrap();
        let without_ep =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1")
                .unwrap();
        assert_eq!(with_ep, without_ep);
        assert_eq!(with_ep.fen(), without_ep.fen());
    }

    #[test]
    fn test_black_to_move() {
        let pos = Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1")
            .unwrap();
        assert_eq!(pos.turn_name(), "black");
        assert_eq!(pos.turn(), Color::Black);
    }

    #[test]
    fn test_checkmate_has_no_legal_moves() {
        // Fool's mate
        let pos = Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
        assert_eq!(pos.legal_move_count(), 0);
    }

    #[test]
    fn test_san_rendering() {
        let pos = Position::from_fen(START_FEN).unwrap();
        assert_eq!(pos.san("e2e4"), "e4");
        assert_eq!(pos.san("g1f3"), "Nf3");
        // Illegal or malformed moves fall back to the raw string
        assert_eq!(pos.san("e2e5"), "e2e5");
        assert_eq!(pos.san("zzzz"), "zzzz");
    }

    #[test]
    fn test_san_rendering_captures() {
        // After 1.e4 d5
        let pos = Position::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2")
            .unwrap();
        assert_eq!(pos.san("e4d5"), "exd5");
    }
}
