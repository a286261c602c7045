//! Game state: current position plus the moves that produced it
//!
//! `shakmaty::Chess` alone does not remember how a position arose, but the
//! castling extractor replays the game and the driver needs threefold
//! detection, so the analysis core works on this thin wrapper instead of a
//! bare position.

use std::collections::HashMap;

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{Board, CastlingMode, Chess, Color, EnPassantMode, Move, Position};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoveError {
    #[error("unparsable move '{0}'")]
    Parse(String),
    #[error("illegal move '{0}' in {1}")]
    Illegal(String, String),
}

/// A position together with the move sequence that produced it from the
/// standard starting position (empty when built from a bare FEN).
#[derive(Debug, Clone)]
pub struct GameState {
    position: Chess,
    moves: Vec<Move>,
    repetitions: HashMap<Zobrist64, u32>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Standard starting position, no moves played.
    pub fn new() -> Self {
        Self::from_position(Chess::default())
    }

    /// Wraps an arbitrary position; the move history starts empty, so
    /// history-derived features (castling status) report nothing.
    pub fn from_position(position: Chess) -> Self {
        let mut state = Self {
            position,
            moves: Vec::new(),
            repetitions: HashMap::new(),
        };
        state.record_repetition();
        state
    }

    /// Parses a FEN string into a fresh state.
    pub fn from_fen(fen: &str) -> Result<Self, MoveError> {
        let parsed: Fen = fen.parse().map_err(|_| MoveError::Parse(fen.to_string()))?;
        let position = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|_| MoveError::Parse(fen.to_string()))?;
        Ok(Self::from_position(position))
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn board(&self) -> &Board {
        self.position.board()
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    pub fn ply(&self) -> usize {
        self.moves.len()
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    /// Renders a move in SAN for the current position, with the check/mate
    /// suffix when the move gives one.
    pub fn san(&self, m: &Move) -> String {
        SanPlus::from_move(self.position.clone(), m.clone()).to_string()
    }

    /// Parses SAN against the current position; a check/mate suffix is
    /// accepted but not required.
    pub fn parse_san(&self, text: &str) -> Result<Move, MoveError> {
        let san: SanPlus = text
            .trim()
            .parse()
            .map_err(|_| MoveError::Parse(text.to_string()))?;
        san.san
            .to_move(&self.position)
            .map_err(|_| MoveError::Illegal(text.to_string(), self.fen()))
    }

    /// Parses a UCI move string against the current position.
    pub fn parse_uci(&self, text: &str) -> Result<Move, MoveError> {
        let uci: UciMove = text
            .trim()
            .parse()
            .map_err(|_| MoveError::Parse(text.to_string()))?;
        uci.to_move(&self.position)
            .map_err(|_| MoveError::Illegal(text.to_string(), self.fen()))
    }

    /// Applies a move. Rejecting an illegal move is fatal to the game, not
    /// recovered: move selection is restricted to legal moves upstream.
    pub fn push(&mut self, m: Move) -> Result<(), MoveError> {
        if !self.position.is_legal(m.clone()) {
            return Err(MoveError::Illegal(format!("{m:?}"), self.fen()));
        }
        self.position.play_unchecked(m.clone());
        self.moves.push(m);
        self.record_repetition();
        Ok(())
    }

    /// Parses and applies a SAN move.
    pub fn push_san(&mut self, text: &str) -> Result<(), MoveError> {
        let m = self.parse_san(text)?;
        self.push(m)
    }

    /// True when the current position has occurred three or more times.
    pub fn is_threefold(&self) -> bool {
        let hash: Zobrist64 = self.position.zobrist_hash(EnPassantMode::Legal);
        self.repetitions.get(&hash).copied().unwrap_or(0) >= 3
    }

    fn record_repetition(&mut self) {
        let hash: Zobrist64 = self.position.zobrist_hash(EnPassantMode::Legal);
        *self.repetitions.entry(hash).or_insert(0) += 1;
    }
}

/// Terminal classification of a position per the rules engine. Repetition
/// and fifty-move draws are claim-based and tracked by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Win(Color),
    Draw,
}

pub fn classify_terminal(pos: &Chess) -> Option<Termination> {
    if pos.is_checkmate() {
        Some(Termination::Win(pos.turn().other()))
    } else if pos.is_stalemate() || pos.is_insufficient_material() {
        Some(Termination::Draw)
    } else {
        None
    }
}

/// Plain-text board diagram, used by the interactive prompt and the
/// terminal renderer. Ranks run top-down from the given side's point of
/// view.
pub fn ascii_board(board: &Board, orientation: Color) -> String {
    let mut out = String::new();
    let ranks: Vec<usize> = match orientation {
        Color::White => (0..8).rev().collect(),
        Color::Black => (0..8).collect(),
    };
    let files: Vec<usize> = match orientation {
        Color::White => (0..8).collect(),
        Color::Black => (0..8).rev().collect(),
    };

    for &rank in &ranks {
        out.push_str(&format!("{} ", rank + 1));
        for &file in &files {
            let square = shakmaty::Square::from_coords(
                shakmaty::File::new(file as u32),
                shakmaty::Rank::new(rank as u32),
            );
            match board.piece_at(square) {
                Some(piece) => out.push(piece.char()),
                None => out.push('.'),
            }
            out.push(' ');
        }
        out.push('\n');
    }
    out.push_str("  ");
    for &file in &files {
        out.push(shakmaty::File::new(file as u32).char());
        out.push(' ');
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod state_tests {
    use super::*;

    #[test]
    fn push_san_advances_the_position() {
        let mut state = GameState::new();
        state.push_san("e4").unwrap();
        state.push_san("e5").unwrap();
        assert_eq!(state.ply(), 2);
        assert_eq!(state.turn(), Color::White);
        assert!(state.fen().starts_with("rnbqkbnr/pppp1ppp/8/4p3/4P3/8"));
    }

    #[test]
    fn illegal_san_is_rejected() {
        let mut state = GameState::new();
        assert!(matches!(state.push_san("e5"), Err(MoveError::Illegal(_, _))));
        assert!(matches!(state.push_san("zz9"), Err(MoveError::Parse(_))));
        assert_eq!(state.ply(), 0);
    }

    #[test]
    fn san_carries_check_and_mate_suffixes() {
        let mut state = GameState::new();
        for san in ["e4", "e6", "d4"] {
            state.push_san(san).unwrap();
        }
        // Suffixed input parses, and rendering restores the suffix.
        let check = state.parse_san("Bb4+").unwrap();
        assert_eq!(state.san(&check), "Bb4+");
        assert_eq!(state.san(&state.parse_san("Bb4").unwrap()), "Bb4+");

        let mut mated = GameState::new();
        for san in ["f3", "e5", "g4"] {
            mated.push_san(san).unwrap();
        }
        let mate = mated.parse_san("Qh4").unwrap();
        assert_eq!(mated.san(&mate), "Qh4#");
    }

    #[test]
    fn uci_round_trips_through_san() {
        let state = GameState::new();
        let m = state.parse_uci("g1f3").unwrap();
        assert_eq!(state.san(&m), "Nf3");
    }

    #[test]
    fn threefold_detected_after_knight_shuffle() {
        let mut state = GameState::new();
        for _ in 0..2 {
            state.push_san("Nf3").unwrap();
            state.push_san("Nf6").unwrap();
            state.push_san("Ng1").unwrap();
            state.push_san("Ng8").unwrap();
        }
        // Startpos has now occurred three times.
        assert!(state.is_threefold());
    }

    #[test]
    fn ascii_board_startpos_corners() {
        let state = GameState::new();
        let white_view = ascii_board(state.board(), Color::White);
        assert!(white_view.starts_with("8 r n b q k b n r"));
        // Files run h..a from black's point of view.
        let black_view = ascii_board(state.board(), Color::Black);
        assert!(black_view.starts_with("1 R N B K Q B N R"));
    }
}
