//! Feature extractors
//!
//! Each extractor reads the bound position (and keys written by earlier
//! steps) and writes named features into the context: a per-side value for
//! white and black plus the white-minus-black differential where that makes
//! sense. The weights and conventions (development points, furthest-rank
//! baselines) are deliberate heuristics preserved for behavioral
//! compatibility; do not "fix" their asymmetries.

use serde::{Deserialize, Serialize};
use shakmaty::{
    Board, CastlingMode, Chess, Color, EnPassantMode, FromSetup, Position, PositionError, Role,
    Square,
};

use crate::{Analysis, StepError, Value};

/// Feature-key constants shared by extractors and the summary step.
pub mod keys {
    pub const MATERIAL_WHITE: &str = "material_white";
    pub const MATERIAL_BLACK: &str = "material_black";
    pub const MATERIAL: &str = "material";
    pub const DEVELOPMENT_WHITE: &str = "development_white";
    pub const DEVELOPMENT_BLACK: &str = "development_black";
    pub const DEVELOPMENT: &str = "development";
    pub const MOBILITY_WHITE: &str = "mobility_white";
    pub const MOBILITY_BLACK: &str = "mobility_black";
    pub const MOBILITY: &str = "mobility";
    pub const WHITE_HAS_CASTLED: &str = "white_has_castled";
    pub const BLACK_HAS_CASTLED: &str = "black_has_castled";
    pub const FULLMOVE_NUMBER: &str = "fullmove_number";
    pub const HALFMOVE_CLOCK: &str = "halfmove_clock";
    pub const FURTHEST_RANK_WHITE: &str = "furthest_rank_white";
    pub const FURTHEST_RANK_BLACK: &str = "furthest_rank_black";
    pub const FURTHEST_RANK: &str = "furthest_rank";
    pub const KING_FILE_WHITE: &str = "king_file_white";
    pub const KING_RANK_WHITE: &str = "king_rank_white";
    pub const KING_FILE_BLACK: &str = "king_file_black";
    pub const KING_RANK_BLACK: &str = "king_rank_black";
    pub const EVAL: &str = "eval";
    pub const BEST_MOVE: &str = "best_move";
    pub const MATE_IN: &str = "mate_in";
    pub const MOVE: &str = "move";
    pub const RESULT: &str = "result";
    pub const NAME: &str = "name";
}

/// Standard piece values: pawn 1, minor 3, rook 5, queen 9, king 0.
pub fn piece_value(role: Role) -> i64 {
    match role {
        Role::Pawn => 1,
        Role::Knight | Role::Bishop => 3,
        Role::Rook => 5,
        Role::Queen => 9,
        Role::King => 0,
    }
}

fn role_index(role: Role) -> usize {
    match role {
        Role::Pawn => 0,
        Role::Knight => 1,
        Role::Bishop => 2,
        Role::Rook => 3,
        Role::Queen => 4,
        Role::King => 5,
    }
}

fn role_counts(board: &Board, color: Color) -> [i64; 6] {
    let mut counts = [0; 6];
    for (_, piece) in board.clone().into_iter() {
        if piece.color == color {
            counts[role_index(piece.role)] += 1;
        }
    }
    counts
}

/// Sums standard piece values per side.
pub fn count_material(cx: &mut Analysis) -> Result<Value, StepError> {
    let mut white = 0;
    let mut black = 0;
    for (_, piece) in cx.board().board().clone().into_iter() {
        match piece.color {
            Color::White => white += piece_value(piece.role),
            Color::Black => black += piece_value(piece.role),
        }
    }

    cx.set(keys::MATERIAL_WHITE, Value::Int(white));
    cx.set(keys::MATERIAL_BLACK, Value::Int(black));
    cx.set(keys::MATERIAL, Value::Int(white - black));
    Ok(Value::Int(white - black))
}

/// Development points per side: 2 per developed minor piece, 1 per developed
/// major piece. A piece type counts as developed `max(0, moved - captured)`
/// times, where `captured` is the starting count minus the current count, so
/// captured-but-moved pieces are not double-counted.
pub fn measure_development(cx: &mut Analysis) -> Result<Value, StepError> {
    let board = cx.board().board();
    let start = Board::default();
    let mut points = [0.0f64; 2];

    for (side, color) in [(0, Color::White), (1, Color::Black)] {
        let starting = role_counts(&start, color);
        let current = role_counts(board, color);

        let mut moved = [0i64; 6];
        for sq in Square::ALL {
            if let Some(piece) = start.piece_at(sq) {
                if piece.color == color && board.piece_at(sq) != Some(piece) {
                    moved[role_index(piece.role)] += 1;
                }
            }
        }

        for (role, weight) in [
            (Role::Knight, 2.0),
            (Role::Bishop, 2.0),
            (Role::Rook, 1.0),
            (Role::Queen, 1.0),
        ] {
            let i = role_index(role);
            let captured = starting[i] - current[i];
            let developed = (moved[i] - captured).max(0);
            points[side] += developed as f64 * weight;
        }
    }

    cx.set(keys::DEVELOPMENT_WHITE, Value::Float(points[0]));
    cx.set(keys::DEVELOPMENT_BLACK, Value::Float(points[1]));
    cx.set(keys::DEVELOPMENT, Value::Float(points[0] - points[1]));
    Ok(Value::Float(points[0] - points[1]))
}

/// Legal moves available to one side, regardless of whose turn it is.
///
/// For the side not to move the position is rebuilt with the turn flag
/// flipped and the en-passant square cleared. If the flipped position is
/// unreachable even ignoring impossible checks, that side counts 0.
fn side_mobility(pos: &Chess, color: Color) -> i64 {
    if pos.turn() == color {
        return pos.legal_moves().len() as i64;
    }
    let mut setup = pos.to_setup(EnPassantMode::Legal);
    setup.turn = color;
    setup.ep_square = None;
    match Chess::from_setup(setup, CastlingMode::Standard)
        .or_else(PositionError::ignore_impossible_check)
    {
        Ok(flipped) => flipped.legal_moves().len() as i64,
        Err(_) => 0,
    }
}

/// Counts each side's legal moves independently.
pub fn evaluate_mobility(cx: &mut Analysis) -> Result<Value, StepError> {
    let pos = cx.board().clone();
    let white = side_mobility(&pos, Color::White);
    let black = side_mobility(&pos, Color::Black);

    cx.set(keys::MOBILITY_WHITE, Value::Int(white));
    cx.set(keys::MOBILITY_BLACK, Value::Int(black));
    cx.set(keys::MOBILITY, Value::Int(white - black));
    Ok(Value::Int(white - black))
}

/// Replays the game's move sequence, flagging each side the first time it
/// castles; short-circuits once both sides have castled.
pub fn check_castled(cx: &mut Analysis) -> Result<Value, StepError> {
    let mut white = false;
    let mut black = false;
    let mut replay = Chess::default();

    for m in cx.state().moves() {
        if m.is_castle() {
            match replay.turn() {
                Color::White => white = true,
                Color::Black => black = true,
            }
        }
        replay.play_unchecked(m.clone());
        if white && black {
            break;
        }
    }

    cx.set(keys::WHITE_HAS_CASTLED, Value::Bool(white));
    cx.set(keys::BLACK_HAS_CASTLED, Value::Bool(black));
    Ok(Value::Bool(white || black))
}

/// Full-move number and half-move clock, verbatim from board state.
pub fn count_moves(cx: &mut Analysis) -> Result<Value, StepError> {
    let fullmove = i64::from(cx.board().fullmoves().get());
    let halfmove = i64::from(cx.board().halfmoves());
    cx.set(keys::FULLMOVE_NUMBER, Value::Int(fullmove));
    cx.set(keys::HALFMOVE_CLOCK, Value::Int(halfmove));
    Ok(Value::Int(fullmove))
}

/// Maximum rank reached by each side's pieces, measured from that side's own
/// baseline: 0 at the back rank, 7 at the far rank for both colors.
pub fn furthest_rank(cx: &mut Analysis) -> Result<Value, StepError> {
    let mut white = 0i64;
    let mut black = 0i64;
    for (sq, piece) in cx.board().board().clone().into_iter() {
        let rank = sq.rank() as i64;
        match piece.color {
            Color::White => white = white.max(rank),
            Color::Black => black = black.max(7 - rank),
        }
    }

    cx.set(keys::FURTHEST_RANK_WHITE, Value::Int(white));
    cx.set(keys::FURTHEST_RANK_BLACK, Value::Int(black));
    cx.set(keys::FURTHEST_RANK, Value::Int(white - black));
    Ok(Value::Int(white - black))
}

/// Each side's king file and side-relative rank.
pub fn king_position(cx: &mut Analysis) -> Result<Value, StepError> {
    let white_king = cx.board().board().king_of(Color::White);
    let black_king = cx.board().board().king_of(Color::Black);
    if let Some(sq) = white_king {
        cx.set(keys::KING_FILE_WHITE, Value::Int(sq.file() as i64));
        cx.set(keys::KING_RANK_WHITE, Value::Int(sq.rank() as i64));
    }
    if let Some(sq) = black_king {
        cx.set(keys::KING_FILE_BLACK, Value::Int(sq.file() as i64));
        cx.set(keys::KING_RANK_BLACK, Value::Int(7 - sq.rank() as i64));
    }
    Ok(Value::Null)
}

/// Clamps a raw evaluation to [-20, +20] pawns for aggregate reporting;
/// idempotent, and maps the infinite mate scores onto the bounds.
pub fn clamp_eval(eval: f64) -> f64 {
    eval.clamp(-20.0, 20.0)
}

/// The flat output record of one analyzed position.
///
/// Field order is the dataset column order. `eval` stays absent when no
/// evaluation step ran in the producing pipeline; every other field defaults
/// to zero/false when its extractor was not part of the pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionSummary {
    pub material_white: i64,
    pub material_black: i64,
    pub material: i64,
    pub development_white: f64,
    pub development_black: f64,
    pub development: f64,
    pub mobility_white: i64,
    pub mobility_black: i64,
    pub mobility: i64,
    pub white_has_castled: bool,
    pub black_has_castled: bool,
    pub fullmove_number: i64,
    pub halfmove_clock: i64,
    pub furthest_rank_white: i64,
    pub furthest_rank_black: i64,
    pub furthest_rank: i64,
    pub king_file_white: i64,
    pub king_rank_white: i64,
    pub king_file_black: i64,
    pub king_rank_black: i64,
    /// Clamped evaluation, absent if no evaluation feature was computed.
    pub eval: Option<f64>,
}

/// Names of the numeric/boolean feature columns, in `feature_vector` order.
/// The evaluation is not a feature; it is the regression target.
pub const FEATURE_COLUMNS: &[&str] = &[
    keys::MATERIAL_WHITE,
    keys::MATERIAL_BLACK,
    keys::MATERIAL,
    keys::DEVELOPMENT_WHITE,
    keys::DEVELOPMENT_BLACK,
    keys::DEVELOPMENT,
    keys::MOBILITY_WHITE,
    keys::MOBILITY_BLACK,
    keys::MOBILITY,
    keys::WHITE_HAS_CASTLED,
    keys::BLACK_HAS_CASTLED,
    keys::FULLMOVE_NUMBER,
    keys::HALFMOVE_CLOCK,
    keys::FURTHEST_RANK_WHITE,
    keys::FURTHEST_RANK_BLACK,
    keys::FURTHEST_RANK,
    keys::KING_FILE_WHITE,
    keys::KING_RANK_WHITE,
    keys::KING_FILE_BLACK,
    keys::KING_RANK_BLACK,
];

impl PositionSummary {
    /// The numeric feature vector consumed by the regression model, in
    /// `FEATURE_COLUMNS` order. Booleans map to 0/1.
    pub fn feature_vector(&self) -> Vec<f64> {
        vec![
            self.material_white as f64,
            self.material_black as f64,
            self.material as f64,
            self.development_white,
            self.development_black,
            self.development,
            self.mobility_white as f64,
            self.mobility_black as f64,
            self.mobility as f64,
            if self.white_has_castled { 1.0 } else { 0.0 },
            if self.black_has_castled { 1.0 } else { 0.0 },
            self.fullmove_number as f64,
            self.halfmove_clock as f64,
            self.furthest_rank_white as f64,
            self.furthest_rank_black as f64,
            self.furthest_rank as f64,
            self.king_file_white as f64,
            self.king_rank_white as f64,
            self.king_file_black as f64,
            self.king_rank_black as f64,
        ]
    }
}

/// Gathers previously written features into the flat summary record. The
/// evaluation, when present, is clamped to [-20, +20].
pub fn position_summary(cx: &mut Analysis) -> Result<Value, StepError> {
    let summary = PositionSummary {
        material_white: cx.get_i64(keys::MATERIAL_WHITE).unwrap_or(0),
        material_black: cx.get_i64(keys::MATERIAL_BLACK).unwrap_or(0),
        material: cx.get_i64(keys::MATERIAL).unwrap_or(0),
        development_white: cx.get_f64(keys::DEVELOPMENT_WHITE).unwrap_or(0.0),
        development_black: cx.get_f64(keys::DEVELOPMENT_BLACK).unwrap_or(0.0),
        development: cx.get_f64(keys::DEVELOPMENT).unwrap_or(0.0),
        mobility_white: cx.get_i64(keys::MOBILITY_WHITE).unwrap_or(0),
        mobility_black: cx.get_i64(keys::MOBILITY_BLACK).unwrap_or(0),
        mobility: cx.get_i64(keys::MOBILITY).unwrap_or(0),
        white_has_castled: cx.get_bool(keys::WHITE_HAS_CASTLED).unwrap_or(false),
        black_has_castled: cx.get_bool(keys::BLACK_HAS_CASTLED).unwrap_or(false),
        fullmove_number: cx.get_i64(keys::FULLMOVE_NUMBER).unwrap_or(0),
        halfmove_clock: cx.get_i64(keys::HALFMOVE_CLOCK).unwrap_or(0),
        furthest_rank_white: cx.get_i64(keys::FURTHEST_RANK_WHITE).unwrap_or(0),
        furthest_rank_black: cx.get_i64(keys::FURTHEST_RANK_BLACK).unwrap_or(0),
        furthest_rank: cx.get_i64(keys::FURTHEST_RANK).unwrap_or(0),
        king_file_white: cx.get_i64(keys::KING_FILE_WHITE).unwrap_or(0),
        king_rank_white: cx.get_i64(keys::KING_RANK_WHITE).unwrap_or(0),
        king_file_black: cx.get_i64(keys::KING_FILE_BLACK).unwrap_or(0),
        king_rank_black: cx.get_i64(keys::KING_RANK_BLACK).unwrap_or(0),
        eval: cx.get_f64(keys::EVAL).map(clamp_eval),
    };
    Ok(Value::Summary(Box::new(summary)))
}

#[cfg(test)]
#[path = "features_tests.rs"]
mod features_tests;
