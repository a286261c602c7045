//! Automated game driver
//!
//! Runs one game between two players: setup applies an optional opening
//! sequence and records history entry 0, the loop alternates strictly by
//! side to move and appends one analyzed history entry per applied move,
//! finalization hands back the result with the full history. There is no
//! mid-game persistence; an interrupted run loses its history.

use shakmaty::{Color, Position};
use thiserror::Error;
use tracing::info;

use chess_analysis::{
    classify_terminal, GameState, MoveError, Pipeline, PositionSummary, StepError, Termination,
    Value,
};

use crate::{Player, Renderer};

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Step(#[from] StepError),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("analysis pipeline produced no position summary for {0}")]
    NoSummary(String),
}

/// Final classification of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    /// Ended by an external signal (closed display, player without a move)
    /// before the rules decided anything.
    Aborted,
}

impl GameResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Aborted => "*",
        }
    }

    fn from_termination(termination: Termination) -> Self {
        match termination {
            Termination::Win(Color::White) => GameResult::WhiteWins,
            Termination::Win(Color::Black) => GameResult::BlackWins,
            Termination::Draw => GameResult::Draw,
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One analyzed position in a game's history. Entry 0 is the position after
/// the opening sequence and carries no producing move.
#[derive(Debug, Clone)]
pub struct PositionEntry {
    pub move_number: usize,
    pub fen: String,
    pub last_move: Option<String>,
    pub summary: PositionSummary,
}

pub struct GameConfig {
    /// Opening sequence in SAN, applied before the players move.
    pub initial_moves: Vec<String>,
    /// Plies (including the opening) after which the game is scored a draw.
    pub max_plies: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_moves: Vec::new(),
            max_plies: 512,
        }
    }
}

/// A completed game: result, both names, the full SAN move sequence from the
/// starting position, and the analyzed per-position history.
pub struct FinishedGame {
    pub white: String,
    pub black: String,
    pub result: GameResult,
    pub moves: Vec<String>,
    pub history: Vec<PositionEntry>,
    pub final_fen: String,
}

fn analyze(pipeline: &mut Pipeline, state: &GameState) -> Result<PositionSummary, GameError> {
    match pipeline.run(state)? {
        Value::Summary(summary) => Ok(*summary),
        _ => Err(GameError::NoSummary(state.fen())),
    }
}

/// Plays one game to completion.
///
/// Termination, checked before every move: a decided or drawn position per
/// the rules engine, the fifty-move rule, threefold repetition, the max-ply
/// guard (scored as a draw), a closed renderer, or a player returning no
/// move (both scored as aborted).
pub fn play_game(
    white: &mut dyn Player,
    black: &mut dyn Player,
    analysis: &mut Pipeline,
    renderer: &mut dyn Renderer,
    config: &GameConfig,
) -> Result<FinishedGame, GameError> {
    let mut state = GameState::new();
    let mut moves = Vec::new();
    for san in &config.initial_moves {
        let m = state.parse_san(san)?;
        moves.push(state.san(&m));
        state.push(m)?;
    }

    let mut history = vec![PositionEntry {
        move_number: 0,
        fen: state.fen(),
        last_move: None,
        summary: analyze(analysis, &state)?,
    }];
    renderer.render(&state, None, Color::White);

    let result = loop {
        if let Some(termination) = classify_terminal(state.position()) {
            break GameResult::from_termination(termination);
        }
        if state.position().halfmoves() >= 100 || state.is_threefold() {
            break GameResult::Draw;
        }
        if state.ply() >= config.max_plies {
            info!(plies = state.ply(), "ply limit reached, scoring a draw");
            break GameResult::Draw;
        }
        if renderer.is_closed() {
            break GameResult::Aborted;
        }

        let (mover, chosen) = match state.turn() {
            Color::White => (white.name().to_string(), white.select_move(&state)?),
            Color::Black => (black.name().to_string(), black.select_move(&state)?),
        };
        let Some(m) = chosen else {
            break GameResult::Aborted;
        };

        let san = state.san(&m);
        info!(player = %mover, %san, "move");
        state.push(m.clone())?;
        moves.push(san.clone());
        renderer.render(&state, Some(&m), Color::White);

        history.push(PositionEntry {
            move_number: history.len(),
            fen: state.fen(),
            last_move: Some(san),
            summary: analyze(analysis, &state)?,
        });
    };

    info!(
        white = white.name(),
        black = black.name(),
        result = result.as_str(),
        plies = state.ply(),
        "game over"
    );
    Ok(FinishedGame {
        white: white.name().to_string(),
        black: black.name().to_string(),
        result,
        moves,
        history,
        final_fen: state.fen(),
    })
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod driver_tests;
