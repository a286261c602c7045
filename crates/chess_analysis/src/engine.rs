//! Evaluation-engine capability
//!
//! External engines (a UCI subprocess, a trained regression model) plug into
//! the pipeline through this trait. Scores always use the white-positive
//! convention: positive centipawns favor white, a positive mate value means
//! white mates.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use thiserror::Error;

/// Raw score returned by an evaluation engine for one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawScore {
    /// Centipawn evaluation, positive favors white.
    Cp(i32),
    /// Forced mate in the given number of plies; positive means white mates.
    Mate(i32),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine process failure: {0}")]
    Process(String),
    #[error("engine protocol error: {0}")]
    Protocol(String),
    #[error("invalid position: {0}")]
    Position(String),
    #[error("no evaluation engine bound to this pipeline")]
    Unavailable,
}

/// Capability contract for position evaluation.
///
/// Calls are serialized per engine: one handle represents one external
/// process or model and is never queried concurrently. A crashed or stalled
/// engine is fatal to the run; there is no retry policy.
pub trait EvalEngine {
    /// Binds the position to evaluate, as a FEN string.
    fn set_position(&mut self, fen: &str) -> Result<(), EngineError>;

    /// Evaluates the bound position.
    fn evaluate(&mut self) -> Result<RawScore, EngineError>;

    /// Recommended best move for the bound position, in UCI notation.
    /// `None` when the engine has no move to suggest.
    fn best_move(&mut self) -> Result<Option<String>, EngineError>;
}

/// Shared, exclusively-owned-in-practice engine handle.
///
/// Pipeline clones may share one handle; the execution model is
/// single-threaded and never queries a handle from two places at once.
pub type EngineHandle = Rc<RefCell<dyn EvalEngine>>;

/// Wraps an engine into a shareable handle.
pub fn engine_handle<E: EvalEngine + 'static>(engine: E) -> EngineHandle {
    Rc::new(RefCell::new(engine))
}

/// Engine that refuses every query.
///
/// Bound to pipelines that never evaluate (random or interactive move
/// selection), so accidental evaluation surfaces as an error instead of a
/// silent default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEngine;

impl EvalEngine for NullEngine {
    fn set_position(&mut self, _fen: &str) -> Result<(), EngineError> {
        Err(EngineError::Unavailable)
    }

    fn evaluate(&mut self) -> Result<RawScore, EngineError> {
        Err(EngineError::Unavailable)
    }

    fn best_move(&mut self) -> Result<Option<String>, EngineError> {
        Err(EngineError::Unavailable)
    }
}

/// Deterministic engine replaying a fixed script of responses.
///
/// Each `set_position` advances to the next scripted response; when the
/// script runs out the fallback response (if any) is repeated. Used by tests
/// across the workspace to exercise the evaluation path without a real
/// engine process.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEngine {
    script: VecDeque<(RawScore, Option<String>)>,
    fallback: Option<(RawScore, Option<String>)>,
    current: Option<(RawScore, Option<String>)>,
    pub positions_seen: Vec<String>,
}

impl ScriptedEngine {
    /// Replies with the same score and move for every position.
    pub fn always(score: RawScore, best_move: Option<&str>) -> Self {
        Self {
            fallback: Some((score, best_move.map(str::to_string))),
            ..Self::default()
        }
    }

    /// Replies with the given responses in order, one per `set_position`.
    pub fn sequence(responses: Vec<(RawScore, Option<String>)>) -> Self {
        Self {
            script: responses.into(),
            ..Self::default()
        }
    }
}

impl EvalEngine for ScriptedEngine {
    fn set_position(&mut self, fen: &str) -> Result<(), EngineError> {
        self.positions_seen.push(fen.to_string());
        self.current = self.script.pop_front().or_else(|| self.fallback.clone());
        Ok(())
    }

    fn evaluate(&mut self) -> Result<RawScore, EngineError> {
        self.current
            .as_ref()
            .map(|(score, _)| *score)
            .ok_or_else(|| EngineError::Protocol("scripted engine exhausted".into()))
    }

    fn best_move(&mut self) -> Result<Option<String>, EngineError> {
        self.current
            .as_ref()
            .map(|(_, mv)| mv.clone())
            .ok_or_else(|| EngineError::Protocol("scripted engine exhausted".into()))
    }
}
