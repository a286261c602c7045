//! Regression-model evaluation engine
//!
//! A linear model over the position feature vector stands in for a real
//! engine: `evaluate` extracts features from the bound position and predicts
//! an evaluation in pawns, `best_move` is a one-ply search that picks the
//! child position with the best predicted score for the side to move.
//! Decided positions bypass the model with a fixed +/-2000 centipawns, draws
//! with 0.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, Position};
use thiserror::Error;
use tracing::warn;

use chess_analysis::{
    clamp_eval, classify_terminal, engine_handle, position_analysis_without_eval, EngineError,
    EvalEngine, GameState, NullEngine, Pipeline, RawScore, Termination, Value, FEATURE_COLUMNS,
};

/// Centipawn score assigned to decided positions instead of a prediction.
pub const DECIDED_SCORE_CP: i32 = 2000;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("model serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("feature dimension mismatch: model has {model}, input has {input}")]
    Dimension { model: usize, input: usize },
}

/// A trained linear regression: one coefficient per feature column plus an
/// intercept, predicting an evaluation in pawns (white-positive).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub columns: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    /// A model over the standard feature columns.
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            coefficients,
            intercept,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let file = File::open(path)?;
        let model: Self = serde_json::from_reader(BufReader::new(file))?;
        if model.columns.len() != model.coefficients.len() {
            return Err(ModelError::Dimension {
                model: model.coefficients.len(),
                input: model.columns.len(),
            });
        }
        Ok(model)
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Predicted evaluation in pawns for one feature vector.
    pub fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.coefficients.len() {
            return Err(ModelError::Dimension {
                model: self.coefficients.len(),
                input: features.len(),
            });
        }
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum();
        Ok(dot + self.intercept)
    }
}

/// An evaluation engine backed by a [`LinearModel`].
pub struct ModelEngine {
    model: LinearModel,
    pipeline: Pipeline,
    state: GameState,
}

impl ModelEngine {
    pub fn new(model: LinearModel) -> Self {
        Self {
            model,
            pipeline: position_analysis_without_eval(engine_handle(NullEngine)),
            state: GameState::new(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        Ok(Self::new(LinearModel::load(path)?))
    }

    /// Scores one position in centipawns, white-positive. Decided positions
    /// get the fixed score; otherwise the prediction is clamped to the same
    /// band the dataset uses, so a model cannot out-score an actual mate.
    fn score(&mut self, pos: &Chess) -> Result<RawScore, EngineError> {
        if let Some(termination) = classify_terminal(pos) {
            let cp = match termination {
                Termination::Win(Color::White) => DECIDED_SCORE_CP,
                Termination::Win(Color::Black) => -DECIDED_SCORE_CP,
                Termination::Draw => 0,
            };
            return Ok(RawScore::Cp(cp));
        }

        let summary = match self
            .pipeline
            .run_position(pos)
            .map_err(|e| EngineError::Protocol(e.to_string()))?
        {
            Value::Summary(summary) => summary,
            other => {
                return Err(EngineError::Protocol(format!(
                    "analysis produced {other:?}, expected a summary"
                )))
            }
        };

        let pawns = match self.model.predict(&summary.feature_vector()) {
            Ok(pawns) => clamp_eval(pawns),
            Err(err) => {
                warn!(%err, "model prediction failed, scoring position as equal");
                0.0
            }
        };
        Ok(RawScore::Cp((pawns * 100.0) as i32))
    }
}

impl EvalEngine for ModelEngine {
    fn set_position(&mut self, fen: &str) -> Result<(), EngineError> {
        self.state = GameState::from_fen(fen).map_err(|e| EngineError::Position(e.to_string()))?;
        Ok(())
    }

    fn evaluate(&mut self) -> Result<RawScore, EngineError> {
        let pos = self.state.position().clone();
        self.score(&pos)
    }

    /// One-ply search: plays every legal move and keeps the child with the
    /// best predicted score for the side to move. Ties keep the first move
    /// in generation order.
    fn best_move(&mut self) -> Result<Option<String>, EngineError> {
        let pos = self.state.position().clone();
        let maximizing = pos.turn() == Color::White;

        let mut best: Option<(shakmaty::Move, i32)> = None;
        for m in pos.legal_moves() {
            let mut child = pos.clone();
            child.play_unchecked(m.clone());
            let cp = match self.score(&child)? {
                RawScore::Cp(cp) => cp,
                RawScore::Mate(mate) => {
                    if mate > 0 {
                        DECIDED_SCORE_CP
                    } else {
                        -DECIDED_SCORE_CP
                    }
                }
            };
            let better = match &best {
                None => true,
                Some((_, current)) => {
                    if maximizing {
                        cp > *current
                    } else {
                        cp < *current
                    }
                }
            };
            if better {
                best = Some((m, cp));
            }
        }

        Ok(best.map(|(m, _)| UciMove::from_move(m, CastlingMode::Standard).to_string()))
    }
}

#[cfg(test)]
mod model_tests;
