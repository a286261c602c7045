//! Players
//!
//! A player is a move-selection pipeline with a display name. The name lives
//! in the pipeline's persistent layer, so it survives across positions and
//! clones; move selection runs the pipeline against the current state and
//! interprets the final value.

use std::path::Path;

use shakmaty::Move;

use chess_analysis::{
    engine_handle, evaluate_board, extract_move, human_move, keys, process_eval, random_move,
    EngineHandle, GameState, NullEngine, Pipeline, StepError, Value,
};
use model_engine::{ModelEngine, ModelError};

/// Display name for a model player, derived from its weights file so logs
/// and dataset identifier columns do not carry raw path specs.
pub fn model_display_name(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("model");
    format!("model({stem})")
}

/// Move-selection capability bound to one side of a game.
pub trait Player {
    fn name(&self) -> &str;

    /// Chooses a move for the given state; `None` means the player has no
    /// move to offer (usually because the game is over).
    fn select_move(&mut self, state: &GameState) -> Result<Option<Move>, StepError>;
}

/// A player whose move selection is an analysis pipeline ending in the
/// extract-move step.
pub struct PipelinePlayer {
    name: String,
    pipeline: Pipeline,
}

impl PipelinePlayer {
    fn new(name: &str, pipeline: Pipeline) -> Self {
        let mut player = Self {
            name: name.to_string(),
            pipeline,
        };
        player
            .pipeline
            .set_persistent(keys::NAME, Value::Str(name.to_string()));
        player
    }

    /// Plays the evaluation engine's recommended move.
    pub fn engine_player(name: &str, engine: EngineHandle) -> Self {
        let pipeline = Pipeline::new(engine)
            .then(evaluate_board)
            .then(process_eval)
            .then(extract_move);
        Self::new(name, pipeline)
    }

    /// Plays a uniformly random legal move.
    pub fn random_player(name: &str) -> Self {
        let pipeline = Pipeline::new(engine_handle(NullEngine))
            .then(random_move)
            .then(extract_move);
        Self::new(name, pipeline)
    }

    /// Prompts on stdin for each move.
    pub fn human_player(name: &str) -> Self {
        let pipeline = Pipeline::new(engine_handle(NullEngine))
            .then(human_move)
            .then(extract_move);
        Self::new(name, pipeline)
    }

    /// Plays the regression model's one-ply search move.
    pub fn model_player(name: &str, model_path: &Path) -> Result<Self, ModelError> {
        let engine = engine_handle(ModelEngine::from_file(model_path)?);
        Ok(Self::engine_player(name, engine))
    }

    /// Independent copy sharing the same engine handle, for self-pairings.
    pub fn clone_player(&self) -> Self {
        Self {
            name: self.name.clone(),
            pipeline: self.pipeline.clone_pipeline(),
        }
    }
}

impl Player for PipelinePlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_move(&mut self, state: &GameState) -> Result<Option<Move>, StepError> {
        match self.pipeline.run(state)? {
            Value::Move(m) => Ok(Some(m)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "player_tests.rs"]
mod player_tests;
