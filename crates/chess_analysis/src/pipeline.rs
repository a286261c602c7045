//! Pipeline engine
//!
//! An ordered list of feature-extraction steps sharing one mutable analysis
//! context. Invoking the pipeline on a position clears the context's current
//! layer, binds the position, runs every step in registration order, and
//! returns the last step's value. A step may depend on keys written by any
//! earlier step in the same pipeline; that ordering is by construction, not
//! statically enforced.

use std::rc::Rc;

use thiserror::Error;

use crate::{AnalysisContext, EngineError, EngineHandle, GameState, MoveError, Value};

#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// One feature-extraction step. Steps are plain functions of the shared
/// context; any state they need lives in the context or the engine handle.
pub type Step = fn(&mut Analysis) -> Result<Value, StepError>;

/// The mutable context threaded through one pipeline invocation: the bound
/// position, the engine handle, and the layered feature map.
pub struct Analysis<'a> {
    state: &'a GameState,
    engine: &'a EngineHandle,
    context: &'a mut AnalysisContext,
}

impl Analysis<'_> {
    /// The position (plus producing moves) being analyzed.
    pub fn state(&self) -> &GameState {
        self.state
    }

    pub fn board(&self) -> &shakmaty::Chess {
        self.state.position()
    }

    /// Clones the engine handle so a step can query it while still writing
    /// into the context.
    pub fn engine(&self) -> EngineHandle {
        Rc::clone(self.engine)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_move(&self, key: &str) -> Option<shakmaty::Move> {
        self.get(key).and_then(Value::as_move).cloned()
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.context.set(key, value);
    }
}

/// An ordered sequence of steps bound to an evaluation-engine handle.
pub struct Pipeline {
    steps: Vec<Step>,
    engine: EngineHandle,
    context: AnalysisContext,
}

impl Pipeline {
    /// Empty pipeline bound to the given engine handle.
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            steps: Vec::new(),
            engine,
            context: AnalysisContext::new(),
        }
    }

    /// Appends a step; composition is associative and order-preserving.
    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Writes an identity-like value that survives across positions.
    pub fn set_persistent(&mut self, key: &str, value: Value) {
        self.context.set_persistent(key, value);
    }

    pub fn engine(&self) -> EngineHandle {
        Rc::clone(&self.engine)
    }

    /// Reads a feature left behind by the most recent invocation (current
    /// layer first, persistent fallback).
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }

    /// Runs every step in registration order against the given state and
    /// returns the final step's value; an empty pipeline yields
    /// `Value::Null`. A step's context writes persist even if a later step
    /// fails; there is no rollback.
    pub fn run(&mut self, state: &GameState) -> Result<Value, StepError> {
        self.context.clear_current();
        let mut out = Value::Null;
        let mut analysis = Analysis {
            state,
            engine: &self.engine,
            context: &mut self.context,
        };
        for step in &self.steps {
            out = step(&mut analysis)?;
        }
        Ok(out)
    }

    /// Convenience for analyzing a bare position with no move history.
    pub fn run_position(&mut self, position: &shakmaty::Chess) -> Result<Value, StepError> {
        self.run(&GameState::from_position(position.clone()))
    }

    /// Independent clone sharing this pipeline's engine handle. The step
    /// list and both context layers are copied.
    pub fn clone_pipeline(&self) -> Self {
        self.clone_with_engine(Rc::clone(&self.engine))
    }

    /// Independent clone with a replacement engine, used to swap evaluation
    /// engines without rebuilding the step list.
    pub fn clone_with_engine(&self, engine: EngineHandle) -> Self {
        Self {
            steps: self.steps.clone(),
            engine,
            context: self.context.clone(),
        }
    }
}
