//! Feature values and the layered analysis context

use std::collections::BTreeMap;

use shakmaty::Move;

use crate::PositionSummary;

/// A single feature value written into the analysis context.
///
/// Numeric features use `Int` or `Float`; the helpers below coerce between
/// the two so extractors don't need to care which one an earlier step chose.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent result (empty pipeline, or a step with nothing to report).
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Move(Move),
    /// The flat output record of the position-summary step.
    Summary(Box<PositionSummary>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view: `Float` as-is, `Int` widened, `Bool` as 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_move(&self) -> Option<&Move> {
        match self {
            Value::Move(m) => Some(m),
            _ => None,
        }
    }
}

/// Accumulated knowledge about one position, keyed by feature name.
///
/// Two layers: a persistent layer that survives resets and pipeline cloning
/// (identity-like data such as a player's display name), and a current layer
/// that is cleared for every new position. Lookup checks the current layer
/// first and falls back to the persistent one; a missing key is simply
/// absent, never an error.
#[derive(Debug, Clone, Default)]
pub struct AnalysisContext {
    persistent: BTreeMap<String, Value>,
    current: BTreeMap<String, Value>,
}

impl AnalysisContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current-layer lookup with persistent fallback.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.current.get(key).or_else(|| self.persistent.get(key))
    }

    /// Writes into the current layer. Later writes overwrite earlier ones
    /// within the same position evaluation.
    pub fn set(&mut self, key: &str, value: Value) {
        self.current.insert(key.to_string(), value);
    }

    /// Writes into the persistent layer.
    pub fn set_persistent(&mut self, key: &str, value: Value) {
        self.persistent.insert(key.to_string(), value);
    }

    /// Clears the current layer; the persistent layer is untouched.
    pub fn clear_current(&mut self) {
        self.current.clear();
    }
}
