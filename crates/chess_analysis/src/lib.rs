//! Position-analysis pipeline for chess
//!
//! This crate provides the analysis core:
//! - An ordered pipeline of feature-extraction steps sharing one mutable
//!   context per position (`Pipeline`, `Analysis`)
//! - Feature extractors (material, development, mobility, castling status,
//!   move counters, furthest advanced rank, king position)
//! - Evaluation normalization: raw engine output (centipawns or mate) to a
//!   signed float, a recommended move, and a display summary
//! - The `EvalEngine` capability implemented by external engines
//!
//! Board legality, FEN/SAN/UCI handling, and outcome classification are
//! delegated entirely to `shakmaty`.

mod analyzers;
mod context;
mod engine;
mod features;
mod pipeline;
mod state;
mod steps;

pub use analyzers::*;
pub use context::*;
pub use engine::*;
pub use features::*;
pub use pipeline::*;
pub use state::*;
pub use steps::*;
