//! Game running
//!
//! Brings the analysis core together into playable games:
//! - `Player`: a named move-selection capability backed by a pipeline
//! - `Renderer`: board display with a poll-based close signal
//! - `driver`: the automated game loop producing a per-position history
//! - `export`: PGN, plain-text analysis history, and CSV rows

mod driver;
mod export;
mod player;
mod render;

pub use driver::*;
pub use export::*;
pub use player::*;
pub use render::*;
