//! Tournament running
//!
//! This crate provides infrastructure for:
//! - Round-robin play over every ordered player pairing, self-pairings
//!   included
//! - A growing per-position CSV dataset, appended after every finished game
//! - W-L-D standings tracking and reporting
//!
//! # Usage
//!
//! ```bash
//! # Engine vs random, ten rounds of four games per pairing
//! cargo run -p tournament -- --players engine,random --rounds 10 --games-per-round 4
//!
//! # Model vs random with a config file
//! cargo run -p tournament -- --config tournament.toml --players model:weights.json,random
//! ```

mod config;
mod results;
mod runner;

pub use config::*;
pub use results::*;
pub use runner::*;
