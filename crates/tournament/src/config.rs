//! Tournament configuration

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::TournamentError;

/// Tournament parameters, loadable from TOML; every field has a default so a
/// config file may set only what it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Full round-robin passes over all pairings.
    pub rounds: u32,
    /// Games per pairing per round.
    pub games_per_round: u32,
    /// Random opening plies prepended to every game for diversity.
    pub opening_plies: usize,
    /// Ply limit per game; hitting it scores a draw.
    pub max_plies: usize,
    /// Dataset output, one row per analyzed position.
    pub csv_path: PathBuf,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            rounds: 1,
            games_per_round: 1,
            opening_plies: 2,
            max_plies: 512,
            csv_path: PathBuf::from("tournament_results.csv"),
        }
    }
}

impl TournamentConfig {
    pub fn load(path: &Path) -> Result<Self, TournamentError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}
