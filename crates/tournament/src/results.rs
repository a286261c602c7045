//! Tournament results storage and reporting

use std::path::Path;

use serde::{Deserialize, Serialize};

use game_runner::GameResult;

use crate::{TournamentConfig, TournamentError};

/// Aggregated score of one ordered pairing, from the white player's side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl MatchResult {
    pub fn record(&mut self, result: GameResult) {
        match result {
            GameResult::WhiteWins => self.wins += 1,
            GameResult::BlackWins => self.losses += 1,
            // Aborted games carry no information either way.
            GameResult::Draw | GameResult::Aborted => self.draws += 1,
        }
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// White's score fraction: win 1, draw 0.5.
    pub fn score(&self) -> f64 {
        if self.games() == 0 {
            return 0.0;
        }
        (self.wins as f64 + self.draws as f64 * 0.5) / self.games() as f64
    }
}

/// One ordered pairing in the tournament.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchEntry {
    pub white: String,
    pub black: String,
    pub result: MatchResult,
}

/// Complete tournament results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentResults {
    /// Name/description of the tournament
    pub name: String,
    /// Participating players
    pub participants: Vec<String>,
    /// One entry per ordered pairing that played at least one game
    pub matches: Vec<MatchEntry>,
    /// Configuration used
    pub config: TournamentConfig,
}

impl TournamentResults {
    pub fn new(name: &str, participants: Vec<String>, config: TournamentConfig) -> Self {
        Self {
            name: name.to_string(),
            participants,
            matches: Vec::new(),
            config,
        }
    }

    /// Folds one game result into its pairing's tally.
    pub fn record_game(&mut self, white: &str, black: &str, result: GameResult) {
        let position = self
            .matches
            .iter()
            .position(|e| e.white == white && e.black == black);
        let entry = match position {
            Some(i) => &mut self.matches[i],
            None => {
                self.matches.push(MatchEntry {
                    white: white.to_string(),
                    black: black.to_string(),
                    result: MatchResult::default(),
                });
                let last = self.matches.len() - 1;
                &mut self.matches[last]
            }
        };
        entry.result.record(result);
    }

    /// Save results to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), TournamentError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load results from a JSON file
    pub fn load(path: &Path) -> Result<Self, TournamentError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Tournament: {} ===\n\n", self.name));
        report.push_str(&format!("Participants: {}\n", self.participants.join(", ")));
        report.push_str(&format!(
            "Config: {} rounds, {} games/pairing/round, {} opening plies\n\n",
            self.config.rounds, self.config.games_per_round, self.config.opening_plies
        ));

        report.push_str("Results (from white's side):\n");
        report.push_str(&format!(
            "{:<20} vs {:<20} {:>5}-{:<5}-{:<5}\n",
            "White", "Black", "W", "L", "D"
        ));
        report.push_str(&"-".repeat(60));
        report.push('\n');

        for entry in &self.matches {
            report.push_str(&format!(
                "{:<20} vs {:<20} {:>5}-{:<5}-{:<5}\n",
                entry.white,
                entry.black,
                entry.result.wins,
                entry.result.losses,
                entry.result.draws
            ));
        }

        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}
