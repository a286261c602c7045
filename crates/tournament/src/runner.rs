//! Round-robin tournament runner
//!
//! Plays every ordered player pairing (self-pairings included) for the
//! configured number of rounds and games. Each game starts with a random
//! opening sequence, runs headless, and appends its analyzed positions to
//! the dataset CSV before the next game starts, so an interrupted tournament
//! keeps everything played so far.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use rand::seq::SliceRandom;
use shakmaty::Position;
use thiserror::Error;
use tracing::info;

use chess_analysis::{GameState, MoveError, Pipeline};
use game_runner::{
    csv_header, csv_row, play_game, FinishedGame, GameConfig, GameError, NullRenderer,
    PipelinePlayer, Player,
};

use crate::{TournamentConfig, TournamentResults};

/// Identifier columns appended to every dataset row after the features.
pub const CSV_ID_COLUMNS: &[&str] = &[
    "white_player",
    "black_player",
    "tournament_game",
    "game_result",
];

#[derive(Debug, Error)]
pub enum TournamentError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("results serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A uniformly random legal opening of the given length, in SAN. Shorter if
/// the random line ends the game early.
pub fn random_opening(plies: usize) -> Result<Vec<String>, MoveError> {
    let mut state = GameState::new();
    let mut sans = Vec::with_capacity(plies);
    let mut rng = rand::thread_rng();
    for _ in 0..plies {
        let legal = state.position().legal_moves();
        let Some(m) = legal.choose(&mut rng).cloned() else {
            break;
        };
        sans.push(state.san(&m));
        state.push(m)?;
    }
    Ok(sans)
}

/// Appends one finished game's positions to the dataset, writing the header
/// only when the file does not exist yet.
fn append_game_csv(
    path: &Path,
    game: &FinishedGame,
    game_number: u32,
) -> Result<(), TournamentError> {
    let write_header = !path.exists();
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if write_header {
        writeln!(file, "{}", csv_header(CSV_ID_COLUMNS))?;
    }
    for entry in &game.history {
        let identifiers = [
            game.white.clone(),
            game.black.clone(),
            game_number.to_string(),
            game.result.as_str().to_string(),
        ];
        writeln!(file, "{}", csv_row(&entry.summary, &identifiers))?;
    }
    Ok(())
}

/// Runs the full tournament. Any existing dataset at the configured CSV path
/// is removed first so the file holds exactly this tournament's positions.
pub fn run_tournament(
    players: &[PipelinePlayer],
    analysis: &mut Pipeline,
    config: &TournamentConfig,
) -> Result<TournamentResults, TournamentError> {
    if config.csv_path.exists() {
        fs::remove_file(&config.csv_path)?;
        info!(path = %config.csv_path.display(), "removed existing dataset to start fresh");
    }

    let names: Vec<String> = players.iter().map(|p| p.name().to_string()).collect();
    let pairings: Vec<(usize, usize)> = (0..players.len())
        .flat_map(|w| (0..players.len()).map(move |b| (w, b)))
        .collect();
    info!(
        players = names.len(),
        pairings = pairings.len(),
        rounds = config.rounds,
        games_per_round = config.games_per_round,
        total_games = pairings.len() as u32 * config.rounds * config.games_per_round,
        "tournament setup"
    );

    let mut results = TournamentResults::new("Round robin", names, config.clone());
    let mut game_counter = 0u32;

    for round in 0..config.rounds {
        info!(round = round + 1, of = config.rounds, "round");
        for &(wi, bi) in &pairings {
            for _ in 0..config.games_per_round {
                game_counter += 1;
                // Fresh clones per game keep per-game pipeline state apart
                // while sharing engine handles.
                let mut white = players[wi].clone_player();
                let mut black = players[bi].clone_player();

                let game_config = GameConfig {
                    initial_moves: random_opening(config.opening_plies)?,
                    max_plies: config.max_plies,
                };
                let game = play_game(
                    &mut white,
                    &mut black,
                    analysis,
                    &mut NullRenderer,
                    &game_config,
                )?;

                append_game_csv(&config.csv_path, &game, game_counter)?;
                info!(
                    game = game_counter,
                    white = %game.white,
                    black = %game.black,
                    result = game.result.as_str(),
                    positions = game.history.len(),
                    "game saved"
                );
                results.record_game(&game.white, &game.black, game.result);
            }
        }
    }

    info!(games = game_counter, "tournament completed");
    Ok(results)
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod runner_tests;
