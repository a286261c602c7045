use super::*;
use chess_analysis::{engine_handle, position_analysis_without_eval, NullEngine};
use std::path::PathBuf;

fn short_config(csv_path: PathBuf) -> TournamentConfig {
    TournamentConfig {
        rounds: 1,
        games_per_round: 1,
        opening_plies: 2,
        max_plies: 6,
        csv_path,
    }
}

#[test]
fn random_opening_is_applicable_from_the_start_position() {
    let opening = random_opening(4).unwrap();
    assert_eq!(opening.len(), 4);
    let mut state = GameState::new();
    for san in &opening {
        state.push_san(san).unwrap();
    }
}

#[test]
fn round_robin_plays_every_ordered_pairing() {
    let csv = std::env::temp_dir().join("tournament_pairings.csv");
    let players = [
        PipelinePlayer::random_player("r1"),
        PipelinePlayer::random_player("r2"),
    ];
    let mut analysis = position_analysis_without_eval(engine_handle(NullEngine));

    let results = run_tournament(&players, &mut analysis, &short_config(csv.clone())).unwrap();
    std::fs::remove_file(&csv).ok();

    // Two players give four ordered pairings, self-pairings included.
    assert_eq!(results.matches.len(), 4);
    let pairs: Vec<(&str, &str)> = results
        .matches
        .iter()
        .map(|e| (e.white.as_str(), e.black.as_str()))
        .collect();
    assert!(pairs.contains(&("r1", "r1")));
    assert!(pairs.contains(&("r1", "r2")));
    assert!(pairs.contains(&("r2", "r1")));
    assert!(pairs.contains(&("r2", "r2")));
    for entry in &results.matches {
        assert_eq!(entry.result.games(), 1);
    }
}

#[test]
fn dataset_has_one_header_and_a_row_per_position() {
    let csv = std::env::temp_dir().join("tournament_dataset.csv");
    std::fs::remove_file(&csv).ok();
    let players = [PipelinePlayer::random_player("solo")];
    let mut analysis = position_analysis_without_eval(engine_handle(NullEngine));

    let config = short_config(csv.clone());
    run_tournament(&players, &mut analysis, &config).unwrap();
    let contents = std::fs::read_to_string(&csv).unwrap();
    std::fs::remove_file(&csv).ok();

    let mut lines = contents.lines();
    let header = lines.next().unwrap();
    assert_eq!(header, csv_header(CSV_ID_COLUMNS));
    let columns = header.split(',').count();

    let rows: Vec<&str> = lines.collect();
    // At least entry 0; at most the ply limit plus entry 0.
    assert!(!rows.is_empty());
    assert!(rows.len() <= config.max_plies + 1);
    for row in rows {
        assert_eq!(row.split(',').count(), columns);
        assert!(row.ends_with(",1/2-1/2") || row.ends_with(",1-0") || row.ends_with(",0-1"));
    }
}

#[test]
fn existing_dataset_is_replaced_on_a_new_run() {
    let csv = std::env::temp_dir().join("tournament_fresh.csv");
    std::fs::write(&csv, "stale contents\n").unwrap();
    let players = [PipelinePlayer::random_player("solo")];
    let mut analysis = position_analysis_without_eval(engine_handle(NullEngine));

    run_tournament(&players, &mut analysis, &short_config(csv.clone())).unwrap();
    let contents = std::fs::read_to_string(&csv).unwrap();
    std::fs::remove_file(&csv).ok();

    assert!(!contents.contains("stale contents"));
    assert_eq!(
        contents.matches("material_white").count(),
        1,
        "header must appear exactly once"
    );
}
