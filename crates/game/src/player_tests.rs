use super::*;
use chess_analysis::{RawScore, ScriptedEngine};
use model_engine::LinearModel;
use shakmaty::Position;

fn mated_state() -> GameState {
    let mut state = GameState::new();
    for san in ["f3", "e5", "g4", "Qh4#"] {
        state.push_san(san).unwrap();
    }
    state
}

#[test]
fn engine_player_plays_the_recommended_move() {
    let engine = engine_handle(ScriptedEngine::always(RawScore::Cp(25), Some("e2e4")));
    let mut player = PipelinePlayer::engine_player("stockfish", engine);
    assert_eq!(player.name(), "stockfish");

    let state = GameState::new();
    let m = player.select_move(&state).unwrap().unwrap();
    assert_eq!(state.san(&m), "e4");
}

#[test]
fn engine_player_offers_no_move_when_the_game_is_over() {
    // An exhausted script errors on any query; terminal positions never
    // reach the engine.
    let engine = engine_handle(ScriptedEngine::sequence(Vec::new()));
    let mut player = PipelinePlayer::engine_player("stockfish", engine);
    assert_eq!(player.select_move(&mated_state()).unwrap(), None);
}

#[test]
fn random_player_selects_a_legal_move() {
    let mut player = PipelinePlayer::random_player("rando");
    let state = GameState::new();
    for _ in 0..10 {
        let m = player.select_move(&state).unwrap().unwrap();
        assert!(state.position().is_legal(m.clone()));
    }
}

#[test]
fn random_player_offers_no_move_when_the_game_is_over() {
    let mut player = PipelinePlayer::random_player("rando");
    assert_eq!(player.select_move(&mated_state()).unwrap(), None);
}

#[test]
fn cloned_player_keeps_its_name_and_still_moves() {
    let engine = engine_handle(ScriptedEngine::always(RawScore::Cp(0), Some("g1f3")));
    let original = PipelinePlayer::engine_player("twin", engine);
    let mut clone = original.clone_player();

    assert_eq!(clone.name(), "twin");
    let state = GameState::new();
    let m = clone.select_move(&state).unwrap().unwrap();
    assert_eq!(state.san(&m), "Nf3");
}

#[test]
fn model_display_name_uses_the_file_stem() {
    assert_eq!(model_display_name(Path::new("weights/v2.json")), "model(v2)");
    assert_eq!(model_display_name(Path::new("net.json")), "model(net)");
}

#[test]
fn model_player_loads_weights_from_disk() {
    let path = std::env::temp_dir().join("player_model.json");
    LinearModel::new(vec![0.0; chess_analysis::FEATURE_COLUMNS.len()], 0.0)
        .save(&path)
        .unwrap();

    let mut player = PipelinePlayer::model_player("learner", &path).unwrap();
    std::fs::remove_file(&path).ok();

    let state = GameState::new();
    let m = player.select_move(&state).unwrap().unwrap();
    assert!(state.position().is_legal(m.clone()));
}
