use super::*;
use crate::{FinishedGame, GameResult, PositionEntry};

fn fools_mate() -> FinishedGame {
    FinishedGame {
        white: "rando".into(),
        black: "stockfish".into(),
        result: GameResult::BlackWins,
        moves: vec!["f3".into(), "e5".into(), "g4".into(), "Qh4#".into()],
        history: Vec::new(),
        final_fen: "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3".into(),
    }
}

#[test]
fn pgn_carries_headers_and_movetext() {
    let pgn = pgn_string(&fools_mate(), "Casual Game");
    assert!(pgn.contains("[Event \"Casual Game\"]"));
    assert!(pgn.contains("[White \"rando\"]"));
    assert!(pgn.contains("[Black \"stockfish\"]"));
    assert!(pgn.contains("[Result \"0-1\"]"));
    assert!(pgn.contains("1. f3 e5 2. g4 Qh4# 0-1"));
}

#[test]
fn pgn_result_token_for_unfinished_game() {
    let mut game = fools_mate();
    game.result = GameResult::Aborted;
    game.moves.truncate(2);
    let pgn = pgn_string(&game, "Casual Game");
    assert!(pgn.contains("[Result \"*\"]"));
    assert!(pgn.trim_end().ends_with('*'));
}

#[test]
fn history_text_labels_the_starting_position() {
    let mut game = fools_mate();
    let mut summary = PositionSummary::default();
    summary.eval = Some(0.33);
    game.history = vec![
        PositionEntry {
            move_number: 0,
            fen: "startfen".into(),
            last_move: None,
            summary: PositionSummary::default(),
        },
        PositionEntry {
            move_number: 1,
            fen: "otherfen".into(),
            last_move: Some("f3".into()),
            summary,
        },
    ];

    let text = history_text(&game);
    assert!(text.contains("POSITION ANALYSIS HISTORY"));
    assert!(text.contains("Move 0: Starting position"));
    assert!(text.contains("FEN: startfen"));
    // Absent evaluations print as a neutral zero.
    assert!(text.contains("Evaluation: +0.0"));
    assert!(text.contains("Move 1: f3"));
    assert!(text.contains("Evaluation: +0.3"));
}

#[test]
fn csv_header_appends_identifier_columns() {
    let header = csv_header(&["white_player", "black_player", "tournament_game", "game_result"]);
    assert!(header.starts_with("material_white,material_black,material,"));
    assert!(header.ends_with("eval,white_player,black_player,tournament_game,game_result"));
}

#[test]
fn csv_row_matches_header_arity() {
    let header = csv_header(&["game_result"]);
    let row = csv_row(&PositionSummary::default(), &["1-0".into()]);
    assert_eq!(
        header.split(',').count(),
        row.split(',').count()
    );
    // No evaluation means an empty field, not a zero.
    assert!(row.ends_with(",,1-0"));
}

#[test]
fn csv_row_serializes_the_evaluation() {
    let mut summary = PositionSummary::default();
    summary.eval = Some(-1.5);
    summary.material_white = 39;
    let row = csv_row(&summary, &[]);
    assert!(row.starts_with("39,"));
    assert!(row.ends_with(",-1.5"));
}
