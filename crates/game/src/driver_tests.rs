use std::collections::VecDeque;

use super::*;
use crate::NullRenderer;
use chess_analysis::{engine_handle, position_analysis_without_eval, NullEngine};

/// Replays a fixed SAN sequence, then reports no move.
struct ScriptedPlayer {
    name: String,
    moves: VecDeque<String>,
}

impl ScriptedPlayer {
    fn new(name: &str, moves: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            moves: moves.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl Player for ScriptedPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_move(
        &mut self,
        state: &GameState,
    ) -> Result<Option<shakmaty::Move>, StepError> {
        match self.moves.pop_front() {
            Some(san) => Ok(Some(state.parse_san(&san)?)),
            None => Ok(None),
        }
    }
}

fn analysis_pipeline() -> Pipeline {
    position_analysis_without_eval(engine_handle(NullEngine))
}

fn run(
    white: &mut ScriptedPlayer,
    black: &mut ScriptedPlayer,
    config: &GameConfig,
) -> FinishedGame {
    play_game(
        white,
        black,
        &mut analysis_pipeline(),
        &mut NullRenderer,
        config,
    )
    .unwrap()
}

#[test]
fn checkmate_ends_the_game() {
    let mut white = ScriptedPlayer::new("w", &["f3", "g4"]);
    let mut black = ScriptedPlayer::new("b", &["e5", "Qh4#"]);
    let game = run(&mut white, &mut black, &GameConfig::default());

    assert_eq!(game.result, GameResult::BlackWins);
    assert_eq!(game.result.as_str(), "0-1");
    assert_eq!(game.moves, vec!["f3", "e5", "g4", "Qh4#"]);
    // Entry 0 plus one entry per applied move.
    assert_eq!(game.history.len(), 5);
    assert_eq!(game.history[0].last_move, None);
    assert_eq!(game.history[4].last_move.as_deref(), Some("Qh4#"));
}

#[test]
fn opening_moves_are_applied_before_entry_zero() {
    let mut white = ScriptedPlayer::new("w", &[]);
    let mut black = ScriptedPlayer::new("b", &[]);
    let config = GameConfig {
        initial_moves: vec!["e4".into(), "e5".into()],
        ..GameConfig::default()
    };
    let game = run(&mut white, &mut black, &config);

    // White had no move to offer, so the game aborts right after setup.
    assert_eq!(game.result, GameResult::Aborted);
    assert_eq!(game.result.as_str(), "*");
    assert_eq!(game.moves, vec!["e4", "e5"]);
    assert_eq!(game.history.len(), 1);
    assert_eq!(game.history[0].move_number, 0);
    assert_eq!(game.history[0].last_move, None);
    assert!(game.history[0]
        .fen
        .starts_with("rnbqkbnr/pppp1ppp/8/4p3/4P3/8"));
}

#[test]
fn ply_limit_scores_a_draw() {
    let mut white = ScriptedPlayer::new("w", &["Nf3", "Ng1"]);
    let mut black = ScriptedPlayer::new("b", &["Nf6", "Ng8"]);
    let config = GameConfig {
        max_plies: 2,
        ..GameConfig::default()
    };
    let game = run(&mut white, &mut black, &config);

    assert_eq!(game.result, GameResult::Draw);
    assert_eq!(game.moves.len(), 2);
    assert_eq!(game.history.len(), 3);
}

#[test]
fn threefold_repetition_scores_a_draw() {
    let shuffle_white = ["Nf3", "Ng1", "Nf3", "Ng1"];
    let shuffle_black = ["Nf6", "Ng8", "Nf6", "Ng8"];
    let mut white = ScriptedPlayer::new("w", &shuffle_white);
    let mut black = ScriptedPlayer::new("b", &shuffle_black);
    let game = run(&mut white, &mut black, &GameConfig::default());

    // The starting position occurs for the third time after eight plies.
    assert_eq!(game.result, GameResult::Draw);
    assert_eq!(game.moves.len(), 8);
}

#[test]
fn closed_renderer_aborts_before_any_move() {
    struct ClosedRenderer;
    impl Renderer for ClosedRenderer {
        fn render(
            &mut self,
            _state: &GameState,
            _last_move: Option<&shakmaty::Move>,
            _orientation: shakmaty::Color,
        ) {
        }
        fn is_closed(&mut self) -> bool {
            true
        }
    }

    let mut white = ScriptedPlayer::new("w", &["e4"]);
    let mut black = ScriptedPlayer::new("b", &["e5"]);
    let game = play_game(
        &mut white,
        &mut black,
        &mut analysis_pipeline(),
        &mut ClosedRenderer,
        &GameConfig::default(),
    )
    .unwrap();

    assert_eq!(game.result, GameResult::Aborted);
    assert!(game.moves.is_empty());
    assert_eq!(game.history.len(), 1);
}
