//! Board renderers
//!
//! Rendering is synchronous; the driver polls `is_closed` once per loop
//! iteration so an interactive display can end the game.

use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Color, Move};

use chess_analysis::{ascii_board, GameState};

pub trait Renderer {
    /// Draws the position after a move, from the given side's point of view.
    fn render(&mut self, state: &GameState, last_move: Option<&Move>, orientation: Color);

    /// Polled once per driver iteration; `true` aborts the game.
    fn is_closed(&mut self) -> bool {
        false
    }
}

/// Headless renderer for tournaments and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _state: &GameState, _last_move: Option<&Move>, _orientation: Color) {}
}

/// Prints the board as a text diagram after every move.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn render(&mut self, state: &GameState, last_move: Option<&Move>, orientation: Color) {
        if let Some(m) = last_move {
            println!(
                "last move: {}",
                UciMove::from_move(m.clone(), CastlingMode::Standard)
            );
        }
        println!("{}", ascii_board(state.board(), orientation));
    }
}
