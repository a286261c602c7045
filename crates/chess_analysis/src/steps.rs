//! Evaluation normalization and move-selection steps

use std::io::{self, BufRead, Write};

use rand::seq::SliceRandom;
use shakmaty::{Color, Position};
use tracing::debug;

use crate::{
    ascii_board, classify_terminal, keys, Analysis, RawScore, StepError, Termination, Value,
};

/// Queries the evaluation engine and normalizes its output.
///
/// Terminal positions short-circuit to `+inf` / `-inf` / `0` without an
/// engine query and carry no mate distance. Otherwise centipawns become
/// fractional pawns (value / 100) and mate scores become `+inf`/`-inf` with
/// the absolute ply distance stored separately; the recommended move is
/// parsed from UCI into a structured move before being stored.
pub fn evaluate_board(cx: &mut Analysis) -> Result<Value, StepError> {
    if let Some(termination) = classify_terminal(cx.board()) {
        let eval = match termination {
            Termination::Win(Color::White) => f64::INFINITY,
            Termination::Win(Color::Black) => f64::NEG_INFINITY,
            Termination::Draw => 0.0,
        };
        cx.set(keys::EVAL, Value::Float(eval));
        cx.set(keys::BEST_MOVE, Value::Null);
        cx.set(keys::MATE_IN, Value::Null);
        return Ok(Value::Float(eval));
    }

    let engine = cx.engine();
    let fen = cx.state().fen();
    let mut engine = engine.borrow_mut();
    engine.set_position(&fen)?;
    let raw = engine.evaluate()?;
    let best = engine.best_move()?;
    drop(engine);

    let (eval, mate_in) = match raw {
        RawScore::Cp(cp) => (f64::from(cp) / 100.0, None),
        RawScore::Mate(plies) => {
            let eval = if plies > 0 {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            };
            (eval, Some(i64::from(plies.abs())))
        }
    };

    let best_move = match best {
        Some(uci) => Some(cx.state().parse_uci(&uci)?),
        None => None,
    };
    debug!(eval, ?mate_in, best = ?best_move, "engine evaluation");

    cx.set(keys::EVAL, Value::Float(eval));
    cx.set(
        keys::BEST_MOVE,
        best_move.map(Value::Move).unwrap_or(Value::Null),
    );
    cx.set(
        keys::MATE_IN,
        mate_in.map(Value::Int).unwrap_or(Value::Null),
    );
    Ok(Value::Float(eval))
}

/// Reassembles the human-readable evaluation summary: "<Winner> M<n>" for
/// mate lines, the numeric evaluation otherwise; "<SAN move> (<eval>)" when
/// a recommended move exists, "Evaluation: <eval>" when not. Also copies the
/// recommended move into the chosen-move slot for engine-driven players.
pub fn process_eval(cx: &mut Analysis) -> Result<Value, StepError> {
    let eval = cx.get_f64(keys::EVAL);
    let best = cx.get_move(keys::BEST_MOVE);
    let mate_in = cx.get_i64(keys::MATE_IN);

    let eval_text = match (mate_in, eval) {
        (Some(plies), Some(e)) => {
            let winner = if e > 0.0 { "White" } else { "Black" };
            format!("{winner} M{plies}")
        }
        (None, Some(e)) => format!("{e}"),
        _ => String::from("?"),
    };

    let result = match &best {
        Some(m) => format!("{} ({})", cx.state().san(m), eval_text),
        None => format!("Evaluation: {eval_text}"),
    };

    cx.set(
        keys::MOVE,
        best.clone().map(Value::Move).unwrap_or(Value::Null),
    );
    cx.set(keys::RESULT, Value::Str(result.clone()));
    Ok(Value::Str(result))
}

/// Selects uniformly at random among all legal moves; absent when none
/// exist.
pub fn random_move(cx: &mut Analysis) -> Result<Value, StepError> {
    let legal = cx.board().legal_moves();
    let chosen = legal.choose(&mut rand::thread_rng()).cloned();
    cx.set(
        keys::MOVE,
        chosen.clone().map(Value::Move).unwrap_or(Value::Null),
    );
    Ok(chosen.map(Value::Move).unwrap_or(Value::Null))
}

/// Prompts on stdin for a SAN move until one parses validly against the
/// current position; re-prompts indefinitely on invalid input. Closed input
/// is an i/o error, not an infinite loop.
pub fn human_move(cx: &mut Analysis) -> Result<Value, StepError> {
    let board_text = ascii_board(cx.state().board(), cx.state().turn());
    let legal: Vec<String> = {
        let state = cx.state();
        state
            .position()
            .legal_moves()
            .iter()
            .map(|m| state.san(m))
            .collect()
    };
    let mut stdout = io::stdout();
    writeln!(stdout, "{board_text}")?;
    writeln!(stdout, "{}", legal.join(" "))?;

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        write!(stdout, ":: ")?;
        stdout.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(StepError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "move input closed",
            )));
        }
        match cx.state().parse_san(&line) {
            Ok(m) => {
                cx.set(keys::MOVE, Value::Move(m.clone()));
                return Ok(Value::Move(m));
            }
            Err(_) => writeln!(stdout, "Invalid Move")?,
        }
    }
}

/// Terminating step of every move-selection pipeline: yields the chosen
/// move, or `Null` when the position offered none.
pub fn extract_move(cx: &mut Analysis) -> Result<Value, StepError> {
    Ok(cx
        .get_move(keys::MOVE)
        .map(Value::Move)
        .unwrap_or(Value::Null))
}

#[cfg(test)]
#[path = "steps_tests.rs"]
mod steps_tests;
