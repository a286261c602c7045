//! Result export: PGN, analysis history text, CSV rows
//!
//! All writers are plain single-threaded formatting over a finished game's
//! history; the CSV layout is the feature column set plus the evaluation and
//! any caller-supplied identifier columns.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chess_analysis::{PositionSummary, FEATURE_COLUMNS};

use crate::FinishedGame;

/// PGN text for one finished game: Event/White/Black/Result headers and the
/// SAN movetext terminated by the result token.
pub fn pgn_string(game: &FinishedGame, event: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("[Event \"{event}\"]\n"));
    out.push_str(&format!("[White \"{}\"]\n", game.white));
    out.push_str(&format!("[Black \"{}\"]\n", game.black));
    out.push_str(&format!("[Result \"{}\"]\n\n", game.result));

    for (i, san) in game.moves.iter().enumerate() {
        if i % 2 == 0 {
            out.push_str(&format!("{}. ", i / 2 + 1));
        }
        out.push_str(san);
        // Line breaks every four full moves keep the movetext readable.
        if i % 8 == 7 {
            out.push('\n');
        } else {
            out.push(' ');
        }
    }
    out.push_str(game.result.as_str());
    out.push('\n');
    out
}

pub fn write_pgn(path: &Path, game: &FinishedGame, event: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(pgn_string(game, event).as_bytes())
}

/// Plain-text per-move analysis history: one block per position with the
/// producing move, FEN, and the headline differentials.
pub fn history_text(game: &FinishedGame) -> String {
    let mut out = String::new();
    out.push_str(&"=".repeat(50));
    out.push('\n');
    out.push_str("POSITION ANALYSIS HISTORY\n");
    out.push_str(&"=".repeat(50));
    out.push('\n');

    for entry in &game.history {
        let last_move = entry.last_move.as_deref().unwrap_or("Starting position");
        out.push_str(&format!("\nMove {}: {last_move}\n", entry.move_number));
        out.push_str(&format!("FEN: {}\n", entry.fen));
        let s = &entry.summary;
        out.push_str(&format!("Material: {:+.1}\n", s.material as f64));
        out.push_str(&format!("Development: {:+.1}\n", s.development));
        out.push_str(&format!("Mobility: {:+.1}\n", s.mobility as f64));
        out.push_str(&format!("Evaluation: {:+.1}\n", s.eval.unwrap_or(0.0)));
    }
    out
}

pub fn write_history(path: &Path, game: &FinishedGame) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(history_text(game).as_bytes())
}

/// CSV header: the feature columns, the evaluation, then the caller's
/// identifier columns.
pub fn csv_header(extra_columns: &[&str]) -> String {
    let mut columns: Vec<&str> = FEATURE_COLUMNS.to_vec();
    columns.push("eval");
    columns.extend_from_slice(extra_columns);
    columns.join(",")
}

/// One CSV row for an analyzed position. An absent evaluation serializes as
/// an empty field.
pub fn csv_row(summary: &PositionSummary, extra_values: &[String]) -> String {
    let mut fields: Vec<String> = summary
        .feature_vector()
        .iter()
        .map(|v| v.to_string())
        .collect();
    fields.push(summary.eval.map(|e| e.to_string()).unwrap_or_default());
    fields.extend_from_slice(extra_values);
    fields.join(",")
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod export_tests;
