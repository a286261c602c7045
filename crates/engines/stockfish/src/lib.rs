//! Stockfish engine wrapper using the UCI protocol
//!
//! Spawns one Stockfish process per engine instance and drives it over
//! stdin/stdout. Each bound position is searched once to a fixed depth; the
//! score and best move from that search answer both `evaluate` and
//! `best_move`. UCI reports scores from the side to move, so they are
//! flipped to the white-positive convention here.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use thiserror::Error;
use tracing::debug;

use chess_analysis::{EngineError, EvalEngine, RawScore};

pub const DEFAULT_DEPTH: u32 = 12;

#[derive(Debug, Error)]
pub enum StockfishError {
    #[error("failed to spawn stockfish at {path}: {source}")]
    Spawn {
        path: String,
        source: std::io::Error,
    },
    #[error("stockfish i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("stockfish protocol error: {0}")]
    Protocol(String),
}

impl From<StockfishError> for EngineError {
    fn from(err: StockfishError) -> Self {
        match err {
            StockfishError::Spawn { .. } | StockfishError::Io(_) => {
                EngineError::Process(err.to_string())
            }
            StockfishError::Protocol(msg) => EngineError::Protocol(msg),
        }
    }
}

/// Outcome of one fixed-depth search, already in white-positive polarity.
#[derive(Debug, Clone)]
struct SearchResult {
    score: RawScore,
    best_move: Option<String>,
}

/// A single Stockfish process speaking UCI.
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    depth: u32,
    fen: Option<String>,
    search: Option<SearchResult>,
}

impl StockfishEngine {
    /// Spawns a Stockfish process and completes the UCI handshake.
    pub fn new(path: &str, depth: u32) -> Result<Self, StockfishError> {
        let mut process = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| StockfishError::Spawn {
                path: path.to_string(),
                source,
            })?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| StockfishError::Protocol("stdin not captured".into()))?;
        let stdout = process
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| StockfishError::Protocol("stdout not captured".into()))?;

        let mut engine = Self {
            process,
            stdin,
            stdout,
            depth,
            fen: None,
            search: None,
        };

        engine.send("uci")?;
        engine.wait_for("uciok")?;
        engine.send("setoption name Threads value 1")?;
        engine.send("isready")?;
        engine.wait_for("readyok")?;

        Ok(engine)
    }

    fn send(&mut self, cmd: &str) -> Result<(), StockfishError> {
        debug!(cmd, "SF <");
        self.stdin.write_all(cmd.as_bytes())?;
        self.stdin.write_all(b"\n")?;
        self.stdin.flush()?;
        Ok(())
    }

    fn read_line(&mut self, line: &mut String) -> Result<(), StockfishError> {
        line.clear();
        if self.stdout.read_line(line)? == 0 {
            return Err(StockfishError::Protocol("engine closed its output".into()));
        }
        debug!(line = line.trim(), "SF >");
        Ok(())
    }

    fn wait_for(&mut self, expected: &str) -> Result<(), StockfishError> {
        let mut line = String::new();
        loop {
            self.read_line(&mut line)?;
            if line.trim() == expected {
                return Ok(());
            }
        }
    }

    /// Runs the fixed-depth search for the bound position, once. Subsequent
    /// calls for the same position reuse the cached result.
    fn ensure_search(&mut self) -> Result<SearchResult, StockfishError> {
        if let Some(result) = &self.search {
            return Ok(result.clone());
        }
        let fen = self
            .fen
            .clone()
            .ok_or_else(|| StockfishError::Protocol("no position bound".into()))?;

        self.send(&format!("position fen {fen}"))?;
        self.send(&format!("go depth {}", self.depth))?;

        // The last score before bestmove belongs to the deepest completed
        // iteration.
        let mut score = None;
        let mut line = String::new();
        let best_move = loop {
            self.read_line(&mut line)?;
            let trimmed = line.trim();
            if trimmed.starts_with("info") {
                if let Some(cp) = parse_cp(trimmed) {
                    score = Some(RawScore::Cp(cp));
                }
                if let Some(mate) = parse_mate(trimmed) {
                    score = Some(RawScore::Mate(mate));
                }
            } else if trimmed.starts_with("bestmove") {
                break parse_bestmove(trimmed);
            }
        };

        let score = score
            .ok_or_else(|| StockfishError::Protocol("no score before bestmove".into()))?;
        let result = SearchResult {
            score: to_white_pov(score, black_to_move(&fen)),
            best_move,
        };
        self.search = Some(result.clone());
        Ok(result)
    }
}

impl EvalEngine for StockfishEngine {
    fn set_position(&mut self, fen: &str) -> Result<(), EngineError> {
        self.fen = Some(fen.to_string());
        self.search = None;
        Ok(())
    }

    fn evaluate(&mut self) -> Result<RawScore, EngineError> {
        Ok(self.ensure_search()?.score)
    }

    fn best_move(&mut self) -> Result<Option<String>, EngineError> {
        Ok(self.ensure_search()?.best_move)
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        let _ = self.send("quit");
        let _ = self.process.wait();
    }
}

/// Whether the FEN's side-to-move field says black moves next.
fn black_to_move(fen: &str) -> bool {
    fen.split_whitespace().nth(1) == Some("b")
}

/// Flips a side-to-move score into the white-positive convention.
fn to_white_pov(score: RawScore, black_to_move: bool) -> RawScore {
    if !black_to_move {
        return score;
    }
    match score {
        RawScore::Cp(cp) => RawScore::Cp(-cp),
        RawScore::Mate(mate) => RawScore::Mate(-mate),
    }
}

/// Parse a centipawn score from a UCI info line.
fn parse_cp(line: &str) -> Option<i32> {
    let mut parts = line.split_whitespace();
    while let Some(part) = parts.next() {
        if part == "cp" {
            return parts.next()?.parse().ok();
        }
    }
    None
}

/// Parse a mate distance from a UCI info line.
fn parse_mate(line: &str) -> Option<i32> {
    let mut parts = line.split_whitespace();
    while let Some(part) = parts.next() {
        if part == "mate" {
            return parts.next()?.parse().ok();
        }
    }
    None
}

/// Parse the move out of a bestmove line; "(none)" means no move exists.
fn parse_bestmove(line: &str) -> Option<String> {
    let mv = line.split_whitespace().nth(1)?;
    if mv == "(none)" {
        None
    } else {
        Some(mv.to_string())
    }
}
