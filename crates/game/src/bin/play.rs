//! Play one game between two configured players in the terminal.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chess_analysis::{
    engine_handle, position_analysis, position_analysis_without_eval, EngineHandle, NullEngine,
    Pipeline,
};
use game_runner::{
    model_display_name, play_game, write_history, write_pgn, GameConfig, PipelinePlayer,
    TerminalRenderer,
};
use stockfish_engine::{StockfishEngine, DEFAULT_DEPTH};

/// Player specification: engine, random, human, or model:<weights.json>.
#[derive(Parser)]
#[command(about = "Play one chess game between two configured players")]
struct Args {
    /// White player: engine | random | human | model:<path>
    #[arg(long, default_value = "human")]
    white: String,

    /// Black player: engine | random | human | model:<path>
    #[arg(long, default_value = "engine")]
    black: String,

    /// Opening moves in SAN, applied before the players take over
    #[arg(long, value_delimiter = ',')]
    opening: Vec<String>,

    /// Path to the Stockfish binary
    #[arg(long, default_value = "stockfish")]
    stockfish: String,

    /// Stockfish search depth
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth: u32,

    /// Ply limit before the game is scored a draw
    #[arg(long, default_value_t = 512)]
    max_plies: usize,

    /// PGN output path
    #[arg(long, default_value = "game.pgn")]
    pgn: PathBuf,

    /// Analysis history output path
    #[arg(long, default_value = "analysis.txt")]
    analysis: PathBuf,
}

struct PlayerFactory {
    stockfish_path: String,
    depth: u32,
    // One Stockfish process serves every engine-driven consumer in the game.
    stockfish: Option<EngineHandle>,
}

impl PlayerFactory {
    fn stockfish_handle(&mut self) -> Result<EngineHandle> {
        if let Some(handle) = &self.stockfish {
            return Ok(handle.clone());
        }
        let engine = StockfishEngine::new(&self.stockfish_path, self.depth)
            .with_context(|| format!("starting stockfish from '{}'", self.stockfish_path))?;
        let handle = engine_handle(engine);
        self.stockfish = Some(handle.clone());
        Ok(handle)
    }

    fn build(&mut self, spec: &str, side: &str) -> Result<PipelinePlayer> {
        if let Some(path) = spec.strip_prefix("model:") {
            let path = PathBuf::from(path);
            let name = format!("{} ({side})", model_display_name(&path));
            let player = PipelinePlayer::model_player(&name, &path)
                .with_context(|| format!("loading model weights from '{}'", path.display()))?;
            return Ok(player);
        }
        let name = format!("{spec} ({side})");
        match spec {
            "engine" => Ok(PipelinePlayer::engine_player(
                &name,
                self.stockfish_handle()?,
            )),
            "random" => Ok(PipelinePlayer::random_player(&name)),
            "human" => Ok(PipelinePlayer::human_player(&name)),
            other => bail!("unknown player spec '{other}' (engine | random | human | model:<path>)"),
        }
    }

    /// The analysis pipeline evaluates with Stockfish when a process is
    /// already running, and skips evaluation otherwise.
    fn analysis_pipeline(&self) -> Pipeline {
        match &self.stockfish {
            Some(handle) => position_analysis(handle.clone()),
            None => position_analysis_without_eval(engine_handle(NullEngine)),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let mut factory = PlayerFactory {
        stockfish_path: args.stockfish.clone(),
        depth: args.depth,
        stockfish: None,
    };
    let mut white = factory.build(&args.white, "white")?;
    let mut black = factory.build(&args.black, "black")?;
    let mut analysis = factory.analysis_pipeline();

    let config = GameConfig {
        initial_moves: args.opening.clone(),
        max_plies: args.max_plies,
    };
    let game = play_game(
        &mut white,
        &mut black,
        &mut analysis,
        &mut TerminalRenderer,
        &config,
    )?;

    println!("{} vs {}: {}", game.white, game.black, game.result);
    write_pgn(&args.pgn, &game, "Casual Game")
        .with_context(|| format!("writing {}", args.pgn.display()))?;
    write_history(&args.analysis, &game)
        .with_context(|| format!("writing {}", args.analysis.display()))?;
    println!(
        "saved {} and {}",
        args.pgn.display(),
        args.analysis.display()
    );
    Ok(())
}
