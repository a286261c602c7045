//! Tournament CLI
//!
//! Run a round-robin tournament between configured players, growing the
//! analysis dataset and printing W-L-D standings.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chess_analysis::{
    engine_handle, position_analysis, position_analysis_without_eval, EngineHandle, NullEngine,
    Pipeline,
};
use game_runner::{model_display_name, PipelinePlayer};
use stockfish_engine::{StockfishEngine, DEFAULT_DEPTH};
use tournament::{run_tournament, TournamentConfig};

#[derive(Parser)]
#[command(about = "Run a round-robin tournament between configured players")]
struct Args {
    /// Optional TOML config file; CLI flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma-separated player specs: engine | random | model:<path>
    #[arg(long, value_delimiter = ',', default_value = "engine,random")]
    players: Vec<String>,

    /// Full round-robin passes
    #[arg(long)]
    rounds: Option<u32>,

    /// Games per pairing per round
    #[arg(long)]
    games_per_round: Option<u32>,

    /// Random opening plies per game
    #[arg(long)]
    opening_plies: Option<usize>,

    /// Ply limit per game
    #[arg(long)]
    max_plies: Option<usize>,

    /// Dataset CSV output path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Path to the Stockfish binary
    #[arg(long, default_value = "stockfish")]
    stockfish: String,

    /// Stockfish search depth
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth: u32,

    /// Standings JSON output path
    #[arg(long, default_value = "tournament_standings.json")]
    standings: PathBuf,
}

fn load_config(args: &Args) -> Result<TournamentConfig> {
    let mut config = match &args.config {
        Some(path) => TournamentConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => TournamentConfig::default(),
    };
    if let Some(rounds) = args.rounds {
        config.rounds = rounds;
    }
    if let Some(games) = args.games_per_round {
        config.games_per_round = games;
    }
    if let Some(plies) = args.opening_plies {
        config.opening_plies = plies;
    }
    if let Some(max) = args.max_plies {
        config.max_plies = max;
    }
    if let Some(csv) = &args.csv {
        config.csv_path = csv.clone();
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();
    let config = load_config(&args)?;

    let mut stockfish: Option<EngineHandle> = None;
    let mut stockfish_handle = || -> Result<EngineHandle> {
        if let Some(handle) = &stockfish {
            return Ok(handle.clone());
        }
        let engine = StockfishEngine::new(&args.stockfish, args.depth)
            .with_context(|| format!("starting stockfish from '{}'", args.stockfish))?;
        let handle = engine_handle(engine);
        stockfish = Some(handle.clone());
        Ok(handle)
    };

    let mut players = Vec::new();
    for spec in &args.players {
        let player = if let Some(path) = spec.strip_prefix("model:") {
            let path = PathBuf::from(path);
            PipelinePlayer::model_player(&model_display_name(&path), &path)
                .with_context(|| format!("loading model weights from '{}'", path.display()))?
        } else {
            match spec.as_str() {
                "engine" => PipelinePlayer::engine_player(spec, stockfish_handle()?),
                "random" => PipelinePlayer::random_player(spec),
                other => bail!("unknown player spec '{other}' (engine | random | model:<path>)"),
            }
        };
        players.push(player);
    }

    // Dataset rows carry an engine evaluation only when a Stockfish process
    // is already part of the tournament.
    let mut analysis: Pipeline = match &stockfish {
        Some(handle) => position_analysis(handle.clone()),
        None => position_analysis_without_eval(engine_handle(NullEngine)),
    };

    let results = run_tournament(&players, &mut analysis, &config)?;
    results.print_report();
    results
        .save(&args.standings)
        .with_context(|| format!("writing {}", args.standings.display()))?;
    println!(
        "dataset: {}\nstandings: {}",
        config.csv_path.display(),
        args.standings.display()
    );
    Ok(())
}
