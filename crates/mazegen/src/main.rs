//! Dungeon generator command line
//!
//! Builds a stack of maze levels from a JSON config or from flags and prints
//! each level as a piece map, or the whole dungeon as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use strum::IntoEnumIterator;

use mz_core::dungeon::ConnectivityMode;
use mz_core::generation::GenerationStrategy;
use mz_core::{
    Dungeon, DungeonConfig, GameRng, LevelConfig, RecordingRenderer, SizeRange, StrategyKind,
    build_dungeon,
};

/// Multi-level maze dungeon generator
#[derive(Parser, Debug)]
#[command(name = "mazegen")]
#[command(author, version, about = "Generate stitched maze dungeons", long_about = None)]
struct Args {
    /// JSON dungeon config; level flags below are ignored when given
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// RNG seed (overrides the config file)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Number of levels
    #[arg(short = 'n', long = "levels", default_value_t = 3)]
    levels: u32,

    /// Grid width in cells
    #[arg(long = "width", default_value_t = mz_core::DEFAULT_WIDTH)]
    width: i32,

    /// Grid height in cells
    #[arg(long = "height", default_value_t = mz_core::DEFAULT_HEIGHT)]
    height: i32,

    /// Rooms carved into each level
    #[arg(short = 'r', long = "rooms", default_value_t = mz_core::DEFAULT_NUM_ROOMS)]
    rooms: u32,

    /// Smallest room side
    #[arg(long = "room-min", default_value_t = mz_core::DEFAULT_ROOM_MIN)]
    room_min: i32,

    /// Largest room side
    #[arg(long = "room-max", default_value_t = mz_core::DEFAULT_ROOM_MAX)]
    room_max: i32,

    /// Generation strategy (see --list-strategies)
    #[arg(short = 'g', long = "strategy", default_value = "recursive_backtracker")]
    strategy: String,

    /// Join corridors with one A* path instead of digging from the edges
    #[arg(long = "path-carver")]
    path_carver: bool,

    /// Wall cells added around each level
    #[arg(long = "padding", default_value_t = 0)]
    padding: i32,

    /// Print the dungeon as JSON
    #[arg(long = "json")]
    json: bool,

    /// List generation strategies and exit
    #[arg(long = "list-strategies")]
    list_strategies: bool,

    /// Debug logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("mazegen: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    if args.list_strategies {
        for kind in StrategyKind::iter() {
            println!("{kind}");
        }
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => DungeonConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => config_from_flags(args)?,
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut rng = match config.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };
    log::info!("seed {}", rng.seed());

    let mut renderer = RecordingRenderer::new();
    let dungeon = build_dungeon(&config, &mut rng, &mut renderer)
        .with_context(|| format!("generation failed with seed {}", rng.seed()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&dungeon).context("failed to encode dungeon")?;
        println!("{json}");
    } else {
        print_dungeon(&dungeon, rng.seed(), &renderer);
    }
    Ok(())
}

fn config_from_flags(args: &Args) -> Result<DungeonConfig> {
    let strategy = StrategyKind::from_name(&args.strategy).ok_or_else(|| {
        anyhow!(
            "unknown strategy '{}', expected one of: {}",
            args.strategy,
            StrategyKind::names().join(", ")
        )
    })?;
    let connectivity = if args.path_carver {
        ConnectivityMode::PathCarver
    } else {
        ConnectivityMode::EdgeDig
    };

    let template = LevelConfig {
        width: args.width,
        height: args.height,
        num_rooms: args.rooms,
        room_size: SizeRange::new(args.room_min, args.room_max),
        strategy,
        connectivity,
        padding: args.padding,
        ..LevelConfig::default()
    };
    Ok(DungeonConfig::uniform(args.levels, &template))
}

fn print_dungeon(dungeon: &Dungeon, seed: u64, renderer: &RecordingRenderer) {
    println!("seed: {seed}");
    for (index, level) in dungeon.levels.iter().enumerate() {
        let config = level.config();
        println!();
        println!(
            "level {index}: {}x{} {} offset {}",
            level.width(),
            level.height(),
            config.strategy.name(),
            config.offset()
        );
        if let Some(report) = level.connectivity() {
            let gaps = report.disconnected_edges();
            if gaps.is_empty() {
                println!("  connectivity: {} (carved {})", report.mode, report.carved);
            } else {
                let gaps: Vec<String> = gaps.iter().map(ToString::to_string).collect();
                println!(
                    "  connectivity: {} (carved {}, unconnected: {})",
                    report.mode,
                    report.carved,
                    gaps.join(", ")
                );
            }
        }
        print!("{}", level.piece_map());
    }

    println!();
    for report in &dungeon.stitches {
        let stairs: Vec<String> = report
            .outcome
            .stairs()
            .iter()
            .map(|s| format!("{} -> {}", s.from, s.to))
            .collect();
        println!(
            "levels {}-{}: {} [{}]",
            report.lower,
            report.upper,
            report.outcome,
            stairs.join(", ")
        );
    }
    println!(
        "{} stairs, {} visuals live",
        dungeon.stair_count(),
        renderer.live_count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_strategy_lists_names() {
        let args = Args::try_parse_from(["mazegen", "--strategy", "zigzag"]).unwrap();
        let err = config_from_flags(&args).unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("unknown strategy 'zigzag'"));
        assert!(text.contains("recursive_backtracker"));
    }

    #[test]
    fn test_missing_config_names_file() {
        let args =
            Args::try_parse_from(["mazegen", "--config", "/nonexistent/levels.json"]).unwrap();
        let err = run(&args).unwrap_err();
        assert_eq!(err.to_string(), "failed to load /nonexistent/levels.json");
        assert!(format!("{err:#}").contains("could not read config"));
    }

    #[test]
    fn test_flags_build_uniform_levels() {
        let args = Args::try_parse_from(["mazegen", "-n", "2", "--padding", "1", "--path-carver"])
            .unwrap();
        let config = config_from_flags(&args).unwrap();
        assert_eq!(config.levels.len(), 2);
        assert_eq!(config.levels[1].padding, 1);
        assert_eq!(config.levels[0].connectivity, ConnectivityMode::PathCarver);
    }
}
