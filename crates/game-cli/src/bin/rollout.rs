use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use game_cli::config::BOARD_SIZES;
use game_cli::session::{GameSession, Phase};
use grid_engine::engine::Move;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;

// Decorrelates the move-picking stream from the tile-spawning stream,
// which is seeded with the plain game seed.
const POLICY_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Parser, Debug)]
#[command(
    name = "rollout",
    about = "Play many random-policy games in parallel and report aggregate statistics."
)]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: u64,

    /// Board side length (3-9)
    #[arg(long, default_value_t = 4)]
    size: usize,

    /// Base RNG seed; game i runs with seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stop a game after this many effective moves
    #[arg(long)]
    max_steps: Option<u64>,

    /// Worker threads (defaults to all cores)
    #[arg(long)]
    jobs: Option<usize>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

struct GameStats {
    steps: u64,
    score: u64,
    highest_tile: u32,
    won: bool,
}

fn play_one(size: usize, seed: u64, max_steps: Option<u64>) -> GameStats {
    let mut session = GameSession::new(size, seed);
    let mut policy = StdRng::seed_from_u64(seed ^ POLICY_SEED_SALT);
    let mut steps: u64 = 0;

    while !session.is_over() {
        if let Some(limit) = max_steps {
            if steps >= limit {
                break;
            }
        }
        let dir = Move::ALL[policy.gen_range(0..4)];
        if session.apply(dir) {
            steps += 1;
        }
    }

    GameStats {
        steps,
        score: session.score(),
        highest_tile: session.grid().highest_tile(),
        won: session.phase() == Phase::Won,
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    anyhow::ensure!(
        BOARD_SIZES.contains(&args.size),
        "size must be between {} and {}",
        BOARD_SIZES.start(),
        BOARD_SIZES.end()
    );
    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()?;
    }

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(args.games);
        pb.set_style(ProgressStyle::with_template(
            "{bar:40} {pos}/{len} games ({elapsed_precise})",
        )?);
        pb
    };

    info!(
        "rolling out {} games on a {}x{} board, base seed {}",
        args.games, args.size, args.size, args.seed
    );

    let results: Vec<GameStats> = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let stats = play_one(args.size, args.seed + i, args.max_steps);
            pb.inc(1);
            stats
        })
        .collect();
    pb.finish_and_clear();

    let games = results.len() as u64;
    let wins = results.iter().filter(|r| r.won).count();
    let total_score: u64 = results.iter().map(|r| r.score).sum();
    let total_steps: u64 = results.iter().map(|r| r.steps).sum();
    let best_score = results.iter().map(|r| r.score).max().unwrap_or(0);
    let best_tile = results.iter().map(|r| r.highest_tile).max().unwrap_or(0);

    println!(
        "Games: {} | Wins: {} | Mean score: {:.1} | Best score: {} | Mean steps: {:.1} | Best tile: {}",
        games,
        wins,
        total_score as f64 / games.max(1) as f64,
        best_score,
        total_steps as f64 / games.max(1) as f64,
        best_tile
    );
    Ok(())
}
