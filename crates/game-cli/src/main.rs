use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use game_cli::config::{Config, BOARD_SIZES};
use game_cli::session::{GameSession, Phase};
use grid_engine::engine::Move;
use log::info;

#[derive(Parser, Debug)]
#[command(
    name = "play",
    about = "Interactive variable-size 2048 in the terminal."
)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Board side length (3-9); overrides the config file
    #[arg(long)]
    size: Option<usize>,

    /// RNG seed for a reproducible game; overrides the config file
    #[arg(long)]
    seed: Option<u64>,
}

enum Command {
    Dir(Move),
    New,
    Size(usize),
    Help,
    Quit,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => Config::from_toml(path)?,
        None => Config::default(),
    };
    if let Some(size) = args.size {
        cfg.board_size = size;
    }
    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }
    cfg.validate()?;

    let mut session = match cfg.seed {
        Some(seed) => GameSession::new(cfg.board_size, seed),
        None => GameSession::from_entropy(cfg.board_size),
    };
    info!(
        "starting {}x{} board (seed: {})",
        cfg.board_size,
        cfg.board_size,
        cfg.seed.map_or_else(|| "entropy".into(), |s| s.to_string())
    );

    print_help();
    render(&session);

    let stdin = io::stdin();
    prompt()?;
    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        match parse_command(&line) {
            Some(Command::Dir(dir)) => {
                if session.is_over() {
                    println!("Game over. Start a new game with 'new'.");
                } else if session.apply(dir) {
                    render(&session);
                    match session.phase() {
                        Phase::Won => println!("You reached 2048!"),
                        Phase::Lost => println!("No moves left, game over."),
                        Phase::Playing => {}
                    }
                }
            }
            Some(Command::New) => {
                session.reset(session.size());
                println!("New game.");
                render(&session);
            }
            Some(Command::Size(size)) => {
                if BOARD_SIZES.contains(&size) {
                    session.reset(size);
                    println!("New {}x{} game.", size, size);
                    render(&session);
                } else {
                    println!(
                        "Board size must be between {} and {}.",
                        BOARD_SIZES.start(),
                        BOARD_SIZES.end()
                    );
                }
            }
            Some(Command::Help) => print_help(),
            Some(Command::Quit) => break,
            None => println!("Unknown command; 'h' lists the commands."),
        }
        prompt()?;
    }
    Ok(())
}

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let head = words.next()?;
    match head.to_ascii_lowercase().as_str() {
        "w" | "up" => Some(Command::Dir(Move::Up)),
        "s" | "down" => Some(Command::Dir(Move::Down)),
        "a" | "left" => Some(Command::Dir(Move::Left)),
        "d" | "right" => Some(Command::Dir(Move::Right)),
        "new" => Some(Command::New),
        "size" => words.next()?.parse().ok().map(Command::Size),
        "h" | "help" | "?" => Some(Command::Help),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

fn render(session: &GameSession) {
    println!("{}", session.grid());
    println!("Score: {}", session.score());
}

fn prompt() -> Result<()> {
    print!("> ");
    io::stdout().flush().context("failed to flush stdout")?;
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  w/a/s/d or up/left/down/right  move tiles");
    println!("  new                            restart on the current board size");
    println!("  size <n>                       restart on an n-by-n board (3-9)");
    println!("  h                              show this help");
    println!("  q                              quit");
}
