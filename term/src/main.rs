use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use sweeper_core::Verdict;

use command::{Command, CommandError};
use session::{Response, Session};
use store::FileStore;

mod command;
mod render;
mod session;
mod store;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board side length, at least 8
    #[arg(short = 'n', long, default_value_t = 8)]
    size: usize,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Where the saved game is kept
    #[arg(long, default_value = "minesweeper.json")]
    save_file: PathBuf,
}

fn clock_seed() -> u64 {
    Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64
}

fn accepts(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let seed = args.seed.unwrap_or_else(clock_seed);
    log::debug!("seed: {}", seed);

    let store = FileStore::new(args.save_file);
    let mut session = Session::new(args.size, seed, store).context("Could not start a game")?;

    let mut lines = io::stdin().lock().lines();
    let mut stdout = io::stdout();
    println!("{}", session.render());
    if session.has_saved_game(Utc::now()) {
        println!("A saved game is available, `l` loads it.");
    }

    loop {
        print!("> ");
        stdout.flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };
        log::debug!("command: {:?}", command);

        match session.execute(command, Utc::now()) {
            Response::Board => println!("{}", session.render()),
            Response::Message(message) => println!("{}", message),
            Response::Finished(verdict) => {
                println!("{}", session.render());
                match verdict {
                    Verdict::Won => println!("CONGRATULATIONS! You cleared the board."),
                    Verdict::Lost => println!("GAME OVER!"),
                }
                print!("New game? [y/N] ");
                stdout.flush()?;
                let answer = lines.next().transpose()?.unwrap_or_default();
                session.conclude(accepts(&answer));
                println!("{}", session.render());
            }
            Response::Quit => break,
        }
    }

    Ok(())
}
