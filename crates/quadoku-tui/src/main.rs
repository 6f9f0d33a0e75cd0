mod app;
mod render;

use clap::Parser;

/// Terminal quadoku: randomly generated boards with a guaranteed unique
/// solution, at any perfect-square dimension.
#[derive(Debug, Parser)]
#[command(name = "quadoku", version, about)]
pub struct Args {
    /// Board dimension; must be a perfect square (falls back to 9 otherwise).
    #[arg(long, default_value_t = 9)]
    pub dimension: usize,

    /// Incorrect guesses allowed before the game is lost.
    #[arg(long, default_value_t = 1000)]
    pub misses: u32,

    /// Hints available.
    #[arg(long, default_value_t = 1000)]
    pub hints: u32,

    /// Seed for reproducible boards.
    #[arg(long)]
    pub seed: Option<u64>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = app::run(&args) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
