//! Generate a board and print the givens and the solution.
//!
//! ```sh
//! cargo run --example generate -- [DIMENSION] [SEED]
//! ```

use quadoku_core::Generator;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let dimension = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(9);
    let seed: Option<u64> = args.next().and_then(|arg| arg.parse().ok());

    let mut generator = match seed {
        Some(seed) => Generator::with_seed(seed),
        None => Generator::new(),
    };

    match generator.generate(dimension) {
        Ok(puzzle) => {
            println!("Givens ({} placed):", puzzle.givens.placed_count());
            println!("{}", puzzle.givens);
            println!("Solution:");
            println!("{}", puzzle.solution);
        }
        Err(err) => {
            eprintln!("generation failed: {err}");
            std::process::exit(1);
        }
    }
}
