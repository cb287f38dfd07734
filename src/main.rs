mod cli;
mod error_handling;
mod generator;
mod grammar;
mod parser;

use std::process::ExitCode;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> ExitCode {
    env_logger::init();
    let cli = cli::Cli::parse();

    let grammar = match parser::load_grammar(&cli.grammar) {
        Ok(grammar) => grammar,
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            return ExitCode::FAILURE;
        }
    };

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy()
    };

    let stdout = std::io::stdout();
    if let Err(e) = generator::generate_outputs(&grammar, &cli.request(), &mut rng, &mut stdout.lock()) {
        log::error!("Could not write output: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
