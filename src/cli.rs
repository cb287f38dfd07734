use std::path::PathBuf;

use clap::Parser;

use crate::generator::{Limits, Mode, Request};

#[derive(Parser, Debug)]
#[command(version, about = "Generate random sentences from a grammar")]
pub struct Cli {
    /// File containing the grammar
    #[arg(short, long, value_name = "PATH")]
    pub grammar: PathBuf,

    /// Print parse trees rather than sentences
    #[arg(short, long)]
    pub tree: bool,

    /// Start symbol
    #[arg(short, long, value_name = "SYMBOL", default_value = "S")]
    pub start: String,

    /// Amount to generate
    #[arg(short = 'n', long, value_name = "AMOUNT", default_value_t = 1)]
    pub count: usize,

    /// Deepest derivation allowed before a generation is abandoned
    #[arg(short = 'd', long, value_name = "DEPTH", default_value_t = Limits::default().max_depth)]
    pub max_depth: usize,

    /// Seed for reproducible output (default: random)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>
}

impl Cli {
    pub fn request(&self) -> Request {
        Request {
            start: self.start.clone(),
            mode: if self.tree { Mode::Tree } else { Mode::Sentence },
            count: self.count,
            limits: Limits { max_depth: self.max_depth }
        }
    }
}
