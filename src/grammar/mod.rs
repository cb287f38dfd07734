/*
    This module is for storing and looking up grammars
*/

use std::collections::HashMap;
use std::path::PathBuf;

use rand::seq::SliceRandom;
use rand::Rng;

// The symbols in a single alternative. Any symbol without a production is a
// terminal.
pub type Alternative = Vec<String>;

// The alternatives of a rewrite rule
pub type Rewrite = Vec<Alternative>;

#[derive(Debug, PartialEq, Clone)]
pub struct Production {
    pub alternatives: Rewrite,
    // Line of the first definition, for diagnostics
    pub line: usize
}

impl Production {
    /// Picks one alternative uniformly at random. A production without any
    /// alternatives rewrites to nothing.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &[String] {
        self.alternatives
            .choose(rng)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Grammar {
    pub file: PathBuf,
    pub rules: HashMap<String, Production>,
}

impl Grammar {
    pub fn new(file: PathBuf) -> Self {
        Grammar {
            file,
            rules: HashMap::new()
        }
    }

    /// Appends alternatives to `symbol`, creating its production if this is
    /// the first line defining it. Repeated definitions accumulate.
    pub fn extend(&mut self, symbol: String, rewrite: Rewrite, line: usize) {
        self.rules
            .entry(symbol)
            .or_insert_with(|| Production {
                alternatives: Vec::new(),
                line
            })
            .alternatives
            .extend(rewrite);
    }

    // None means the symbol is a terminal
    pub fn lookup(&self, symbol: &str) -> Option<&Production> {
        self.rules.get(symbol)
    }
}
