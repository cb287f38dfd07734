/*
    This module generates sentences and parse trees
*/

mod tree;

use rand::Rng;
use std::fmt::Display;
use std::io::Write;

use crate::grammar::*;
use crate::error_handling::*;
use itertools::Itertools;

pub use tree::ParseTree;

// Width used when pretty printing trees
pub const TREE_WIDTH: usize = 80;

#[derive(Debug, PartialEq)]
pub enum GenerateErrorType {
    // A derivation got deeper than the configured limit
    RecursionLimit { symbol: String, limit: usize },
}

impl ErrorType for GenerateErrorType {}

impl Display for GenerateErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateErrorType::RecursionLimit { symbol, limit } => write!(f, "Recursion limit of {} exceeded while expanding `{}`", limit, symbol),
        }
    }
}

pub type GenerateError = Error<GenerateErrorType>;
pub type GenResult<T> = Result<T, GenerateError>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    // Deepest expansion allowed, the start symbol's expansion being depth 1
    pub max_depth: usize
}

impl Default for Limits {
    fn default() -> Self {
        Limits { max_depth: 100_000 }
    }
}

fn recursion_error(grammar: &Grammar, symbol: &str, production: &Production, limits: &Limits) -> GenerateError {
    GenerateError {
        location: Location {
            file: grammar.file.clone(),
            line: production.line
        },
        error: GenerateErrorType::RecursionLimit {
            symbol: symbol.to_string(),
            limit: limits.max_depth
        }
    }
}

/// Rewrites every symbol of `symbols` left to right into terminals.
pub fn rewrite_sequence<R: Rng + ?Sized>(grammar: &Grammar, symbols: &[String], limits: &Limits, rng: &mut R) -> GenResult<Vec<String>> {
    let mut tokens = Vec::new();

    // One iterator per expansion in progress, with the input sequence at the
    // bottom, so the stack length is the depth of the next expansion
    let mut stack = vec![symbols.iter()];
    while let Some(pending) = stack.last_mut() {
        let Some(symbol) = pending.next() else {
            stack.pop();
            continue;
        };

        match grammar.lookup(symbol) {
            None => tokens.push(symbol.clone()),
            Some(production) => {
                if stack.len() > limits.max_depth {
                    return Err(recursion_error(grammar, symbol, production, limits));
                }
                stack.push(production.choose(rng).iter());
            }
        }
    }

    Ok(tokens)
}

/// Rewrites a single symbol into terminals. A terminal rewrites to itself.
pub fn rewrite<R: Rng + ?Sized>(grammar: &Grammar, symbol: &str, limits: &Limits, rng: &mut R) -> GenResult<Vec<String>> {
    rewrite_sequence(grammar, &[symbol.to_string()], limits, rng)
}

/// Generates one sentence from `start`, with tokens joined by spaces.
pub fn generate<R: Rng + ?Sized>(grammar: &Grammar, start: &str, limits: &Limits, rng: &mut R) -> GenResult<String> {
    Ok(rewrite(grammar, start, limits, rng)?.iter().join(" "))
}

// A nonterminal whose chosen alternative is still being expanded
struct Frame<'g> {
    symbol: &'g str,
    pending: std::slice::Iter<'g, String>,
    children: Vec<ParseTree>
}

impl<'g> Frame<'g> {
    fn new(symbol: &'g str, alternative: &'g [String]) -> Self {
        Frame {
            symbol,
            pending: alternative.iter(),
            children: Vec::new()
        }
    }

    fn into_tree(self) -> ParseTree {
        ParseTree::Node(self.symbol.to_string(), self.children)
    }
}

/// Like `rewrite`, but keeps the derivation as a parse tree. Random choices are
/// made in the same order as `rewrite`, so both agree for the same source.
pub fn rewrite_tree<R: Rng + ?Sized>(grammar: &Grammar, symbol: &str, limits: &Limits, rng: &mut R) -> GenResult<ParseTree> {
    let Some(production) = grammar.lookup(symbol) else {
        return Ok(ParseTree::Leaf(symbol.to_string()));
    };
    if limits.max_depth == 0 {
        return Err(recursion_error(grammar, symbol, production, limits));
    }

    let mut root = Frame::new(symbol, production.choose(rng));
    let mut stack: Vec<Frame> = Vec::new();
    loop {
        // The frame being filled in sits at depth `stack.len() + 1`
        let depth = stack.len() + 1;
        let frame = stack.last_mut().unwrap_or(&mut root);

        match frame.pending.next() {
            Some(child) => match grammar.lookup(child) {
                None => frame.children.push(ParseTree::Leaf(child.clone())),
                Some(production) => {
                    if depth + 1 > limits.max_depth {
                        return Err(recursion_error(grammar, child, production, limits));
                    }
                    stack.push(Frame::new(child, production.choose(rng)));
                }
            },
            None => match stack.pop() {
                Some(done) => {
                    let tree = done.into_tree();
                    stack.last_mut().unwrap_or(&mut root).children.push(tree);
                }
                None => return Ok(root.into_tree()),
            },
        }
    }
}

/// Rewrites every symbol of `symbols` into its own parse tree.
pub fn rewrite_tree_sequence<R: Rng + ?Sized>(grammar: &Grammar, symbols: &[String], limits: &Limits, rng: &mut R) -> GenResult<Vec<ParseTree>> {
    symbols.iter()
        .map(|symbol| rewrite_tree(grammar, symbol, limits, rng))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Sentence,
    Tree
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub start: String,
    pub mode: Mode,
    pub count: usize,
    pub limits: Limits
}

/// Writes `request.count` outputs to `out`, one per line (trees may span
/// several). A generation that hits the recursion limit is reported in place
/// of its output and the rest still run. Returns how many outputs failed.
pub fn generate_outputs<R: Rng + ?Sized, W: Write>(grammar: &Grammar, request: &Request, rng: &mut R, out: &mut W) -> std::io::Result<usize> {
    let mut failures = 0;
    for _ in 0..request.count {
        let output = match request.mode {
            Mode::Sentence => generate(grammar, &request.start, &request.limits, rng),
            Mode::Tree => rewrite_tree(grammar, &request.start, &request.limits, rng)
                .map(|tree| tree.pretty(TREE_WIDTH)),
        };

        match output {
            Ok(text) => writeln!(out, "{}", text)?,
            Err(error) => {
                log::warn!("Generation from `{}` failed: {}", request.start, error.error);
                failures += 1;
                writeln!(out, "{}", error.plain())?;
            }
        }
    }

    log::info!("Generated {} of {} outputs", request.count - failures, request.count);
    Ok(failures)
}
