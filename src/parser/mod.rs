/*
    This module parses grammar files of the form `LHS -> RHS | RHS ...`
*/

mod lexer;

use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::grammar::*;
use crate::error_handling::*;
use itertools::Itertools;
use lexer::*;

#[derive(Debug)]
pub enum FormatErrorType {
    // A rule line has no `->`
    MissingSeparator,
    // A rule line has more than one `->`
    UnexpectedSeparator,
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for FormatErrorType {}

impl PartialEq for FormatErrorType {
    fn eq(&self, other: &Self) -> bool {
        if let FormatErrorType::FileError(a) = self {
            if let FormatErrorType::FileError(b) = other {
                return a.kind() == b.kind();
            }
        }
        return std::mem::discriminant(self) == std::mem::discriminant(other);
    }
}

impl Display for FormatErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatErrorType::MissingSeparator => write!(f, "Expected `->` between nonterminal and rewrite"),
            FormatErrorType::UnexpectedSeparator => write!(f, "Unexpected second `->` encountered"),
            FormatErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type GrammarFormatError = Error<FormatErrorType>;
pub type GrammarFormatErrors = Errors<FormatErrorType>;

fn io_error(error: std::io::Error, file: &Path) -> GrammarFormatError {
    GrammarFormatError {
        location: Location::file(file.to_path_buf()),
        error: FormatErrorType::FileError(error)
    }
}

pub type Result<T> = std::result::Result<T, FormatErrorType>;
pub type LineResult<T> = std::result::Result<T, GrammarFormatError>;
pub type FileResult<T> = std::result::Result<T, GrammarFormatErrors>;

#[derive(PartialEq, Debug)]
struct Rule {
    symbol: String,
    rewrite: Rewrite,
    line: usize
}

fn parse_alternative(tokens: &[Token]) -> Alternative {
    tokens.iter().filter_map(|t| match t {
        Token::Symbol(s) => Some(s.clone()),
        _ => None
    }).collect()
}

// An empty right side still has one (empty) alternative
fn parse_rewrite(tokens: &[Token]) -> Rewrite {
    tokens.split(|t| *t == Token::Or).map(parse_alternative).collect()
}

// The left side is taken as written, so `big dog -> a` defines `big dog`
fn parse_line(text: &str, line: usize) -> Result<Rule> {
    let (lhs, rhs) = split_rule(text)?;
    let rewrite = parse_rewrite(&lexer::lex_line(rhs)?);

    return Ok(Rule {
        symbol: lhs.trim().to_string(),
        rewrite,
        line
    });
}

fn parse_lex_line(text: &str, location: Location) -> LineResult<Rule> {
    parse_line(text, location.line)
        .map_err(|error| GrammarFormatError { location, error })
}

// Returns an iterator over the numbered rule lines of a source, with comments
// and surrounding whitespace removed and io errors wrapped
fn rule_lines<'a, R: BufRead + 'a>(source: R, path: &'a Path) -> impl Iterator<Item = (usize, LineResult<String>)> + 'a {
    source
        .lines()
        .map(move |line| {
            line.map(|text| strip_comment(text.trim()).trim().to_string())
                .map_err(|e| io_error(e, path))
        })
        .enumerate()
        .filter(|(_, line)| line.as_ref().map_or(true, |text| !text.is_empty()))
        .map(|(num, line)| (num + 1, line))
}

fn grammar_from_rules(rules: Vec<Rule>, path: &Path) -> Grammar {
    let mut grammar = Grammar::new(path.to_path_buf());
    for rule in rules {
        grammar.extend(rule.symbol, rule.rewrite, rule.line);
    }
    grammar
}

fn parse_reader<'a, R: Read + 'a>(source: R, path: &'a Path) -> FileResult<Grammar> {
    let parsed_lines = rule_lines(BufReader::new(source), path).map(|(num, line_res)| {
        line_res.and_then(|line| parse_lex_line(&line, Location {
            file: path.to_path_buf(),
            line: num
        }))
    });

    let (rules, errors): (Vec<_>, Vec<_>) = parsed_lines.partition_result();
    if !errors.is_empty() {
        return Err(errors);
    }
    log::debug!("Parsed {} rule lines from {}", rules.len(), path.display());

    return Ok(grammar_from_rules(rules, path));
}

/// Parses grammar text that did not come from disk. `path` is only used to
/// locate errors.
pub fn parse_source(source: &str, path: &Path) -> FileResult<Grammar> {
    parse_reader(source.as_bytes(), path)
}

/// Loads a grammar file, reporting every malformed line.
pub fn load_grammar(path: &Path) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path)])?;
    let grammar = parse_reader(file, path)?;
    log::info!("Loaded {} nonterminals from {}", grammar.rules.len(), path.display());
    Ok(grammar)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::path::PathBuf;

    use super::*;

    fn alternative(symbols: &[&str]) -> Alternative {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    fn parse(text: &str) -> FileResult<Grammar> {
        parse_source(text, Path::new("test.grammar"))
    }

    fn alternatives<'a>(grammar: &'a Grammar, symbol: &str) -> &'a Rewrite {
        &grammar.lookup(symbol).unwrap().alternatives
    }

    #[test]
    fn parse_normal_line() {
        let answer = Rule {
            symbol: "NP".to_string(),
            rewrite: vec![
                alternative(&["Art", "N"]),
                alternative(&["Art", "Adj", "N"])
            ],
            line: 4
        };

        assert_eq!(parse_line("NP -> Art N | Art Adj N", 4), Ok(answer));
    }

    #[test]
    fn parse_empty_alternatives() {
        let rule = parse_line("NP -> Art N |", 1).unwrap();
        assert_eq!(rule.rewrite, vec![alternative(&["Art", "N"]), alternative(&[])]);

        let rule = parse_line("Nothing ->", 1).unwrap();
        assert_eq!(rule.rewrite, vec![alternative(&[])]);

        let rule = parse_line("Adj -> | |", 1).unwrap();
        assert_eq!(rule.rewrite.len(), 3);
    }

    #[test]
    fn parse_left_side_as_written() {
        let rule = parse_line("big dog -> b", 1).unwrap();
        assert_eq!(rule.symbol, "big dog");

        let rule = parse_line("-> a", 1).unwrap();
        assert_eq!(rule.symbol, "");
        assert_eq!(rule.rewrite, vec![alternative(&["a"])]);

        let rule = parse_line("x | y -> z", 1).unwrap();
        assert_eq!(rule.symbol, "x | y");

        let grammar = parse("S -> a\nbig dog -> b\n").unwrap();
        assert_eq!(grammar.rules.len(), 2);
        assert_eq!(alternatives(&grammar, "big dog"), &vec![alternative(&["b"])]);
    }

    #[test]
    fn parse_malformed_line() {
        // Missing arrow
        assert_eq!(parse_line("alpha bravo charlie", 1), Err(FormatErrorType::MissingSeparator));

        // Two arrows
        assert_eq!(parse_line("alpha -> bravo -> charlie", 1), Err(FormatErrorType::UnexpectedSeparator));
        assert_eq!(parse_line("a->b->", 1), Err(FormatErrorType::UnexpectedSeparator));
    }

    #[test]
    fn repeated_nonterminals_accumulate() {
        let grammar = parse("
            S -> NP VP
            NP -> Art N | N
            S -> S and S
            NP -> Art Adj N
        ").unwrap();

        let nonterminals: HashSet<&str> = grammar.rules.keys().map(String::as_str).collect();
        assert_eq!(nonterminals, HashSet::from(["S", "NP"]));
        assert_eq!(alternatives(&grammar, "S").len(), 2);
        assert_eq!(alternatives(&grammar, "NP"), &vec![
            alternative(&["Art", "N"]),
            alternative(&["N"]),
            alternative(&["Art", "Adj", "N"])
        ]);
        assert_eq!(grammar.lookup("NP").unwrap().line, 3);
    }

    #[test]
    fn comments_and_blank_lines() {
        let grammar = parse("
            # a whole-line comment

            S -> a b # trailing comment
               # indented comment
        ").unwrap();

        assert_eq!(grammar.rules.len(), 1);
        assert_eq!(alternatives(&grammar, "S"), &vec![alternative(&["a", "b"])]);
    }

    #[test]
    fn comment_marker_inside_symbol_ends_line() {
        let grammar = parse("Lang -> C#sharp | rust").unwrap();
        assert_eq!(alternatives(&grammar, "Lang"), &vec![alternative(&["C"])]);

        // A `#` before the arrow leaves a line without a separator
        let errors = parse("Note#1 -> a").unwrap_err();
        assert_eq!(errors[0].error, FormatErrorType::MissingSeparator);
    }

    #[test]
    fn reports_every_malformed_line() {
        let errors = parse("
            S -> NP VP
            NP Art N
            VP -> barks -> loudly
        ").unwrap_err();

        let path = PathBuf::from("test.grammar");
        assert_eq!(errors, vec![
            GrammarFormatError {
                location: Location { file: path.clone(), line: 3 },
                error: FormatErrorType::MissingSeparator
            },
            GrammarFormatError {
                location: Location { file: path, line: 4 },
                error: FormatErrorType::UnexpectedSeparator
            }
        ]);
    }

    #[test]
    fn parse_normal_file() {
        let path = PathBuf::from("example_data/english.grammar");
        let grammar = load_grammar(&path).unwrap();

        let nonterminals: HashSet<&str> = grammar.rules.keys().map(String::as_str).collect();
        assert_eq!(nonterminals, HashSet::from([
            "S", "NP", "VP", "PP", "Art", "Adj", "N", "V", "P"
        ]));
        assert_eq!(alternatives(&grammar, "S").len(), 2);
        assert_eq!(alternatives(&grammar, "NP").len(), 3);
        assert_eq!(alternatives(&grammar, "Adj").len(), 4);
        assert_eq!(alternatives(&grammar, "PP"), &vec![alternative(&["P", "NP"])]);
        assert!(alternatives(&grammar, "Adj").contains(&alternative(&[])));
    }

    #[test]
    fn load_is_idempotent() {
        let path = PathBuf::from("example_data/english.grammar");
        assert_eq!(load_grammar(&path).unwrap(), load_grammar(&path).unwrap());
    }

    #[test]
    fn parse_malformed_file() {
        let path = PathBuf::from("example_data/malformed.grammar");
        let errors = load_grammar(&path).unwrap_err();

        assert_eq!(errors, vec![
            GrammarFormatError {
                location: Location { file: path.clone(), line: 4 },
                error: FormatErrorType::MissingSeparator
            },
            GrammarFormatError {
                location: Location { file: path, line: 6 },
                error: FormatErrorType::UnexpectedSeparator
            }
        ]);
    }

    #[test]
    fn missing_file() {
        let path = PathBuf::from("example_data/does_not_exist.grammar");
        let errors = load_grammar(&path).unwrap_err();

        assert_eq!(errors, vec![GrammarFormatError {
            location: Location::file(path),
            error: FormatErrorType::FileError(std::io::ErrorKind::NotFound.into())
        }]);
    }
}
