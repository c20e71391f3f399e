/// Behavior statement and term syntax trees.
pub mod ast;
/// Re-exports from the diagnostics crate.
pub mod diag;
/// Behavior lexer: tokenizes one line into borrowed tokens.
pub mod lexer;
/// Token-boundary search used to place diagnostics.
pub mod locate;
/// Line classifier, statement parsers and the term parser.
pub mod parser;
