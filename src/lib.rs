#![forbid(missing_docs)]
//! The `lexgen` crate provides a lexer generator engine.
//! Token definitions are given as pairs of a token type and a regular expression. Every pattern
//! is compiled into a DFA via an expression tree and a Thompson NFA. The resulting scanner splits
//! its input into tokens by maximal munch and recovers from lexical errors.
//!
//! ```
//! use lexgen::ScannerBuilder;
//!
//! let mut builder = ScannerBuilder::new();
//! builder.add_definition("KEYWORD", "if").unwrap();
//! builder.add_definition("ID", "[az][az]*").unwrap();
//! builder.add_definition("WHITESPACE", " ").unwrap();
//! let scanner = builder.build();
//!
//! let output = scanner.tokenize_str("if iffy").unwrap();
//! let types = output.tokens.iter().map(|t| t.token_type.as_str()).collect::<Vec<_>>();
//! assert_eq!(types, vec!["KEYWORD", "WHITESPACE", "ID"]);
//! ```

/// Module with error definitions
mod errors;
pub use errors::{LexGenError, LexGenErrorKind, Result};

/// Module that provides types for integer ids that can also be used to index into slices.
mod ids;
pub use ids::{DefinitionID, StateID};

/// Printable representations of characters and strings.
mod escape;
pub use escape::{char_representation, escape, unescape};

/// The parser module contains the tokenizer and the normalization of patterns.
mod parser;
pub use parser::{escape_pattern, unescape_pattern, Regex, RegexToken, RegexTokenKind};

/// Conversion of a normalized pattern to postfix notation.
mod postfix;

/// The expression tree of a pattern.
mod tree;
pub use tree::{ExprNode, ExprTree};

/// The nfa module contains the NFA implementation.
mod nfa;
pub use nfa::{Nfa, StateSet};

/// The module containing the conversions from the expression tree to the NFA.
mod thompson;

/// The dfa module contains the DFA implementation and the subset construction.
mod dfa;
pub use dfa::{Dfa, DfaRun};

/// Token type definitions.
mod definition;
pub use definition::{parse_definitions, Definition};

/// The lookahead buffer of the scanner.
mod buffer;

/// Tokens and lexical errors.
mod token;
pub use token::{LexToken, LexicalError, ScanOutput};

/// The scanner configuration.
mod scanner_config;
pub use scanner_config::{LineEnding, ScannerConfig, DEFAULT_LOOKAHEAD_CAPACITY};

/// The maximal munch scanner.
mod scanner;
pub use scanner::Scanner;

/// The builder of the scanner.
mod scanner_builder;
pub use scanner_builder::ScannerBuilder;

/// Module with conversion to graphviz dot format
#[cfg(feature = "dot")]
mod dot;
#[cfg(feature = "dot")]
pub use dot::{dfa_render, nfa_render};
