use thiserror::Error;

use crate::escape::escape;

/// A lexeme recognized by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LexToken {
    /// The sequence number of the token, starting at 0.
    pub id: usize,
    /// The 1-based row of the first character of the lexeme.
    pub row: usize,
    /// The 1-based column of the first character of the lexeme.
    pub col: usize,
    /// The name of the token type.
    pub token_type: String,
    /// The matched text.
    pub lexeme: String,
}

impl LexToken {
    /// The heading of a token listing matching the `Display` output of the tokens.
    pub fn heading() -> String {
        format!("{:>5} {:>5} {:>5} {:<15}{}", "ID", "ROW", "COL", "TYPE", "LEXEME")
    }
}

impl std::fmt::Display for LexToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:>5} {:>5} {:>5} {:<15}{}",
            self.id,
            self.row,
            self.col,
            self.token_type,
            escape(&self.lexeme)
        )
    }
}

/// A span of the input no definition matches.
///
/// Lexical errors don't stop the scanner. The span is skipped and scanning continues
/// after it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
#[error("Invalid match @ row {row} col {col}: {}", escape(.text))]
pub struct LexicalError {
    /// The 1-based row of the first character of the span.
    pub row: usize,
    /// The 1-based column of the first character of the span.
    pub col: usize,
    /// The skipped text.
    pub text: String,
}

/// The result of a tokenize call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutput {
    /// The tokens in input order.
    pub tokens: Vec<LexToken>,
    /// The lexical errors in input order.
    pub errors: Vec<LexicalError>,
}

impl ScanOutput {
    /// Removes all tokens of the given type, e.g. whitespace.
    /// The ids of the remaining tokens are kept.
    pub fn without_type(mut self, token_type: &str) -> Self {
        self.tokens.retain(|token| token.token_type != token_type);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_listing() {
        let token = LexToken {
            id: 7,
            row: 2,
            col: 13,
            token_type: "STRING".to_string(),
            lexeme: "\"a\tb\"".to_string(),
        };
        assert_eq!(
            LexToken::heading(),
            "   ID   ROW   COL TYPE           LEXEME"
        );
        assert_eq!(
            token.to_string(),
            "    7     2    13 STRING         \"a\\tb\""
        );
    }

    #[test]
    fn test_lexical_error_display() {
        let error = LexicalError {
            row: 3,
            col: 1,
            text: "\u{1}#".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid match @ row 3 col 1: \\u0001#");
    }
}
