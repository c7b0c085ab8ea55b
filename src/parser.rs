//! This module contains the tokenizer for the pattern syntax.
//! A pattern is split into regex tokens, range blocks are expanded into unions of
//! characters and the implicit concatenation is made explicit, so that the token sequence
//! can be converted into postfix order.

use crate::{malformed, Result};

/// The special characters of the pattern syntax.
pub(crate) const BCLOSE: char = ')';
pub(crate) const BOPEN: char = '(';
pub(crate) const CLOSURE: char = '*';
pub(crate) const CONCAT: char = '.';
pub(crate) const EPSILON: char = 'ε';
pub(crate) const ESCAPE: char = '\\';
pub(crate) const RANGECLOSE: char = ']';
pub(crate) const RANGEOPEN: char = '[';
pub(crate) const UNION: char = '|';

const SPECIAL_CHARS: [char; 9] = [
    BCLOSE, BOPEN, CLOSURE, CONCAT, EPSILON, ESCAPE, RANGECLOSE, RANGEOPEN, UNION,
];

/// Returns true if the character has a special meaning in a pattern.
pub fn is_special_char(c: char) -> bool {
    SPECIAL_CHARS.contains(&c)
}

/// The kind of a regex token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegexTokenKind {
    /// A literal character.
    Char,
    /// The empty string.
    Epsilon,
    /// Alternation `|`.
    Union,
    /// Concatenation, either explicit `.` or inserted between juxtaposed operands.
    Concat,
    /// Kleene star `*`.
    Closure,
    /// `(`
    BOpen,
    /// `)`
    BClose,
    /// `[`
    RangeOpen,
    /// `]`
    RangeClose,
}

/// A token of the pattern syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegexToken {
    kind: RegexTokenKind,
    value: char,
}

impl RegexToken {
    /// Creates a literal character token.
    pub fn char(value: char) -> Self {
        RegexToken {
            kind: RegexTokenKind::Char,
            value,
        }
    }

    /// Creates the token for an operator or another special character.
    pub(crate) fn special(kind: RegexTokenKind) -> Self {
        let value = match kind {
            RegexTokenKind::Char => unreachable!("a literal is not a special character"),
            RegexTokenKind::Epsilon => EPSILON,
            RegexTokenKind::Union => UNION,
            RegexTokenKind::Concat => CONCAT,
            RegexTokenKind::Closure => CLOSURE,
            RegexTokenKind::BOpen => BOPEN,
            RegexTokenKind::BClose => BCLOSE,
            RegexTokenKind::RangeOpen => RANGEOPEN,
            RegexTokenKind::RangeClose => RANGECLOSE,
        };
        RegexToken { kind, value }
    }

    fn from_special_char(c: char) -> Option<Self> {
        let kind = match c {
            EPSILON => RegexTokenKind::Epsilon,
            UNION => RegexTokenKind::Union,
            CONCAT => RegexTokenKind::Concat,
            CLOSURE => RegexTokenKind::Closure,
            BOPEN => RegexTokenKind::BOpen,
            BCLOSE => RegexTokenKind::BClose,
            RANGEOPEN => RegexTokenKind::RangeOpen,
            RANGECLOSE => RegexTokenKind::RangeClose,
            _ => return None,
        };
        Some(RegexToken::special(kind))
    }

    /// The kind of the token.
    pub fn kind(&self) -> RegexTokenKind {
        self.kind
    }

    /// The character of the token.
    pub fn value(&self) -> char {
        self.value
    }

    /// Operands are the leaves of the expression tree.
    pub fn is_operand(&self) -> bool {
        matches!(self.kind, RegexTokenKind::Char | RegexTokenKind::Epsilon)
    }

    // A token after which a concatenation may follow.
    fn completes_operand(&self) -> bool {
        matches!(
            self.kind,
            RegexTokenKind::Char
                | RegexTokenKind::Epsilon
                | RegexTokenKind::BClose
                | RegexTokenKind::Closure
        )
    }

    // A token that can start the right operand of a concatenation.
    fn starts_operand(&self) -> bool {
        matches!(
            self.kind,
            RegexTokenKind::Char | RegexTokenKind::Epsilon | RegexTokenKind::BOpen
        )
    }
}

/// A tokenized pattern.
#[derive(Debug, Clone)]
pub struct Regex {
    raw: String,
    tokens: Vec<RegexToken>,
    normalized_tokens: Vec<RegexToken>,
}

impl Regex {
    /// Tokenizes the pattern, expands the range blocks and inserts the implicit
    /// concatenations.
    pub fn new(pattern: &str) -> Result<Self> {
        let tokens = expand_ranges(pattern, tokenize(pattern)?)?;
        let normalized_tokens = normalize(pattern, &tokens)?;
        Ok(Regex {
            raw: pattern.to_string(),
            tokens,
            normalized_tokens,
        })
    }

    /// The pattern as it was given.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The tokens after range expansion.
    pub fn tokens(&self) -> &[RegexToken] {
        &self.tokens
    }

    /// The tokens with explicit concatenation operators.
    pub fn normalized_tokens(&self) -> &[RegexToken] {
        &self.normalized_tokens
    }

    /// The normalized tokens as pattern text.
    pub fn normalized(&self) -> String {
        tokens_to_string(&self.normalized_tokens)
    }
}

impl std::fmt::Display for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.normalized())
    }
}

/// Splits the pattern into regex tokens.
pub fn tokenize(pattern: &str) -> Result<Vec<RegexToken>> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            let escaped = chars
                .next()
                .ok_or_else(|| malformed!(pattern, "dangling escape character at the end"))?;
            tokens.push(RegexToken::char(escaped));
        } else if let Some(token) = RegexToken::from_special_char(c) {
            tokens.push(token);
        } else {
            tokens.push(RegexToken::char(c));
        }
    }
    Ok(tokens)
}

/// Replaces every range block `[lohi...]` by a parenthesized union of all characters in the
/// ranges.
pub fn expand_ranges(pattern: &str, tokens: Vec<RegexToken>) -> Result<Vec<RegexToken>> {
    let mut expanded = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter();
    while let Some(token) = iter.next() {
        match token.kind() {
            RegexTokenKind::RangeOpen => {}
            RegexTokenKind::RangeClose => {
                return Err(malformed!(pattern, "range block closed but never opened"))
            }
            _ => {
                expanded.push(token);
                continue;
            }
        }

        let mut block = Vec::new();
        loop {
            match iter.next() {
                Some(t) if t.kind() == RegexTokenKind::RangeClose => break,
                Some(t) if t.kind() == RegexTokenKind::Char => block.push(t.value()),
                Some(t) => {
                    return Err(malformed!(
                        pattern,
                        format!("unexpected '{}' inside a range block", t.value())
                    ))
                }
                None => return Err(malformed!(pattern, "unterminated range block")),
            }
        }
        if block.is_empty() {
            return Err(malformed!(pattern, "empty range block"));
        }
        if block.len() % 2 != 0 {
            return Err(malformed!(
                pattern,
                "range block must contain pairs of characters"
            ));
        }

        expanded.push(RegexToken::special(RegexTokenKind::BOpen));
        for pair in block.chunks_exact(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if hi < lo {
                return Err(malformed!(
                    pattern,
                    format!("range end '{}' falls before range start '{}'", hi, lo)
                ));
            }
            for c in lo..=hi {
                expanded.push(RegexToken::char(c));
                expanded.push(RegexToken::special(RegexTokenKind::Union));
            }
        }
        // Replace the trailing union by the closing bracket
        expanded.pop();
        expanded.push(RegexToken::special(RegexTokenKind::BClose));
    }
    Ok(expanded)
}

/// Inserts a concatenation operator between every pair of juxtaposed operands.
pub fn normalize(pattern: &str, tokens: &[RegexToken]) -> Result<Vec<RegexToken>> {
    let Some(first) = tokens.first() else {
        return Err(malformed!(pattern, "empty pattern"));
    };
    let mut normalized = Vec::with_capacity(tokens.len() * 2);
    normalized.push(*first);
    for pair in tokens.windows(2) {
        let (left, right) = (pair[0], pair[1]);
        if left.completes_operand() && right.starts_operand() {
            normalized.push(RegexToken::special(RegexTokenKind::Concat));
        }
        normalized.push(right);
    }
    Ok(normalized)
}

/// Converts tokens back to pattern text. Literal special characters are escaped.
pub fn tokens_to_string(tokens: &[RegexToken]) -> String {
    let mut text = String::with_capacity(tokens.len());
    for token in tokens {
        if token.kind() == RegexTokenKind::Char && is_special_char(token.value()) {
            text.push(ESCAPE);
        }
        text.push(token.value());
    }
    text
}

/// Escapes all special characters of the text so that the resulting pattern matches the
/// text literally.
pub fn escape_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if is_special_char(c) {
            escaped.push(ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Removes the escape characters added by [`escape_pattern`].
pub fn unescape_pattern(pattern: &str) -> String {
    let mut text = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            if let Some(escaped) = chars.next() {
                text.push(escaped);
                continue;
            }
        }
        text.push(c);
    }
    text
}
