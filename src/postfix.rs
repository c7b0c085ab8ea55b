//! Conversion of the normalized infix token sequence into postfix order.

use crate::{
    malformed,
    parser::{Regex, RegexToken, RegexTokenKind},
    Result,
};

fn precedence(kind: RegexTokenKind) -> u8 {
    match kind {
        RegexTokenKind::BOpen => 1,
        RegexTokenKind::Union => 2,
        RegexTokenKind::Concat => 3,
        RegexTokenKind::Closure => 4,
        _ => 0,
    }
}

/// Converts the normalized tokens of the regex into postfix order with the shunting-yard
/// algorithm.
///
/// The closure operator is unary postfix and therefore goes directly to the output.
/// An opening parenthesis acts as a barrier that only the matching closing one removes.
pub fn to_postfix(regex: &Regex) -> Result<Vec<RegexToken>> {
    let mut postfix = Vec::with_capacity(regex.normalized_tokens().len());
    let mut stack: Vec<RegexToken> = Vec::new();

    for token in regex.normalized_tokens() {
        if token.is_operand() {
            postfix.push(*token);
            continue;
        }
        match token.kind() {
            RegexTokenKind::BOpen => stack.push(*token),
            RegexTokenKind::BClose => loop {
                match stack.pop() {
                    Some(top) if top.kind() == RegexTokenKind::BOpen => break,
                    Some(top) => postfix.push(top),
                    None => return Err(malformed!(regex.raw(), "unmatched ')'")),
                }
            },
            RegexTokenKind::Closure => postfix.push(*token),
            RegexTokenKind::Union | RegexTokenKind::Concat => {
                while let Some(top) = stack.last() {
                    if precedence(top.kind()) >= precedence(token.kind()) {
                        postfix.push(*top);
                        stack.pop();
                    } else {
                        break;
                    }
                }
                stack.push(*token);
            }
            _ => {
                return Err(malformed!(
                    regex.raw(),
                    format!("unexpected '{}'", token.value())
                ))
            }
        }
    }

    while let Some(top) = stack.pop() {
        if top.kind() == RegexTokenKind::BOpen {
            return Err(malformed!(regex.raw(), "unmatched '('"));
        }
        postfix.push(top);
    }
    Ok(postfix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tokens_to_string;

    fn postfix_of(pattern: &str) -> String {
        let regex = Regex::new(pattern).unwrap();
        tokens_to_string(&to_postfix(&regex).unwrap())
    }

    #[test]
    fn test_to_postfix() {
        assert_eq!(postfix_of("a|b"), "ab|");
        assert_eq!(postfix_of("ab|c"), "ab.c|");
        assert_eq!(postfix_of("a|bc"), "abc.|");
        assert_eq!(postfix_of("a*a"), "a*a.");
        assert_eq!(postfix_of("(a|b)*abb"), "ab|*a.b.b.");
        assert_eq!(postfix_of("abc"), "ab.c.");
    }

    #[test]
    fn test_unmatched_parentheses() {
        assert!(to_postfix(&Regex::new("(ab").unwrap()).is_err());
        assert!(to_postfix(&Regex::new("ab)").unwrap()).is_err());
    }
}
