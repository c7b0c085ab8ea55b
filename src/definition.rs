//! Token type definitions and the loader for definitions files.

use std::time::Instant;

use log::{debug, trace};

use crate::{
    dfa::Dfa, nfa::Nfa, parser::Regex, tree::ExprTree, DefinitionID, LexGenError,
    LexGenErrorKind, Result,
};

/// The separator between the token type and the pattern in a definitions file.
const SEPARATOR: char = ' ';

/// A token type together with the DFA that recognizes its lexemes.
///
/// The id of a definition is its declaration order. When several definitions match a
/// lexeme of the same length the one with the lowest id wins.
#[derive(Debug, Clone)]
pub struct Definition {
    id: DefinitionID,
    token_type: String,
    pattern: String,
    dfa: Dfa,
}

impl Definition {
    /// Compiles the pattern into a DFA.
    ///
    /// With `verbose` the intermediate results of every compilation step are logged at debug
    /// level.
    pub fn compile(
        id: DefinitionID,
        token_type: &str,
        pattern: &str,
        verbose: bool,
    ) -> Result<Self> {
        let now = Instant::now();

        let regex = Regex::new(pattern)?;
        let tree = ExprTree::new(&regex)?;
        let nfa: Nfa = (&tree).try_into()?;
        let dfa: Dfa = (&nfa).try_into()?;

        if verbose {
            debug!("Token Type: {}", token_type);
            debug!("Regex: {}", regex);
            debug!("Regex Tree:\n{}", tree);
            debug!("NFA:\n{}", nfa);
            debug!("DFA:\n{}", dfa);
        }
        trace!(
            "Compiling definition #{} '{}' took {} microseconds.",
            id,
            token_type,
            now.elapsed().as_micros()
        );

        Ok(Definition {
            id,
            token_type: token_type.to_string(),
            pattern: pattern.to_string(),
            dfa,
        })
    }

    /// The declaration index.
    pub fn id(&self) -> DefinitionID {
        self.id
    }

    /// The name of the token type.
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// The pattern as it was given.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The compiled DFA.
    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }
}

/// Splits the lines of a definitions text into `(token type, pattern)` pairs.
///
/// The token type ends at the first space, the rest of the line is the pattern. Blank lines
/// are skipped.
pub fn parse_definitions(input: &str) -> Result<Vec<(String, String)>> {
    let mut definitions = Vec::new();
    for (index, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let invalid = |reason: &str| {
            LexGenError::new(LexGenErrorKind::InvalidDefinition {
                line: index + 1,
                reason: reason.to_string(),
            })
        };
        let (token_type, pattern) = line
            .split_once(SEPARATOR)
            .ok_or_else(|| invalid("line does not contain a separator"))?;
        if token_type.is_empty() {
            return Err(invalid("missing token type"));
        }
        definitions.push((token_type.to_string(), pattern.to_string()));
    }
    Ok(definitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_definitions() {
        let input = "KEYWORD if\nWHITESPACE ( |\t)*\n\nID [az]([az]|[09])*\n";
        let definitions = parse_definitions(input).unwrap();
        assert_eq!(
            definitions,
            vec![
                ("KEYWORD".to_string(), "if".to_string()),
                ("WHITESPACE".to_string(), "( |\t)*".to_string()),
                ("ID".to_string(), "[az]([az]|[09])*".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_definitions_errors() {
        let err = parse_definitions("A a\nBROKEN\n").unwrap_err();
        assert!(matches!(
            err.kind(),
            LexGenErrorKind::InvalidDefinition { line: 2, .. }
        ));
        let err = parse_definitions(" a").unwrap_err();
        assert!(matches!(
            err.kind(),
            LexGenErrorKind::InvalidDefinition { line: 1, .. }
        ));
    }

    #[test]
    fn test_compile_definition() {
        let definition = Definition::compile(DefinitionID::new(3), "NUM", "[09][09]*", true).unwrap();
        assert_eq!(definition.id().as_usize(), 3);
        assert_eq!(definition.token_type(), "NUM");
        assert_eq!(definition.pattern(), "[09][09]*");
        assert_eq!(definition.dfa().alphabet().len(), 10);
    }

    #[test]
    fn test_inverted_range_produces_no_definition() {
        let err = Definition::compile(DefinitionID::new(0), "ID", "[za]", false).unwrap_err();
        assert!(matches!(
            err.kind(),
            LexGenErrorKind::MalformedPattern { .. }
        ));
    }
}
