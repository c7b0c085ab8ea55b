use std::path::Path;

use log::debug;

use crate::{
    definition::{parse_definitions, Definition},
    malformed,
    scanner::Scanner,
    scanner_config::{LineEnding, ScannerConfig},
    DefinitionID, LexGenError, LexGenErrorKind, Result,
};

/// A scanner builder is used to build a scanner.
///
/// Every pattern is compiled when its definition is added, so configure `verbose` before
/// adding definitions.
#[derive(Debug, Default)]
pub struct ScannerBuilder {
    /// The compiled definitions in declaration order.
    definitions: Vec<Definition>,
    /// The configuration handed over to the scanner.
    config: ScannerConfig,
}

impl ScannerBuilder {
    /// Creates a new scanner builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles the pattern and adds it as the definition with the next declaration index.
    pub fn add_definition(&mut self, token_type: &str, pattern: &str) -> Result<DefinitionID> {
        let id = DefinitionID::new(self.definitions.len());
        let definition = Definition::compile(id, token_type, pattern, self.config.verbose)
            .map_err(|err| match *err.source {
                LexGenErrorKind::MalformedPattern { pattern, reason } => malformed!(
                    pattern,
                    format!("definition #{} '{}': {}", id, token_type, reason)
                ),
                kind => LexGenError::new(kind),
            })?;
        self.definitions.push(definition);
        Ok(id)
    }

    /// Adds `(token type, pattern)` pairs in order.
    /// On error the definitions before the failing one stay added.
    pub fn add_definitions<T, P>(&mut self, definitions: &[(T, P)]) -> Result<()>
    where
        T: AsRef<str>,
        P: AsRef<str>,
    {
        for (token_type, pattern) in definitions {
            self.add_definition(token_type.as_ref(), pattern.as_ref())?;
        }
        Ok(())
    }

    /// Adds the definitions of a definitions text with one `TYPE pattern` per line.
    pub fn add_definitions_from_str(&mut self, input: &str) -> Result<()> {
        let definitions = parse_definitions(input)?;
        debug!("Adding {} definitions", definitions.len());
        self.add_definitions(&definitions)
    }

    /// Reads and adds the definitions of a definitions file.
    pub fn add_definitions_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        debug!("Reading definitions from {}", path.as_ref().display());
        let input = std::fs::read_to_string(path)?;
        self.add_definitions_from_str(&input)
    }

    /// Sets the line ending policy used for row and column numbers.
    pub fn line_ending(&mut self, line_ending: LineEnding) -> &mut Self {
        self.config.line_ending = line_ending;
        self
    }

    /// Sets the number of characters a single match attempt may read ahead.
    /// A capacity of 0 is raised to 1, the least a scanner needs to read any character.
    pub fn lookahead_capacity(&mut self, capacity: usize) -> &mut Self {
        self.config.lookahead_capacity = capacity.max(1);
        self
    }

    /// Logs the intermediate results of the compilation of all definitions added
    /// afterwards.
    pub fn verbose(&mut self, verbose: bool) -> &mut Self {
        self.config.verbose = verbose;
        self
    }

    /// Builds the scanner from the scanner builder.
    pub fn build(self) -> Scanner {
        Scanner::new(self.definitions, self.config)
    }
}
