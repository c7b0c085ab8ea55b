//! The maximal munch scanner.
//!
//! All definitions are advanced in parallel over the input. The scanner keeps reading as
//! long as at least one DFA is alive and remembers which definitions accept at each
//! position. When every DFA died, it backtracks to the longest accepted prefix, emits it as
//! a token and rescans the rest.

use std::io::BufRead;

use log::{trace, warn};

use crate::{
    buffer::{CharReader, LookaheadBuffer},
    definition::Definition,
    dfa::DfaRun,
    scanner_config::{LineEnding, ScannerConfig},
    token::{LexToken, LexicalError, ScanOutput},
    DefinitionID, Result,
};

/// A scanner that splits its input into tokens.
///
/// A scanner is created with the [`crate::ScannerBuilder`]. Its compiled DFAs are never
/// modified, so one scanner can tokenize any number of inputs.
#[derive(Debug, Clone)]
pub struct Scanner {
    definitions: Vec<Definition>,
    config: ScannerConfig,
}

impl Scanner {
    pub(crate) fn new(definitions: Vec<Definition>, config: ScannerConfig) -> Self {
        Scanner {
            definitions,
            config,
        }
    }

    /// The definitions in declaration order.
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    /// The configuration the scanner was built with.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Tokenizes the input and collects the tokens and the lexical errors.
    pub fn tokenize<R: BufRead>(&self, reader: R) -> Result<ScanOutput> {
        let mut errors = Vec::new();
        let tokens = self.tokenize_with(reader, |error| errors.push(error))?;
        Ok(ScanOutput { tokens, errors })
    }

    /// Tokenizes a string.
    pub fn tokenize_str(&self, text: &str) -> Result<ScanOutput> {
        self.tokenize(text.as_bytes())
    }

    /// Tokenizes the input and hands every lexical error to `on_error` as soon as it is
    /// found.
    ///
    /// Lexical errors don't stop the scan. The call only fails if the input can't be read
    /// or a single match attempt outgrows the lookahead buffer.
    pub fn tokenize_with<R, F>(&self, reader: R, mut on_error: F) -> Result<Vec<LexToken>>
    where
        R: BufRead,
        F: FnMut(LexicalError),
    {
        let mut source = CharReader::new(reader);
        let mut buffer = LookaheadBuffer::new(self.config.lookahead_capacity);
        let mut runs = self
            .definitions
            .iter()
            .map(|definition| DfaRun::new(definition.dfa()))
            .collect::<Vec<_>>();
        // The accepting definitions for each speculative position.
        let mut accepting: Vec<Vec<DefinitionID>> = Vec::new();
        let mut position = Position::new(self.config.line_ending);
        let mut tokens = Vec::new();

        loop {
            let killed = match buffer.peek_or_fetch(&mut source)? {
                Some(c) => {
                    if self.advance_runs(&mut runs, c) {
                        accepting.push(self.accepting_definitions(&runs));
                        continue;
                    }
                    true
                }
                None => {
                    if buffer.speculative_len() == 0 {
                        break;
                    }
                    false
                }
            };

            match Self::longest_match(&accepting) {
                Some((length, id)) => {
                    let lexeme = buffer.commit(length);
                    let token = LexToken {
                        id: tokens.len(),
                        row: position.row,
                        col: position.col,
                        token_type: self.definitions[id].token_type().to_string(),
                        lexeme,
                    };
                    trace!("{}", token);
                    position.advance(&token.lexeme);
                    tokens.push(token);
                }
                None => {
                    // The character that killed the last runs belongs to the error span.
                    let text = buffer.commit(accepting.len() + usize::from(killed));
                    let error = LexicalError {
                        row: position.row,
                        col: position.col,
                        text,
                    };
                    warn!("{}", error);
                    position.advance(&error.text);
                    on_error(error);
                }
            }

            for (run, definition) in runs.iter_mut().zip(&self.definitions) {
                run.reset(definition.dfa());
            }
            accepting.clear();
            buffer.rewind_speculative();
        }

        Ok(tokens)
    }

    /// Advances all alive runs and returns true if at least one of them survived.
    fn advance_runs(&self, runs: &mut [DfaRun], c: char) -> bool {
        let mut alive = false;
        for (run, definition) in runs.iter_mut().zip(&self.definitions) {
            if !run.is_in_dead_state() {
                run.advance(definition.dfa(), c);
                alive |= !run.is_in_dead_state();
            }
        }
        alive
    }

    fn accepting_definitions(&self, runs: &[DfaRun]) -> Vec<DefinitionID> {
        runs.iter()
            .zip(&self.definitions)
            .filter(|(run, definition)| run.is_in_final_state(definition.dfa()))
            .map(|(_, definition)| definition.id())
            .collect()
    }

    /// Returns the length of the longest accepted prefix and the definition that accepted
    /// it. The definitions of a position are in declaration order, so the first one wins.
    fn longest_match(accepting: &[Vec<DefinitionID>]) -> Option<(usize, DefinitionID)> {
        accepting
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, ids)| ids.first().map(|id| (index + 1, *id)))
    }
}

/// The row and column of the next committed character.
#[derive(Debug)]
struct Position {
    row: usize,
    col: usize,
    line_ending: LineEnding,
    // The last committed character was a '\r' that already broke the line.
    pending_cr: bool,
}

impl Position {
    fn new(line_ending: LineEnding) -> Self {
        Position {
            row: 1,
            col: 1,
            line_ending,
            pending_cr: false,
        }
    }

    fn advance(&mut self, text: &str) {
        for c in text.chars() {
            match (self.line_ending, c) {
                (LineEnding::CrLf, '\n') if self.pending_cr => {
                    self.pending_cr = false;
                }
                (_, '\n') | (LineEnding::CrLf, '\r') => {
                    self.row += 1;
                    self.col = 1;
                    self.pending_cr = c == '\r';
                }
                _ => {
                    self.col += 1;
                    self.pending_cr = false;
                }
            }
        }
    }
}
