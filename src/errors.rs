use thiserror::Error;

/// The result type for the `lexgen` crate.
pub type Result<T> = std::result::Result<T, LexGenError>;

/// A macro that constructs a new LexGenError::MalformedPattern variant.
#[macro_export]
macro_rules! malformed {
    ($pattern:expr, $reason:expr) => {
        $crate::LexGenError::new($crate::LexGenErrorKind::MalformedPattern {
            pattern: $pattern.to_string(),
            reason: $reason.to_string(),
        })
    };
}

/// A macro that constructs a new LexGenError::InvalidState variant.
#[macro_export]
macro_rules! invalid_state {
    ($($arg:tt)*) => {
        $crate::LexGenError::new($crate::LexGenErrorKind::InvalidState(format!($($arg)*)))
    };
}

/// The error type for the `lexgen` crate.
#[derive(Error, Debug)]
pub struct LexGenError {
    /// The source of the error.
    pub source: Box<LexGenErrorKind>,
}

impl LexGenError {
    /// Create a new `LexGenError`.
    pub fn new(kind: LexGenErrorKind) -> Self {
        LexGenError {
            source: Box::new(kind),
        }
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> &LexGenErrorKind {
        &self.source
    }
}

impl std::fmt::Display for LexGenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// The error kind type.
#[derive(Error, Debug)]
pub enum LexGenErrorKind {
    /// The pattern of a definition can't be compiled.
    #[error("Malformed pattern '{pattern}': {reason}")]
    MalformedPattern {
        /// The raw pattern text.
        pattern: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An automaton would reference a state that does not exist.
    #[error("Invalid automaton state: {0}")]
    InvalidState(String),

    /// The input of a tokenize call can't be read.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(std::io::Error),

    /// A single speculative span outgrew the lookahead buffer.
    #[error("Lookahead buffer capacity of {0} characters exceeded")]
    LookaheadExceeded(usize),

    /// A line of a definitions file is malformed.
    #[error("Invalid definition in line {line}: {reason}")]
    InvalidDefinition {
        /// The 1-based line number.
        line: usize,
        /// What is wrong with the line.
        reason: String,
    },

    /// A std::io error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<std::io::Error> for LexGenError {
    fn from(error: std::io::Error) -> Self {
        LexGenError::new(LexGenErrorKind::Io(error))
    }
}
