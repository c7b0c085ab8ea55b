/// The default capacity of the lookahead buffer in characters.
pub const DEFAULT_LOOKAHEAD_CAPACITY: usize = 512;

/// Decides which characters break lines when rows and columns are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// Only `\n` breaks a line. A `\r` does not break a line in this mode, it counts as
    /// an ordinary column.
    #[default]
    Lf,
    /// `\n` and `\r` break a line and a `\r\n` pair counts as a single break.
    CrLf,
}

/// The configuration of a scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    /// The line ending policy used for row and column numbers.
    pub line_ending: LineEnding,
    /// The maximum number of characters a single match attempt may read ahead, at least 1.
    pub lookahead_capacity: usize,
    /// Log the intermediate results of the compilation of each definition.
    pub verbose: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            line_ending: LineEnding::default(),
            lookahead_capacity: DEFAULT_LOOKAHEAD_CAPACITY,
            verbose: false,
        }
    }
}
