use thiserror::Error;

/// Result type for meaning construction and corpus parsing
pub type Result<T> = std::result::Result<T, MeaningError>;

/// Errors raised while building expressions, hypotheses or corpora
#[derive(Error, Debug)]
pub enum MeaningError {
    /// Input is neither a symbol string nor a sequence of valid inputs
    #[error("Malformed expression: {0}")]
    Malformed(String),

    /// A leaf was given an empty name
    #[error("Empty symbol name")]
    EmptySymbol,

    /// An internal node was given no children
    #[error("Empty expression node")]
    EmptyNode,

    /// Corpus text could not be parsed
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// IO error while reading a corpus
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl MeaningError {
    /// Create a malformed-input error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Create a corpus parse error for a 1-based line number
    pub fn parse(line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: msg.into(),
        }
    }
}
