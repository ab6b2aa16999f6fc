use thiserror::Error;
use wordsense_meaning::MeaningError;

/// Result type for learner operations
pub type Result<T> = std::result::Result<T, LearnerError>;

/// Errors raised by the learners
#[derive(Error, Debug)]
pub enum LearnerError {
    /// No sense assignment was consistent even after adding new senses to
    /// every allowed subset of words. The lexicon is left as it was before
    /// the pair was processed.
    #[error("No consistent sense assignment for \"{utterance}\" after trying new senses for every word subset")]
    ExhaustedEscalation { utterance: String },

    /// A sense symbol is not of the form `word_N`
    #[error("Invalid sense symbol: {0}")]
    InvalidSense(String),

    /// A seeded entry would require symbols its possible set excludes.
    /// Nothing is written when this is returned.
    #[error("Inconsistent entry for {sense}: necessary {necessary} is not within possible {possible}")]
    InconsistentEntry {
        sense: String,
        necessary: String,
        possible: String,
    },

    /// Invalid learner configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Training input could not be turned into pairs
    #[error("{0}")]
    MeaningError(#[from] MeaningError),
}

impl LearnerError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an invalid sense error
    pub fn invalid_sense(sense: impl Into<String>) -> Self {
        Self::InvalidSense(sense.into())
    }
}
