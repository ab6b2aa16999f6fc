use crate::hypothesis::Hypothesis;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// One training example: the words said and the meanings hypothesized for
/// them. Rule 1 of the learner removes hypotheses from the set as it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtteranceMeaningPair {
    pub utterance: String,
    pub words: BTreeSet<String>,
    pub hypotheses: BTreeSet<Hypothesis>,
}

impl UtteranceMeaningPair {
    /// Split `utterance` on whitespace into a deduplicated word set
    pub fn new<I>(utterance: &str, hypotheses: I) -> Self
    where
        I: IntoIterator<Item = Hypothesis>,
    {
        Self {
            utterance: utterance.split_whitespace().collect::<Vec<_>>().join(" "),
            words: utterance.split_whitespace().map(str::to_string).collect(),
            hypotheses: hypotheses.into_iter().collect(),
        }
    }

    /// Build from pre-tokenized words
    pub fn from_words<W, S, I>(words: W, hypotheses: I) -> Self
    where
        W: IntoIterator<Item = S>,
        S: Into<String>,
        I: IntoIterator<Item = Hypothesis>,
    {
        let words: BTreeSet<String> = words.into_iter().map(Into::into).collect();
        Self {
            utterance: words.iter().map(String::as_str).collect::<Vec<_>>().join(" "),
            words,
            hypotheses: hypotheses.into_iter().collect(),
        }
    }

    /// Copy of this pair with each word replaced by its mapped symbol
    /// (used to substitute sense symbols for surface words)
    #[must_use]
    pub fn with_words(&self, mapping: &BTreeMap<String, String>) -> Self {
        let words: BTreeSet<String> = self
            .words
            .iter()
            .map(|w| mapping.get(w).cloned().unwrap_or_else(|| w.clone()))
            .collect();
        Self {
            utterance: words.iter().map(String::as_str).collect::<Vec<_>>().join(" "),
            words,
            hypotheses: self.hypotheses.clone(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl fmt::Display for UtteranceMeaningPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hypotheses: Vec<String> = self.hypotheses.iter().map(ToString::to_string).collect();
        write!(f, "\"{}\" -> {{ {} }}", self.utterance, hypotheses.join(", "))
    }
}
