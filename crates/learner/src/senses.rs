use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Sense symbol `word_index`
#[must_use]
pub fn sense_symbol(word: &str, index: usize) -> String {
    format!("{word}_{index}")
}

/// Split `ball_2` into (`ball`, 2). The word part may itself contain
/// underscores; the index is whatever follows the last one.
#[must_use]
pub fn parse_sense(sense: &str) -> Option<(&str, usize)> {
    let (word, index) = sense.rsplit_once('_')?;
    if word.is_empty() || index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    index.parse().ok().map(|index| (word, index))
}

/// Sense symbol → usage count. Missing senses read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfidenceTable {
    table: BTreeMap<String, u64>,
}

impl ConfidenceTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, sense: &str) -> u64 {
        self.table.get(sense).copied().unwrap_or(0)
    }

    /// Overwrite a sense's confidence (seeding known states)
    pub fn set(&mut self, sense: &str, value: u64) {
        self.table.insert(sense.to_string(), value);
    }

    /// Increment confidence in `sense` by one, returning the new value
    pub fn poke(&mut self, sense: &str) -> u64 {
        let value = self.table.entry(sense.to_string()).or_insert(0);
        *value += 1;
        *value
    }

    /// Summed confidence of a sense assignment
    pub fn score<'a, I>(&self, senses: I) -> u64
    where
        I: IntoIterator<Item = &'a String>,
    {
        senses.into_iter().map(|sense| self.get(sense)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.table.iter().map(|(sense, value)| (sense.as_str(), *value))
    }
}

impl fmt::Display for ConfidenceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (sense, value) in &self.table {
            writeln!(f, "{sense:>10} | {value}")?;
        }
        Ok(())
    }
}

/// Surface word → its sense symbols.
///
/// A word with no explicit senses has exactly one implicit sense `word_0`.
/// It is synthesized on every read and never stored, so only words that
/// have been split by homonymy or noise own an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenseSymbolTable {
    table: BTreeMap<String, BTreeSet<String>>,
}

impl SenseSymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every sense of `word`, the implicit `word_0` included
    #[must_use]
    pub fn get(&self, word: &str) -> BTreeSet<String> {
        let mut senses = self.table.get(word).cloned().unwrap_or_default();
        senses.insert(sense_symbol(word, 0));
        senses
    }

    /// Has `word` been given explicit senses? False for single-sense words.
    #[must_use]
    pub fn contains_word(&self, word: &str) -> bool {
        self.table.contains_key(word)
    }

    /// Allocate the next sense for `word` (lowest free index from 1)
    pub fn add_sense(&mut self, word: &str) -> String {
        let senses = self.table.entry(word.to_string()).or_default();
        let next = senses.len() + 1;
        let index = (1..=next)
            .find(|i| !senses.contains(&sense_symbol(word, *i)))
            .unwrap_or(next);
        let sense = sense_symbol(word, index);
        senses.insert(sense.clone());
        sense
    }

    /// Register an explicit sense by name
    pub fn insert_sense(&mut self, word: &str, sense: &str) {
        self.table
            .entry(word.to_string())
            .or_default()
            .insert(sense.to_string());
    }

    /// Drop an explicit sense. When the last one goes the word falls back to
    /// its implicit single sense. Implicit or unknown senses are ignored.
    pub fn remove_sense(&mut self, sense: &str) -> bool {
        let Some((word, _)) = parse_sense(sense) else {
            return false;
        };
        let Some(senses) = self.table.get_mut(word) else {
            return false;
        };
        let removed = senses.remove(sense);
        if senses.is_empty() {
            self.table.remove(word);
        }
        removed
    }
}
