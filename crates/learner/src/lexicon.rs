use crate::symbol_set::Symbols;
use crate::symbol_table::{ExpressionTable, FiniteSymbolTable, SymbolTable, UniversalSymbolTable};
use std::collections::BTreeSet;
use std::fmt;

/// Necessary, possible and conceptual-expression tables of one learner.
///
/// Cloning is a deep copy, which is what trial evaluation snapshots and
/// restores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexicon {
    pub necessary: FiniteSymbolTable,
    pub possible: UniversalSymbolTable,
    pub expressions: ExpressionTable,
}

impl Lexicon {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from known N and P tables
    #[must_use]
    pub fn with_tables(necessary: FiniteSymbolTable, possible: UniversalSymbolTable) -> Self {
        Self {
            necessary,
            possible,
            expressions: ExpressionTable::new(),
        }
    }

    /// Register `word` in N and P with their defaults
    pub fn touch(&mut self, word: &str) {
        self.necessary.entry(word);
        self.possible.entry(word);
    }

    /// Every word with an explicit entry in any table
    #[must_use]
    pub fn words(&self) -> BTreeSet<&str> {
        self.necessary
            .words()
            .chain(self.possible.words())
            .chain(self.expressions.words())
            .map(String::as_str)
            .collect()
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.necessary.contains_word(word) || self.possible.contains_word(word)
    }

    /// N(word) == P(word)
    #[must_use]
    pub fn converged(&self, word: &str) -> bool {
        self.possible.get(word).as_finite() == Some(&*self.necessary.get(word))
    }

    /// An entry is inconsistent when noise or homonymy has corrupted it:
    /// its possible set is finite and either misses a necessary symbol or its
    /// candidate expressions have collapsed to nothing.
    #[must_use]
    pub fn consistent(&self, word: &str) -> bool {
        let possible = self.possible.get(word);
        let Symbols::Finite(possible) = possible.as_ref() else {
            return true;
        };
        if self.expressions.get(word).is_empty() {
            return false;
        }
        self.necessary.get(word).is_subset(possible)
    }

    #[must_use]
    pub fn all_consistent(&self) -> bool {
        self.words().into_iter().all(|word| self.consistent(word))
    }
}

impl fmt::Display for Lexicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in self.words() {
            writeln!(
                f,
                "{:>10} || {:<25} | {:<25} | {}",
                word,
                self.necessary.get(word).to_string(),
                self.possible.get(word).to_string(),
                self.expressions.get(word),
            )?;
        }
        Ok(())
    }
}
