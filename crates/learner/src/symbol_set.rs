use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use wordsense_meaning::{Expression, Symbol, SymbolSet};

/// A symbol set that may still be universal.
///
/// `Universal` contains every symbol. Intersecting it with a finite set
/// yields exactly that finite set; that is the only way it becomes finite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbols {
    Universal,
    Finite(SymbolSet),
}

impl Symbols {
    #[must_use]
    pub fn empty() -> Self {
        Self::Finite(SymbolSet::new())
    }

    #[must_use]
    pub fn is_universal(&self) -> bool {
        matches!(self, Self::Universal)
    }

    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        match self {
            Self::Universal => true,
            Self::Finite(set) => set.contains(symbol),
        }
    }

    #[must_use]
    pub fn as_finite(&self) -> Option<&SymbolSet> {
        match self {
            Self::Universal => None,
            Self::Finite(set) => Some(set),
        }
    }

    /// Number of members; `None` while universal
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        self.as_finite().map(SymbolSet::len)
    }

    #[must_use]
    pub fn intersection(&self, other: &SymbolSet) -> SymbolSet {
        match self {
            Self::Universal => other.clone(),
            Self::Finite(set) => set.intersection(other),
        }
    }

    pub fn intersect_with(&mut self, other: &SymbolSet) {
        match self {
            Self::Universal => *self = Self::Finite(other.clone()),
            Self::Finite(set) => set.intersect_with(other),
        }
    }

    /// Remove `other` from a finite set. A universal set stays universal:
    /// it can only be bounded by intersection.
    pub fn remove_all(&mut self, other: &SymbolSet) {
        if let Self::Finite(set) = self {
            set.remove_all(other);
        }
    }

    /// Does this set include every member of `other`?
    #[must_use]
    pub fn includes(&self, other: &SymbolSet) -> bool {
        match self {
            Self::Universal => true,
            Self::Finite(set) => other.is_subset(set),
        }
    }
}

impl From<SymbolSet> for Symbols {
    fn from(set: SymbolSet) -> Self {
        Self::Finite(set)
    }
}

impl fmt::Display for Symbols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universal => f.write_str("UNIVERSAL"),
            Self::Finite(set) => write!(f, "{set}"),
        }
    }
}

/// A resolved conceptual meaning for a word or sense
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Meaning {
    /// No conceptual content (function words), still consistent
    Bottom,

    /// Referential word: the meaning is the variable itself
    Variable(Symbol),

    /// A subexpression of the hypothesized meanings
    Expression(Expression),
}

impl fmt::Display for Meaning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bottom => f.write_str("_|_"),
            Self::Variable(symbol) => write!(f, "{symbol}"),
            Self::Expression(expression) => write!(f, "{expression}"),
        }
    }
}

/// Candidate conceptual expressions of a word; universal until first
/// constrained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Meanings {
    Universal,
    Finite(BTreeSet<Meaning>),
}

impl Meanings {
    /// The singleton `{ _|_ }`
    #[must_use]
    pub fn bottom() -> Self {
        Self::Finite(BTreeSet::from([Meaning::Bottom]))
    }

    #[must_use]
    pub fn is_universal(&self) -> bool {
        matches!(self, Self::Universal)
    }

    /// True only for a finite set with no members
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Finite(set) if set.is_empty())
    }

    #[must_use]
    pub fn contains(&self, meaning: &Meaning) -> bool {
        match self {
            Self::Universal => true,
            Self::Finite(set) => set.contains(meaning),
        }
    }

    #[must_use]
    pub fn as_finite(&self) -> Option<&BTreeSet<Meaning>> {
        match self {
            Self::Universal => None,
            Self::Finite(set) => Some(set),
        }
    }

    #[must_use]
    pub fn len(&self) -> Option<usize> {
        self.as_finite().map(BTreeSet::len)
    }

    pub fn intersect_with(&mut self, other: &BTreeSet<Meaning>) {
        match self {
            Self::Universal => *self = Self::Finite(other.clone()),
            Self::Finite(set) => set.retain(|meaning| other.contains(meaning)),
        }
    }
}

impl fmt::Display for Meanings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universal => f.write_str("UNIVERSAL"),
            Self::Finite(set) => {
                let items: Vec<String> = set.iter().map(ToString::to_string).collect();
                if items.is_empty() {
                    f.write_str("{ }")
                } else {
                    write!(f, "{{ {} }}", items.join(", "))
                }
            }
        }
    }
}
