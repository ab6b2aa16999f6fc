use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{btree_map, btree_set, BTreeMap, BTreeSet};
use std::fmt;

/// Kind of a conceptual symbol, decided once by its surface casing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Fixed conceptual primitive (`CAUSE`, `GO`)
    Constant,

    /// Referent or argument slot (`john`, `ball`, `r_255`)
    Variable,
}

impl SymbolKind {
    /// Classify a name: constant iff it has a cased character and none of
    /// its cased characters are lowercase.
    #[must_use]
    pub fn of(name: &str) -> Self {
        let mut cased = false;
        for ch in name.chars() {
            if ch.is_lowercase() {
                return Self::Variable;
            }
            if ch.is_uppercase() {
                cased = true;
            }
        }
        if cased {
            Self::Constant
        } else {
            Self::Variable
        }
    }
}

/// A conceptual symbol (or a word/sense symbol used as a table key)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn kind(&self) -> SymbolKind {
        SymbolKind::of(&self.0)
    }

    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.kind() == SymbolKind::Constant
    }

    #[must_use]
    pub fn is_variable(&self) -> bool {
        self.kind() == SymbolKind::Variable
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&Symbol> for Symbol {
    fn from(symbol: &Symbol) -> Self {
        symbol.clone()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Finite, ordered set of symbols
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolSet(BTreeSet<Symbol>);

impl SymbolSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from anything convertible to symbols
    pub fn of<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        symbols.into_iter().collect()
    }

    pub fn insert(&mut self, symbol: impl Into<Symbol>) -> bool {
        self.0.insert(symbol.into())
    }

    pub fn remove(&mut self, symbol: &str) -> bool {
        self.0.remove(symbol)
    }

    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.0.contains(symbol)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Symbol> {
        self.0.iter()
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }

    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        Self(self.0.intersection(&other.0).cloned().collect())
    }

    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self(self.0.difference(&other.0).cloned().collect())
    }

    /// Add every symbol of `other` to this set
    pub fn union_with(&mut self, other: &Self) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Keep only the symbols also present in `other`
    pub fn intersect_with(&mut self, other: &Self) {
        self.0.retain(|symbol| other.0.contains(symbol));
    }

    /// Drop every symbol present in `other`
    pub fn remove_all(&mut self, other: &Self) {
        self.0.retain(|symbol| !other.0.contains(symbol));
    }

    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.0.is_subset(&other.0)
    }

    #[must_use]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.0.is_disjoint(&other.0)
    }

    /// Variable members (lowercase / argument slots)
    #[must_use]
    pub fn variables(&self) -> Self {
        self.iter().filter(|s| s.is_variable()).cloned().collect()
    }

    /// Constant members (uppercase / conceptual primitives)
    #[must_use]
    pub fn constants(&self) -> Self {
        self.iter().filter(|s| s.is_constant()).cloned().collect()
    }
}

impl<S: Into<Symbol>> FromIterator<S> for SymbolSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<Symbol>> Extend<S> for SymbolSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for SymbolSet {
    type Item = Symbol;
    type IntoIter = btree_set::IntoIter<Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SymbolSet {
    type Item = &'a Symbol;
    type IntoIter = btree_set::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for SymbolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("{ }");
        }
        let names: Vec<&str> = self.0.iter().map(Symbol::name).collect();
        write!(f, "{{ {} }}", names.join(", "))
    }
}

/// Occurrence counts of every symbol in an expression
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolCounts(BTreeMap<Symbol, usize>);

impl SymbolCounts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Occurrences of `symbol`; zero when absent
    #[must_use]
    pub fn get(&self, symbol: &str) -> usize {
        self.0.get(symbol).copied().unwrap_or(0)
    }

    pub fn add(&mut self, symbol: &Symbol, count: usize) {
        *self.0.entry(symbol.clone()).or_insert(0) += count;
    }

    /// Fold another count table into this one
    pub fn merge(&mut self, other: &Self) {
        for (symbol, count) in &other.0 {
            self.add(symbol, *count);
        }
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Symbol, usize> {
        self.0.iter()
    }

    pub fn constants(&self) -> impl Iterator<Item = (&Symbol, usize)> + '_ {
        self.0
            .iter()
            .filter(|(s, _)| s.is_constant())
            .map(|(s, c)| (s, *c))
    }

    pub fn variables(&self) -> impl Iterator<Item = (&Symbol, usize)> + '_ {
        self.0
            .iter()
            .filter(|(s, _)| s.is_variable())
            .map(|(s, c)| (s, *c))
    }

    /// Distinct symbols counted at least once
    #[must_use]
    pub fn symbols(&self) -> SymbolSet {
        self.0.keys().cloned().collect()
    }

    /// Symbols that occur at most once
    #[must_use]
    pub fn singletons(&self) -> SymbolSet {
        self.0
            .iter()
            .filter(|(_, count)| **count <= 1)
            .map(|(s, _)| s.clone())
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_casing() {
        assert_eq!(SymbolKind::of("CAUSE"), SymbolKind::Constant);
        assert_eq!(SymbolKind::of("PART_OF"), SymbolKind::Constant);
        assert_eq!(SymbolKind::of("john"), SymbolKind::Variable);
        assert_eq!(SymbolKind::of("r_255"), SymbolKind::Variable);
        assert_eq!(SymbolKind::of("John"), SymbolKind::Variable);
        assert_eq!(SymbolKind::of("_"), SymbolKind::Variable);
    }

    #[test]
    fn test_constants_and_variables_views() {
        let set = SymbolSet::of(["HELLO", "john", "ball"]);
        assert_eq!(set.constants(), SymbolSet::of(["HELLO"]));
        assert_eq!(set.variables(), SymbolSet::of(["john", "ball"]));
    }

    #[test]
    fn test_set_algebra() {
        let a = SymbolSet::of(["A", "B", "c"]);
        let b = SymbolSet::of(["B", "c", "D"]);

        assert_eq!(a.union(&b), SymbolSet::of(["A", "B", "c", "D"]));
        assert_eq!(a.intersection(&b), SymbolSet::of(["B", "c"]));
        assert_eq!(a.difference(&b), SymbolSet::of(["A"]));
        assert!(SymbolSet::of(["B"]).is_subset(&a));
        assert!(!a.is_subset(&b));

        let mut c = a.clone();
        c.remove_all(&b);
        assert_eq!(c, SymbolSet::of(["A"]));
    }

    #[test]
    fn test_display() {
        assert_eq!(SymbolSet::new().to_string(), "{ }");
        assert_eq!(SymbolSet::of(["b", "A"]).to_string(), "{ A, b }");
    }

    #[test]
    fn test_counts_default_to_zero() {
        let mut counts = SymbolCounts::new();
        counts.add(&Symbol::from("john"), 2);
        counts.add(&Symbol::from("GO"), 1);

        assert_eq!(counts.get("john"), 2);
        assert_eq!(counts.get("GO"), 1);
        assert_eq!(counts.get("missing"), 0);
        assert_eq!(counts.singletons(), SymbolSet::of(["GO"]));
        assert_eq!(counts.constants().count(), 1);
    }
}
