use crate::symbol_set::{Meanings, Symbols};
use std::borrow::Cow;
use std::collections::{btree_map, BTreeMap};
use std::fmt;
use wordsense_meaning::{Symbol, SymbolSet};

/// Word (or sense symbol) → set table.
///
/// Implementations differ only in what an absent entry reads as. `get` is a
/// pure read that synthesizes the default; `entry` stores it.
pub trait SymbolTable {
    type Set: Clone + PartialEq + fmt::Display;

    /// Value an absent word reads as
    fn default_set() -> Self::Set;

    fn entries(&self) -> &BTreeMap<String, Self::Set>;

    fn entries_mut(&mut self) -> &mut BTreeMap<String, Self::Set>;

    fn get(&self, word: &str) -> Cow<'_, Self::Set> {
        match self.entries().get(word) {
            Some(set) => Cow::Borrowed(set),
            None => Cow::Owned(Self::default_set()),
        }
    }

    /// Get-or-insert-default
    fn entry(&mut self, word: &str) -> &mut Self::Set {
        self.entries_mut()
            .entry(word.to_string())
            .or_insert_with(Self::default_set)
    }

    fn insert(&mut self, word: &str, set: Self::Set) {
        self.entries_mut().insert(word.to_string(), set);
    }

    fn remove(&mut self, word: &str) -> Option<Self::Set> {
        self.entries_mut().remove(word)
    }

    /// Does the table hold an explicit entry for `word`?
    fn contains_word(&self, word: &str) -> bool {
        self.entries().contains_key(word)
    }

    fn words(&self) -> btree_map::Keys<'_, String, Self::Set> {
        self.entries().keys()
    }

    fn len(&self) -> usize {
        self.entries().len()
    }

    fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

macro_rules! symbol_table {
    ($(#[$doc:meta])* $name:ident, $set:ty, $default:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            entries: BTreeMap<String, $set>,
        }

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }
        }

        impl SymbolTable for $name {
            type Set = $set;

            fn default_set() -> Self::Set {
                $default
            }

            fn entries(&self) -> &BTreeMap<String, Self::Set> {
                &self.entries
            }

            fn entries_mut(&mut self) -> &mut BTreeMap<String, Self::Set> {
                &mut self.entries
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for (word, set) in &self.entries {
                    writeln!(f, "{word:>10} || {set}")?;
                }
                Ok(())
            }
        }
    };
}

symbol_table!(
    /// Necessary-set table: absent words read as the empty set
    FiniteSymbolTable,
    SymbolSet,
    SymbolSet::new()
);

symbol_table!(
    /// Possible-set table: absent words read as universal
    UniversalSymbolTable,
    Symbols,
    Symbols::Universal
);

symbol_table!(
    /// Conceptual-expression table: absent words read as universal
    ExpressionTable,
    Meanings,
    Meanings::Universal
);

impl FiniteSymbolTable {
    /// Union `symbols` into the entry for `word`
    pub fn add<I, S>(&mut self, word: &str, symbols: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.entry(word).extend(symbols);
    }
}

impl UniversalSymbolTable {
    /// Intersect the entry for `word` with `symbols`
    pub fn restrict(&mut self, word: &str, symbols: &SymbolSet) {
        self.entry(word).intersect_with(symbols);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> FiniteSymbolTable {
        let mut table = FiniteSymbolTable::new();
        table.add("hello", ["HELLO"]);
        table
    }

    #[test]
    fn test_add_new_word() {
        let mut table = table();
        assert!(!table.contains_word("world"));
        assert!(!table.get("world").contains("WORLD"));
        assert!(!table.contains_word("world"), "get must not insert");

        table.add("world", ["WORLD"]);
        assert!(table.contains_word("world"));
        assert!(table.get("world").contains("WORLD"));
    }

    #[test]
    fn test_add_existing_word() {
        let mut table = table();
        assert!(!table.get("hello").contains("GREETING"));
        table.add("hello", ["GREETING"]);
        assert!(table.get("hello").contains("GREETING"));
        assert!(table.get("hello").contains("HELLO"));
    }

    #[test]
    fn test_add_symbol_set_and_views() {
        let mut table = table();
        table.add("hello", ["john", "ball"]);

        let entry = table.get("hello");
        assert_eq!(entry.constants(), SymbolSet::of(["HELLO"]));
        assert_eq!(entry.variables(), SymbolSet::of(["john", "ball"]));
    }

    #[test]
    fn test_entry_inserts_default() {
        let mut possible = UniversalSymbolTable::new();
        assert!(possible.get("took").is_universal());
        assert!(possible.is_empty());

        assert!(possible.entry("took").is_universal());
        assert!(possible.contains_word("took"));

        possible.restrict("took", &SymbolSet::of(["CAUSE", "GO"]));
        possible.restrict("took", &SymbolSet::of(["GO", "TO"]));
        assert_eq!(*possible.get("took"), Symbols::from(SymbolSet::of(["GO"])));
    }

    #[test]
    fn test_expression_table_defaults_universal() {
        let mut expressions = ExpressionTable::new();
        assert!(expressions.get("word").is_universal());
        expressions.insert("the", Meanings::bottom());
        assert_eq!(expressions.words().collect::<Vec<_>>(), vec!["the"]);
        assert_eq!(expressions.remove("the"), Some(Meanings::bottom()));
    }
}
