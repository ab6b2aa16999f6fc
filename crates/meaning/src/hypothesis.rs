use crate::error::Result;
use crate::expression::Expression;
use crate::symbol::{SymbolCounts, SymbolSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Which subexpression set conceptual-expression matching draws from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubexpressionMode {
    /// Every node of the hypothesis tree
    #[default]
    Exact,

    /// Every node plus wildcard-generalized constant-headed nodes
    Generalized,
}

/// One candidate meaning for an utterance, with derived data cached
#[derive(Debug, Clone)]
pub struct Hypothesis {
    expression: Expression,
    symbols: SymbolSet,
    counts: SymbolCounts,
    subexpressions: BTreeSet<Expression>,
    generalized: BTreeSet<Expression>,
}

impl Hypothesis {
    pub fn new(expression: Expression) -> Self {
        let counts = expression.counts();
        let symbols = counts.symbols();
        let subexpressions = expression.deep_subexpressions();
        let generalized = expression.generalized_subexpressions();
        Self {
            expression,
            symbols,
            counts,
            subexpressions,
            generalized,
        }
    }

    /// Build from a string leaf or nested array
    pub fn from_value(value: &Value) -> Result<Self> {
        Expression::from_value(value).map(Self::new)
    }

    #[must_use]
    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Distinct symbols of the meaning
    #[must_use]
    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    /// Per-symbol occurrence counts
    #[must_use]
    pub fn symbol_counts(&self) -> &SymbolCounts {
        &self.counts
    }

    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    #[must_use]
    pub fn subexpressions(&self, mode: SubexpressionMode) -> &BTreeSet<Expression> {
        match mode {
            SubexpressionMode::Exact => &self.subexpressions,
            SubexpressionMode::Generalized => &self.generalized,
        }
    }

    /// Subexpressions whose constants include all of `constants`
    #[must_use]
    pub fn subexpressions_for_constants(
        &self,
        constants: &SymbolSet,
        mode: SubexpressionMode,
    ) -> BTreeSet<Expression> {
        self.subexpressions(mode)
            .iter()
            .filter(|sub| constants.is_subset(&sub.constants()))
            .cloned()
            .collect()
    }
}

impl From<Expression> for Hypothesis {
    fn from(expression: Expression) -> Self {
        Self::new(expression)
    }
}

impl FromStr for Hypothesis {
    type Err = crate::error::MeaningError;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<Expression>().map(Self::new)
    }
}

impl PartialEq for Hypothesis {
    fn eq(&self, other: &Self) -> bool {
        self.expression == other.expression
    }
}

impl Eq for Hypothesis {}

impl PartialOrd for Hypothesis {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hypothesis {
    fn cmp(&self, other: &Self) -> Ordering {
        self.expression.cmp(&other.expression)
    }
}

impl fmt::Display for Hypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}
