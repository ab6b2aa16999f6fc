use crate::error::{MeaningError, Result};
use crate::symbol::{Symbol, SymbolCounts, SymbolKind, SymbolSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Surface form of the wildcard leaf used by generalized subexpressions
pub const WILDCARD: &str = "*";

/// Symbolic meaning tree
///
/// Leaves are constants, variables or the wildcard; internal nodes hold an
/// ordered, non-empty list of children. Equality and ordering are
/// structural.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawExpression", into = "RawExpression")]
pub enum Expression {
    /// Conceptual primitive (uppercase)
    Constant(Symbol),

    /// Referent / argument slot (lowercase)
    Variable(Symbol),

    /// Placeholder for a dropped argument in a generalized subexpression
    Wildcard,

    /// Ordered sequence of subexpressions
    Node(Vec<Expression>),
}

impl Expression {
    /// Build a leaf; its kind is decided by the casing of `name`
    pub fn leaf(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(MeaningError::EmptySymbol);
        }
        if name == WILDCARD {
            return Ok(Self::Wildcard);
        }
        if let Some(bad) = name.chars().find(|c| is_reserved(*c)) {
            return Err(MeaningError::malformed(format!(
                "symbol '{name}' contains reserved character {bad:?}"
            )));
        }
        Ok(Self::classified(Symbol::from(name)))
    }

    /// Build an internal node from its children
    pub fn node(children: Vec<Expression>) -> Result<Self> {
        if children.is_empty() {
            return Err(MeaningError::EmptyNode);
        }
        Ok(Self::Node(children))
    }

    /// Build from a string leaf or a (nested) array of such leaves
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(name) => Self::leaf(name),
            Value::Array(items) => {
                let children = items.iter().map(Self::from_value).collect::<Result<Vec<_>>>()?;
                Self::node(children)
            }
            other => Err(MeaningError::malformed(format!(
                "expected symbol string or sequence, found {}",
                value_kind(other)
            ))),
        }
    }

    fn classified(symbol: Symbol) -> Self {
        match symbol.kind() {
            SymbolKind::Constant => Self::Constant(symbol),
            SymbolKind::Variable => Self::Variable(symbol),
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::Node(_))
    }

    /// Symbol carried by a constant or variable leaf
    #[must_use]
    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            Self::Constant(s) | Self::Variable(s) => Some(s),
            Self::Wildcard | Self::Node(_) => None,
        }
    }

    /// Children of an internal node; empty for leaves
    #[must_use]
    pub fn children(&self) -> &[Expression] {
        match self {
            Self::Node(children) => children,
            _ => &[],
        }
    }

    /// Leading constant of an internal node, e.g. `CAUSE` in `(CAUSE x y)`
    #[must_use]
    pub fn head(&self) -> Option<&Symbol> {
        match self.children().first() {
            Some(Self::Constant(symbol)) => Some(symbol),
            _ => None,
        }
    }

    /// Is `symbol` present anywhere in this tree?
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        match self {
            Self::Constant(s) | Self::Variable(s) => s.name() == symbol,
            Self::Wildcard => false,
            Self::Node(children) => children.iter().any(|child| child.contains(symbol)),
        }
    }

    /// Occurrence count of every constant and variable, aggregated bottom-up
    #[must_use]
    pub fn counts(&self) -> SymbolCounts {
        match self {
            Self::Constant(s) | Self::Variable(s) => {
                let mut counts = SymbolCounts::new();
                counts.add(s, 1);
                counts
            }
            Self::Wildcard => SymbolCounts::new(),
            Self::Node(children) => {
                let mut counts = SymbolCounts::new();
                for child in children {
                    counts.merge(&child.counts());
                }
                counts
            }
        }
    }

    /// Distinct symbols in this tree
    #[must_use]
    pub fn symbols(&self) -> SymbolSet {
        let mut symbols = SymbolSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, out: &mut SymbolSet) {
        match self {
            Self::Constant(s) | Self::Variable(s) => {
                out.insert(s);
            }
            Self::Wildcard => {}
            Self::Node(children) => {
                for child in children {
                    child.collect_symbols(out);
                }
            }
        }
    }

    /// Distinct constants in this tree
    #[must_use]
    pub fn constants(&self) -> SymbolSet {
        self.symbols().constants()
    }

    /// Every node of the tree, the root and all leaves included
    #[must_use]
    pub fn deep_subexpressions(&self) -> BTreeSet<Expression> {
        let mut out = BTreeSet::new();
        self.walk(&mut |node| {
            out.insert(node.clone());
        });
        out
    }

    /// Deep subexpressions plus the generalized form of every
    /// constant-headed node
    #[must_use]
    pub fn generalized_subexpressions(&self) -> BTreeSet<Expression> {
        let mut out = BTreeSet::new();
        self.walk(&mut |node| {
            out.insert(node.clone());
            if let Some(general) = node.generalized() {
                out.insert(general);
            }
        });
        out
    }

    /// `(HEAD a b)` becomes `(HEAD * *)`; `None` unless this is a
    /// constant-headed node with at least one argument
    #[must_use]
    pub fn generalized(&self) -> Option<Expression> {
        let head = self.head()?;
        let arity = self.children().len();
        if arity < 2 {
            return None;
        }
        let mut children = Vec::with_capacity(arity);
        children.push(Self::Constant(head.clone()));
        children.extend(std::iter::repeat(Self::Wildcard).take(arity - 1));
        Some(Self::Node(children))
    }

    fn walk<F: FnMut(&Expression)>(&self, visit: &mut F) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Rename variables according to `substitutions`; constants are kept.
    /// A renamed leaf is reclassified by its new name.
    #[must_use]
    pub fn replace(&self, substitutions: &BTreeMap<String, String>) -> Expression {
        match self {
            Self::Variable(s) => match substitutions.get(s.name()) {
                Some(renamed) => Self::classified(Symbol::from(renamed.as_str())),
                None => self.clone(),
            },
            Self::Constant(_) | Self::Wildcard => self.clone(),
            Self::Node(children) => {
                Self::Node(children.iter().map(|c| c.replace(substitutions)).collect())
            }
        }
    }
}

fn is_reserved(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | '{' | '}' | ',' | '"')
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse one expression from the front of `input`, returning the rest
pub(crate) fn parse_prefix(input: &str) -> Result<(Expression, &str)> {
    let rest = input.trim_start();
    if let Some(mut rest) = rest.strip_prefix('(') {
        let mut children = Vec::new();
        loop {
            let trimmed = rest.trim_start();
            if let Some(after) = trimmed.strip_prefix(')') {
                return Ok((Expression::node(children)?, after));
            }
            if trimmed.is_empty() {
                return Err(MeaningError::malformed("unclosed '('"));
            }
            let (child, after) = parse_prefix(trimmed)?;
            children.push(child);
            rest = after;
        }
    }

    let end = rest.find(is_reserved).unwrap_or(rest.len());
    if end == 0 {
        return Err(match rest.chars().next() {
            Some(ch) => MeaningError::malformed(format!("unexpected {ch:?}")),
            None => MeaningError::malformed("expected a symbol or '('"),
        });
    }
    let (atom, after) = rest.split_at(end);
    Ok((Expression::leaf(atom)?, after))
}

impl FromStr for Expression {
    type Err = MeaningError;

    /// Parse s-expression syntax: `CAUSE`, `(CAUSE john (GO ball))`
    fn from_str(s: &str) -> Result<Self> {
        let (expression, rest) = parse_prefix(s)?;
        if !rest.trim().is_empty() {
            return Err(MeaningError::malformed(format!(
                "trailing input after expression: '{}'",
                rest.trim()
            )));
        }
        Ok(expression)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(s) | Self::Variable(s) => write!(f, "{s}"),
            Self::Wildcard => f.write_str(WILDCARD),
            Self::Node(children) => {
                f.write_str("(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Wire shape: a string leaf or a nested array
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawExpression {
    Leaf(String),
    Node(Vec<RawExpression>),
}

impl TryFrom<RawExpression> for Expression {
    type Error = MeaningError;

    fn try_from(raw: RawExpression) -> Result<Self> {
        match raw {
            RawExpression::Leaf(name) => Self::leaf(&name),
            RawExpression::Node(items) => {
                let children = items
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<Result<Vec<_>>>()?;
                Self::node(children)
            }
        }
    }
}

impl From<Expression> for RawExpression {
    fn from(expression: Expression) -> Self {
        match expression {
            Expression::Constant(s) | Expression::Variable(s) => Self::Leaf(s.name().to_string()),
            Expression::Wildcard => Self::Leaf(WILDCARD.to_string()),
            Expression::Node(children) => {
                Self::Node(children.into_iter().map(Self::from).collect())
            }
        }
    }
}
