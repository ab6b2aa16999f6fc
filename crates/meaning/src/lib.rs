//! # Wordsense Meaning
//!
//! Symbolic meaning representations consumed by the word-meaning learners.
//!
//! ## Architecture
//!
//! ```text
//! "(CAUSE john (GO ball))" / ["CAUSE", "john", ["GO", "ball"]]
//!     │
//!     ├──> Expression (constant / variable / wildcard leaves, ordered nodes)
//!     │      ├─ counts()               symbol multiset
//!     │      ├─ deep_subexpressions()  every node
//!     │      └─ generalized_...()      plus (HEAD * *) forms
//!     │
//!     ├──> Hypothesis (expression + cached symbols, counts, subexpressions)
//!     │
//!     └──> UtteranceMeaningPair (word set + surviving hypotheses)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use wordsense_meaning::{Hypothesis, UtteranceMeaningPair};
//!
//! let hyp: Hypothesis = "(CAUSE john (GO ball (TO john)))".parse().unwrap();
//! assert_eq!(hyp.symbol_counts().get("john"), 2);
//!
//! let pair = UtteranceMeaningPair::new("john took the ball", vec![hyp]);
//! assert_eq!(pair.words.len(), 4);
//! ```

mod corpus;
mod error;
mod expression;
mod hypothesis;
mod pairs;
mod symbol;

pub use corpus::{load_corpus, parse_corpus};
pub use error::{MeaningError, Result};
pub use expression::{Expression, WILDCARD};
pub use hypothesis::{Hypothesis, SubexpressionMode};
pub use pairs::UtteranceMeaningPair;
pub use symbol::{Symbol, SymbolCounts, SymbolKind, SymbolSet};
