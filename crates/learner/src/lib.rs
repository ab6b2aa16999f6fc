//! # Wordsense Learner
//!
//! Cross-situational word-meaning learners (Siskind 1996).
//!
//! ## Architecture
//!
//! ```text
//! UtteranceMeaningPair (surface words)
//!     │
//!     ▼
//! NoisySymbolLearner ── SenseSymbolTable  word → { word_0, word_1, .. }
//!     │                 ConfidenceTable   sense → usage count
//!     │
//!     ├─ trial: snapshot ─> NpSymbolLearner::process ─> all_consistent? ─> restore
//!     ├─ select: unique / most confident / escalate with new senses
//!     └─ commit: NpSymbolLearner::process + poke confidence
//!                   │
//!                   ▼
//!              Lexicon { necessary (N), possible (P), expressions }
//!                   rules 1-4 narrow N and P, rule 5 resolves expressions
//! ```
//!
//! ## Example
//!
//! ```rust
//! use wordsense_learner::{NoisySymbolLearner, LearnerConfig};
//! use wordsense_meaning::UtteranceMeaningPair;
//!
//! let mut learner = NoisySymbolLearner::new(LearnerConfig::default());
//! let pair = UtteranceMeaningPair::new(
//!     "john runs",
//!     vec!["(RUN john)".parse().unwrap()],
//! );
//! let assignment = learner.process(&pair).unwrap();
//! assert_eq!(assignment.sense("john"), Some("john_0"));
//! ```

mod config;
mod error;
mod lexicon;
mod noisy_learner;
mod np_learner;
mod senses;
mod symbol_set;
mod symbol_table;

pub use config::LearnerConfig;
pub use error::{LearnerError, Result};
pub use lexicon::Lexicon;
pub use noisy_learner::{NoisySymbolLearner, SenseAssignment, Selection};
pub use np_learner::{NpSymbolLearner, Rule};
pub use senses::{parse_sense, sense_symbol, ConfidenceTable, SenseSymbolTable};
pub use symbol_set::{Meaning, Meanings, Symbols};
pub use symbol_table::{ExpressionTable, FiniteSymbolTable, SymbolTable, UniversalSymbolTable};
