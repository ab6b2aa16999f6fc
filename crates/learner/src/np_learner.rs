//! Necessary/possible symbol learner (Siskind 1996).
//!
//! For every word the learner keeps N (symbols the word must mean) and P
//! (symbols the word may still mean). Each utterance-meaning pair narrows
//! both through five rules applied in order; N only grows and P only
//! shrinks. A word whose N and P meet has converged, and its conceptual
//! expression is then resolved against the surviving hypotheses.

use crate::config::LearnerConfig;
use crate::lexicon::Lexicon;
use crate::symbol_set::{Meaning, Meanings, Symbols};
use crate::symbol_table::{ExpressionTable, FiniteSymbolTable, SymbolTable, UniversalSymbolTable};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use wordsense_meaning::{SymbolSet, UtteranceMeaningPair};

/// The inference rules, in application order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Drop hypotheses the words cannot jointly explain
    FilterHypotheses,

    /// Intersect P with the symbols of the surviving hypotheses
    PrunePossible,

    /// Promote common symbols only one word can carry into its N
    PromoteNecessary,

    /// Remove once-occurring symbols claimed by another word from P
    PruneSingletons,

    /// Resolve conceptual expressions of converged words
    ResolveExpressions,
}

impl Rule {
    pub const ALL: [Rule; 5] = [
        Rule::FilterHypotheses,
        Rule::PrunePossible,
        Rule::PromoteNecessary,
        Rule::PruneSingletons,
        Rule::ResolveExpressions,
    ];

    /// 1-based rule number
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Rule::FilterHypotheses => 1,
            Rule::PrunePossible => 2,
            Rule::PromoteNecessary => 3,
            Rule::PruneSingletons => 4,
            Rule::ResolveExpressions => 5,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::FilterHypotheses => "filter hypotheses",
            Rule::PrunePossible => "prune possible",
            Rule::PromoteNecessary => "promote necessary",
            Rule::PruneSingletons => "prune singletons",
            Rule::ResolveExpressions => "resolve expressions",
        };
        write!(f, "rule {} ({name})", self.number())
    }
}

/// Learner over the N, P and expression tables of one lexicon
#[derive(Debug, Clone, Default)]
pub struct NpSymbolLearner {
    lexicon: Lexicon,
    config: LearnerConfig,
}

impl NpSymbolLearner {
    pub fn new(config: LearnerConfig) -> Self {
        Self {
            lexicon: Lexicon::new(),
            config,
        }
    }

    /// Start from known N and P tables
    pub fn with_tables(necessary: FiniteSymbolTable, possible: UniversalSymbolTable) -> Self {
        Self::with_lexicon(Lexicon::with_tables(necessary, possible), LearnerConfig::default())
    }

    pub fn with_lexicon(lexicon: Lexicon, config: LearnerConfig) -> Self {
        Self { lexicon, config }
    }

    #[must_use]
    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    #[must_use]
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn lexicon_mut(&mut self) -> &mut Lexicon {
        &mut self.lexicon
    }

    #[must_use]
    pub fn necessary(&self, word: &str) -> Cow<'_, SymbolSet> {
        self.lexicon.necessary.get(word)
    }

    #[must_use]
    pub fn possible(&self, word: &str) -> Cow<'_, Symbols> {
        self.lexicon.possible.get(word)
    }

    #[must_use]
    pub fn expressions(&self, word: &str) -> Cow<'_, Meanings> {
        self.lexicon.expressions.get(word)
    }

    #[must_use]
    pub fn necessary_table(&self) -> &FiniteSymbolTable {
        &self.lexicon.necessary
    }

    #[must_use]
    pub fn possible_table(&self) -> &UniversalSymbolTable {
        &self.lexicon.possible
    }

    #[must_use]
    pub fn expression_table(&self) -> &ExpressionTable {
        &self.lexicon.expressions
    }

    /// Does the lexicon hold an entry for `word`?
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.lexicon.contains(word)
    }

    #[must_use]
    pub fn converged(&self, word: &str) -> bool {
        self.lexicon.converged(word)
    }

    #[must_use]
    pub fn consistent(&self, word: &str) -> bool {
        self.lexicon.consistent(word)
    }

    #[must_use]
    pub fn all_consistent(&self) -> bool {
        self.lexicon.all_consistent()
    }

    /// Deep copy of the current tables
    #[must_use]
    pub fn snapshot(&self) -> Lexicon {
        self.lexicon.clone()
    }

    pub fn restore(&mut self, snapshot: Lexicon) {
        self.lexicon = snapshot;
    }

    /// Run all five rules on `pair`. Rule 1 removes hypotheses from the
    /// pair itself.
    pub fn process(&mut self, pair: &mut UtteranceMeaningPair) {
        log::debug!("Processing {pair}");
        for word in &pair.words {
            self.lexicon.touch(word);
        }
        for rule in Rule::ALL {
            self.apply(rule, pair);
        }
    }

    /// Process a sequence of pairs in order
    pub fn train<'a, I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = &'a UtteranceMeaningPair>,
    {
        for pair in pairs {
            let mut pair = pair.clone();
            self.process(&mut pair);
        }
    }

    /// Apply a single rule
    pub fn apply(&mut self, rule: Rule, pair: &mut UtteranceMeaningPair) {
        log::trace!("[{}] -> {}", rule, pair);
        match rule {
            Rule::FilterHypotheses => self.filter_hypotheses(pair),
            Rule::PrunePossible => self.prune_possible(pair),
            Rule::PromoteNecessary => self.promote_necessary(pair),
            Rule::PruneSingletons => self.prune_singletons(pair),
            Rule::ResolveExpressions => self.resolve_expressions(pair),
        }
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("[{}] <-\n{}", rule, self.lexicon);
        }
    }

    fn filter_hypotheses(&self, pair: &mut UtteranceMeaningPair) {
        // None once any word's P is still universal
        let mut possible_union = Some(SymbolSet::new());
        let mut necessary_union = SymbolSet::new();
        for word in &pair.words {
            match self.lexicon.possible.get(word).as_finite() {
                Some(set) => {
                    if let Some(union) = possible_union.as_mut() {
                        union.union_with(set);
                    }
                }
                None => possible_union = None,
            }
            necessary_union.union_with(&self.lexicon.necessary.get(word));
        }

        pair.hypotheses.retain(|hypothesis| {
            if let Some(possible) = &possible_union {
                if !hypothesis.symbols().is_subset(possible) {
                    log::debug!(
                        "Dropping {hypothesis}: {} not possible",
                        hypothesis.symbols().difference(possible)
                    );
                    return false;
                }
            }
            if !necessary_union.is_subset(hypothesis.symbols()) {
                log::debug!(
                    "Dropping {hypothesis}: missing necessary {}",
                    necessary_union.difference(hypothesis.symbols())
                );
                return false;
            }
            true
        });
    }

    fn prune_possible(&mut self, pair: &UtteranceMeaningPair) {
        let mut remaining = SymbolSet::new();
        for hypothesis in &pair.hypotheses {
            remaining.union_with(hypothesis.symbols());
        }
        for word in &pair.words {
            self.lexicon.possible.restrict(word, &remaining);
        }
    }

    fn promote_necessary(&mut self, pair: &UtteranceMeaningPair) {
        let mut hypotheses = pair.hypotheses.iter();
        let Some(first) = hypotheses.next() else {
            return;
        };
        let mut common = first.symbols().clone();
        for hypothesis in hypotheses {
            common.intersect_with(hypothesis.symbols());
        }
        log::trace!("Common symbols: {common}");

        for word in &pair.words {
            let mut attributable = common.clone();
            for other in pair.words.iter().filter(|other| *other != word) {
                match self.lexicon.possible.get(other).as_ref() {
                    Symbols::Universal => attributable = SymbolSet::new(),
                    Symbols::Finite(possible) => attributable.remove_all(possible),
                }
            }
            if !attributable.is_empty() {
                log::debug!("N({word}) += {attributable}");
                self.lexicon.necessary.entry(word).union_with(&attributable);
            }
        }
    }

    fn prune_singletons(&mut self, pair: &UtteranceMeaningPair) {
        let mut once = SymbolSet::new();
        for hypothesis in &pair.hypotheses {
            once.union_with(&hypothesis.symbol_counts().singletons());
        }
        log::trace!("Once-occurring symbols: {once}");

        for word in &pair.words {
            let mut claimed = SymbolSet::new();
            for other in pair.words.iter().filter(|other| *other != word) {
                claimed.union_with(&once.intersection(&self.lexicon.necessary.get(other)));
            }
            if !claimed.is_empty() {
                log::debug!("P({word}) -= {claimed}");
                self.lexicon.possible.entry(word).remove_all(&claimed);
            }
        }
    }

    fn resolve_expressions(&mut self, pair: &UtteranceMeaningPair) {
        let mode = self.config.subexpressions;
        for word in &pair.words {
            if !self.lexicon.converged(word) {
                continue;
            }
            let necessary = self.lexicon.necessary.get(word).into_owned();

            if necessary.is_empty() {
                log::debug!("{word} converged on no symbols: bottom");
                self.lexicon.expressions.insert(word, Meanings::bottom());
                continue;
            }

            if necessary.variables() == necessary {
                log::debug!("{word} converged on variables {necessary}");
                let variables: BTreeSet<Meaning> = necessary.into_iter().map(Meaning::Variable).collect();
                self.lexicon.expressions.entry(word).intersect_with(&variables);
                continue;
            }

            let constants = necessary.constants();
            let mut candidates = BTreeSet::new();
            for hypothesis in &pair.hypotheses {
                candidates.extend(
                    hypothesis
                        .subexpressions_for_constants(&constants, mode)
                        .into_iter()
                        .map(Meaning::Expression),
                );
            }
            log::debug!("{word} converged on constants {constants}: {} candidate expressions", candidates.len());
            self.lexicon.expressions.entry(word).intersect_with(&candidates);
        }
    }
}

impl fmt::Display for NpSymbolLearner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lexicon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordsense_meaning::Hypothesis;

    fn hyp(text: &str) -> Hypothesis {
        text.parse().unwrap()
    }

    #[test]
    fn test_rule_order() {
        let numbers: Vec<u8> = Rule::ALL.iter().map(|r| r.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(Rule::PruneSingletons.to_string(), "rule 4 (prune singletons)");
    }

    #[test]
    fn test_fresh_learner_keeps_everything_under_universal_p() {
        let mut learner = NpSymbolLearner::default();
        let mut pair = UtteranceMeaningPair::new("john runs", vec![hyp("(RUN john)"), hyp("(WALK john)")]);

        learner.apply(Rule::FilterHypotheses, &mut pair);
        assert_eq!(pair.hypotheses.len(), 2);
    }

    #[test]
    fn test_single_word_converges_on_its_hypothesis() {
        let mut learner = NpSymbolLearner::default();
        let mut pair = UtteranceMeaningPair::new("john", vec![hyp("john")]);
        learner.process(&mut pair);

        assert_eq!(*learner.necessary("john"), SymbolSet::of(["john"]));
        assert!(learner.converged("john"));
        assert!(learner.expressions("john").contains(&Meaning::Variable("john".into())));
        assert_eq!(learner.expressions("john").len(), Some(1));
    }

    #[test]
    fn test_empty_hypotheses_empty_every_possible_set() {
        let mut learner = NpSymbolLearner::default();
        let mut pair = UtteranceMeaningPair::new("the", Vec::new());
        learner.process(&mut pair);

        assert_eq!(*learner.possible("the"), Symbols::empty());
        assert!(learner.converged("the"));
        assert_eq!(*learner.expressions("the"), Meanings::bottom());
        assert!(learner.consistent("the"));
    }

    #[test]
    fn test_constant_word_resolves_to_subexpressions() {
        let mut necessary = FiniteSymbolTable::new();
        necessary.add("catches", ["CAUSE", "GO", "TO"]);
        let mut possible = UniversalSymbolTable::new();
        possible.insert("catches", SymbolSet::of(["CAUSE", "GO", "TO"]).into());
        let mut learner = NpSymbolLearner::with_tables(necessary, possible);

        assert!(learner.expressions("catches").contains(&Meaning::Bottom), "universal before rule 5");
        let mut pair = UtteranceMeaningPair::new(
            "catches",
            vec![hyp("(CAUSE (john (GO (ball (TO john)))))")],
        );
        learner.apply(Rule::ResolveExpressions, &mut pair);

        let expressions = learner.expressions("catches");
        let expressions = expressions.as_finite().unwrap();
        assert_eq!(expressions.len(), 1);
        for meaning in expressions {
            let Meaning::Expression(expression) = meaning else {
                panic!("expected expression, got {meaning}");
            };
            for symbol in ["CAUSE", "GO", "TO"] {
                assert!(expression.contains(symbol));
            }
        }
    }

    #[test]
    fn test_variable_words_resolve_to_themselves() {
        let mut necessary = FiniteSymbolTable::new();
        necessary.add("john", ["john"]);
        necessary.add("ball", ["ball"]);
        let mut possible = UniversalSymbolTable::new();
        possible.insert("john", SymbolSet::of(["john"]).into());
        possible.insert("ball", SymbolSet::of(["ball"]).into());
        let mut learner = NpSymbolLearner::with_tables(necessary, possible);
        let hypothesis = hyp("(CAUSE (john (GO (ball (TO john)))))");

        let mut pair = UtteranceMeaningPair::new("john", vec![hypothesis.clone()]);
        learner.apply(Rule::ResolveExpressions, &mut pair);
        assert!(learner.expressions("john").contains(&Meaning::Variable("john".into())));
        assert!(!learner.expressions("john").contains(&Meaning::Variable("ball".into())));

        let mut pair = UtteranceMeaningPair::new("ball", vec![hypothesis]);
        learner.apply(Rule::ResolveExpressions, &mut pair);
        assert!(learner.expressions("ball").contains(&Meaning::Variable("ball".into())));
        assert!(!learner.expressions("ball").contains(&Meaning::Variable("john".into())));
    }

    #[test]
    fn test_empty_converged_word_resolves_to_bottom() {
        let mut necessary = FiniteSymbolTable::new();
        necessary.entry("the");
        let mut possible = UniversalSymbolTable::new();
        possible.insert("the", Symbols::empty());
        let mut learner = NpSymbolLearner::with_tables(necessary, possible);

        let mut pair = UtteranceMeaningPair::new("the", vec![hyp("(CAUSE (john (GO (ball (TO john)))))")]);
        learner.apply(Rule::ResolveExpressions, &mut pair);
        assert_eq!(*learner.expressions("the"), Meanings::bottom());
    }

    #[test]
    fn test_generalized_mode_adds_wildcard_candidates() {
        let mut necessary = FiniteSymbolTable::new();
        necessary.add("goes", ["GO"]);
        let mut possible = UniversalSymbolTable::new();
        possible.insert("goes", SymbolSet::of(["GO"]).into());
        let lexicon = Lexicon::with_tables(necessary, possible);
        let mut learner = NpSymbolLearner::with_lexicon(lexicon, LearnerConfig::generalized());

        let mut pair = UtteranceMeaningPair::new("goes", vec![hyp("(GO ball (TO john))")]);
        learner.apply(Rule::ResolveExpressions, &mut pair);
        assert!(learner
            .expressions("goes")
            .contains(&Meaning::Expression("(GO * *)".parse().unwrap())));
    }
}
