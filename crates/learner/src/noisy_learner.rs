//! Sense-assigning learner for noisy and homonymous input.
//!
//! Each surface word owns one or more sense symbols and the NP learner is
//! trained on senses rather than words. For every pair the learner tries
//! every combination of existing senses against a snapshot of the lexicon,
//! adopts a consistent one, and only invents new senses when none exists.

use crate::config::LearnerConfig;
use crate::error::{LearnerError, Result};
use crate::lexicon::Lexicon;
use crate::np_learner::NpSymbolLearner;
use crate::senses::{parse_sense, ConfidenceTable, SenseSymbolTable};
use crate::symbol_set::{Meaning, Meanings};
use crate::symbol_table::SymbolTable;
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use wordsense_meaning::{parse_corpus, SymbolSet, UtteranceMeaningPair};

/// How the committed sense assignment was chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Exactly one assignment of existing senses was consistent
    Unique,

    /// Several were consistent; this one had the highest confidence sum
    MostConfident { candidates: usize, score: u64 },

    /// None were consistent until these senses were created
    NewSenses { created: Vec<String> },
}

/// Outcome of processing one pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenseAssignment {
    /// Surface word → sense symbol used
    pub senses: BTreeMap<String, String>,
    pub selection: Selection,
    /// Trial evaluations run, escalation rounds included
    pub trials: usize,
}

impl SenseAssignment {
    #[must_use]
    pub fn sense(&self, word: &str) -> Option<&str> {
        self.senses.get(word).map(String::as_str)
    }
}

impl fmt::Display for SenseAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let senses = self.senses.values().join(" ");
        match &self.selection {
            Selection::Unique => write!(f, "{senses} (unique)"),
            Selection::MostConfident { candidates, score } => {
                write!(f, "{senses} (best of {candidates}, confidence {score})")
            }
            Selection::NewSenses { created } => {
                write!(f, "{senses} (new senses: {})", created.join(", "))
            }
        }
    }
}

/// Word → candidate senses, in word order
type SenseSpace = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug, Clone, Default)]
pub struct NoisySymbolLearner {
    np: NpSymbolLearner,
    senses: SenseSymbolTable,
    confidence: ConfidenceTable,
}

impl NoisySymbolLearner {
    pub fn new(config: LearnerConfig) -> Self {
        Self::with_learner(NpSymbolLearner::new(config))
    }

    /// Like `new`, rejecting an invalid config
    pub fn with_config(config: LearnerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Wrap an existing NP learner, whose words are treated as senses
    pub fn with_learner(np: NpSymbolLearner) -> Self {
        Self {
            np,
            senses: SenseSymbolTable::new(),
            confidence: ConfidenceTable::new(),
        }
    }

    #[must_use]
    pub fn np_learner(&self) -> &NpSymbolLearner {
        &self.np
    }

    #[must_use]
    pub fn sense_table(&self) -> &SenseSymbolTable {
        &self.senses
    }

    #[must_use]
    pub fn confidence(&self) -> &ConfidenceTable {
        &self.confidence
    }

    #[must_use]
    pub fn lexicon(&self) -> &Lexicon {
        self.np.lexicon()
    }

    /// Current senses of a surface word
    #[must_use]
    pub fn senses(&self, word: &str) -> BTreeSet<String> {
        self.senses.get(word)
    }

    /// Is `sense` (not a surface word) known to the lexicon?
    #[must_use]
    pub fn contains(&self, sense: &str) -> bool {
        self.np.contains(sense)
    }

    /// Enter a known lexical entry for `sense`, e.g. to start from a
    /// partially learned state
    pub fn seed_entry(
        &mut self,
        sense: &str,
        necessary: SymbolSet,
        possible: SymbolSet,
        confidence: u64,
    ) -> Result<()> {
        let (word, index) = parse_sense(sense).ok_or_else(|| LearnerError::invalid_sense(sense))?;

        // A rejected seed leaves the lexicon untouched
        let mut lexicon = self.np.snapshot();
        lexicon.necessary.entry(sense).union_with(&necessary);
        lexicon.possible.restrict(sense, &possible);

        if !lexicon.consistent(sense) {
            return Err(LearnerError::InconsistentEntry {
                sense: sense.to_string(),
                necessary: lexicon.necessary.get(sense).to_string(),
                possible: lexicon.possible.get(sense).to_string(),
            });
        }

        if necessary.is_empty() && possible.is_empty() {
            lexicon.expressions.insert(sense, Meanings::bottom());
        } else if necessary == possible && necessary.constants().is_empty() {
            let variables = necessary.into_iter().map(Meaning::Variable).collect();
            lexicon.expressions.insert(sense, Meanings::Finite(variables));
        }

        self.np.restore(lexicon);
        self.confidence.set(sense, confidence);
        if index > 0 {
            self.senses.insert_sense(word, sense);
        }
        log::debug!("Seeded {sense} with confidence {confidence}");
        Ok(())
    }

    /// Commit one sense assignment for `pair`
    pub fn process(&mut self, pair: &UtteranceMeaningPair) -> Result<SenseAssignment> {
        log::debug!("Processing {pair}");
        let space: SenseSpace = pair
            .words
            .iter()
            .map(|word| (word.clone(), self.senses.get(word)))
            .collect();

        let mut consistent = self.consistent_assignments(&space, pair);
        let mut trials = assignment_count(&space);

        let (senses, selection) = match consistent.len() {
            1 => (consistent.swap_remove(0), Selection::Unique),
            0 => {
                log::debug!("No existing sense assignment is consistent; escalating");
                let (senses, created, escalation_trials) = self.escalate(&space, pair)?;
                trials += escalation_trials;
                (senses, Selection::NewSenses { created })
            }
            candidates => {
                let (best, score) = self.most_confident(consistent);
                (best, Selection::MostConfident { candidates, score })
            }
        };

        let mut sense_pair = pair.with_words(&senses);
        self.np.process(&mut sense_pair);
        for sense in senses.values() {
            self.confidence.poke(sense);
        }

        let assignment = SenseAssignment {
            senses,
            selection,
            trials,
        };
        log::debug!("Committed {assignment}");
        Ok(assignment)
    }

    /// Process pairs in order, stopping at the first failure
    pub fn train<'a, I>(&mut self, pairs: I) -> Result<Vec<SenseAssignment>>
    where
        I: IntoIterator<Item = &'a UtteranceMeaningPair>,
    {
        pairs.into_iter().map(|pair| self.process(pair)).collect()
    }

    /// Parse a corpus in the pair text format and train on it
    pub fn train_corpus(&mut self, text: &str) -> Result<Vec<SenseAssignment>> {
        let pairs = parse_corpus(text)?;
        log::info!("Training on {} pairs", pairs.len());
        self.train(&pairs)
    }

    /// Every assignment over `space` that leaves the lexicon consistent, in
    /// product order. The lexicon is unchanged afterwards.
    fn consistent_assignments(
        &mut self,
        space: &SenseSpace,
        pair: &UtteranceMeaningPair,
    ) -> Vec<BTreeMap<String, String>> {
        let mut consistent = Vec::new();
        for assignment in assignments(space) {
            let snapshot = self.np.snapshot();
            let mut trial = pair.with_words(&assignment);
            self.np.process(&mut trial);
            let ok = self.np.all_consistent();
            self.np.restore(snapshot);

            log::trace!(
                "Trial {} -> {}",
                assignment.values().join(" "),
                if ok { "consistent" } else { "inconsistent" }
            );
            if ok {
                consistent.push(assignment);
            }
        }
        consistent
    }

    /// First assignment with the highest summed confidence
    fn most_confident(&self, candidates: Vec<BTreeMap<String, String>>) -> (BTreeMap<String, String>, u64) {
        let mut best: Option<(BTreeMap<String, String>, u64)> = None;
        for candidate in candidates {
            let score = self.confidence.score(candidate.values());
            if best.as_ref().map_or(true, |(_, top)| score > *top) {
                best = Some((candidate, score));
            }
        }
        best.unwrap_or_default()
    }

    /// Give new senses to ever larger word subsets until some assignment is
    /// consistent. Senses created for a failing subset are removed again.
    fn escalate(
        &mut self,
        space: &SenseSpace,
        pair: &UtteranceMeaningPair,
    ) -> Result<(BTreeMap<String, String>, Vec<String>, usize)> {
        let words: Vec<&String> = space.keys().collect();
        let limit = self
            .np
            .config()
            .escalation_limit
            .unwrap_or(words.len())
            .min(words.len());
        let mut trials = 0;

        for size in 1..=limit {
            for subset in words.iter().copied().combinations(size) {
                let mut augmented = space.clone();
                let mut created = Vec::with_capacity(size);
                for word in subset {
                    let sense = self.senses.add_sense(word);
                    if let Some(senses) = augmented.get_mut(word) {
                        senses.insert(sense.clone());
                    }
                    created.push(sense);
                }
                log::debug!("Trying new senses {}", created.join(", "));

                trials += assignment_count(&augmented);
                let mut consistent = self.consistent_assignments(&augmented, pair);
                if !consistent.is_empty() {
                    return Ok((consistent.swap_remove(0), created, trials));
                }
                for sense in &created {
                    self.senses.remove_sense(sense);
                }
            }
        }

        log::warn!("Exhausted sense escalation for {pair}");
        Err(LearnerError::ExhaustedEscalation {
            utterance: pair.utterance.clone(),
        })
    }
}

/// Cartesian product of the per-word senses. A pair without words has the
/// single empty assignment.
fn assignments(space: &SenseSpace) -> Vec<BTreeMap<String, String>> {
    if space.is_empty() {
        return vec![BTreeMap::new()];
    }
    space
        .values()
        .map(|senses| senses.iter())
        .multi_cartesian_product()
        .map(|choice| {
            space
                .keys()
                .cloned()
                .zip(choice.into_iter().cloned())
                .collect()
        })
        .collect()
}

fn assignment_count(space: &SenseSpace) -> usize {
    space.values().map(BTreeSet::len).product()
}

impl fmt::Display for NoisySymbolLearner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.np)
    }
}
