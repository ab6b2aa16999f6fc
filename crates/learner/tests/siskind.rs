use anyhow::Result;
use pretty_assertions::assert_eq;
use wordsense_learner::{
    FiniteSymbolTable, Meaning, Meanings, NpSymbolLearner, Rule, SymbolTable, Symbols,
    UniversalSymbolTable,
};
use wordsense_meaning::{parse_corpus, Hypothesis, SymbolSet, UtteranceMeaningPair};

const CORPUS: &str = include_str!("fixtures/siskind1996.txt");
const WORDS: [&str; 4] = ["john", "took", "the", "ball"];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn finite(symbols: &[&str]) -> Symbols {
    Symbols::from(SymbolSet::of(symbols.iter().copied()))
}

fn learner() -> NpSymbolLearner {
    let mut necessary = FiniteSymbolTable::new();
    necessary.add("john", ["john"]);
    necessary.add("took", ["CAUSE"]);
    necessary.entry("the");
    necessary.add("ball", ["ball"]);

    let mut possible = UniversalSymbolTable::new();
    possible.insert("john", finite(&["john", "ball"]));
    possible.insert("took", finite(&["CAUSE", "WANT", "GO", "TO", "arm"]));
    possible.insert("the", finite(&["WANT", "arm"]));
    possible.insert("ball", finite(&["ball", "arm"]));

    NpSymbolLearner::with_tables(necessary, possible)
}

fn pair() -> Result<UtteranceMeaningPair> {
    let mut pairs = parse_corpus(CORPUS)?;
    assert_eq!(pairs.len(), 1);
    Ok(pairs.remove(0))
}

fn intended() -> Hypothesis {
    "(CAUSE (john (GO (ball (TO john)))))".parse().unwrap()
}

#[test]
fn rule_one_keeps_only_the_cause_go_to_hypothesis() -> Result<()> {
    init_logging();
    let mut learner = learner();
    let mut pair = pair()?;
    assert_eq!(pair.hypotheses.len(), 3);

    learner.apply(Rule::FilterHypotheses, &mut pair);

    assert_eq!(pair.hypotheses.into_iter().collect::<Vec<_>>(), vec![intended()]);
    Ok(())
}

#[test]
fn rule_two_prunes_unused_symbols_from_possible() -> Result<()> {
    init_logging();
    let mut learner = learner();
    let mut pair = pair()?;

    learner.apply(Rule::FilterHypotheses, &mut pair);
    learner.apply(Rule::PrunePossible, &mut pair);

    let took = learner.possible("took");
    assert!(!took.contains("WANT"));
    assert!(!took.contains("arm"));
    let the = learner.possible("the");
    assert!(!the.contains("WANT"));
    assert!(!the.contains("arm"));
    assert!(!learner.possible("ball").contains("arm"));

    assert_eq!(*took, finite(&["CAUSE", "GO", "TO"]));
    assert_eq!(*the, Symbols::empty());
    Ok(())
}

#[test]
fn rule_three_promotes_go_and_to_for_took() -> Result<()> {
    init_logging();
    let mut learner = learner();
    let mut pair = pair()?;

    for rule in [Rule::FilterHypotheses, Rule::PrunePossible] {
        learner.apply(rule, &mut pair);
    }
    assert!(!learner.necessary("took").contains("GO"));
    learner.apply(Rule::PromoteNecessary, &mut pair);

    assert!(learner.necessary("took").contains("GO"));
    assert!(learner.necessary("took").contains("TO"));
    assert_eq!(*learner.necessary("took"), SymbolSet::of(["CAUSE", "GO", "TO"]));
    // ball is still possible for john, so nobody is promoted to it
    assert_eq!(*learner.necessary("ball"), SymbolSet::of(["ball"]));
    Ok(())
}

#[test]
fn rule_four_removes_ball_from_john() -> Result<()> {
    init_logging();
    let mut learner = learner();
    let mut pair = pair()?;

    for rule in [Rule::FilterHypotheses, Rule::PrunePossible, Rule::PromoteNecessary] {
        learner.apply(rule, &mut pair);
    }
    assert!(learner.possible("john").contains("ball"));
    learner.apply(Rule::PruneSingletons, &mut pair);

    assert!(!learner.possible("john").contains("ball"));
    assert_eq!(*learner.possible("john"), finite(&["john"]));
    Ok(())
}

#[test]
fn every_word_converges_after_one_pair() -> Result<()> {
    init_logging();
    let mut learner = learner();
    let mut pair = pair()?;

    assert!(WORDS.iter().any(|word| !learner.converged(word)));
    learner.process(&mut pair);

    for word in WORDS {
        assert!(learner.converged(word), "{word} did not converge:\n{learner}");
        assert!(learner.consistent(word));
    }
    assert!(learner.all_consistent());
    Ok(())
}

#[test]
fn converged_words_resolve_their_expressions() -> Result<()> {
    init_logging();
    let mut learner = learner();
    let mut pair = pair()?;
    learner.process(&mut pair);

    assert_eq!(
        *learner.expressions("john"),
        Meanings::Finite([Meaning::Variable("john".into())].into())
    );
    assert_eq!(
        *learner.expressions("ball"),
        Meanings::Finite([Meaning::Variable("ball".into())].into())
    );
    assert_eq!(*learner.expressions("the"), Meanings::bottom());
    assert_eq!(
        *learner.expressions("took"),
        Meanings::Finite([Meaning::Expression(intended().expression().clone())].into())
    );
    Ok(())
}

#[test]
fn rules_are_idempotent_on_a_minimal_hypothesis_set() -> Result<()> {
    init_logging();
    let mut learner = learner();
    let mut pair = pair()?;
    learner.process(&mut pair);
    let minimal = pair.hypotheses.clone();
    let lexicon = learner.snapshot();

    learner.process(&mut pair);

    assert_eq!(pair.hypotheses, minimal);
    assert_eq!(learner.lexicon(), &lexicon);
    Ok(())
}

#[test]
fn fresh_learner_narrows_monotonically_over_a_corpus() -> Result<()> {
    init_logging();
    let corpus = r#"
"john took the ball" -> { (CAUSE (john (GO (ball (TO john))))), (WANT (john ball)) }
"john took the ball" -> { (CAUSE (john (GO (ball (TO john))))) }
"mary took the ball" -> { (CAUSE (mary (GO (ball (TO mary))))) }
"ball" -> { ball }
"the ball" -> { ball }
"#;
    let pairs = parse_corpus(corpus)?;
    let mut learner = NpSymbolLearner::default();

    for pair in &pairs {
        let before = learner.snapshot();
        let mut pair = pair.clone();
        learner.process(&mut pair);

        for word in before.words() {
            assert!(
                before.necessary.get(word).is_subset(&learner.necessary(word)),
                "N({word}) shrank"
            );
            if let Some(after) = learner.possible(word).as_finite() {
                assert!(before.possible.get(word).includes(after), "P({word}) grew");
            }
        }
    }

    assert!(learner.converged("ball"));
    assert_eq!(*learner.necessary("ball"), SymbolSet::of(["ball"]));
    assert!(learner.converged("the"));
    assert_eq!(*learner.expressions("the"), Meanings::bottom());
    Ok(())
}
