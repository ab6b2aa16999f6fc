//! Plain-text training corpus format.
//!
//! One pair per line, `#` starts a comment line:
//!
//! ```text
//! "john took the ball" -> { (CAUSE john (GO ball (TO john))), (WANT john ball) }
//! ```

use crate::error::{MeaningError, Result};
use crate::expression::parse_prefix;
use crate::hypothesis::Hypothesis;
use crate::pairs::UtteranceMeaningPair;
use std::path::Path;

/// Parse every pair in `text`
pub fn parse_corpus(text: &str) -> Result<Vec<UtteranceMeaningPair>> {
    let mut pairs = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        pairs.push(parse_pair(trimmed, index + 1)?);
    }
    log::debug!("Parsed {} utterance-meaning pairs", pairs.len());
    Ok(pairs)
}

/// Read and parse a corpus file
pub fn load_corpus(path: &Path) -> Result<Vec<UtteranceMeaningPair>> {
    let text = std::fs::read_to_string(path)?;
    log::debug!("Loading corpus from {}", path.display());
    parse_corpus(&text)
}

fn parse_pair(line: &str, line_no: usize) -> Result<UtteranceMeaningPair> {
    let (utterance, hypotheses) = line
        .split_once("->")
        .ok_or_else(|| MeaningError::parse(line_no, "missing '->' between utterance and hypotheses"))?;

    let utterance = utterance.trim().trim_matches('"').trim();
    if utterance.is_empty() {
        return Err(MeaningError::parse(line_no, "empty utterance"));
    }

    let hypotheses = parse_hypothesis_set(hypotheses.trim(), line_no)?;
    Ok(UtteranceMeaningPair::new(utterance, hypotheses))
}

fn parse_hypothesis_set(text: &str, line_no: usize) -> Result<Vec<Hypothesis>> {
    let inner = text
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| MeaningError::parse(line_no, "hypotheses must be enclosed in '{ }'"))?;

    let mut hypotheses = Vec::new();
    let mut rest = inner.trim_start();
    while !rest.is_empty() {
        let (expression, after) =
            parse_prefix(rest).map_err(|err| MeaningError::parse(line_no, err.to_string()))?;
        hypotheses.push(Hypothesis::new(expression));

        let after = after.trim_start();
        rest = match after.strip_prefix(',') {
            Some(next) if next.trim().is_empty() => {
                return Err(MeaningError::parse(line_no, "trailing ',' in hypothesis set"));
            }
            Some(next) => next.trim_start(),
            None if after.is_empty() => after,
            None => {
                return Err(MeaningError::parse(
                    line_no,
                    format!("expected ',' between hypotheses, found '{after}'"),
                ));
            }
        };
    }
    Ok(hypotheses)
}
