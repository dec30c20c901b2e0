use std::time::Instant;

use crate::engine::PatternEngine;
use crate::types::{AnswerRule, GradingReport, RuleOutcome};
use crate::{synthesize, PatternError, RuleBody, ScoreResult};

/// Normalize a submitted answer before matching.
///
/// Carriage returns are removed and trailing blank lines are always dropped.
/// With `trim` on, every line loses its leading and trailing spaces and
/// tabs, and leading blank lines are dropped too.
pub(crate) fn preprocess(answer: &str, trim: bool) -> String {
    let answer = answer.replace('\r', "");
    let mut lines: Vec<&str> = answer
        .split('\n')
        .map(|line| if trim { trim_horizontal(line) } else { line })
        .collect();

    while lines.last().is_some_and(|line| is_blank(line)) {
        lines.pop();
    }
    if trim {
        let leading = lines.iter().take_while(|line| is_blank(line)).count();
        lines.drain(..leading);
    }

    lines.join("\n")
}

fn trim_horizontal(line: &str) -> &str {
    line.trim_matches(|c| c == ' ' || c == '\t')
}

fn is_blank(line: &str) -> bool {
    trim_horizontal(line).is_empty()
}

/// Unweighted score of one rule body, in `[0, 1]`.
pub(crate) fn score_body(
    body: &RuleBody,
    answer: &str,
    engine: &dyn PatternEngine,
) -> Result<f64, PatternError> {
    // An unparsable spec never earns credit, not even for a blank answer.
    if body.is_degenerate() {
        return Ok(0.0);
    }
    let answer = preprocess(answer, body.flags.trim_spaces);

    if body.flags.match_any_order {
        return score_any_order(body, &answer, engine);
    }

    let pattern = synthesize(&body.regex_fragments[0], body.flags);
    let matched = engine.compile_and_match(&pattern, &answer)?;
    Ok(if matched { 1.0 } else { 0.0 })
}

/// Greedy first-fit assignment of fragments to answer lines.
///
/// Each fragment consumes the first still-unconsumed line it fully matches.
/// Missing lines and extra or wrong lines are each penalized once:
///
/// ```text
/// diff   = fragments - lines
/// points = max(0, fragments - |diff| - (wrong - max(0, -diff)))
/// ```
fn score_any_order(
    body: &RuleBody,
    answer: &str,
    engine: &dyn PatternEngine,
) -> Result<f64, PatternError> {
    let separator = if body.separator.is_empty() {
        crate::types::DEFAULT_SEPARATOR
    } else {
        body.separator.as_str()
    };
    let mut remaining: Vec<&str> = answer.split(separator).collect();
    let answer_lines = remaining.len();

    for fragment in &body.regex_fragments {
        let pattern = synthesize(fragment, body.flags);
        let mut hit = None;
        for (idx, line) in remaining.iter().enumerate() {
            if engine.compile_and_match(&pattern, line)? {
                hit = Some(idx);
                break;
            }
        }
        if let Some(idx) = hit {
            remaining.remove(idx);
        }
    }

    #[allow(clippy::cast_possible_wrap)] // counts are bounded by the answer length
    let (max_points, answer_lines, wrong) = (
        body.regex_fragments.len() as i64,
        answer_lines as i64,
        remaining.len() as i64,
    );
    let points = any_order_points(max_points, answer_lines, wrong);

    if max_points == 0 {
        return Ok(0.0);
    }
    #[allow(clippy::cast_precision_loss)]
    let fraction = points as f64 / max_points as f64;
    Ok(fraction)
}

/// Points awarded in match-any-order mode.
pub(crate) fn any_order_points(max_points: i64, answer_lines: i64, wrong: i64) -> i64 {
    let diff = max_points - answer_lines;
    (max_points - diff.abs() - (wrong - (-diff).max(0))).max(0)
}

/// Grade `answer` against every rule and keep the best weighted fraction.
///
/// A rule becomes a candidate when its unweighted score is above zero. The
/// first candidate is taken even if its weight is zero (so its feedback can
/// be shown); a later candidate replaces it only with a strictly higher
/// weighted fraction. Rules whose pattern fails to compile score zero.
pub(crate) fn grade(
    rules: &[AnswerRule],
    answer: &str,
    engine: &dyn PatternEngine,
) -> ScoreResult {
    let mut best: Option<(usize, f64)> = None;

    for (idx, rule) in rules.iter().enumerate() {
        let raw = match rule.body.score(answer, engine) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(rule = %rule.id, "answer could not be processed: {err}");
                continue;
            }
        };
        if raw <= 0.0 {
            continue;
        }
        let weighted = raw * rule.fraction;
        tracing::debug!(rule = %rule.id, raw, weighted, "rule matched");
        if best.is_none_or(|(_, current)| weighted > current) {
            best = Some((idx, weighted));
        }
    }

    match best {
        Some((idx, fraction)) => ScoreResult::matched(&rules[idx].id, fraction),
        None => ScoreResult::none(),
    }
}

/// Like [`grade`], but records every rule's outcome and the elapsed time.
pub(crate) fn grade_detailed(
    rules: &[AnswerRule],
    answer: &str,
    engine: &dyn PatternEngine,
) -> GradingReport {
    let start = Instant::now();
    let mut best: Option<(usize, f64)> = None;
    let mut outcomes = Vec::with_capacity(rules.len());

    for (idx, rule) in rules.iter().enumerate() {
        let outcome = match rule.body.score(answer, engine) {
            Ok(raw) if raw > 0.0 => {
                let weighted = raw * rule.fraction;
                if best.is_none_or(|(_, current)| weighted > current) {
                    best = Some((idx, weighted));
                }
                RuleOutcome::Matched { raw, weighted }
            }
            Ok(_) => RuleOutcome::NoMatch,
            Err(err) => {
                tracing::warn!(rule = %rule.id, "answer could not be processed: {err}");
                RuleOutcome::Unprocessable(err.to_string())
            }
        };
        outcomes.push((rule.id.clone(), outcome));
    }

    let score = match best {
        Some((idx, fraction)) => ScoreResult::matched(&rules[idx].id, fraction),
        None => ScoreResult::none(),
    };
    GradingReport::new(score, outcomes, start.elapsed())
}
