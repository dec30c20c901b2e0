use crate::parse::{validate, KeyProfile};
use crate::types::{AnswerRule, AuthoringError, SlotError};
use crate::{CompileError, RuleSet};

const FULL_GRADE_TOLERANCE: f64 = 0.000_001;

/// Validate an authored answer set and build a [`RuleSet`] from it.
///
/// Slots with a blank specification are dropped from the result; they are
/// only an error when they carry a grade or feedback.
pub(crate) fn compile(
    rules: Vec<AnswerRule>,
    profile: KeyProfile,
) -> Result<RuleSet, CompileError> {
    let errors = check(&rules, profile);
    if !errors.is_empty() {
        return Err(CompileError::Invalid { errors });
    }

    let rules = rules
        .into_iter()
        .filter(|rule| !is_blank(rule))
        .collect();
    Ok(RuleSet::from_rules(rules))
}

pub(crate) fn check(rules: &[AnswerRule], profile: KeyProfile) -> Vec<SlotError> {
    let mut errors = Vec::new();
    let mut authored = 0usize;
    let mut full_grade = false;

    for (slot, rule) in rules.iter().enumerate() {
        if is_blank(rule) {
            if rule.fraction != 0.0 || !rule.feedback.trim().is_empty() {
                errors.push(slot_error(slot, rule, AuthoringError::GradeWithoutRegex));
                authored += 1;
            }
            continue;
        }

        authored += 1;
        if (rule.fraction - 1.0).abs() < FULL_GRADE_TOLERANCE {
            full_grade = true;
        }
        for error in validate(&rule.spec, profile) {
            errors.push(slot_error(slot, rule, error.into()));
        }
    }

    let first_id = rules.first().map(|r| r.id.clone()).unwrap_or_default();
    if authored == 0 {
        errors.push(SlotError {
            slot: 0,
            id: first_id,
            error: AuthoringError::NoAnswers,
        });
    } else if !full_grade {
        errors.push(SlotError {
            slot: 0,
            id: first_id,
            error: AuthoringError::NoFullGrade,
        });
    }

    errors
}

fn is_blank(rule: &AnswerRule) -> bool {
    rule.spec.trim().is_empty()
}

fn slot_error(slot: usize, rule: &AnswerRule, error: AuthoringError) -> SlotError {
    SlotError {
        slot,
        id: rule.id.clone(),
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FeedbackFormat, ValidationError};

    fn rule(id: &str, spec: &str, fraction: f64) -> AnswerRule {
        AnswerRule::new(id, spec, fraction)
    }

    #[test]
    fn valid_set_compiles_and_drops_blank_slots() {
        let ruleset = compile(
            vec![rule("a", "[[x]]//", 1.0), rule("b", "", 0.0)],
            KeyProfile::Question,
        )
        .unwrap();
        assert_eq!(ruleset.len(), 1);
    }

    #[test]
    fn no_answers() {
        let errors = check(&[rule("a", "  ", 0.0)], KeyProfile::Question);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error, AuthoringError::NoAnswers);
    }

    #[test]
    fn empty_set_has_no_answers() {
        let errors = check(&[], KeyProfile::Question);
        assert_eq!(errors[0].error, AuthoringError::NoAnswers);
        assert_eq!(errors[0].id, "");
    }

    #[test]
    fn no_full_grade() {
        let errors = check(&[rule("a", "[[x]]//", 0.5)], KeyProfile::Question);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error, AuthoringError::NoFullGrade);
    }

    #[test]
    fn grade_without_regex() {
        let errors = check(
            &[
                rule("a", "[[x]]//", 1.0),
                rule("b", "", 0.5),
                rule("c", "", 0.0).with_feedback("hint", FeedbackFormat::Html),
            ],
            KeyProfile::Question,
        );
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].slot, 1);
        assert_eq!(errors[0].error, AuthoringError::GradeWithoutRegex);
        assert_eq!(errors[1].slot, 2);
    }

    #[test]
    fn spec_errors_are_reported_per_slot() {
        let errors = check(
            &[rule("a", "[[x]]//", 1.0), rule("b", "[[y$]]/Q/", 0.0)],
            KeyProfile::Question,
        );
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.slot == 1 && e.id == "b"));
        assert_eq!(
            errors[0].error,
            AuthoringError::Spec(ValidationError::IllegalOption { option: 'Q' })
        );
    }

    #[test]
    fn compile_returns_all_errors() {
        let err = compile(
            vec![rule("a", "[[x]]/Q/", 0.5)],
            KeyProfile::Question,
        )
        .unwrap_err();
        assert_eq!(err.errors().len(), 2);
    }
}
