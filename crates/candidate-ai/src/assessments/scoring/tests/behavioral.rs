use super::common::*;
use crate::assessments::scoring::domain::{FlagCategory, FlagSeverity};
use crate::assessments::scoring::report::score_attempt;
use crate::assessments::scoring::BehavioralLevel;

#[test]
fn self_report_is_sixty_percent_for_ratings_four_and_two() {
    let report = score_attempt(&snapshot(clean_answers()), &rubric(), generated_at());

    let dimension = &report.behavioral[0];
    assert_close(dimension.self_report_pct, 60.0);
}

#[test]
fn missing_likert_answer_still_counts_toward_the_maximum() {
    // Only question 1 answered out of the configured [1, 2].
    let report = score_attempt(&snapshot(vec![likert(1, 4)]), &rubric(), generated_at());

    assert_close(report.behavioral[0].self_report_pct, 40.0);
}

#[test]
fn dimension_without_scenarios_is_fully_aligned() {
    let mut rubric = rubric();
    rubric.dimensions[0].indicators.clear();
    rubric.dimensions[0].consistency_checks.clear();

    let report = score_attempt(
        &snapshot(vec![likert(1, 4), likert(2, 2)]),
        &rubric,
        generated_at(),
    );

    assert_close(report.behavioral[0].ethical_alignment, 1.0);
}

#[test]
fn dimension_without_likert_questions_scores_the_sentinel() {
    let mut rubric = rubric();
    rubric.dimensions[0].likert_questions.clear();
    rubric.dimensions[0].consistency_checks.clear();

    let report = score_attempt(&snapshot(clean_answers()), &rubric, generated_at());

    let pct = report.behavioral[0].self_report_pct;
    assert_eq!(pct, 0.0);
    assert!(!pct.is_nan());
}

#[test]
fn all_expected_choices_align_fully_regardless_of_weights() {
    let report = score_attempt(&snapshot(clean_answers()), &rubric(), generated_at());

    let dimension = &report.behavioral[0];
    assert_close(dimension.ethical_alignment, 1.0);
    assert_eq!(dimension.scenarios_answered, 2);
    assert_eq!(dimension.scenarios_unanswered, 0);
}

#[test]
fn option_position_beats_contradictory_option_text() {
    // The option text claims to be "B" but sits at position 1, so it
    // resolves to choice A and aligns with s1's expectation.
    let mut rubric = rubric();
    rubric.dimensions[0].indicators.truncate(1);
    rubric.dimensions[0].consistency_checks.clear();

    let answers = vec![scenario_choice(10, 1, "Option B")];
    let report = score_attempt(&snapshot(answers), &rubric, generated_at());

    assert_close(report.behavioral[0].ethical_alignment, 1.0);
}

#[test]
fn unanswered_scenario_counts_weight_but_never_alignment() {
    let mut rubric = rubric();
    rubric.dimensions[0].indicators.truncate(1);
    rubric.dimensions[0].consistency_checks.clear();

    // No answer at all for the single weight-1 scenario.
    let report = score_attempt(
        &snapshot(vec![likert(1, 4), likert(2, 2)]),
        &rubric,
        generated_at(),
    );

    let dimension = &report.behavioral[0];
    assert_close(dimension.ethical_alignment, 0.0);
    assert_eq!(dimension.scenarios_answered, 0);
    assert_eq!(dimension.scenarios_unanswered, 1);
}

#[test]
fn misaligned_choices_raise_a_flag_with_evidence() {
    // Both scenarios answered with the opposite of the expected choice.
    let answers = vec![
        likert(1, 4),
        likert(2, 2),
        scenario_choice(10, 2, "Keep it quiet"),
        scenario_choice(11, 1, "Cover for them"),
    ];
    let report = score_attempt(&snapshot(answers), &rubric(), generated_at());

    let dimension = &report.behavioral[0];
    assert_close(dimension.ethical_alignment, 0.0);

    let flag = dimension
        .red_flags
        .iter()
        .find(|flag| flag.category == FlagCategory::EthicalMisalignment)
        .expect("misalignment flag");
    assert_eq!(flag.severity, FlagSeverity::High);
    assert_eq!(flag.evidence.len(), 2);
    assert!(flag.evidence[0].contains("s1"));
}

#[test]
fn consistency_neutral_fills_missing_likert_answers() {
    // No Likert answers: the check averages to the neutral midpoint 3, both
    // scenarios align, so the proxy is 1 - |3/5 - 1| = 0.6.
    let answers = vec![
        scenario_choice(10, 1, "Disclose the conflict"),
        scenario_choice(11, 2, "Escalate to the manager"),
    ];
    let report = score_attempt(&snapshot(answers), &rubric(), generated_at());

    assert_close(report.behavioral[0].consistency, 0.6);
}

#[test]
fn consistency_defaults_to_one_without_checks() {
    let mut rubric = rubric();
    rubric.dimensions[0].consistency_checks.clear();

    let report = score_attempt(&snapshot(clean_answers()), &rubric, generated_at());

    assert_close(report.behavioral[0].consistency, 1.0);
}

#[test]
fn low_consistency_raises_an_inconsistency_flag() {
    // Maximal self-report with zero alignment drives the proxy to 0.
    let answers = vec![
        likert(1, 5),
        likert(2, 5),
        scenario_choice(10, 2, "Keep it quiet"),
        scenario_choice(11, 1, "Cover for them"),
    ];
    let report = score_attempt(&snapshot(answers), &rubric(), generated_at());

    let dimension = &report.behavioral[0];
    assert_close(dimension.consistency, 0.0);
    assert!(dimension
        .red_flags
        .iter()
        .any(|flag| flag.category == FlagCategory::Inconsistency
            && flag.severity == FlagSeverity::High));
}

#[test]
fn level_follows_the_weaker_signal() {
    // Self-report 100% but alignment 0 must not land on High.
    let answers = vec![
        likert(1, 5),
        likert(2, 5),
        scenario_choice(10, 2, "Keep it quiet"),
        scenario_choice(11, 1, "Cover for them"),
    ];
    let report = score_attempt(&snapshot(answers), &rubric(), generated_at());
    assert_eq!(report.behavioral[0].level, BehavioralLevel::Low);

    let clean = score_attempt(&snapshot(clean_answers()), &rubric(), generated_at());
    // Self-report 60% with full alignment bands as moderate.
    assert_eq!(clean.behavioral[0].level, BehavioralLevel::Moderate);
}
