//! Typed lookups over the raw answer rows: Likert ratings by question
//! sequence and resolved scenario choices by scenario name.

use std::collections::BTreeMap;

use tracing::warn;

use super::domain::{AnswerValue, AttemptSnapshot, ChoiceLabel, QuestionKind};
use super::rubric::ScoringRubric;

/// Likert ratings keyed by question sequence number. Only rating payloads on
/// Likert questions are indexed; anything else is ignored.
pub(crate) fn likert_ratings(snapshot: &AttemptSnapshot) -> BTreeMap<u32, u8> {
    snapshot
        .answers
        .iter()
        .filter(|answer| answer.question_kind == QuestionKind::Likert)
        .filter_map(|answer| match answer.value {
            AnswerValue::Rating { value } => Some((answer.question_sequence, value)),
            _ => None,
        })
        .collect()
}

/// Likert ratings in question-sequence order, for the response-pattern
/// detectors that care about the shape of the whole sequence.
pub(crate) fn ordered_likert_ratings(snapshot: &AttemptSnapshot) -> Vec<u8> {
    likert_ratings(snapshot).into_values().collect()
}

/// Resolve every mapped scenario to the choice the candidate actually made.
///
/// `Some(label)` means the mapped question was answered with an option
/// selection whose position resolves to a label. `None` means the scenario is
/// mapped but unanswered; downstream scoring must keep that distinct from a
/// misaligned choice. Scenario names with no question mapping never appear in
/// the result; the caller treats those as configuration errors.
pub(crate) fn resolve_scenario_choices(
    snapshot: &AttemptSnapshot,
    rubric: &ScoringRubric,
) -> BTreeMap<String, Option<ChoiceLabel>> {
    let mut choices = BTreeMap::new();

    for (scenario, sequence) in &rubric.scenario_questions {
        let resolved = snapshot
            .answers
            .iter()
            .find(|answer| {
                answer.question_sequence == *sequence && answer.question_kind.is_choice()
            })
            .and_then(|answer| match &answer.value {
                AnswerValue::Selection { position, .. } => {
                    let label = ChoiceLabel::from_position(*position);
                    if label.is_none() {
                        warn!(
                            scenario = scenario.as_str(),
                            position, "selected option position has no choice label; treating as unanswered"
                        );
                    }
                    label
                }
                _ => None,
            });

        choices.insert(scenario.clone(), resolved);
    }

    choices
}

#[cfg(test)]
mod tests {
    use super::super::domain::{AttemptId, QuestionKind, RecordedAnswer};
    use super::*;

    fn answer(sequence: u32, kind: QuestionKind, value: AnswerValue) -> RecordedAnswer {
        RecordedAnswer {
            question_sequence: sequence,
            question_kind: kind,
            question_text: format!("Question {sequence}"),
            required: true,
            competency_area: None,
            points_possible: 0,
            points_awarded: 0,
            expected_answer: None,
            value,
        }
    }

    fn snapshot(answers: Vec<RecordedAnswer>) -> AttemptSnapshot {
        AttemptSnapshot {
            attempt_id: AttemptId("att-1".to_string()),
            assessment_id: "asmt-1".to_string(),
            candidate: "cand-1".to_string(),
            completed_at: None,
            answers,
        }
    }

    #[test]
    fn indexes_only_rating_payloads() {
        let snapshot = snapshot(vec![
            answer(1, QuestionKind::Likert, AnswerValue::Rating { value: 4 }),
            answer(
                2,
                QuestionKind::Text,
                AnswerValue::FreeText {
                    text: "hello".to_string(),
                },
            ),
            answer(3, QuestionKind::Likert, AnswerValue::Skipped),
        ]);

        let ratings = likert_ratings(&snapshot);
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings.get(&1), Some(&4));
    }

    #[test]
    fn ratings_on_non_likert_questions_are_not_indexed() {
        let snapshot = snapshot(vec![
            answer(1, QuestionKind::Likert, AnswerValue::Rating { value: 4 }),
            answer(
                2,
                QuestionKind::MultipleChoice,
                AnswerValue::Rating { value: 5 },
            ),
        ]);

        let ratings = likert_ratings(&snapshot);
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings.get(&2), None);
        assert_eq!(ordered_likert_ratings(&snapshot), vec![4]);
    }

    #[test]
    fn resolves_choice_by_position_not_text() {
        let mut rubric = ScoringRubric::standard();
        rubric.scenario_questions = BTreeMap::from([("s1".to_string(), 10)]);

        // The text says "B" but the option sits first, so it is choice A.
        let snapshot = snapshot(vec![answer(
            10,
            QuestionKind::ScenarioChoice,
            AnswerValue::Selection {
                option_text: "Option B".to_string(),
                position: 1,
            },
        )]);

        let choices = resolve_scenario_choices(&snapshot, &rubric);
        assert_eq!(choices.get("s1"), Some(&Some(ChoiceLabel::A)));
    }

    #[test]
    fn unanswered_mapped_scenario_resolves_to_none() {
        let mut rubric = ScoringRubric::standard();
        rubric.scenario_questions = BTreeMap::from([("s1".to_string(), 10)]);

        let choices = resolve_scenario_choices(&snapshot(Vec::new()), &rubric);
        assert_eq!(choices.get("s1"), Some(&None));
    }

    #[test]
    fn non_choice_answers_do_not_resolve() {
        let mut rubric = ScoringRubric::standard();
        rubric.scenario_questions = BTreeMap::from([("s1".to_string(), 10)]);

        let snapshot = snapshot(vec![answer(
            10,
            QuestionKind::Likert,
            AnswerValue::Rating { value: 5 },
        )]);

        let choices = resolve_scenario_choices(&snapshot, &rubric);
        assert_eq!(choices.get("s1"), Some(&None));
    }
}
