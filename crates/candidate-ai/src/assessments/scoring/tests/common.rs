use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::assessments::scoring::domain::{
    AnswerValue, AttemptId, AttemptSnapshot, ChoiceLabel, QuestionKind, RecordedAnswer,
};
use crate::assessments::scoring::repository::{AnswerRepository, RepositoryError};
use crate::assessments::scoring::rubric::{
    CompetencyDefinition, ConsistencyCheck, CorrelationSign, DimensionDefinition, ScenarioIndicator,
    ScoringRubric,
};
use crate::assessments::scoring::service::ReportService;

pub(super) fn generated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 5, 9, 0, 0).single().expect("valid timestamp")
}

/// Synthetic rubric: one dimension fed by Likert questions 1-2 and the
/// scenarios s1 (expected A, weight 1) and s2 (expected B, weight 2) mapped
/// to questions 10 and 11, plus one point-based competency.
pub(super) fn rubric() -> ScoringRubric {
    let mut rubric = ScoringRubric::standard();
    rubric.version = "test-1".to_string();
    rubric.scenario_questions =
        BTreeMap::from([("s1".to_string(), 10), ("s2".to_string(), 11)]);
    rubric.dimensions = vec![DimensionDefinition {
        name: "Integrity".to_string(),
        likert_questions: vec![1, 2],
        indicators: vec![
            ScenarioIndicator {
                scenario: "s1".to_string(),
                expected_choice: ChoiceLabel::A,
                weight: 1.0,
            },
            ScenarioIndicator {
                scenario: "s2".to_string(),
                expected_choice: ChoiceLabel::B,
                weight: 2.0,
            },
        ],
        consistency_checks: vec![ConsistencyCheck {
            likert_questions: vec![1, 2],
            scenarios: vec!["s1".to_string(), "s2".to_string()],
            expected: CorrelationSign::Positive,
        }],
    }];
    rubric.competencies = vec![CompetencyDefinition {
        name: "Communication".to_string(),
        area: "communication".to_string(),
        passing_pct: 70.0,
    }];
    rubric
}

pub(super) fn likert(sequence: u32, value: u8) -> RecordedAnswer {
    RecordedAnswer {
        question_sequence: sequence,
        question_kind: QuestionKind::Likert,
        question_text: format!("Likert question {sequence}"),
        required: true,
        competency_area: None,
        points_possible: 0,
        points_awarded: 0,
        expected_answer: None,
        value: AnswerValue::Rating { value },
    }
}

pub(super) fn skipped_likert(sequence: u32) -> RecordedAnswer {
    RecordedAnswer {
        value: AnswerValue::Skipped,
        ..likert(sequence, 0)
    }
}

pub(super) fn scenario_choice(sequence: u32, position: u32, text: &str) -> RecordedAnswer {
    RecordedAnswer {
        question_sequence: sequence,
        question_kind: QuestionKind::ScenarioChoice,
        question_text: format!("Scenario question {sequence}"),
        required: true,
        competency_area: None,
        points_possible: 0,
        points_awarded: 0,
        expected_answer: None,
        value: AnswerValue::Selection {
            option_text: text.to_string(),
            position,
        },
    }
}

pub(super) fn scored_mcq(
    sequence: u32,
    area: &str,
    awarded: u32,
    possible: u32,
) -> RecordedAnswer {
    RecordedAnswer {
        question_sequence: sequence,
        question_kind: QuestionKind::MultipleChoice,
        question_text: format!("Knowledge question {sequence}"),
        required: true,
        competency_area: Some(area.to_string()),
        points_possible: possible,
        points_awarded: awarded,
        expected_answer: Some("Option A".to_string()),
        value: AnswerValue::Selection {
            option_text: "Option A".to_string(),
            position: 1,
        },
    }
}

pub(super) fn snapshot(answers: Vec<RecordedAnswer>) -> AttemptSnapshot {
    AttemptSnapshot {
        attempt_id: AttemptId("att-100".to_string()),
        assessment_id: "asmt-1".to_string(),
        candidate: "cand-1".to_string(),
        completed_at: Some(Utc.with_ymd_and_hms(2025, 3, 4, 18, 0, 0).single().expect("valid")),
        answers,
    }
}

pub(super) fn incomplete_snapshot(answers: Vec<RecordedAnswer>) -> AttemptSnapshot {
    AttemptSnapshot {
        completed_at: None,
        ..snapshot(answers)
    }
}

/// A complete attempt that scores cleanly under `rubric()`: varied Likert
/// ratings, both scenarios aligned, and 15 of 20 competency points.
pub(super) fn clean_answers() -> Vec<RecordedAnswer> {
    vec![
        likert(1, 4),
        likert(2, 2),
        scenario_choice(10, 1, "Disclose the conflict"),
        scenario_choice(11, 2, "Escalate to the manager"),
        scored_mcq(30, "communication", 8, 10),
        scored_mcq(31, "communication", 7, 10),
    ]
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    snapshots: Arc<Mutex<HashMap<AttemptId, AttemptSnapshot>>>,
}

impl MemoryRepository {
    pub(super) fn with_snapshot(snapshot: AttemptSnapshot) -> Self {
        let repository = Self::default();
        repository.insert(snapshot);
        repository
    }

    pub(super) fn insert(&self, snapshot: AttemptSnapshot) {
        self.snapshots
            .lock()
            .expect("repository mutex poisoned")
            .insert(snapshot.attempt_id.clone(), snapshot);
    }
}

#[async_trait]
impl AnswerRepository for MemoryRepository {
    async fn attempt_snapshot(&self, id: &AttemptId) -> Result<AttemptSnapshot, RepositoryError> {
        self.snapshots
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }
}

pub(super) struct UnavailableRepository;

#[async_trait]
impl AnswerRepository for UnavailableRepository {
    async fn attempt_snapshot(&self, _id: &AttemptId) -> Result<AttemptSnapshot, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service(snapshot: AttemptSnapshot) -> Arc<ReportService<MemoryRepository>> {
    Arc::new(ReportService::new(
        Arc::new(MemoryRepository::with_snapshot(snapshot)),
        rubric(),
    ))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
