//! Report assembly: the pure entry point that turns an attempt snapshot and
//! a rubric into one `AssessmentReport`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::behavioral::{score_dimensions, BehavioralScore};
use super::competency::{score_competencies, CompetencyScore};
use super::domain::{AnswerValue, AttemptId, AttemptSnapshot, ChoiceLabel, QuestionKind};
use super::integrity::{assess_integrity, IntegrityAssessment};
use super::policies;
use super::responses;
use super::rubric::{RecommendationTier, ScoringRubric};

/// One question-by-question row for the administrator view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDetail {
    pub sequence: u32,
    pub kind: QuestionKind,
    pub question: String,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    pub points_awarded: u32,
    pub points_possible: u32,
}

/// The assembled report for one attempt. Produced fresh on every generation;
/// identical inputs (including `generated_at`) produce identical reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub attempt_id: AttemptId,
    pub assessment_id: String,
    pub candidate: String,
    pub generated_at: DateTime<Utc>,
    pub rubric_version: String,
    pub overall_percentage: f64,
    pub overall_pass: bool,
    pub recommendation: RecommendationTier,
    pub competencies: Vec<CompetencyScore>,
    pub behavioral: Vec<BehavioralScore>,
    pub integrity: IntegrityAssessment,
    pub questions: Vec<QuestionDetail>,
}

impl AssessmentReport {
    pub fn summary(&self) -> ReportSummaryView {
        ReportSummaryView {
            attempt_id: self.attempt_id.clone(),
            candidate: self.candidate.clone(),
            generated_at: self.generated_at,
            overall_percentage: self.overall_percentage,
            overall_pass: self.overall_pass,
            recommendation: self.recommendation.label(),
            integrity_score: self.integrity.score,
            red_flag_count: self.red_flag_count(),
            competencies: self
                .competencies
                .iter()
                .map(|score| CompetencySummaryEntry {
                    name: score.name.clone(),
                    percentage: score.percentage,
                    level: score.level.label(),
                    is_passing: score.is_passing,
                })
                .collect(),
            behavioral: self
                .behavioral
                .iter()
                .map(|score| BehavioralSummaryEntry {
                    dimension: score.dimension.clone(),
                    level: score.level.label(),
                    ethical_alignment: score.ethical_alignment,
                })
                .collect(),
        }
    }

    pub fn red_flag_count(&self) -> usize {
        self.integrity.red_flags.len()
            + self
                .behavioral
                .iter()
                .map(|score| score.red_flags.len())
                .sum::<usize>()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompetencySummaryEntry {
    pub name: String,
    pub percentage: f64,
    pub level: &'static str,
    pub is_passing: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BehavioralSummaryEntry {
    pub dimension: String,
    pub level: &'static str,
    pub ethical_alignment: f64,
}

/// Compact view for list screens and status endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummaryView {
    pub attempt_id: AttemptId,
    pub candidate: String,
    pub generated_at: DateTime<Utc>,
    pub overall_percentage: f64,
    pub overall_pass: bool,
    pub recommendation: &'static str,
    pub integrity_score: u8,
    pub red_flag_count: usize,
    pub competencies: Vec<CompetencySummaryEntry>,
    pub behavioral: Vec<BehavioralSummaryEntry>,
}

/// Score a completed attempt. Deterministic and side-effect free; the
/// timestamp is injected rather than sampled so repeated generations agree.
pub fn score_attempt(
    snapshot: &AttemptSnapshot,
    rubric: &ScoringRubric,
    generated_at: DateTime<Utc>,
) -> AssessmentReport {
    let ratings = responses::likert_ratings(snapshot);
    let choices = responses::resolve_scenario_choices(snapshot, rubric);
    let ordered_ratings = responses::ordered_likert_ratings(snapshot);

    let behavioral = score_dimensions(&ratings, &choices, rubric);
    let competencies = score_competencies(snapshot, &rubric.competencies);
    let integrity = assess_integrity(&ordered_ratings, &behavioral, &rubric.integrity);

    let earned: u32 = snapshot
        .answers
        .iter()
        .map(|answer| answer.points_awarded)
        .sum();
    let possible: u32 = snapshot
        .answers
        .iter()
        .map(|answer| answer.points_possible)
        .sum();
    let overall_percentage = policies::guarded_percentage(f64::from(earned), f64::from(possible));

    let integrity_clean = !rubric.require_clean_integrity || !integrity.has_high_severity_flag();
    let overall_pass = overall_percentage >= rubric.overall_passing_pct && integrity_clean;

    let recommendation = recommend(rubric, overall_pass, &competencies, integrity.score);

    let questions = snapshot
        .answers
        .iter()
        .map(|answer| QuestionDetail {
            sequence: answer.question_sequence,
            kind: answer.question_kind,
            question: answer.question_text.clone(),
            response: render_response(&answer.value),
            expected: answer.expected_answer.clone(),
            points_awarded: answer.points_awarded,
            points_possible: answer.points_possible,
        })
        .collect();

    AssessmentReport {
        attempt_id: snapshot.attempt_id.clone(),
        assessment_id: snapshot.assessment_id.clone(),
        candidate: snapshot.candidate.clone(),
        generated_at,
        rubric_version: rubric.version.clone(),
        overall_percentage,
        overall_pass,
        recommendation,
        competencies,
        behavioral,
        integrity,
        questions,
    }
}

/// First-match walk of the configured decision table; `DoNotHire` when no
/// rule matches.
fn recommend(
    rubric: &ScoringRubric,
    overall_pass: bool,
    competencies: &[CompetencyScore],
    integrity_score: u8,
) -> RecommendationTier {
    let pass_ratio = if competencies.is_empty() {
        1.0
    } else {
        competencies.iter().filter(|score| score.is_passing).count() as f64
            / competencies.len() as f64
    };

    for rule in &rubric.recommendation_rules {
        if rule.requires_overall_pass && !overall_pass {
            continue;
        }
        if pass_ratio >= rule.min_competency_pass_ratio
            && integrity_score >= rule.min_integrity_score
        {
            return rule.tier;
        }
    }

    RecommendationTier::DoNotHire
}

/// Render a candidate's answer by question type for the report detail rows.
fn render_response(value: &AnswerValue) -> String {
    match value {
        AnswerValue::Selection {
            option_text,
            position,
        } => match ChoiceLabel::from_position(*position) {
            Some(label) => format!("{}. {}", label.label(), option_text),
            None => option_text.clone(),
        },
        AnswerValue::FreeText { text } => text.clone(),
        AnswerValue::Rating { value } => format!("{value}/5"),
        AnswerValue::Video { storage_key } => format!("video response ({storage_key})"),
        AnswerValue::Skipped => "not answered".to_string(),
    }
}
