use candidate_ai::assessments::export::AnswerExportImporter;
use candidate_ai::assessments::scoring::{
    score_attempt, AnswerValue, AssessmentReport, AttemptId, AttemptSnapshot, QuestionKind,
    RecordedAnswer, ReportError, ScoringRubric,
};
use candidate_ai::config::ScoringConfig;
use candidate_ai::error::AppError;
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use std::path::PathBuf;

use crate::infra::load_rubric;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Report timestamp as RFC 3339 (defaults to now).
    #[arg(long, value_parser = crate::infra::parse_timestamp)]
    pub(crate) generated_at: Option<DateTime<Utc>>,
    /// Emit the full report as JSON instead of the rendered view.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreReportArgs {
    /// Path to a CSV answers export for a single attempt
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Optional rubric JSON overriding the built-in standard rubric
    #[arg(long)]
    pub(crate) rubric: Option<PathBuf>,
    /// Report timestamp as RFC 3339 (defaults to now)
    #[arg(long, value_parser = crate::infra::parse_timestamp)]
    pub(crate) generated_at: Option<DateTime<Utc>>,
    /// Emit the full report as JSON instead of the rendered view
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score_report(args: ScoreReportArgs) -> Result<(), AppError> {
    let ScoreReportArgs {
        answers,
        rubric,
        generated_at,
        json,
    } = args;

    let rubric = load_rubric(&ScoringConfig {
        rubric_path: rubric,
    })?;
    let snapshot = AnswerExportImporter::from_path(answers)?;
    if !snapshot.is_complete() {
        return Err(ReportError::AttemptIncomplete(snapshot.attempt_id.0.clone()).into());
    }

    let generated_at = generated_at.unwrap_or_else(Utc::now);
    let report = score_attempt(&snapshot, &rubric, generated_at);

    if json {
        print_json(&report);
    } else {
        render_report(&report);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { generated_at, json } = args;

    let rubric = ScoringRubric::standard();
    let snapshot = demo_attempt_snapshot();
    let generated_at = generated_at.unwrap_or_else(Utc::now);

    println!("Assessment scoring demo (seeded attempt)");
    let report = score_attempt(&snapshot, &rubric, generated_at);

    if json {
        print_json(&report);
        return Ok(());
    }

    render_report(&report);

    match serde_json::to_string_pretty(&report.summary()) {
        Ok(payload) => println!("\nSummary payload:\n{}", payload),
        Err(err) => println!("\nSummary payload unavailable: {}", err),
    }

    Ok(())
}

fn print_json(report: &AssessmentReport) {
    match serde_json::to_string_pretty(report) {
        Ok(payload) => println!("{}", payload),
        Err(err) => println!("Report payload unavailable: {}", err),
    }
}

pub(crate) fn render_report(report: &AssessmentReport) {
    println!(
        "Attempt {} | assessment {} | candidate {}",
        report.attempt_id.0, report.assessment_id, report.candidate
    );
    println!(
        "Rubric {} | generated {}",
        report.rubric_version, report.generated_at
    );
    println!(
        "\nOverall: {:.1}% -> {}",
        report.overall_percentage,
        if report.overall_pass { "PASS" } else { "FAIL" }
    );
    println!("Recommendation: {}", report.recommendation.label());

    println!("\nCompetencies");
    for competency in &report.competencies {
        println!(
            "- {}: {}/{} points ({:.1}%) | {} | {}",
            competency.name,
            competency.points_earned,
            competency.points_possible,
            competency.percentage,
            competency.level.label(),
            if competency.is_passing {
                "passing"
            } else {
                "below bar"
            }
        );
    }

    println!("\nBehavioral dimensions");
    for dimension in &report.behavioral {
        println!(
            "- {}: self-report {:.0}% | alignment {:.2} | consistency {:.2} | {}",
            dimension.dimension,
            dimension.self_report_pct,
            dimension.ethical_alignment,
            dimension.consistency,
            dimension.level.label()
        );
        println!("  {}", dimension.interpretation);
        if dimension.scenarios_unanswered > 0 {
            println!(
                "  Scenarios answered: {} ({} unanswered)",
                dimension.scenarios_answered, dimension.scenarios_unanswered
            );
        }
        for flag in &dimension.red_flags {
            println!(
                "  Flag [{}] {}: {}",
                flag.severity.label(),
                flag.category.label(),
                flag.description
            );
        }
        for recommendation in &dimension.recommendations {
            println!("  Next step: {}", recommendation);
        }
    }

    let integrity = &report.integrity;
    println!("\nIntegrity: {}/100", integrity.score);
    println!(
        "- Desirability bias {} | consistency {} | self-awareness {} ({:.0}%)",
        integrity.desirability_bias.label(),
        integrity.consistency_rating.label(),
        integrity.self_awareness_rating.label(),
        integrity.self_awareness * 100.0
    );
    if integrity.patterns.is_empty() {
        println!("- Response patterns: none detected");
    } else {
        for pattern in &integrity.patterns {
            println!(
                "- Pattern [{}] {}: {}",
                pattern.severity.label(),
                pattern.kind.label(),
                pattern.description
            );
        }
    }
    for flag in &integrity.red_flags {
        println!(
            "- Flag [{}] {}: {}",
            flag.severity.label(),
            flag.category.label(),
            flag.description
        );
        for evidence in &flag.evidence {
            println!("    evidence: {}", evidence);
        }
        println!("    recommendation: {}", flag.recommendation);
    }

    println!("\nQuestion detail");
    for question in &report.questions {
        let points_note = if question.points_possible > 0 {
            format!(" | {}/{} pts", question.points_awarded, question.points_possible)
        } else {
            String::new()
        };
        println!(
            "- Q{} [{}] {}{}",
            question.sequence,
            question.kind.label(),
            question.response,
            points_note
        );
    }
}

/// A seeded attempt that exercises every scorer against the standard rubric:
/// varied Likert ratings, all four scenarios answered, and three scored
/// competency areas.
fn demo_attempt_snapshot() -> AttemptSnapshot {
    let completed_at = Utc::now() - Duration::hours(2);

    let likert = |sequence: u32, statement: &str, value: u8| RecordedAnswer {
        question_sequence: sequence,
        question_kind: QuestionKind::Likert,
        question_text: statement.to_string(),
        required: true,
        competency_area: None,
        points_possible: 0,
        points_awarded: 0,
        expected_answer: None,
        value: AnswerValue::Rating { value },
    };

    let scenario = |sequence: u32, prompt: &str, position: u32, choice: &str| RecordedAnswer {
        question_sequence: sequence,
        question_kind: QuestionKind::ScenarioChoice,
        question_text: prompt.to_string(),
        required: true,
        competency_area: None,
        points_possible: 0,
        points_awarded: 0,
        expected_answer: None,
        value: AnswerValue::Selection {
            option_text: choice.to_string(),
            position,
        },
    };

    let scored = |sequence: u32, prompt: &str, area: &str, awarded: u32| RecordedAnswer {
        question_sequence: sequence,
        question_kind: QuestionKind::MultipleChoice,
        question_text: prompt.to_string(),
        required: true,
        competency_area: Some(area.to_string()),
        points_possible: 10,
        points_awarded: awarded,
        expected_answer: Some("Option A".to_string()),
        value: AnswerValue::Selection {
            option_text: "Option A".to_string(),
            position: 1,
        },
    };

    AttemptSnapshot {
        attempt_id: AttemptId("demo-attempt".to_string()),
        assessment_id: "demo-assessment".to_string(),
        candidate: "demo-candidate".to_string(),
        completed_at: Some(completed_at),
        answers: vec![
            likert(1, "I admit my mistakes even when it costs me", 4),
            likert(2, "I report problems as soon as I find them", 4),
            likert(3, "I am honest even when nobody is checking", 3),
            likert(4, "I follow through on my commitments", 4),
            likert(5, "I take ownership when a handoff fails", 3),
            likert(6, "I meet deadlines I agree to", 4),
            likert(7, "I put the customer's needs first", 5),
            likert(8, "I stay patient with frustrated customers", 4),
            scenario(
                21,
                "A vendor bidding on your project is a close friend",
                1,
                "Disclose the relationship to your manager",
            ),
            scenario(
                22,
                "A teammate asks you to pad a shared expense report",
                1,
                "Decline and file the report accurately",
            ),
            scenario(
                23,
                "A customer asks for a delivery date you cannot guarantee",
                2,
                "Offer a realistic date and explain the tradeoff",
            ),
            scenario(
                24,
                "A peer skips a required safety check to hit a deadline",
                1,
                "Raise it with the peer directly",
            ),
            scored(30, "Pick the clearest status update", "communication", 8),
            scored(31, "Choose the best reply to an upset customer", "communication", 9),
            scored(40, "Identify the root cause in the incident log", "problem_solving", 7),
            scored(41, "Select the next diagnostic step", "problem_solving", 7),
            scored(50, "Which policy applies to this request?", "role_knowledge", 6),
            scored(51, "Pick the correct escalation path", "role_knowledge", 8),
        ],
    }
}
