use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier wrapper for assessment attempts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptId(pub String);

/// Question shapes the platform records answers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    Text,
    Likert,
    Video,
    ScenarioChoice,
}

impl QuestionKind {
    pub const fn label(self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::Text => "text",
            QuestionKind::Likert => "likert",
            QuestionKind::Video => "video",
            QuestionKind::ScenarioChoice => "scenario_choice",
        }
    }

    /// Choice-typed questions carry an option selection that scenario
    /// resolution can interpret positionally.
    pub const fn is_choice(self) -> bool {
        matches!(
            self,
            QuestionKind::MultipleChoice | QuestionKind::ScenarioChoice
        )
    }
}

/// Exactly one payload per recorded answer. The source store kept several
/// optional columns side by side; collapsing them rules out multi-field rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerValue {
    Selection { option_text: String, position: u32 },
    FreeText { text: String },
    Rating { value: u8 },
    Video { storage_key: String },
    Skipped,
}

/// Positional choice labels for ethical scenarios. The option's ordinal
/// position among its siblings carries the meaning, never its display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceLabel {
    A,
    B,
    C,
    D,
}

impl ChoiceLabel {
    /// The single place the 1-based position convention lives: position 1 is
    /// choice A, position 2 is choice B, and so on.
    pub const fn from_position(position: u32) -> Option<Self> {
        match position {
            1 => Some(ChoiceLabel::A),
            2 => Some(ChoiceLabel::B),
            3 => Some(ChoiceLabel::C),
            4 => Some(ChoiceLabel::D),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ChoiceLabel::A => "A",
            ChoiceLabel::B => "B",
            ChoiceLabel::C => "C",
            ChoiceLabel::D => "D",
        }
    }
}

/// One answer row as returned by the store join: the answer payload plus the
/// originating question's metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedAnswer {
    pub question_sequence: u32,
    pub question_kind: QuestionKind,
    pub question_text: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competency_area: Option<String>,
    pub points_possible: u32,
    pub points_awarded: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_answer: Option<String>,
    pub value: AnswerValue,
}

/// Immutable snapshot of one candidate's pass through one assessment.
/// Scoring is read-only over this value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptSnapshot {
    pub attempt_id: AttemptId,
    pub assessment_id: String,
    pub candidate: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub answers: Vec<RecordedAnswer>,
}

impl AttemptSnapshot {
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Rejects payloads no well-formed answer row can carry. The platform
    /// store and the export importer both enforce these bounds, so a
    /// violation means a corrupt adapter feeding the scorer.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        for answer in &self.answers {
            match &answer.value {
                AnswerValue::Rating { value } if !(1..=5).contains(value) => {
                    return Err(SnapshotError::RatingOutOfScale {
                        sequence: answer.question_sequence,
                        value: *value,
                    });
                }
                AnswerValue::Selection { position, .. } if *position == 0 => {
                    return Err(SnapshotError::ZeroOptionPosition {
                        sequence: answer.question_sequence,
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Answer data that cannot have come from the platform store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("question {sequence}: rating {value} is outside the 1-5 scale")]
    RatingOutOfScale { sequence: u32, value: u8 },
    #[error("question {sequence}: option positions are 1-based")]
    ZeroOptionPosition { sequence: u32 },
}

/// Severity scale shared by every red-flag producer. Ordering follows
/// escalation so flags can be ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagSeverity {
    Low,
    Medium,
    High,
}

impl FlagSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            FlagSeverity::Low => "low",
            FlagSeverity::Medium => "medium",
            FlagSeverity::High => "high",
        }
    }
}

/// Where a red flag originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagCategory {
    EthicalMisalignment,
    Inconsistency,
    SocialDesirability,
    ResponsePattern,
    SelfAwareness,
}

impl FlagCategory {
    pub const fn label(self) -> &'static str {
        match self {
            FlagCategory::EthicalMisalignment => "ethical_misalignment",
            FlagCategory::Inconsistency => "inconsistency",
            FlagCategory::SocialDesirability => "social_desirability",
            FlagCategory::ResponsePattern => "response_pattern",
            FlagCategory::SelfAwareness => "self_awareness",
        }
    }
}

/// A categorized integrity concern with supporting evidence and a follow-up
/// for the reviewing administrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedFlag {
    pub category: FlagCategory,
    pub severity: FlagSeverity,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<String>,
    pub recommendation: String,
}
