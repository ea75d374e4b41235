//! Behavioral scoring and integrity analysis for completed assessment
//! attempts.
//!
//! The scoring core is read-only computation over an immutable answer
//! snapshot and an injected rubric: the repository fetch is the single async
//! boundary, and everything after it is deterministic.

pub mod behavioral;
pub mod competency;
pub mod domain;
pub mod integrity;
mod policies;
pub mod report;
pub mod repository;
mod responses;
pub mod router;
pub mod rubric;
pub mod service;

#[cfg(test)]
mod tests;

pub use behavioral::{BehavioralLevel, BehavioralScore};
pub use competency::{CompetencyLevel, CompetencyScore};
pub use domain::{
    AnswerValue, AttemptId, AttemptSnapshot, ChoiceLabel, FlagCategory, FlagSeverity,
    QuestionKind, RecordedAnswer, RedFlag, SnapshotError,
};
pub use integrity::{
    BiasRating, ConsistencyRating, IntegrityAssessment, PatternKind, ResponsePattern,
    SelfAwarenessRating,
};
pub use report::{score_attempt, AssessmentReport, QuestionDetail, ReportSummaryView};
pub use repository::{AnswerRepository, RepositoryError};
pub use router::report_router;
pub use rubric::{
    CompetencyDefinition, ConsistencyCheck, CorrelationSign, DimensionDefinition,
    RecommendationRule, RecommendationTier, RubricError, ScenarioIndicator, ScoringRubric,
};
pub use service::{ReportError, ReportService};
