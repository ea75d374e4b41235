use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::{AttemptId, SnapshotError};
use super::report::{score_attempt, AssessmentReport};
use super::repository::{AnswerRepository, RepositoryError};
use super::rubric::ScoringRubric;

/// Service composing the answer repository and the injected rubric. The
/// fetch is awaited once; scoring itself is synchronous and pure, so a
/// failed fetch means no partial report ever exists.
pub struct ReportService<R> {
    repository: Arc<R>,
    rubric: Arc<ScoringRubric>,
}

impl<R> ReportService<R>
where
    R: AnswerRepository + 'static,
{
    pub fn new(repository: Arc<R>, rubric: ScoringRubric) -> Self {
        Self {
            repository,
            rubric: Arc::new(rubric),
        }
    }

    pub fn rubric(&self) -> &ScoringRubric {
        &self.rubric
    }

    /// Generate a report stamped with the current time.
    pub async fn generate(&self, id: &AttemptId) -> Result<AssessmentReport, ReportError> {
        self.generate_at(id, Utc::now()).await
    }

    /// Generate a report with an injected timestamp. Identical inputs yield
    /// identical reports.
    pub async fn generate_at(
        &self,
        id: &AttemptId,
        generated_at: DateTime<Utc>,
    ) -> Result<AssessmentReport, ReportError> {
        let snapshot = self
            .repository
            .attempt_snapshot(id)
            .await
            .map_err(|err| match err {
                RepositoryError::NotFound => ReportError::AttemptNotFound(id.0.clone()),
                RepositoryError::Unavailable(reason) => ReportError::StoreUnavailable(reason),
            })?;

        if !snapshot.is_complete() {
            return Err(ReportError::AttemptIncomplete(id.0.clone()));
        }

        snapshot
            .validate()
            .map_err(|source| ReportError::InvalidAnswers(id.0.clone(), source))?;

        Ok(score_attempt(&snapshot, &self.rubric, generated_at))
    }
}

/// User-visible report generation failures. The cases stay distinguishable
/// so the presentation layer can phrase each one.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("no attempt found for '{0}'")]
    AttemptNotFound(String),
    #[error("attempt '{0}' has not been completed")]
    AttemptIncomplete(String),
    #[error("attempt '{0}' has invalid answer data: {1}")]
    InvalidAnswers(String, #[source] SnapshotError),
    #[error("answer store unavailable: {0}")]
    StoreUnavailable(String),
}
