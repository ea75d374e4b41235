use async_trait::async_trait;

use super::domain::{AttemptId, AttemptSnapshot};

/// Storage abstraction over the answers-for-attempt join so the scoring core
/// can be exercised against in-memory doubles. Fetching is the single
/// asynchronous boundary; everything downstream is pure computation.
#[async_trait]
pub trait AnswerRepository: Send + Sync {
    async fn attempt_snapshot(&self, id: &AttemptId) -> Result<AttemptSnapshot, RepositoryError>;
}

/// Error enumeration for repository failures. "No such attempt" and "store
/// unreachable" stay distinguishable all the way to the caller.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("attempt not found")]
    NotFound,
    #[error("answer store unavailable: {0}")]
    Unavailable(String),
}
