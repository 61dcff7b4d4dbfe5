// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("A match needs two distinct clubs (got {0} twice)")]
    SameClubFixture(String),

    #[error("Unknown match status: {0}")]
    UnknownStatus(String),

    #[error("Unknown predicted outcome: {0}")]
    UnknownOutcome(String),

    #[error("Probabilities must sum to 100 (got {0:.2})")]
    ProbabilitySum(f64),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
