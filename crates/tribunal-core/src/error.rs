use thiserror::Error;

#[derive(Debug, Error)]
pub enum CourtError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("case not found: {0}")]
    UnknownCase(String),

    #[error("verdict already rendered")]
    VerdictAlreadyRendered,

    #[error("failed to persist report: {0}")]
    Report(String),
}
