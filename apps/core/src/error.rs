use thiserror::Error;

/// Core error type, consolidating all component failures into a single enum.
///
/// Every variant is caught at a component boundary and rendered as user-facing
/// text; `Agent::respond` never surfaces an `Err` to its caller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AgentError {
    /// Arithmetic input was empty or whitespace-only.
    #[error("Empty expression")]
    EmptyExpression,

    /// Arithmetic input could not be parsed or numerically evaluated.
    #[error("{0}")]
    Evaluation(String),

    /// A solve request could not be lowered to a solvable form.
    #[error("{0}")]
    Algebra(String),

    /// The FAQ corpus could not be read. Callers treat this as an empty corpus.
    #[error("FAQ corpus unavailable: {0}")]
    Corpus(String),
}

impl From<std::io::Error> for AgentError {
    fn from(err: std::io::Error) -> Self {
        AgentError::Corpus(err.to_string())
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::Corpus(format!("JSON error: {}", err))
    }
}
