//! Error types shared across the engine.

use thiserror::Error;

/// Errors raised by a reference solution while evaluating one case.
///
/// The verifier never propagates these; each one is recorded as a
/// per-case failure and evaluation continues with the next case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// A required input field was absent
    #[error("missing input field `{0}`")]
    MissingField(String),
    /// An input field had the wrong shape
    #[error("input field `{field}` must be {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },
    /// The input was well-formed but the algorithm could not produce an answer
    #[error("{0}")]
    Evaluation(String),
}

impl SolveError {
    pub fn invalid(field: &str, expected: &'static str) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            expected,
        }
    }
}

/// Errors raised while assembling registries or loading external data.
#[derive(Debug, Error)]
pub enum BlueprintError {
    /// Two contracts were registered for the same problem
    #[error("duplicate contract for problem {0}")]
    DuplicateContract(u32),
    /// Two strategies were registered under the same id
    #[error("duplicate strategy id `{0}`")]
    DuplicateStrategy(String),
    /// An authored contract failed schema validation
    #[error("invalid contract: {}", .0.join("; "))]
    InvalidContract(Vec<String>),
    /// A problem id was requested that the catalog does not contain
    #[error("unknown problem {0}")]
    UnknownProblem(u32),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SolveResult<T> = Result<T, SolveError>;

pub type BlueprintResult<T> = Result<T, BlueprintError>;
