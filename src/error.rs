//! Error types for keycalc.

use thiserror::Error;

/// Errors surfaced by key parsing and expression evaluation.
///
/// Evaluation errors never escape the state machine: a failed `=` puts the
/// session into [`crate::Mode::Error`]. They are returned directly only by the
/// lower-level pieces (tokenizer, [`crate::Evaluator`]) and by key parsing.
#[derive(Debug, Error)]
pub enum CalcError {
    #[error("unknown key '{0}'")]
    UnknownKey(String),

    #[error("cannot tokenize '{input}' at byte {position}")]
    Tokenize { input: String, position: usize },

    #[error("incomplete expression '{0}'")]
    Incomplete(String),

    #[error("failed to evaluate '{expression}': {message}")]
    Evaluation { expression: String, message: String },

    #[error("result of '{0}' is not a finite number")]
    NonFinite(String),

    #[error("evaluator returned a non-numeric value: {0}")]
    UnexpectedValue(String),
}

impl CalcError {
    pub fn unknown_key(key: impl Into<String>) -> Self {
        Self::UnknownKey(key.into())
    }

    pub fn tokenize(input: impl Into<String>, position: usize) -> Self {
        Self::Tokenize { input: input.into(), position }
    }

    pub fn incomplete(expression: impl Into<String>) -> Self {
        Self::Incomplete(expression.into())
    }

    pub fn evaluation(expression: impl Into<String>, message: impl ToString) -> Self {
        Self::Evaluation { expression: expression.into(), message: message.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
