use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a source text fails to become a [`Program`](crate::program::Program).
///
/// Positions are 0-based indices into the whitespace-separated token
/// stream left after comment characters are stripped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("syntax error: missing loop variable at {position}")]
    MissingLoopVariable { position: usize },
    #[error("syntax error: invalid command \"{token}\" at {position}")]
    InvalidCommand { token: String, position: usize },
    #[error("syntax error: missing loop start at {position}")]
    MissingLoopStart { position: usize },
    #[error("syntax error: missing loop end(s), {unclosed} unclosed")]
    MissingLoopEnd { unclosed: usize },
    /// A numeric-notation variable too large to expand.
    #[error("syntax error: variable {literal} out of range")]
    VariableOutOfRange { literal: String },
}

/// Raised by an output sink to abort the run it is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("output sink failed: {0}")]
pub struct OutputError(pub String);

impl OutputError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("maximal steps exceeded ({limit})")]
    StepLimitExceeded { limit: usize },
    /// A `LoopEnd` with no matching `LoopStart`. Parsed programs never hit this.
    #[error("loop start not found for instruction {pc}")]
    LoopStartNotFound { pc: usize },
    /// A `LoopStart` with no matching `LoopEnd`. Parsed programs never hit this.
    #[error("loop end not found for instruction {pc}")]
    LoopEndNotFound { pc: usize },
    #[error(transparent)]
    Output(#[from] OutputError),
}
