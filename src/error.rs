use thiserror::Error;

/// Rejected difficulty window. The session is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is missing")]
    Missing { field: &'static str },
    #[error("{field} must be a non-negative whole number, got {input:?}")]
    NotANumber { field: &'static str, input: String },
    #[error("\"up to\" must be at least 1")]
    ZeroUpTo,
    #[error("window start {start} is after window end {end}")]
    Inverted { start: usize, end: usize },
    #[error("window end {end} is outside a pool of {pool_len} words")]
    OutOfRange { end: usize, pool_len: usize },
}

/// Operation not allowed in the session's current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("no difficulty window has been configured yet")]
    NotConfigured,
    #[error("the session is complete; reset it to start again")]
    AlreadyComplete,
    #[error("the session is still in progress")]
    StillActive,
    #[error("no word is in play; configure the window again")]
    NoWord,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    State(#[from] StateError),
}

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("failed to read deck: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed deck csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("no built-in deck named {0:?}")]
    NotFound(String),
    #[error("deck {0:?} has no words")]
    Empty(String),
}

/// Why the app could not go back to the difficulty form.
#[derive(Debug, Error)]
pub enum RestartError {
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to write history: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write history csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("history database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("history database has a malformed timestamp: {0:?}")]
    BadTimestamp(String),
}
