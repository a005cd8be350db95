use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error, the command was not applied")]
    Store(#[from] rusqlite::Error),

    #[error("Load a topic first.")]
    NoTopic,

    #[error("Interview has not yet started, run the start command first.")]
    NotStarted,

    #[error("Topic '{0}' not found or has no questions.")]
    UnknownTopic(String),

    #[error("Interviewee name cannot be empty.")]
    EmptyName,

    #[error("No question available at level {0}.")]
    NoQuestion(&'static str),

    #[error("{0}")]
    InvalidInput(String),

    #[error("input error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Errors that abort the whole loop rather than a single command.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}
