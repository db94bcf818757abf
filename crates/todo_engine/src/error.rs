use std::fmt;
use std::path::Path;

/// Failure taxonomy for the task engine.
///
/// Three things can go wrong here: the user asked for something the engine
/// refuses to store, the persisted task document is malformed, or the
/// filesystem got in the way. Every error renders as `code - message`; the
/// code tokens are stable and the CLI prints them verbatim after `ERROR:` or
/// `WARNING:`, so scripts can match on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Rejected user input: a blank task title, an unknown status or
    /// priority token. Always fatal to the command that triggered it.
    InvalidInput(String),
    /// The store document, or a value derived from it, does not parse.
    /// At load time these are recoverable: the collection starts empty and
    /// the error is carried as a warning instead.
    InvalidData(String),
    /// Reading or writing the store file failed.
    Io(String),
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    /// Unreadable store file, naming the path the store was opened at.
    pub fn read_failed(path: &Path, cause: impl fmt::Display) -> Self {
        Self::Io(format!("could not read {}: {cause}", path.display()))
    }

    /// Failed store write, naming the path the store was opened at.
    pub fn write_failed(path: &Path, cause: impl fmt::Display) -> Self {
        Self::Io(format!("could not write {}: {cause}", path.display()))
    }

    /// The store file exists but does not hold a task collection.
    pub fn malformed_store(path: &Path, cause: impl fmt::Display) -> Self {
        Self::InvalidData(format!(
            "{} is not a valid task file: {cause}",
            path.display()
        ))
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::Io(_) => "io_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(message) | Self::InvalidData(message) | Self::Io(message) => message,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.message())
    }
}

impl std::error::Error for AppError {}
