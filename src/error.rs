use thiserror::Error;

/// The error type used in this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("malformed input at byte offset {offset}: {message}")]
    Format { offset: u64, message: String },

    #[error("unexpected end of stream at byte offset {offset}")]
    UnexpectedEndOfStream { offset: u64 },

    #[error("invalid event name filter pattern: {0}")]
    InvalidRegex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
