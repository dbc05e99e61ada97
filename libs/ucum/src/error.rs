use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Which lookup table a missing symbol was expected in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetadataKind {
    Unit,
    Prefix,
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataKind::Unit => f.write_str("unit"),
            MetadataKind::Prefix => f.write_str("prefix"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid unit code '{input}' at byte {pos}: {message}")]
    Syntax {
        input: String,
        pos: usize,
        message: &'static str,
    },

    #[error("could not interpret unit code '{input}': {message}")]
    Structural { input: String, message: String },

    #[error("no {kind} entry for '{symbol}' in unit code '{input}'")]
    MissingMetadata {
        input: String,
        kind: MetadataKind,
        symbol: String,
    },

    #[error("lookup table error: {0}")]
    Table(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The unit code this error was raised for, when it concerns a single input.
    pub fn input(&self) -> Option<&str> {
        match self {
            Error::Syntax { input, .. }
            | Error::Structural { input, .. }
            | Error::MissingMetadata { input, .. } => Some(input),
            _ => None,
        }
    }
}
