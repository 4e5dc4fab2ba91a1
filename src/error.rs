//! Error types for stkit

use thiserror::Error;

/// Result type alias for stkit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for stkit
#[derive(Error, Debug)]
pub enum Error {
    /// IO error at the file boundary
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed container (missing magic, missing chunks)
    #[error("Format error: {0}")]
    Format(String),

    /// Source audio is not uncompressed linear PCM
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// A declared length runs past the end of the buffer
    #[error("Truncated input: {context} declares {declared} bytes, {available} available")]
    TruncatedInput {
        context: String,
        declared: usize,
        available: usize,
    },

    /// Pack was called with nothing to pack
    #[error("No assets provided")]
    NoAssetsProvided,

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Library initialization failed
    #[error("Initialization error: {0}")]
    Init(String),

    /// Failure while processing one input of a batch
    #[error("Asset #{index} ({name}): {source}")]
    Asset {
        index: usize,
        name: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a format error
    pub fn format<S: Into<String>>(msg: S) -> Self {
        Error::Format(msg.into())
    }

    /// Create an unsupported encoding error
    pub fn unsupported_encoding<S: Into<String>>(msg: S) -> Self {
        Error::UnsupportedEncoding(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a truncated input error
    pub fn truncated<S: Into<String>>(context: S, declared: usize, available: usize) -> Self {
        Error::TruncatedInput {
            context: context.into(),
            declared,
            available,
        }
    }

    /// Attach the position and name of the input that failed
    pub fn for_asset<S: Into<String>>(self, index: usize, name: S) -> Self {
        Error::Asset {
            index,
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// The underlying error, looking through per-asset context
    pub fn root(&self) -> &Error {
        match self {
            Error::Asset { source, .. } => source.root(),
            other => other,
        }
    }
}
