//! Error types for the hwpage library.

use std::io;
use thiserror::Error;

/// Result type alias for hwpage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for hwpage operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A cursor read ran past the end of its stream.
    ///
    /// Fatal to the current stream: decoding stops and partial results are
    /// kept.
    #[error("out of data: need {needed} bytes at offset {offset}, {remaining} remain")]
    OutOfData {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A typed field read would exceed the current record's declared length.
    ///
    /// Recoverable: the next `pull()` resyncs past the unread remainder.
    #[error("record overrun in tag {tag_id}: read of {needed} bytes exceeds {data_len}-byte record")]
    RecordOverrun {
        tag_id: u16,
        needed: u32,
        data_len: u32,
    },

    /// Invalid or malformed data.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The file format is not supported.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The document is encrypted and cannot be parsed.
    #[error("document is encrypted")]
    Encrypted,

    /// OLE container error (not found, not a valid compound file).
    #[error("OLE container error: {0}")]
    OleContainer(String),

    /// A required stream is missing from the container.
    #[error("missing required stream: {0}")]
    MissingComponent(String),

    /// Stream decompression failed.
    #[error("decompression error: {0}")]
    Decompression(String),

    /// Text encoding error.
    #[error("text encoding error: {0}")]
    Encoding(String),
}

impl From<std::string::FromUtf16Error> for Error {
    fn from(err: std::string::FromUtf16Error) -> Self {
        Error::Encoding(err.to_string())
    }
}
