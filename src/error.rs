use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid hex on line {line} ({text:?}): {source}")]
    InvalidHex {
        line: usize,
        text: String,
        #[source]
        source: hex::FromHexError,
    },
}

impl ConversionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConversionError::Io { path: path.into(), source }
    }
}
