use std::path::PathBuf;

use tokio_util::codec::{AnyDelimiterCodecError, LinesCodecError};

#[derive(Debug, thiserror::Error)]
pub enum WordSourceError {
    #[error("unable to open the dictionary file at {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error reading the dictionary file at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: LinesCodecError,
    },
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("a name is required to generate suggestions")]
    EmptyName,
    #[error("No adjectives or nouns found starting with '{0}'.")]
    NoAlliterativeWords(char),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("reading from the terminal failed: {0}")]
    Read(#[from] AnyDelimiterCodecError),
    #[error("writing to the terminal failed: {0}")]
    Write(#[from] LinesCodecError),
}
