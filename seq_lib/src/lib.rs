pub mod pulse_sequence;
pub mod offsets;
pub mod spoil;
pub mod phase;
pub mod wasabi;

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Seq(#[from] seq_tools::Error),

    #[error("cannot parse parameter file {path:?}: {source}")]
    Params { path:PathBuf, #[source] source:serde_json::Error },

    #[error("cannot serialize parameters: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("i/o error on {path:?}: {source}")]
    Io { path:PathBuf, #[source] source:std::io::Error },

    #[error("{0} is not a known sequence")]
    UnknownSequence(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
