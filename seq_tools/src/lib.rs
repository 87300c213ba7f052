pub mod hardware_constants;
pub mod utils;
pub mod pulse_function;
pub mod pulse;
pub mod rf_event;
pub mod gradient_event;
pub mod acq_event;
pub mod seq_event;
pub mod sequence;
pub mod seq_file;
pub mod conversion;

use std::path::PathBuf;

pub use hardware_constants::SystemLimits;
pub use sequence::Sequence;
pub use seq_event::{Block, SeqEvent};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid parameter for {event}: {reason}")]
    InvalidParameter { event:&'static str, reason:String },

    #[error("{event} exceeds hardware limit: {quantity} is {value:.6e}, limit is {limit:.6e}")]
    HardwareLimit { event:&'static str, quantity:&'static str, value:f64, limit:f64 },

    #[error("block {block} has more than one event on channel {channel}")]
    ChannelConflict { block:usize, channel:String },

    #[error("i/o error on {path:?}: {source}")]
    Io { path:PathBuf, #[source] source:std::io::Error },

    #[error("expected a version 1.2 sequence file, found {found}")]
    UnsupportedVersion { found:String },

    #[error("malformed sequence file: {0}")]
    MalformedFile(String),
}

impl Error {
    pub(crate) fn invalid(event:&'static str, reason:impl Into<String>) -> Self {
        Error::InvalidParameter { event, reason:reason.into() }
    }
    pub(crate) fn io(path:impl Into<PathBuf>, source:std::io::Error) -> Self {
        Error::Io { path:path.into(), source }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
