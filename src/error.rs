use std::fmt;
use std::io;

use crate::sbus::SbusError;

#[derive(Debug)]
pub enum Error {
    /// Fewer channels than the signal-strength index needs
    ShortFrame { len: usize },
    Sbus(SbusError),
    Io(io::Error),
    Settings(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ShortFrame { len } => write!(
                f,
                "channel frame too short: {} values, need at least {}",
                len,
                crate::channels::MIN_CHANNELS
            ),
            Error::Sbus(e) => write!(f, "sbus: {}", e),
            Error::Io(e) => write!(f, "i/o: {}", e),
            Error::Settings(e) => write!(f, "settings: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ShortFrame { .. } => None,
            Error::Sbus(e) => Some(e),
            Error::Io(e) => Some(e),
            Error::Settings(e) => Some(e),
        }
    }
}

impl From<SbusError> for Error {
    fn from(e: SbusError) -> Self {
        Error::Sbus(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Settings(e)
    }
}
