//! Shared error and result types.
use serde::{Deserialize, Serialize};

/// A quarry result, returning [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// A quarry error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Error {
    /// Invalid data encountered while a pipeline was being driven, e.g.
    /// sort keys that refuse to compare.
    InvalidData(String),
    /// Invalid user input, e.g. a malformed operator argument.
    InvalidInput(String),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidData(message) => write!(f, "invalid data: {message}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
        }
    }
}

/// Constructs an Error::InvalidData via format!() and into().
#[macro_export]
macro_rules! errdata {
    ($($args:tt)*) => {
        $crate::common::Error::InvalidData(format!($($args)*)).into()
    };
}

/// Constructs an Error::InvalidInput via format!() and into().
#[macro_export]
macro_rules! errinput {
    ($($args:tt)*) => {
        $crate::common::Error::InvalidInput(format!($($args)*)).into()
    };
}

/// Allows converting an error directly into a result, e.g. when a match
/// arm needs to produce an Err without wrapping it by hand.
impl<T> From<Error> for Result<T> {
    fn from(error: Error) -> Self {
        Err(error)
    }
}
