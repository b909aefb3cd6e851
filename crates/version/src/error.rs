use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The class of a parse failure, without the diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidFormat,
    NumericOverflow,
    UnderlyingEngine,
    EmptyInput,
}

/// Every failure carries the raw input it was produced from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid version '{raw}': {reason}")]
    InvalidFormat {
        raw: String,
        reason: String,
    },

    #[error("invalid version '{raw}': {field} does not fit in 64 bits")]
    NumericOverflow {
        raw: String,
        field: &'static str,
    },

    #[error("semver rejected '{raw}': {reason}")]
    UnderlyingEngine {
        raw: String,
        reason: String,
    },

    #[error("invalid version '{raw}': no version segments")]
    EmptyInput {
        raw: String,
    },
}

impl Error {

    pub(crate) fn invalid<R: Into<String>, S: ToString>(raw: R, reason: S) -> Self {
        Error::InvalidFormat { raw: raw.into(), reason: reason.to_string() }
    }

    pub(crate) fn overflow<R: Into<String>>(raw: R, field: &'static str) -> Self {
        Error::NumericOverflow { raw: raw.into(), field }
    }

    pub(crate) fn engine<R: Into<String>, S: ToString>(raw: R, reason: S) -> Self {
        Error::UnderlyingEngine { raw: raw.into(), reason: reason.to_string() }
    }

    pub(crate) fn empty<R: Into<String>>(raw: R) -> Self {
        Error::EmptyInput { raw: raw.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Error::NumericOverflow { .. } => ErrorKind::NumericOverflow,
            Error::UnderlyingEngine { .. } => ErrorKind::UnderlyingEngine,
            Error::EmptyInput { .. } => ErrorKind::EmptyInput,
        }
    }

    /// the input string that failed
    pub fn raw(&self) -> &str {
        match self {
            Error::InvalidFormat { raw, .. }
            | Error::NumericOverflow { raw, .. }
            | Error::UnderlyingEngine { raw, .. }
            | Error::EmptyInput { raw } => raw,
        }
    }
}
