use std::fmt;

use serde_json::error::Category;
use ursa::errors::{UrsaCryptoError, UrsaCryptoErrorKind};

pub mod prelude {
    pub use super::{err_msg, ProofError, ProofErrorExt, ProofErrorKind, ProofResult};
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum ProofErrorKind {
    #[error("Allocation failed")]
    Allocation,
    #[error("Invalid parameter")]
    InvalidParameter,
    #[error("Invalid state")]
    InvalidState,
    #[error("Build failed")]
    Build,
    #[error("Malformed json")]
    Parse,
    #[error("Invalid structure")]
    Schema,
    #[error("Handle already released")]
    DoubleFree,
}

/// Error returned by every builder and handle operation.
///
/// `kind` is authoritative; `message` carries the diagnostic text, including
/// the primitives layer's own message when the failure originated there.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ProofError {
    kind: ProofErrorKind,
    message: String,
}

impl ProofError {
    pub fn from_msg<D>(kind: ProofErrorKind, msg: D) -> ProofError
    where
        D: fmt::Display,
    {
        ProofError {
            kind,
            message: msg.to_string(),
        }
    }

    pub fn kind(&self) -> ProofErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_msg<D>(kind: ProofErrorKind, msg: D) -> ProofError
where
    D: fmt::Display,
{
    ProofError::from_msg(kind, msg)
}

pub type ProofResult<T> = Result<T, ProofError>;

#[cfg(feature = "logger")]
impl From<log::SetLoggerError> for ProofError {
    fn from(err: log::SetLoggerError) -> ProofError {
        err_msg(
            ProofErrorKind::InvalidState,
            format!("Setting logger failed: {}", err),
        )
    }
}

/// Extension methods for errors raised below this crate.
pub trait ProofErrorExt {
    fn to_proof_error<D>(self, kind: ProofErrorKind, msg: D) -> ProofError
    where
        D: fmt::Display;
}

impl ProofErrorExt for UrsaCryptoError {
    fn to_proof_error<D>(self, kind: ProofErrorKind, msg: D) -> ProofError
    where
        D: fmt::Display,
    {
        err_msg(kind, format!("{}: {}", msg, self.to_string().trim_end()))
    }
}

impl ProofErrorExt for serde_json::Error {
    fn to_proof_error<D>(self, kind: ProofErrorKind, msg: D) -> ProofError
    where
        D: fmt::Display,
    {
        err_msg(kind, format!("{}: {}", msg, self))
    }
}

/// Kind for a rejected accumulate call (`add_*`) on a builder.
///
/// Malformed or mutually inconsistent caller data is a parameter problem;
/// anything else means the primitives layer could not hold the new state.
pub(crate) fn accumulate_kind(kind: UrsaCryptoErrorKind) -> ProofErrorKind {
    match kind {
        UrsaCryptoErrorKind::InvalidState | UrsaCryptoErrorKind::IOError => {
            ProofErrorKind::Allocation
        }
        _ => ProofErrorKind::InvalidParameter,
    }
}

/// Kind for a failed json decode: syntax problems versus well-formed json
/// that does not describe the expected structure.
pub(crate) fn decode_kind(err: &serde_json::Error) -> ProofErrorKind {
    match err.classify() {
        Category::Data => ProofErrorKind::Schema,
        Category::Syntax | Category::Eof | Category::Io => ProofErrorKind::Parse,
    }
}
