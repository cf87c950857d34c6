//! # Admission Rejections
//!
//! A rejected output is the normal outcome for almost every output on chain.
//! These values explain a `false` decision; they are never surfaced as
//! failures and are logged at `trace!` at most.

use thiserror::Error;

/// Why an advertised URI is not acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    #[error("scheme is not in the allow-list")]
    UnsupportedScheme,

    #[error("missing host")]
    MissingHost,

    #[error("invalid port")]
    InvalidPort,

    #[error("loopback host '{0}'")]
    Loopback(String),

    #[error("path not allowed for this scheme")]
    PathNotAllowed,

    #[error("missing query parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("invalid query parameter '{0}'")]
    InvalidParameter(&'static str),
}

/// Why an advertised topic or service name is not acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("length {0} outside 1..=50")]
    Length(usize),

    #[error("not lowercase underscore-separated segments")]
    Pattern,

    #[error("missing required prefix '{0}'")]
    MissingPrefix(&'static str),
}

/// Why an output was not admitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("not a pushdrop token")]
    NotAToken,

    #[error("expected 5 fields, found {0}")]
    FieldCount(usize),

    #[error("identifier does not match this protocol")]
    WrongIdentifier,

    #[error("field {0} is not UTF-8")]
    NotUtf8(usize),

    #[error("unacceptable URI: {0}")]
    Uri(#[from] UriError),

    #[error("unacceptable name: {0}")]
    Name(#[from] NameError),

    #[error("signature is not linked to the identity key")]
    NotLinked,
}
