//! Error types
//!
//! Every failure raised by a client operation names the operation and the
//! phase it failed in, and keeps the underlying cause as its `source`.

use std::fmt;

/// Result alias used by every client operation.
pub type Result<T> = std::result::Result<T, Error>;

/// The phase of a request in which an operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Preparing,
    Sending,
    Responding,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Preparing => "preparing request",
            Phase::Sending => "sending request",
            Phase::Responding => "responding to request",
        };
        f.write_str(s)
    }
}

/// Which page fetch failed while draining a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStage {
    Initial,
    Next,
}

impl fmt::Display for PageStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageStage::Initial => f.write_str("initial"),
            PageStage::Next => f.write_str("next"),
        }
    }
}

/// Failures while building a request.
#[derive(Debug, thiserror::Error)]
pub enum PrepareError {
    #[error("parsing nextLink {link:?}")]
    NextLink {
        link: String,
        #[source]
        source: url::ParseError,
    },

    #[error("building request url from {base:?} and {path:?}")]
    Url {
        base: String,
        path: String,
        #[source]
        source: url::ParseError,
    },
}

/// Failures reported by the transport while sending a request.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("http transport")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("bearer token is not a valid header value")]
    InvalidToken,
}

/// Failures while interpreting a response.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("decoding response body")]
    Decode(#[source] serde_json::Error),
}

/// Top-level client error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{operation}: failure preparing request")]
    Prepare {
        operation: &'static str,
        #[source]
        source: PrepareError,
    },

    #[error("{operation}: failure sending request")]
    Send {
        operation: &'static str,
        #[source]
        source: TransportError,
    },

    #[error("{operation}: failure responding to request")]
    Respond {
        operation: &'static str,
        #[source]
        source: ResponseError,
    },

    #[error("no more pages returned")]
    NoMorePages,

    #[error("loading the {stage} page")]
    Page {
        stage: PageStage,
        #[source]
        source: Box<Error>,
    },

    #[error("unknown discriminator {value:?} for {type_name}")]
    UnknownDiscriminator {
        type_name: &'static str,
        value: String,
    },

    #[error("missing discriminator field {field:?} for {type_name}")]
    MissingDiscriminator {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("marshaling {variant}")]
    Encode {
        variant: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("unmarshaling {type_name}")]
    Decode {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// The phase a request-level failure occurred in, if any.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Error::Prepare { .. } => Some(Phase::Preparing),
            Error::Send { .. } => Some(Phase::Sending),
            Error::Respond { .. } => Some(Phase::Responding),
            Error::Page { source, .. } => source.phase(),
            _ => None,
        }
    }

    /// HTTP status of a rejected response, looking through page wrappers.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Respond {
                source: ResponseError::Status { status, .. },
                ..
            } => Some(*status),
            Error::Page { source, .. } => source.status(),
            _ => None,
        }
    }
}
