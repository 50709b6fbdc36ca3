use crate::constants::{UPSTREAM_MALFORMED_MESSAGE, UPSTREAM_UNAVAILABLE_MESSAGE};
use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum WardError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid capacity override entry: {0}")]
    InvalidCapacityOverride(String),
}

pub type WardResult<T> = std::result::Result<T, WardError>;

/// Failure talking to one of the upstream data services.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The request never produced an HTTP response (connect failure, timeout, reset).
    #[error("{service} unavailable: {details}")]
    Unavailable {
        service: &'static str,
        details: String,
    },
    /// The upstream answered with a non-2xx status.
    #[error("{service} rejected request with status {status}")]
    Rejected {
        service: &'static str,
        status: u16,
        body: Value,
    },
    /// The upstream answered 2xx but the body did not decode into the expected records.
    #[error("{service} returned a malformed body: {details}")]
    Malformed {
        service: &'static str,
        details: String,
    },
}

pub type UpstreamResult<T> = std::result::Result<T, UpstreamError>;

/// Status code and JSON body to hand back to the caller as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: Value,
}

impl UpstreamReply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

impl UpstreamError {
    pub fn service(&self) -> &'static str {
        match self {
            Self::Unavailable { service, .. }
            | Self::Rejected { service, .. }
            | Self::Malformed { service, .. } => service,
        }
    }

    /// The response a caller should see for this failure.
    ///
    /// Rejections are forwarded verbatim. Network failures become `503` and malformed bodies
    /// become `502`, both with an `{error, details}` envelope.
    pub fn reply(&self) -> UpstreamReply {
        match self {
            Self::Unavailable { details, .. } => UpstreamReply::new(
                503,
                json!({ "error": UPSTREAM_UNAVAILABLE_MESSAGE, "details": details }),
            ),
            Self::Rejected { status, body, .. } => UpstreamReply::new(*status, body.clone()),
            Self::Malformed { details, .. } => UpstreamReply::new(
                502,
                json!({ "error": UPSTREAM_MALFORMED_MESSAGE, "details": details }),
            ),
        }
    }

    pub fn into_reply(self) -> UpstreamReply {
        match self {
            Self::Rejected { status, body, .. } => UpstreamReply::new(status, body),
            other => other.reply(),
        }
    }
}
