//! Error definitions for bulk dispatch.

use thiserror::Error;

/// Errors produced by a batch call.
///
/// Only [`BulkError::NoRequests`] fails a whole call; every other variant is
/// recorded in place of the response for a single index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BulkError {
    /// The batch held no requests, nothing was dispatched.
    #[error("no requests provided")]
    NoRequests,

    /// The deadline elapsed before this index's outcome was recorded.
    #[error("request ignored")]
    RequestIgnored,

    /// The transport itself failed, unrelated to the batch deadline.
    #[error("http client error: {0}")]
    Transport(String),

    /// The transport produced neither a response nor an error.
    #[error("no response received")]
    EmptyResponse,

    /// The response arrived but its body could not be read in full.
    #[error("error while reading response body: {0}")]
    BodyRead(String),
}

impl BulkError {
    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            BulkError::NoRequests => "no_requests",
            BulkError::RequestIgnored => "ignored",
            BulkError::Transport(_) => "transport",
            BulkError::EmptyResponse => "empty",
            BulkError::BodyRead(_) => "body_read",
        }
    }
}
