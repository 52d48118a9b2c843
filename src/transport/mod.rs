//! Capability traits for channels, HTTP and databases, and the adapters that
//! lift them into [`TaskResult`](crate::effect::TaskResult) and its
//! transformers.
//!
//! The crate ships no drivers. Hosts implement [`WritableSink`],
//! [`HttpTransport`] or [`DbConnection`] over their client of choice; the
//! adapters here turn every outcome (transport error, cancellation, bad
//! status, malformed payload) into a `Result<_, String>` failure with a stable
//! message.

mod channel;
mod db;
mod http;

use thiserror::Error;

pub use channel::{
    CHANNEL_ALREADY_COMPLETED, CHANNEL_WRITE_CANCELLED, ChannelSink, WritableSink,
    complete_result, write_reader, write_result,
};
pub use db::{
    DbConnection, DbTransaction, DbTransactionState, IsolationLevel, NO_ACTIVE_TRANSACTION,
    commit_transaction, rollback_transaction, to_state_task_result, to_state_task_result_with,
};
pub use http::{
    BufferedResponse, HTTP_PAYLOAD_EMPTY, HTTP_REQUEST_CANCELLED, HttpMethod, HttpRequest,
    HttpResponse, HttpTransport, get_json_result, get_json_result_with, http_reader,
    post_json_result, post_json_result_with, send_result,
};

/// Errors reported by transport capabilities.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The operation observed a cancelled token.
    #[error("operation was cancelled")]
    Cancelled,

    /// The channel, connection or transaction is no longer usable.
    #[error("{0} is closed")]
    Closed(&'static str),

    /// Any other failure, carrying the underlying message.
    #[error("{0}")]
    Failed(String),
}

impl TransportError {
    /// Wraps an arbitrary message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl From<crate::effect::Cancelled> for TransportError {
    fn from(_: crate::effect::Cancelled) -> Self {
        Self::Cancelled
    }
}

/// Message of a transport failure, logged at debug level.
fn failure_message(operation: &str, error: &TransportError) -> String {
    tracing::debug!(operation, %error, "transport call failed");
    crate::data::normalize_error(error.to_string())
}
