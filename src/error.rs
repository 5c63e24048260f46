//! Error taxonomy for the counter client.

use std::io;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`CounterClient`](crate::CounterClient) and the record codec.
///
/// Every error is returned to the caller of the failing operation. Nothing is
/// retried and nothing is logged; a caller that drops these errors loses the
/// corresponding counter observations.
#[derive(Debug, Error)]
pub enum Error {
    /// The destination is neither a usable socket path nor a resolvable host/port pair.
    #[error("invalid address `{destination}`: {reason}")]
    InvalidAddress {
        /// The destination as supplied by the caller.
        destination: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// The datagram socket could not be opened.
    #[error("failed to create socket: {source}")]
    SocketCreation {
        #[source]
        source: io::Error,
    },

    /// An input does not fit the fixed-width wire field.
    #[error("cannot encode {field}: {reason}")]
    Encoding {
        /// Name of the record field.
        field: &'static str,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// The transport reported an error while sending.
    #[error("failed to transmit record: {source}")]
    Transmission {
        #[source]
        source: io::Error,
    },

    /// The client was closed before the call.
    #[error("client is closed")]
    Closed,

    /// A received buffer is not a valid counter record.
    #[error("malformed record: {reason}")]
    MalformedRecord { reason: String },
}

impl Error {
    pub(crate) fn invalid_address(destination: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            destination: destination.to_string(),
            reason: reason.into(),
        }
    }
}
