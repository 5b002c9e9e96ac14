//! AMI transport errors.

use thiserror::Error;

/// Errors talking to the AMI gateway.
#[derive(Error, Debug)]
pub enum AmiError {
    /// TCP connect failed.
    #[error("cannot connect to AMI at {addr}: {source}")]
    Connect {
        /// `host:port` that was dialled.
        addr: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The manager rejected our credentials.
    #[error("AMI login rejected: {0}")]
    LoginRejected(String),

    /// The peer closed the connection mid-exchange.
    #[error("AMI connection closed")]
    ConnectionClosed,

    /// The round trip did not finish within the configured timeout.
    #[error("AMI request timed out after {0}s")]
    Timeout(u64),

    /// The peer sent something that is not an AMI frame.
    #[error("AMI protocol error: {0}")]
    Protocol(String),

    /// Read or write failed.
    #[error("AMI I/O error: {0}")]
    Io(#[from] std::io::Error),
}
