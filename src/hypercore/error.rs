//! Classified error types for HyperCore client operations.
//!
//! [`Error`] is the crate's public error type: every fallible operation
//! named on the client surface resolves to one of its variants rather than
//! a bare [`anyhow::Error`]. Internal helpers may still thread `anyhow`
//! context before mapping to a variant at the boundary.

use std::fmt;

use thiserror::Error as ThisError;

/// Classified error for HyperCore client operations.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Requested symbol not present in the metadata cache.
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    /// Close-position inference was attempted without an open position.
    #[error("no open position for {0}")]
    NoPosition(String),

    /// Size, price, trigger, or amount is not a valid decimal.
    #[error("bad number: {0}")]
    BadNumber(String),

    /// A `0x`-address was malformed or the wrong length.
    #[error("bad address: {0}")]
    BadAddress(String),

    /// A position-size (`szi`) string could not be parsed.
    #[error("bad position size: {0}")]
    BadPosition(String),

    /// The action could not be serialized into a JSON-safe value.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// The builder fee was missing, non-integer, negative, or above the configured bound.
    #[error("bad builder fee: {0}")]
    BadBuilderFee(String),

    /// ECDSA signing failed.
    #[error("sign error: {0}")]
    SignError(String),

    /// Server rejected the request semantically (`400..500`). Not retried.
    #[error("http {status}: {body}")]
    Http4xx {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        body: String,
    },

    /// Server-side transient failure (`>= 500`). Retried when the policy allows.
    #[error("http {status}: {body}")]
    Http5xx {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        body: String,
    },

    /// Transport, timeout, or serialization error. Retried when the policy allows.
    #[error("io error: {0}")]
    Io(String),
}

impl Error {
    /// Whether a retry policy is allowed to retry this error.
    ///
    /// Only `Http5xx` and `Io` are retryable; `Http4xx` short-circuits, and
    /// every other variant is a caller/data problem that a retry cannot fix.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Http5xx { .. } | Error::Io(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            let body = err.to_string();
            if status.is_client_error() {
                return Error::Http4xx {
                    status: status.as_u16(),
                    body,
                };
            }
            if status.is_server_error() {
                return Error::Http5xx {
                    status: status.as_u16(),
                    body,
                };
            }
        }
        Error::Io(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::EncodeError(err.to_string())
    }
}

impl From<rmp_serde::encode::Error> for Error {
    fn from(err: rmp_serde::encode::Error) -> Self {
        Error::EncodeError(err.to_string())
    }
}

/// Internal helpers still thread `anyhow` context before mapping to a
/// classified variant at the boundary; this is the generic fallback for
/// paths that don't already carry a more specific error type.
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// Error for batch operations (orders, cancels, modifies) where some items failed.
///
/// Contains the IDs of the orders/actions that failed and the error message
/// returned by the exchange.
///
/// # Type Parameter
///
/// - `T`: the ID type (e.g., `Cloid`, `u64`, `OidOrCloid`)
#[derive(Debug, Clone)]
pub struct ActionError<T> {
    /// The IDs of orders/actions that encountered the error.
    ids: Vec<T>,
    /// The error message from the exchange.
    err: String,
}

impl<T> ActionError<T> {
    /// Creates a new ActionError.
    pub fn new(ids: Vec<T>, err: String) -> Self {
        Self { ids, err }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.err
    }

    /// Returns the failed IDs.
    pub fn ids(&self) -> &[T] {
        &self.ids
    }

    /// Consumes the error and returns the IDs.
    pub fn into_ids(self) -> Vec<T> {
        self.ids
    }
}

impl<T> fmt::Display for ActionError<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, ids: {:?}", self.err, self.ids)
    }
}

impl<T> std::error::Error for ActionError<T> where T: fmt::Display + fmt::Debug {}
