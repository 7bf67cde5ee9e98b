//! Client error types with kind-checking helpers.
//!
//! Two broad groups:
//! - **Transport/internal**: connection failures, stream teardown, signing
//!   failures, malformed response envelopes. These wrap the underlying cause
//!   with context and carry no distinguished kind beyond "this call failed".
//! - **Typed outcomes**: per-entity not-found, stale row versions, and the
//!   fixed unsupported-delete error. Callers match these with the `is_*`
//!   helpers to decide whether to re-read, give up, or surface the error.

use snafu::{Location, Snafu};
use tonic::Code;

/// Result type alias for catalog operations.
pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

/// Errors returned by the catalog client.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CatalogError {
    /// Failed to establish or address the session channel.
    #[snafu(display("Connection error at {location}: {message}"))]
    Connection {
        /// Error description.
        message: String,
        /// Source location.
        #[snafu(implicit)]
        location: Location,
    },

    /// Transport-level error (HTTP/2, TLS, dial).
    #[snafu(display("Transport error at {location}: {source}"))]
    Transport {
        /// Underlying transport error.
        source: tonic::transport::Error,
        /// Source location.
        #[snafu(implicit)]
        location: Location,
    },

    /// The session stream failed at the RPC layer.
    #[snafu(display("RPC error (code={code:?}): {message}"))]
    Rpc {
        /// gRPC status code.
        code: Code,
        /// Error message from the transport.
        message: String,
    },

    /// The session stream ended or the send side was gone.
    #[snafu(display("Session stream closed: {message}"))]
    StreamClosed {
        /// Disconnect reason.
        message: String,
    },

    /// Computing or attaching the HMAC request signature failed.
    #[snafu(display("Request signing failed at {location}: {message}"))]
    Signing {
        /// Error description.
        message: String,
        /// Source location.
        #[snafu(implicit)]
        location: Location,
    },

    /// A response arrived without its status envelope.
    #[snafu(display("Response carried no status (at {location})"))]
    MissingStatus {
        /// Source location.
        #[snafu(implicit)]
        location: Location,
    },

    /// The response union held a different payload than the request sent.
    #[snafu(display("Unexpected response payload, expected {expected} (at {location})"))]
    UnexpectedPayload {
        /// The payload kind the caller was waiting for.
        expected: &'static str,
        /// Source location.
        #[snafu(implicit)]
        location: Location,
    },

    /// The service reported a failure in its embedded status.
    ///
    /// Detail payloads are retained verbatim for client-side matching.
    #[snafu(display("remote status (code={code:?}): {message}"))]
    Remote {
        /// Status code reported by the service.
        code: Code,
        /// Message reported by the service.
        message: String,
        /// Structured detail payloads, preserved as sent.
        details: Vec<prost_types::Any>,
    },

    /// No record matched the requested key.
    #[snafu(display("no {entity} found: {message}"))]
    NotFound {
        /// Entity kind, e.g. `"address reference"`.
        entity: &'static str,
        /// Original server message, kept for diagnostics.
        message: String,
    },

    /// The submitted row version no longer matches the server's.
    ///
    /// Callers may re-read and retry; this client never retries on its own.
    #[snafu(display("stale {entity} version: {message}"))]
    Stale {
        /// Entity kind.
        entity: &'static str,
        /// Original server message.
        message: String,
    },

    /// The operation is not supported by the catalog.
    #[snafu(display("{operation} is not supported: the catalog is append/amend-only"))]
    Unsupported {
        /// Operation name, e.g. `"address reference delete"`.
        operation: &'static str,
    },

    /// A store operation failed for a reason other than not-found or
    /// staleness.
    #[snafu(display("{entity} operation failed: {source}"))]
    Operation {
        /// Entity kind.
        entity: &'static str,
        /// The translated underlying error.
        source: Box<CatalogError>,
    },

    /// Configuration validation error.
    #[snafu(display("Configuration error: {message}"))]
    Config {
        /// Error description.
        message: String,
    },

    /// A record could not be converted to or from its wire form.
    #[snafu(display("Conversion error: {source}"))]
    Convert {
        /// Underlying conversion error.
        source: chainreg_proto::convert::ConvertError,
    },

    /// A metadata document failed to encode or decode.
    #[snafu(display("Document error: {source}"))]
    Document {
        /// Underlying document error.
        source: chainreg_types::DocumentError,
    },

    /// A transaction callback failed and the subsequent rollback failed too.
    #[snafu(display("transaction failed: {source}; rollback also failed: {rollback}"))]
    TransactionCleanup {
        /// The callback's error.
        source: Box<CatalogError>,
        /// The rollback's error.
        rollback: Box<CatalogError>,
    },
}

impl CatalogError {
    /// Returns true if this is a per-entity not-found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is an optimistic-concurrency conflict.
    ///
    /// A stale error means the submitted row version no longer matched the
    /// server's; the caller can re-read and retry.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale { .. })
    }

    /// Returns true for the fixed unsupported-operation error.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// Returns the remote status code, looking through operation wrappers.
    #[must_use]
    pub fn code(&self) -> Option<Code> {
        match self {
            Self::Remote { code, .. } | Self::Rpc { code, .. } => Some(*code),
            Self::Operation { source, .. } => source.code(),
            _ => None,
        }
    }
}

impl From<tonic::Status> for CatalogError {
    fn from(status: tonic::Status) -> Self {
        Self::Rpc { code: status.code(), message: status.message().to_owned() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_matches_helper() {
        let err = CatalogError::NotFound { entity: "address reference", message: String::new() };
        assert!(err.is_not_found());
        assert!(!err.is_stale());
        assert!(!err.is_unsupported());
    }

    #[test]
    fn stale_matches_helper() {
        let err =
            CatalogError::Stale { entity: "contract metadata", message: "mismatch".to_owned() };
        assert!(err.is_stale());
        assert!(!err.is_not_found());
    }

    #[test]
    fn unsupported_matches_helper() {
        let err = CatalogError::Unsupported { operation: "chain metadata delete" };
        assert!(err.is_unsupported());
    }

    #[test]
    fn code_looks_through_operation_wrapper() {
        let err = CatalogError::Operation {
            entity: "transaction",
            source: Box::new(CatalogError::Remote {
                code: Code::FailedPrecondition,
                message: "transaction already open".to_owned(),
                details: Vec::new(),
            }),
        };
        assert_eq!(err.code(), Some(Code::FailedPrecondition));
    }

    #[test]
    fn from_tonic_status_keeps_code_and_message() {
        let err = CatalogError::from(tonic::Status::unavailable("server down"));
        assert_eq!(err.code(), Some(Code::Unavailable));
        assert!(err.to_string().contains("server down"));
    }
}
