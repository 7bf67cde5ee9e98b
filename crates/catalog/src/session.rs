//! Transport session: one long-lived bidirectional stream.
//!
//! The session owns a single `CatalogService/Session` stream, lazily opened
//! on the first operation and cached until [`Session::close`]. Every
//! operation is one send followed by one receive; operations issued through
//! one session are observed by the server in order (single stream, FIFO).
//!
//! Concurrent callers serialize on an async mutex around the stream, so a
//! session is safe to share for non-transactional operations — but the
//! server binds transaction state to the stream, so one session can carry at
//! most one open transaction. Use one client per logical unit of work.

use prost::Message;
use tokio::sync::{Mutex, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::Endpoint;

use chainreg_proto::proto::{
    CatalogRequest, CatalogResponse, catalog_service_client::CatalogServiceClient,
};
use snafu::ResultExt;

use crate::config::CatalogConfig;
use crate::error::{ConnectionSnafu, Result, SigningSnafu, StreamClosedSnafu, TransportSnafu};
use crate::signer::{HMAC_SIGNATURE_HEADER, HMAC_TIMESTAMP_HEADER, RequestSigner};

/// Full gRPC method path of the session rpc, used as the signed method.
pub(crate) const SESSION_METHOD: &str = "/catalog.v1.CatalogService/Session";

/// Outgoing request buffer. Requests are sent one at a time under the
/// session lock, so this never fills in practice.
const REQUEST_BUFFER: usize = 16;

/// Keepalive settings for the long-lived stream.
const HTTP2_KEEPALIVE_INTERVAL: std::time::Duration = std::time::Duration::from_secs(30);
const HTTP2_KEEPALIVE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);
const TCP_KEEPALIVE_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

/// The live halves of an established stream.
struct OpenStream {
    requests: mpsc::Sender<CatalogRequest>,
    responses: tonic::Streaming<CatalogResponse>,
}

/// A lazily-established, cached session stream.
pub(crate) struct Session {
    config: CatalogConfig,
    signer: Option<RequestSigner>,
    stream: Mutex<Option<OpenStream>>,
}

impl Session {
    /// Creates a session; no connection is made until the first roundtrip.
    pub(crate) fn new(config: CatalogConfig, signer: Option<RequestSigner>) -> Self {
        Self { config, signer, stream: Mutex::new(None) }
    }

    /// Sends one request and awaits its response.
    ///
    /// Opens the stream on first use. When HMAC signing is configured the
    /// *opening* request's payload is signed and the signature attached as
    /// call metadata; requests sent over the already-open stream are not
    /// independently signed — authentication is per-channel, not
    /// per-request. A stream-level failure tears the cached stream down so
    /// the next call reconnects.
    pub(crate) async fn roundtrip(&self, request: CatalogRequest) -> Result<CatalogResponse> {
        let mut guard = self.stream.lock().await;

        if guard.is_none() {
            *guard = Some(self.open(&request).await?);
            tracing::debug!(endpoint = %self.config.endpoint(), "catalog session established");
        }

        let Some(stream) = guard.as_mut() else {
            return StreamClosedSnafu { message: "session not open" }.fail();
        };

        if stream.requests.send(request).await.is_err() {
            *guard = None;
            return StreamClosedSnafu { message: "send side closed" }.fail();
        }

        match stream.responses.message().await {
            Ok(Some(response)) => Ok(response),
            Ok(None) => {
                *guard = None;
                StreamClosedSnafu { message: "server closed the session" }.fail()
            }
            Err(status) => {
                *guard = None;
                Err(status.into())
            }
        }
    }

    /// Closes the session stream.
    ///
    /// Half-closes the send side and discards the cached stream; the server
    /// rolls back any transaction still open on it. Idempotent — a no-op
    /// when nothing is open. A later operation opens a fresh stream.
    pub(crate) async fn close(&self) {
        let mut guard = self.stream.lock().await;
        if guard.take().is_some() {
            tracing::debug!("catalog session closed");
        }
    }

    /// Opens the stream, signing the opening request when configured.
    async fn open(&self, first: &CatalogRequest) -> Result<OpenStream> {
        let mut endpoint = Endpoint::from_shared(self.config.endpoint().to_owned())
            .context(TransportSnafu)?
            .connect_timeout(self.config.connect_timeout())
            .tcp_nodelay(true)
            .tcp_keepalive(Some(TCP_KEEPALIVE_INTERVAL))
            .http2_keep_alive_interval(HTTP2_KEEPALIVE_INTERVAL)
            .keep_alive_timeout(HTTP2_KEEPALIVE_TIMEOUT)
            .keep_alive_while_idle(true);

        if let Some(tls) = self.config.tls() {
            endpoint = endpoint.tls_config(client_tls(tls)?).context(TransportSnafu)?;
        }

        let channel = endpoint.connect().await.context(TransportSnafu)?;

        let (requests, receiver) = mpsc::channel(REQUEST_BUFFER);
        let mut call = tonic::Request::new(ReceiverStream::new(receiver));

        if let Some(signer) = &self.signer {
            let authority = self.config.signing_authority()?;
            let payload = first.encode_to_vec();
            let (signature, timestamp) =
                signer.sign(SESSION_METHOD, &authority, &payload).await?;

            let metadata = call.metadata_mut();
            metadata.insert(
                HMAC_SIGNATURE_HEADER,
                signature.parse().map_err(|_| {
                    SigningSnafu { message: "signature is not valid metadata" }.build()
                })?,
            );
            metadata.insert(
                HMAC_TIMESTAMP_HEADER,
                timestamp.parse().map_err(|_| {
                    SigningSnafu { message: "timestamp is not valid metadata" }.build()
                })?,
            );
        }

        let mut client = CatalogServiceClient::new(channel);
        let responses = client.session(call).await.map_err(crate::error::CatalogError::from)?;

        Ok(OpenStream { requests, responses: responses.into_inner() })
    }
}

/// Builds the tonic TLS settings from the client configuration.
fn client_tls(tls: &crate::config::TlsConfig) -> Result<tonic::transport::ClientTlsConfig> {
    use crate::config::CertificateData;

    let mut config = tonic::transport::ClientTlsConfig::new().with_enabled_roots();
    if let Some(ca_cert) = &tls.ca_cert {
        let pem = match ca_cert {
            CertificateData::Pem(pem) => pem.clone(),
            CertificateData::Path(path) => std::fs::read(path).map_err(|e| {
                ConnectionSnafu { message: format!("failed to read CA cert {path:?}: {e}") }
                    .build()
            })?,
        };
        config = config.ca_certificate(tonic::transport::Certificate::from_pem(pem));
    }
    if let Some(domain) = &tls.domain_name {
        config = config.domain_name(domain);
    }
    Ok(config)
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.config.endpoint())
            .field("signed", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn test_config() -> CatalogConfig {
        CatalogConfig::builder()
            .with_domain("demo")
            .with_environment("staging")
            .with_endpoint("http://127.0.0.1:1")
            .with_connect_timeout(std::time::Duration::from_millis(100))
            .build()
            .expect("valid test config")
    }

    #[test]
    fn session_creation_does_not_connect() {
        let session = Session::new(test_config(), None);
        assert!(session.stream.try_lock().expect("uncontended").is_none());
    }

    #[tokio::test]
    async fn close_without_open_stream_is_a_noop() {
        let session = Session::new(test_config(), None);
        session.close().await;
        session.close().await;
        assert!(session.stream.lock().await.is_none());
    }

    #[tokio::test]
    async fn roundtrip_fails_against_unreachable_endpoint() {
        let session = Session::new(test_config(), None);
        let result = session.roundtrip(CatalogRequest { payload: None }).await;
        assert!(result.is_err(), "expected connection failure");
        // Failure leaves nothing cached; a later call retries from scratch.
        assert!(session.stream.lock().await.is_none());
    }
}
