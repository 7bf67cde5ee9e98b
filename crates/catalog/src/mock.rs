//! Mock catalog gRPC server for integration testing.
//!
//! Provides a controllable in-process implementation of the catalog service
//! for testing client behavior without a real deployment:
//!
//! - **Record storage**: committed rows per entity with server-assigned
//!   versions
//! - **Transactions**: a per-connection overlay staging writes until commit;
//!   dropping the stream discards it (the implicit rollback)
//! - **Version checks**: edits submitting a mismatched row version are
//!   rejected with `ABORTED`
//! - **Failure injection**: queue statuses to fail upcoming requests
//! - **Signing capture**: the HMAC metadata of the session-opening call is
//!   recorded for assertions
//!
//! # Example
//!
//! ```no_run
//! use chainreg_catalog::mock::MockCatalogServer;
//! use chainreg_catalog::CatalogClient;
//!
//! # async fn example() -> chainreg_catalog::Result<()> {
//! let server = MockCatalogServer::start().await?;
//! let client = CatalogClient::connect(server.endpoint(), "demo", "staging")?;
//! # Ok(())
//! # }
//! ```

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::{ReceiverStream, TcpListenerStream};
use tonic::{Code, Request, Response, Status, transport::Server};

use chainreg_proto::proto::{
    self, EditSemantics,
    catalog_request::Payload as RequestPayload,
    catalog_response::Payload as ResponsePayload,
    catalog_service_server::{CatalogService, CatalogServiceServer},
};

use crate::error::{ConfigSnafu, ConnectionSnafu, Result};
use crate::signer::{HMAC_SIGNATURE_HEADER, HMAC_TIMESTAMP_HEADER};

/// Key for address references: (domain, environment, selector, type, version, qualifier).
type AddressKey = (String, String, u64, String, String, String);

/// Key for chain metadata: (domain, environment, selector).
type ChainKey = (String, String, u64);

/// Key for contract metadata: (domain, environment, selector, address).
type ContractKey = (String, String, u64, String);

/// Key for the env metadata singleton: (domain, environment).
type ScopeKey = (String, String);

/// Writes staged by an open transaction, applied on commit and discarded on
/// rollback or disconnect.
#[derive(Debug, Default)]
struct TxnOverlay {
    address_refs: HashMap<AddressKey, proto::AddressReference>,
    chain_metadata: HashMap<ChainKey, proto::ChainMetadataRecord>,
    contract_metadata: HashMap<ContractKey, proto::ContractMetadataRecord>,
    env_metadata: HashMap<ScopeKey, proto::EnvMetadataRecord>,
}

/// Shared state for the mock server.
#[derive(Debug, Default)]
struct MockState {
    /// Committed rows. Stored records carry their current version.
    address_refs: RwLock<HashMap<AddressKey, proto::AddressReference>>,
    chain_metadata: RwLock<HashMap<ChainKey, proto::ChainMetadataRecord>>,
    contract_metadata: RwLock<HashMap<ContractKey, proto::ContractMetadataRecord>>,
    env_metadata: RwLock<HashMap<ScopeKey, proto::EnvMetadataRecord>>,

    /// Statuses to fail upcoming requests with, drained front-first.
    injected: Mutex<VecDeque<(i32, String)>>,

    /// Total find requests received.
    find_count: AtomicUsize,

    /// Total edit requests received.
    edit_count: AtomicUsize,

    /// HMAC metadata captured from the most recent session-opening call.
    last_hmac: RwLock<Option<(String, String)>>,
}

impl MockState {
    fn pop_injected(&self) -> Option<(i32, String)> {
        self.injected.lock().pop_front()
    }

    /// Processes one request against committed state plus the connection's
    /// transaction overlay.
    fn handle(
        &self,
        request: proto::CatalogRequest,
        txn: &mut Option<TxnOverlay>,
    ) -> proto::CatalogResponse {
        let payload = match request.payload {
            Some(payload) => payload,
            None => {
                // No way to know which response union arm the client wants;
                // answer with an empty envelope and let it surface the error.
                return proto::CatalogResponse { payload: None };
            }
        };

        let payload = match payload {
            RequestPayload::AddressReferenceFind(req) => {
                self.find_count.fetch_add(1, Ordering::SeqCst);
                let scope = req.scope.clone().unwrap_or_default();
                let (status, references) = match self.pop_injected() {
                    Some((code, message)) => (status_of(code, message), Vec::new()),
                    None => {
                        let overlay = overlay_for(txn, req.ignore_transaction, |t| &t.address_refs);
                        let rows = read_rows(&self.address_refs, overlay, |k| {
                            k.0 == scope.domain
                                && k.1 == scope.environment
                                && req.key.as_ref().is_none_or(|key| {
                                    k.2 == key.chain_selector
                                        && k.3 == key.contract_type
                                        && k.4 == key.version
                                        && k.5 == key.qualifier
                                })
                        });
                        keyed_find_status(req.key.is_some(), rows, "no address reference found")
                    }
                };
                ResponsePayload::AddressReferenceFind(proto::AddressReferenceFindResponse {
                    status: Some(status),
                    references,
                })
            }
            RequestPayload::AddressReferenceEdit(req) => {
                self.edit_count.fetch_add(1, Ordering::SeqCst);
                let scope = req.scope.clone().unwrap_or_default();
                let (status, reference) = match self.pop_injected() {
                    Some((code, message)) => (status_of(code, message), None),
                    None => match req.reference {
                        None => (
                            status_of(Code::InvalidArgument as i32, "missing address reference"),
                            None,
                        ),
                        Some(reference) => {
                            let key = (
                                scope.domain,
                                scope.environment,
                                reference.chain_selector,
                                reference.contract_type.clone(),
                                reference.version.clone(),
                                reference.qualifier.clone(),
                            );
                            let submitted = reference.row_version;
                            let outcome = apply_edit(
                                &self.address_refs,
                                txn.as_mut().map(|t| &mut t.address_refs),
                                key,
                                reference,
                                semantics_of(req.semantics),
                                submitted,
                                |r| r.row_version,
                                |r, v| r.row_version = v,
                            );
                            edit_response(outcome)
                        }
                    },
                };
                ResponsePayload::AddressReferenceEdit(proto::AddressReferenceEditResponse {
                    status: Some(status),
                    reference,
                })
            }
            RequestPayload::ChainMetadataFind(req) => {
                self.find_count.fetch_add(1, Ordering::SeqCst);
                let scope = req.scope.clone().unwrap_or_default();
                let (status, records) = match self.pop_injected() {
                    Some((code, message)) => (status_of(code, message), Vec::new()),
                    None => {
                        let overlay =
                            overlay_for(txn, req.ignore_transaction, |t| &t.chain_metadata);
                        let rows = read_rows(&self.chain_metadata, overlay, |k| {
                            k.0 == scope.domain
                                && k.1 == scope.environment
                                && req.chain_selector.is_none_or(|selector| k.2 == selector)
                        });
                        keyed_find_status(
                            req.chain_selector.is_some(),
                            rows,
                            "no chain metadata found",
                        )
                    }
                };
                ResponsePayload::ChainMetadataFind(proto::ChainMetadataFindResponse {
                    status: Some(status),
                    records,
                })
            }
            RequestPayload::ChainMetadataEdit(req) => {
                self.edit_count.fetch_add(1, Ordering::SeqCst);
                let scope = req.scope.clone().unwrap_or_default();
                let (status, record) = match self.pop_injected() {
                    Some((code, message)) => (status_of(code, message), None),
                    None => match req.record {
                        None => (
                            status_of(Code::InvalidArgument as i32, "missing chain metadata"),
                            None,
                        ),
                        Some(record) => {
                            let key = (scope.domain, scope.environment, record.chain_selector);
                            let submitted = record.row_version;
                            let outcome = apply_edit(
                                &self.chain_metadata,
                                txn.as_mut().map(|t| &mut t.chain_metadata),
                                key,
                                record,
                                semantics_of(req.semantics),
                                submitted,
                                |r| r.row_version,
                                |r, v| r.row_version = v,
                            );
                            edit_response(outcome)
                        }
                    },
                };
                ResponsePayload::ChainMetadataEdit(proto::ChainMetadataEditResponse {
                    status: Some(status),
                    record,
                })
            }
            RequestPayload::ContractMetadataFind(req) => {
                self.find_count.fetch_add(1, Ordering::SeqCst);
                let scope = req.scope.clone().unwrap_or_default();
                let (status, records) = match self.pop_injected() {
                    Some((code, message)) => (status_of(code, message), Vec::new()),
                    None => {
                        let overlay =
                            overlay_for(txn, req.ignore_transaction, |t| &t.contract_metadata);
                        let rows = read_rows(&self.contract_metadata, overlay, |k| {
                            k.0 == scope.domain
                                && k.1 == scope.environment
                                && req.key.as_ref().is_none_or(|key| {
                                    k.2 == key.chain_selector && k.3 == key.address
                                })
                        });
                        keyed_find_status(req.key.is_some(), rows, "no contract metadata found")
                    }
                };
                ResponsePayload::ContractMetadataFind(proto::ContractMetadataFindResponse {
                    status: Some(status),
                    records,
                })
            }
            RequestPayload::ContractMetadataEdit(req) => {
                self.edit_count.fetch_add(1, Ordering::SeqCst);
                let scope = req.scope.clone().unwrap_or_default();
                let (status, record) = match self.pop_injected() {
                    Some((code, message)) => (status_of(code, message), None),
                    None => match req.record {
                        None => (
                            status_of(Code::InvalidArgument as i32, "missing contract metadata"),
                            None,
                        ),
                        Some(record) => {
                            let key = (
                                scope.domain,
                                scope.environment,
                                record.chain_selector,
                                record.address.clone(),
                            );
                            let submitted = record.row_version;
                            let outcome = apply_edit(
                                &self.contract_metadata,
                                txn.as_mut().map(|t| &mut t.contract_metadata),
                                key,
                                record,
                                semantics_of(req.semantics),
                                submitted,
                                |r| r.row_version,
                                |r, v| r.row_version = v,
                            );
                            edit_response(outcome)
                        }
                    },
                };
                ResponsePayload::ContractMetadataEdit(proto::ContractMetadataEditResponse {
                    status: Some(status),
                    record,
                })
            }
            RequestPayload::EnvMetadataFind(req) => {
                self.find_count.fetch_add(1, Ordering::SeqCst);
                let scope = req.scope.clone().unwrap_or_default();
                let (status, records) = match self.pop_injected() {
                    Some((code, message)) => (status_of(code, message), Vec::new()),
                    None => {
                        let overlay = overlay_for(txn, req.ignore_transaction, |t| &t.env_metadata);
                        let rows = read_rows(&self.env_metadata, overlay, |k| {
                            k.0 == scope.domain && k.1 == scope.environment
                        });
                        // The scope is the key, so every env find is keyed.
                        keyed_find_status(true, rows, "no environment metadata found")
                    }
                };
                ResponsePayload::EnvMetadataFind(proto::EnvMetadataFindResponse {
                    status: Some(status),
                    records,
                })
            }
            RequestPayload::EnvMetadataEdit(req) => {
                self.edit_count.fetch_add(1, Ordering::SeqCst);
                let scope = req.scope.clone().unwrap_or_default();
                let (status, record) = match self.pop_injected() {
                    Some((code, message)) => (status_of(code, message), None),
                    None => match req.record {
                        None => (
                            status_of(Code::InvalidArgument as i32, "missing environment metadata"),
                            None,
                        ),
                        Some(record) => {
                            let key = (scope.domain, scope.environment);
                            let submitted = record.row_version;
                            let outcome = apply_edit(
                                &self.env_metadata,
                                txn.as_mut().map(|t| &mut t.env_metadata),
                                key,
                                record,
                                semantics_of(req.semantics),
                                submitted,
                                |r| r.row_version,
                                |r, v| r.row_version = v,
                            );
                            edit_response(outcome)
                        }
                    },
                };
                ResponsePayload::EnvMetadataEdit(proto::EnvMetadataEditResponse {
                    status: Some(status),
                    record,
                })
            }
            RequestPayload::BeginTransaction(_) => {
                let status = match self.pop_injected() {
                    Some((code, message)) => status_of(code, message),
                    None if txn.is_some() => status_of(
                        Code::FailedPrecondition as i32,
                        "transaction already open on this session",
                    ),
                    None => {
                        *txn = Some(TxnOverlay::default());
                        ok_status()
                    }
                };
                ResponsePayload::BeginTransaction(proto::BeginTransactionResponse {
                    status: Some(status),
                })
            }
            RequestPayload::CommitTransaction(_) => {
                let status = match self.pop_injected() {
                    Some((code, message)) => status_of(code, message),
                    None => {
                        // Commit with nothing open succeeds silently.
                        if let Some(overlay) = txn.take() {
                            self.commit(overlay);
                        }
                        ok_status()
                    }
                };
                ResponsePayload::CommitTransaction(proto::CommitTransactionResponse {
                    status: Some(status),
                })
            }
            RequestPayload::RollbackTransaction(_) => {
                let status = match self.pop_injected() {
                    Some((code, message)) => status_of(code, message),
                    None => {
                        txn.take();
                        ok_status()
                    }
                };
                ResponsePayload::RollbackTransaction(proto::RollbackTransactionResponse {
                    status: Some(status),
                })
            }
        };

        proto::CatalogResponse { payload: Some(payload) }
    }

    /// Applies staged writes to committed state. Conflicts were already
    /// detected at write time, not here.
    fn commit(&self, overlay: TxnOverlay) {
        self.address_refs.write().extend(overlay.address_refs);
        self.chain_metadata.write().extend(overlay.chain_metadata);
        self.contract_metadata.write().extend(overlay.contract_metadata);
        self.env_metadata.write().extend(overlay.env_metadata);
    }
}

/// Selects the overlay map for a read, honoring `ignore_transaction`.
fn overlay_for<'a, M>(
    txn: &'a Option<TxnOverlay>,
    ignore_transaction: bool,
    project: impl FnOnce(&'a TxnOverlay) -> &'a M,
) -> Option<&'a M> {
    if ignore_transaction { None } else { txn.as_ref().map(project) }
}

/// Merges committed rows with an overlay, overlay winning per key.
fn read_rows<K: Eq + Hash + Clone, V: Clone>(
    committed: &RwLock<HashMap<K, V>>,
    overlay: Option<&HashMap<K, V>>,
    matches: impl Fn(&K) -> bool,
) -> Vec<V> {
    let committed = committed.read();
    let mut merged: HashMap<K, V> = committed
        .iter()
        .filter(|(k, _)| matches(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if let Some(overlay) = overlay {
        for (k, v) in overlay {
            if matches(k) {
                merged.insert(k.clone(), v.clone());
            }
        }
    }
    merged.into_values().collect()
}

/// Applies one edit, enforcing semantics and the optimistic version check.
/// Writes land in the overlay when a transaction is open, otherwise in
/// committed state. Returns the stored record.
#[allow(clippy::too_many_arguments)]
fn apply_edit<K: Eq + Hash + Clone, V: Clone>(
    committed: &RwLock<HashMap<K, V>>,
    overlay: Option<&mut HashMap<K, V>>,
    key: K,
    mut record: V,
    semantics: EditSemantics,
    submitted: u64,
    version_of: impl Fn(&V) -> u64,
    set_version: impl Fn(&mut V, u64),
) -> std::result::Result<V, (i32, String)> {
    let mut committed = committed.write();

    let current_version = overlay
        .as_deref()
        .and_then(|o| o.get(&key))
        .or_else(|| committed.get(&key))
        .map(&version_of);

    match semantics {
        EditSemantics::Insert if current_version.is_some() => {
            return Err((Code::AlreadyExists as i32, "record already exists".to_owned()));
        }
        EditSemantics::Update if current_version.is_none() => {
            return Err((Code::NotFound as i32, "no record to update".to_owned()));
        }
        EditSemantics::Unspecified => {
            return Err((Code::InvalidArgument as i32, "edit semantics unspecified".to_owned()));
        }
        _ => {}
    }

    let have = current_version.unwrap_or(0);
    if submitted != have {
        return Err((
            Code::Aborted as i32,
            format!("row version mismatch: submitted {submitted}, have {have}"),
        ));
    }

    set_version(&mut record, have + 1);
    let stored = record.clone();
    match overlay {
        Some(overlay) => {
            overlay.insert(key, record);
        }
        None => {
            committed.insert(key, record);
        }
    }
    Ok(stored)
}

fn semantics_of(raw: i32) -> EditSemantics {
    EditSemantics::try_from(raw).unwrap_or(EditSemantics::Unspecified)
}

fn edit_response<V>(
    outcome: std::result::Result<V, (i32, String)>,
) -> (proto::ResponseStatus, Option<V>) {
    match outcome {
        Ok(record) => (ok_status(), Some(record)),
        Err((code, message)) => (status_of(code, message), None),
    }
}

/// Keyed finds with no match report NotFound; scope-wide finds return an
/// empty OK result.
fn keyed_find_status<V>(
    keyed: bool,
    rows: Vec<V>,
    not_found: &str,
) -> (proto::ResponseStatus, Vec<V>) {
    if keyed && rows.is_empty() {
        (status_of(Code::NotFound as i32, not_found), rows)
    } else {
        (ok_status(), rows)
    }
}

fn ok_status() -> proto::ResponseStatus {
    proto::ResponseStatus { code: Code::Ok as i32, message: String::new(), details: Vec::new() }
}

fn status_of(code: i32, message: impl Into<String>) -> proto::ResponseStatus {
    proto::ResponseStatus { code, message: message.into(), details: Vec::new() }
}

/// The session service implementation.
#[derive(Debug)]
struct MockCatalogService {
    state: Arc<MockState>,
}

#[tonic::async_trait]
impl CatalogService for MockCatalogService {
    type SessionStream = ReceiverStream<std::result::Result<proto::CatalogResponse, Status>>;

    async fn session(
        &self,
        request: Request<tonic::Streaming<proto::CatalogRequest>>,
    ) -> std::result::Result<Response<Self::SessionStream>, Status> {
        // Record HMAC metadata from the channel-opening call for assertions.
        let metadata = request.metadata();
        let signature = metadata
            .get(HMAC_SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let timestamp = metadata
            .get(HMAC_TIMESTAMP_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        if let (Some(signature), Some(timestamp)) = (signature, timestamp) {
            *self.state.last_hmac.write() = Some((signature, timestamp));
        }

        let mut inbound = request.into_inner();
        let (tx, rx) = mpsc::channel(16);
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            // Dropping the overlay when the stream ends is the implicit
            // rollback: transaction state lives and dies with the stream.
            let mut txn: Option<TxnOverlay> = None;
            while let Ok(Some(request)) = inbound.message().await {
                let response = state.handle(request, &mut txn);
                if tx.send(Ok(response)).await.is_err() {
                    break;
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}

/// Controllable mock implementation of the catalog service.
pub struct MockCatalogServer {
    state: Arc<MockState>,
    endpoint: String,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockCatalogServer {
    /// Starts a mock server on an ephemeral port.
    ///
    /// # Errors
    ///
    /// Returns a connection error if binding fails.
    pub async fn start() -> Result<Self> {
        Self::start_on_port(0).await
    }

    /// Starts a mock server on a specific port (0 for ephemeral).
    ///
    /// # Errors
    ///
    /// Returns a connection error if binding fails.
    pub async fn start_on_port(port: u16) -> Result<Self> {
        let state = Arc::new(MockState::default());

        let addr: SocketAddr = format!("127.0.0.1:{port}")
            .parse()
            .map_err(|e| ConfigSnafu { message: format!("invalid port: {e}") }.build())?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ConnectionSnafu { message: format!("failed to bind: {e}") }.build())?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| ConnectionSnafu { message: format!("no local addr: {e}") }.build())?;

        let endpoint = format!("http://{local_addr}");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let service = MockCatalogService { state: Arc::clone(&state) };
        let incoming = TcpListenerStream::new(listener);

        tokio::spawn(async move {
            let result = Server::builder()
                .add_service(CatalogServiceServer::new(service))
                .serve_with_incoming_shutdown(incoming, async {
                    let _ = shutdown_rx.await;
                })
                .await;

            if let Err(e) = result {
                tracing::error!("mock catalog server error: {e}");
            }
        });

        Ok(Self { state, endpoint, shutdown_tx: Some(shutdown_tx) })
    }

    /// Returns the endpoint URL for connecting to this server.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Seeds a committed address reference. The stored `row_version` is
    /// taken from the record as given.
    pub fn set_address_ref(&self, domain: &str, environment: &str, reference: proto::AddressReference) {
        let key = (
            domain.to_owned(),
            environment.to_owned(),
            reference.chain_selector,
            reference.contract_type.clone(),
            reference.version.clone(),
            reference.qualifier.clone(),
        );
        self.state.address_refs.write().insert(key, reference);
    }

    /// Returns the committed version of an address reference, if present.
    #[must_use]
    pub fn address_ref_version(
        &self,
        domain: &str,
        environment: &str,
        key: &proto::AddressReferenceKey,
    ) -> Option<u64> {
        let map_key = (
            domain.to_owned(),
            environment.to_owned(),
            key.chain_selector,
            key.contract_type.clone(),
            key.version.clone(),
            key.qualifier.clone(),
        );
        self.state.address_refs.read().get(&map_key).map(|r| r.row_version)
    }

    /// Seeds a committed contract metadata record. The stored `row_version`
    /// is taken from the record as given.
    pub fn set_contract_metadata(
        &self,
        domain: &str,
        environment: &str,
        record: proto::ContractMetadataRecord,
    ) {
        let key = (
            domain.to_owned(),
            environment.to_owned(),
            record.chain_selector,
            record.address.clone(),
        );
        self.state.contract_metadata.write().insert(key, record);
    }

    /// Returns the committed version of a contract metadata record.
    #[must_use]
    pub fn contract_metadata_version(
        &self,
        domain: &str,
        environment: &str,
        key: &proto::ContractMetadataKey,
    ) -> Option<u64> {
        let map_key =
            (domain.to_owned(), environment.to_owned(), key.chain_selector, key.address.clone());
        self.state.contract_metadata.read().get(&map_key).map(|r| r.row_version)
    }

    /// Queues `times` failures with the given status for upcoming requests.
    pub fn inject_status(&self, code: Code, message: &str, times: usize) {
        let mut injected = self.state.injected.lock();
        for _ in 0..times {
            injected.push_back((code as i32, message.to_owned()));
        }
    }

    /// Total find requests received.
    #[must_use]
    pub fn find_count(&self) -> usize {
        self.state.find_count.load(Ordering::SeqCst)
    }

    /// Total edit requests received.
    #[must_use]
    pub fn edit_count(&self) -> usize {
        self.state.edit_count.load(Ordering::SeqCst)
    }

    /// HMAC metadata captured from the most recent session-opening call, as
    /// `(signature_hex, timestamp)`.
    #[must_use]
    pub fn last_hmac(&self) -> Option<(String, String)> {
        self.state.last_hmac.read().clone()
    }

    /// Stops the server.
    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockCatalogServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl std::fmt::Debug for MockCatalogServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCatalogServer").field("endpoint", &self.endpoint).finish_non_exhaustive()
    }
}
