//! The catalog client facade.
//!
//! [`CatalogClient`] composes the four entity stores and the transaction
//! coordinator behind one cheap-to-clone handle sharing a single session
//! stream.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use chainreg_proto::proto::Scope;

use crate::config::CatalogConfig;
use crate::error::{CatalogError, ConfigSnafu, Result};
use crate::session::Session;
use crate::signer::{KeyedMac, RequestSigner};
use crate::stores::{AddressRefStore, ChainMetadataStore, ContractMetadataStore, EnvMetadataStore};
use crate::transaction::TxnCoordinator;

/// Client for the remote catalog service.
///
/// All operations multiplex over one lazily-established stream; nothing
/// connects until the first operation. Cloning is cheap and clones share the
/// stream, the version caches, and — because the server binds transaction
/// state to the stream — the transaction scope.
///
/// # Concurrency
///
/// Non-transactional operations may run concurrently from multiple tasks;
/// they serialize on the stream. Transactional use is a different matter:
/// one client (and its clones) carries at most one open transaction, and
/// concurrent begin/operation/commit sequences from two tasks would
/// interleave against the same server-side transaction. Use one client per
/// logical unit of work.
#[derive(Clone, Debug)]
pub struct CatalogClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    session: Arc<Session>,
    coordinator: TxnCoordinator,
    address_refs: AddressRefStore,
    chain_metadata: ChainMetadataStore,
    contract_metadata: ContractMetadataStore,
    env_metadata: EnvMetadataStore,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Creates a client without request signing.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the config enables HMAC signing —
    /// a signing-enabled config needs a keyring, use
    /// [`with_keyring`](Self::with_keyring).
    pub fn new(config: CatalogConfig) -> Result<Self> {
        if config.hmac().is_some() {
            return ConfigSnafu {
                message: "config enables hmac signing; construct with a keyring",
            }
            .fail();
        }
        Ok(Self::build(config, None))
    }

    /// Creates a client that signs the session-opening request with the
    /// configured remote MAC key.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the config carries no HMAC
    /// section.
    pub fn with_keyring(config: CatalogConfig, keyring: Arc<dyn KeyedMac>) -> Result<Self> {
        let hmac = config
            .hmac()
            .cloned()
            .ok_or_else(|| {
                ConfigSnafu { message: "keyring provided but config has no hmac section" }.build()
            })?;
        let signer = RequestSigner::new(keyring, hmac);
        Ok(Self::build(config, Some(signer)))
    }

    /// Convenience constructor for an unsigned client against one endpoint.
    ///
    /// No connection is made until the first operation.
    pub fn connect(
        endpoint: impl Into<String>,
        domain: impl Into<String>,
        environment: impl Into<String>,
    ) -> Result<Self> {
        let config = CatalogConfig::builder()
            .with_endpoint(endpoint)
            .with_domain(domain)
            .with_environment(environment)
            .build()?;
        Self::new(config)
    }

    fn build(config: CatalogConfig, signer: Option<RequestSigner>) -> Self {
        let session = Arc::new(Session::new(config.clone(), signer));
        let scope = Scope {
            domain: config.domain().to_owned(),
            environment: config.environment().to_owned(),
        };
        Self {
            inner: Arc::new(ClientInner {
                coordinator: TxnCoordinator::new(Arc::clone(&session)),
                address_refs: AddressRefStore::new(Arc::clone(&session), scope.clone()),
                chain_metadata: ChainMetadataStore::new(Arc::clone(&session), scope.clone()),
                contract_metadata: ContractMetadataStore::new(Arc::clone(&session), scope.clone()),
                env_metadata: EnvMetadataStore::new(Arc::clone(&session), scope),
                session,
                config,
            }),
        }
    }

    /// Returns a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.inner.config
    }

    /// The address reference store.
    #[must_use]
    pub fn address_refs(&self) -> &AddressRefStore {
        &self.inner.address_refs
    }

    /// The chain metadata store.
    #[must_use]
    pub fn chain_metadata(&self) -> &ChainMetadataStore {
        &self.inner.chain_metadata
    }

    /// The contract metadata store.
    #[must_use]
    pub fn contract_metadata(&self) -> &ContractMetadataStore {
        &self.inner.contract_metadata
    }

    /// The environment metadata store.
    #[must_use]
    pub fn env_metadata(&self) -> &EnvMetadataStore {
        &self.inner.env_metadata
    }

    /// Opens a transaction on the session.
    ///
    /// A second begin while one is open is rejected by the server. Callers
    /// driving begin/commit/rollback by hand own their cleanup on every exit
    /// path — prefer [`with_transaction`](Self::with_transaction).
    pub async fn begin_transaction(&self) -> Result<()> {
        self.inner.coordinator.begin().await
    }

    /// Commits the open transaction. Succeeds silently when none is open.
    pub async fn commit_transaction(&self) -> Result<()> {
        self.inner.coordinator.commit().await
    }

    /// Rolls back the open transaction. Succeeds silently when none is open.
    pub async fn rollback_transaction(&self) -> Result<()> {
        self.inner.coordinator.rollback().await
    }

    /// Runs `f` inside a transaction, guaranteeing cleanup on every exit
    /// path.
    ///
    /// Begins a transaction and invokes `f` with a clone of this client:
    /// - if `f` panics, the transaction is rolled back and the panic
    ///   resumes;
    /// - if `f` returns an error, the transaction is rolled back and the
    ///   error is returned (a rollback failure is reported alongside it);
    /// - otherwise the transaction is committed and the commit's result
    ///   returned.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use chainreg_catalog::{CatalogClient, GetOptions};
    /// # use chainreg_types::{ContractMetadataKey, ChainSelector, Document};
    /// # async fn example(client: &CatalogClient) -> chainreg_catalog::Result<()> {
    /// client
    ///     .with_transaction(|txn| async move {
    ///         let key = ContractMetadataKey {
    ///             chain_selector: ChainSelector::new(1),
    ///             address: "0x1234".to_owned(),
    ///         };
    ///         txn.contract_metadata()
    ///             .upsert(&key, Document::default(), Default::default())
    ///             .await
    ///     })
    ///     .await
    /// # }
    /// ```
    pub async fn with_transaction<F, Fut, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(CatalogClient) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.begin_transaction().await?;

        match AssertUnwindSafe(f(self.clone())).catch_unwind().await {
            Err(panic) => {
                if let Err(error) = self.rollback_transaction().await {
                    tracing::warn!(error = %error, "rollback after panic failed");
                }
                std::panic::resume_unwind(panic);
            }
            Ok(Err(error)) => match self.rollback_transaction().await {
                Ok(()) => Err(error),
                Err(rollback) => Err(CatalogError::TransactionCleanup {
                    source: Box::new(error),
                    rollback: Box::new(rollback),
                }),
            },
            Ok(Ok(value)) => {
                self.commit_transaction().await?;
                Ok(value)
            }
        }
    }

    /// Closes the session stream.
    ///
    /// The server rolls back any transaction still open on it. Idempotent;
    /// a later operation opens a fresh stream.
    pub async fn close(&self) {
        self.inner.session.close().await;
    }
}
