//! Transactional client for the chainreg catalog service.
//!
//! The catalog is a remote, gRPC-backed datastore tracking deployed contract
//! addresses and metadata across chains. This crate is its client: typed
//! record stores with optimistic-concurrency version tracking, layered over
//! a single long-lived bidirectional stream that doubles as the transaction
//! scope.
//!
//! # Features
//!
//! - **Typed stores**: address references, chain / contract / environment
//!   metadata, each with Get / Fetch / Filter / Add / Upsert / Update
//! - **Optimistic concurrency**: per-record version caching, stale writes
//!   surfaced as typed errors
//! - **Transactions**: explicit begin/commit/rollback plus a scoped
//!   [`with_transaction`](CatalogClient::with_transaction) guaranteeing
//!   cleanup on error and panic
//! - **HMAC auth**: session-opening requests signed via a remote keyed-MAC
//!   capability, no key material held locally
//! - **No hidden retries**: every failure is surfaced to the caller
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use chainreg_catalog::{CatalogClient, GetOptions};
//! use chainreg_types::{AddressRefKey, ChainSelector, Version};
//!
//! #[tokio::main]
//! async fn main() -> chainreg_catalog::Result<()> {
//!     let client = CatalogClient::connect("http://localhost:50051", "ccip", "staging")?;
//!
//!     let key = AddressRefKey {
//!         chain_selector: ChainSelector::new(1),
//!         contract_type: "Router".to_owned(),
//!         version: Version::new(1, 2, 0),
//!         qualifier: String::new(),
//!     };
//!     let reference = client.address_refs().get(&key, GetOptions::new()).await?;
//!     println!("router at {}", reference.address);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 CatalogClient (facade)                      │
//! │  .address_refs() │ .chain_metadata() │ .with_transaction() │
//! ├─────────────────────────────────────────────────────────────┤
//! │                 Entity stores (×4)                          │
//! │   Filter construction │ Conversions │ Version cache        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                 Session                                     │
//! │   One bidi stream │ Lazy connect │ HMAC on open            │
//! ├─────────────────────────────────────────────────────────────┤
//! │                 Tonic gRPC transport                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Concurrency
//!
//! One client instance is one transaction scope. Non-transactional
//! operations from concurrent tasks serialize on the session stream and are
//! safe; concurrent transactional sequences on one client are not — see
//! [`CatalogClient`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod error;
pub mod mock;
mod session;
mod signer;
mod status;
mod store;
mod stores;
mod transaction;

// Public API exports
pub use client::CatalogClient;
pub use config::{
    CatalogConfig, CatalogConfigBuilder, CertificateData, HmacConfig, TlsConfig,
    authority_from_endpoint,
};
pub use error::{CatalogError, Result};
pub use signer::{
    HMAC_SIGNATURE_HEADER, HMAC_TIMESTAMP_HEADER, KeyedMac, LocalHmacKey, RequestSigner,
};
pub use store::{FilterPredicate, GetOptions, MetadataUpdater, UpdateOptions};
pub use stores::{
    AddressRefStore, ChainMetadataStore, ContractMetadataStore, EnvMetadataStore, filters,
};

// Re-export commonly used types from chainreg-types
pub use chainreg_types::{
    AddressRef, AddressRefKey, ChainMetadata, ChainSelector, ContractMetadata,
    ContractMetadataKey, Document, EnvMetadata, Version,
};
