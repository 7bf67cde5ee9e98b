//! The four entity stores.
//!
//! Each store is a thin typed wrapper holding a configured [`Store`]
//! instance and delegating to it — entity-specific conversions live in the
//! [`CatalogEntity`] bindings, merge semantics for the metadata stores live
//! here.

use std::sync::Arc;

use chainreg_proto::convert;
use chainreg_proto::proto::{
    self, EditSemantics, ResponseStatus, Scope, catalog_request, catalog_response,
};
use chainreg_types::{
    AddressRef, AddressRefKey, ChainMetadata, ChainSelector, ContractMetadata,
    ContractMetadataKey, Document, EnvMetadata,
};
use snafu::ResultExt;

use crate::error::{ConvertSnafu, Result, UnexpectedPayloadSnafu};
use crate::session::Session;
use crate::store::{CatalogEntity, FilterPredicate, GetOptions, Store, UpdateOptions};

// =============================================================================
// Entity bindings
// =============================================================================

pub(crate) enum AddressRefEntity {}

impl CatalogEntity for AddressRefEntity {
    const ENTITY: &'static str = "address reference";
    const DELETE_OPERATION: &'static str = "address reference delete";

    type Key = AddressRefKey;
    type Record = AddressRef;
    type Wire = proto::AddressReference;

    fn key_of(record: &Self::Record) -> Self::Key {
        record.key()
    }

    fn find_request(
        scope: Scope,
        key: Option<&Self::Key>,
        ignore_transaction: bool,
    ) -> catalog_request::Payload {
        catalog_request::Payload::AddressReferenceFind(proto::AddressReferenceFindRequest {
            scope: Some(scope),
            key: key.map(convert::address_ref_key_to_proto),
            ignore_transaction,
        })
    }

    fn edit_request(
        scope: Scope,
        record: &Self::Record,
        semantics: EditSemantics,
        row_version: u64,
    ) -> Result<catalog_request::Payload> {
        Ok(catalog_request::Payload::AddressReferenceEdit(proto::AddressReferenceEditRequest {
            scope: Some(scope),
            semantics: semantics as i32,
            reference: Some(convert::address_ref_to_proto(record, row_version)),
        }))
    }

    fn find_reply(
        payload: catalog_response::Payload,
    ) -> Result<(Option<ResponseStatus>, Vec<Self::Wire>)> {
        match payload {
            catalog_response::Payload::AddressReferenceFind(reply) => {
                Ok((reply.status, reply.references))
            }
            _ => UnexpectedPayloadSnafu { expected: "address reference find response" }.fail(),
        }
    }

    fn edit_reply(payload: catalog_response::Payload) -> Result<Option<ResponseStatus>> {
        match payload {
            catalog_response::Payload::AddressReferenceEdit(reply) => Ok(reply.status),
            _ => UnexpectedPayloadSnafu { expected: "address reference edit response" }.fail(),
        }
    }

    fn from_wire(wire: Self::Wire) -> Result<(Self::Record, u64)> {
        convert::address_ref_from_proto(wire).context(ConvertSnafu)
    }
}

pub(crate) enum ChainMetadataEntity {}

impl CatalogEntity for ChainMetadataEntity {
    const ENTITY: &'static str = "chain metadata";
    const DELETE_OPERATION: &'static str = "chain metadata delete";

    type Key = ChainSelector;
    type Record = ChainMetadata;
    type Wire = proto::ChainMetadataRecord;

    fn key_of(record: &Self::Record) -> Self::Key {
        record.chain_selector
    }

    fn find_request(
        scope: Scope,
        key: Option<&Self::Key>,
        ignore_transaction: bool,
    ) -> catalog_request::Payload {
        catalog_request::Payload::ChainMetadataFind(proto::ChainMetadataFindRequest {
            scope: Some(scope),
            chain_selector: key.map(|selector| selector.value()),
            ignore_transaction,
        })
    }

    fn edit_request(
        scope: Scope,
        record: &Self::Record,
        semantics: EditSemantics,
        row_version: u64,
    ) -> Result<catalog_request::Payload> {
        let record = convert::chain_metadata_to_proto(record, row_version).context(ConvertSnafu)?;
        Ok(catalog_request::Payload::ChainMetadataEdit(proto::ChainMetadataEditRequest {
            scope: Some(scope),
            semantics: semantics as i32,
            record: Some(record),
        }))
    }

    fn find_reply(
        payload: catalog_response::Payload,
    ) -> Result<(Option<ResponseStatus>, Vec<Self::Wire>)> {
        match payload {
            catalog_response::Payload::ChainMetadataFind(reply) => Ok((reply.status, reply.records)),
            _ => UnexpectedPayloadSnafu { expected: "chain metadata find response" }.fail(),
        }
    }

    fn edit_reply(payload: catalog_response::Payload) -> Result<Option<ResponseStatus>> {
        match payload {
            catalog_response::Payload::ChainMetadataEdit(reply) => Ok(reply.status),
            _ => UnexpectedPayloadSnafu { expected: "chain metadata edit response" }.fail(),
        }
    }

    fn from_wire(wire: Self::Wire) -> Result<(Self::Record, u64)> {
        convert::chain_metadata_from_proto(wire).context(ConvertSnafu)
    }
}

pub(crate) enum ContractMetadataEntity {}

impl CatalogEntity for ContractMetadataEntity {
    const ENTITY: &'static str = "contract metadata";
    const DELETE_OPERATION: &'static str = "contract metadata delete";

    type Key = ContractMetadataKey;
    type Record = ContractMetadata;
    type Wire = proto::ContractMetadataRecord;

    fn key_of(record: &Self::Record) -> Self::Key {
        record.key()
    }

    fn find_request(
        scope: Scope,
        key: Option<&Self::Key>,
        ignore_transaction: bool,
    ) -> catalog_request::Payload {
        catalog_request::Payload::ContractMetadataFind(proto::ContractMetadataFindRequest {
            scope: Some(scope),
            key: key.map(convert::contract_metadata_key_to_proto),
            ignore_transaction,
        })
    }

    fn edit_request(
        scope: Scope,
        record: &Self::Record,
        semantics: EditSemantics,
        row_version: u64,
    ) -> Result<catalog_request::Payload> {
        let record =
            convert::contract_metadata_to_proto(record, row_version).context(ConvertSnafu)?;
        Ok(catalog_request::Payload::ContractMetadataEdit(proto::ContractMetadataEditRequest {
            scope: Some(scope),
            semantics: semantics as i32,
            record: Some(record),
        }))
    }

    fn find_reply(
        payload: catalog_response::Payload,
    ) -> Result<(Option<ResponseStatus>, Vec<Self::Wire>)> {
        match payload {
            catalog_response::Payload::ContractMetadataFind(reply) => {
                Ok((reply.status, reply.records))
            }
            _ => UnexpectedPayloadSnafu { expected: "contract metadata find response" }.fail(),
        }
    }

    fn edit_reply(payload: catalog_response::Payload) -> Result<Option<ResponseStatus>> {
        match payload {
            catalog_response::Payload::ContractMetadataEdit(reply) => Ok(reply.status),
            _ => UnexpectedPayloadSnafu { expected: "contract metadata edit response" }.fail(),
        }
    }

    fn from_wire(wire: Self::Wire) -> Result<(Self::Record, u64)> {
        convert::contract_metadata_from_proto(wire).context(ConvertSnafu)
    }
}

pub(crate) enum EnvMetadataEntity {}

impl CatalogEntity for EnvMetadataEntity {
    const ENTITY: &'static str = "environment metadata";
    const DELETE_OPERATION: &'static str = "environment metadata delete";

    // The domain+environment scope is the key.
    type Key = ();
    type Record = EnvMetadata;
    type Wire = proto::EnvMetadataRecord;

    fn key_of(_record: &Self::Record) -> Self::Key {}

    fn find_request(
        scope: Scope,
        _key: Option<&Self::Key>,
        ignore_transaction: bool,
    ) -> catalog_request::Payload {
        catalog_request::Payload::EnvMetadataFind(proto::EnvMetadataFindRequest {
            scope: Some(scope),
            ignore_transaction,
        })
    }

    fn edit_request(
        scope: Scope,
        record: &Self::Record,
        semantics: EditSemantics,
        row_version: u64,
    ) -> Result<catalog_request::Payload> {
        let record = convert::env_metadata_to_proto(record, row_version).context(ConvertSnafu)?;
        Ok(catalog_request::Payload::EnvMetadataEdit(proto::EnvMetadataEditRequest {
            scope: Some(scope),
            semantics: semantics as i32,
            record: Some(record),
        }))
    }

    fn find_reply(
        payload: catalog_response::Payload,
    ) -> Result<(Option<ResponseStatus>, Vec<Self::Wire>)> {
        match payload {
            catalog_response::Payload::EnvMetadataFind(reply) => Ok((reply.status, reply.records)),
            _ => UnexpectedPayloadSnafu { expected: "environment metadata find response" }.fail(),
        }
    }

    fn edit_reply(payload: catalog_response::Payload) -> Result<Option<ResponseStatus>> {
        match payload {
            catalog_response::Payload::EnvMetadataEdit(reply) => Ok(reply.status),
            _ => UnexpectedPayloadSnafu { expected: "environment metadata edit response" }.fail(),
        }
    }

    fn from_wire(wire: Self::Wire) -> Result<(Self::Record, u64)> {
        convert::env_metadata_from_proto(wire).context(ConvertSnafu)
    }
}

// =============================================================================
// Public stores
// =============================================================================

/// Store for [`AddressRef`] records.
///
/// Address references carry their full payload in the record, so all write
/// operations take the record itself; there is no merge path.
#[derive(Debug)]
pub struct AddressRefStore {
    store: Store<AddressRefEntity>,
}

impl AddressRefStore {
    pub(crate) fn new(session: Arc<Session>, scope: Scope) -> Self {
        Self { store: Store::new(session, scope) }
    }

    /// Reads one reference by natural key.
    pub async fn get(&self, key: &AddressRefKey, options: GetOptions) -> Result<AddressRef> {
        self.store.get(key, options).await
    }

    /// Reads every reference in scope.
    pub async fn fetch(&self) -> Result<Vec<AddressRef>> {
        self.store.fetch().await
    }

    /// Fetches and applies client-side predicates in order.
    pub async fn filter(
        &self,
        predicates: Vec<FilterPredicate<AddressRef>>,
    ) -> Result<Vec<AddressRef>> {
        self.store.filter(predicates).await
    }

    /// Inserts a new reference; fails if the natural key exists.
    pub async fn add(&self, record: &AddressRef) -> Result<()> {
        self.store.add(record).await
    }

    /// Inserts or overwrites a reference.
    pub async fn upsert(&self, record: &AddressRef) -> Result<()> {
        self.store.upsert(record).await
    }

    /// Amends an existing reference; fails with not-found if the key is
    /// unknown, never inserts.
    pub async fn update(&self, record: &AddressRef) -> Result<()> {
        self.store.update(record).await
    }

    /// Always fails: address references are append/amend-only history.
    pub fn delete(&self, _key: &AddressRefKey) -> Result<()> {
        self.store.delete()
    }
}

/// Store for [`ChainMetadata`] records.
#[derive(Debug)]
pub struct ChainMetadataStore {
    store: Store<ChainMetadataEntity>,
}

impl ChainMetadataStore {
    pub(crate) fn new(session: Arc<Session>, scope: Scope) -> Self {
        Self { store: Store::new(session, scope) }
    }

    /// Reads the metadata record for one chain.
    pub async fn get(&self, chain_selector: ChainSelector, options: GetOptions) -> Result<ChainMetadata> {
        self.store.get(&chain_selector, options).await
    }

    /// Reads every chain metadata record in scope.
    pub async fn fetch(&self) -> Result<Vec<ChainMetadata>> {
        self.store.fetch().await
    }

    /// Fetches and applies client-side predicates in order.
    pub async fn filter(
        &self,
        predicates: Vec<FilterPredicate<ChainMetadata>>,
    ) -> Result<Vec<ChainMetadata>> {
        self.store.filter(predicates).await
    }

    /// Inserts a new record; fails if the chain already has one.
    pub async fn add(&self, record: &ChainMetadata) -> Result<()> {
        self.store.add(record).await
    }

    /// Inserts or merges metadata for a chain.
    ///
    /// When the record exists, current and incoming payloads are merged
    /// through the configured updater (default: replace). A not-found on the
    /// read-before-write path still proceeds to insert — upsert succeeds for
    /// brand-new keys.
    pub async fn upsert(
        &self,
        chain_selector: ChainSelector,
        metadata: Document,
        options: UpdateOptions,
    ) -> Result<()> {
        let current = match self.store.get(&chain_selector, GetOptions::default()).await {
            Ok(existing) => Some(existing.metadata),
            Err(error) if error.is_not_found() => None,
            Err(error) => return Err(error),
        };
        let merged = options.merge(metadata, current)?;
        self.store.upsert(&ChainMetadata { chain_selector, metadata: merged }).await
    }

    /// Merges metadata into an existing record; fails with not-found if the
    /// chain has none.
    pub async fn update(
        &self,
        chain_selector: ChainSelector,
        metadata: Document,
        options: UpdateOptions,
    ) -> Result<()> {
        let current = self.store.get(&chain_selector, GetOptions::default()).await?;
        let merged = options.merge(metadata, Some(current.metadata))?;
        self.store.update(&ChainMetadata { chain_selector, metadata: merged }).await
    }

    /// Always fails: the catalog does not delete metadata.
    pub fn delete(&self, _chain_selector: ChainSelector) -> Result<()> {
        self.store.delete()
    }
}

/// Store for [`ContractMetadata`] records.
#[derive(Debug)]
pub struct ContractMetadataStore {
    store: Store<ContractMetadataEntity>,
}

impl ContractMetadataStore {
    pub(crate) fn new(session: Arc<Session>, scope: Scope) -> Self {
        Self { store: Store::new(session, scope) }
    }

    /// Reads the metadata record for one contract.
    pub async fn get(
        &self,
        key: &ContractMetadataKey,
        options: GetOptions,
    ) -> Result<ContractMetadata> {
        self.store.get(key, options).await
    }

    /// Reads every contract metadata record in scope.
    pub async fn fetch(&self) -> Result<Vec<ContractMetadata>> {
        self.store.fetch().await
    }

    /// Fetches and applies client-side predicates in order.
    pub async fn filter(
        &self,
        predicates: Vec<FilterPredicate<ContractMetadata>>,
    ) -> Result<Vec<ContractMetadata>> {
        self.store.filter(predicates).await
    }

    /// Inserts a new record; fails if the contract already has one.
    pub async fn add(&self, record: &ContractMetadata) -> Result<()> {
        self.store.add(record).await
    }

    /// Inserts or merges metadata for a contract.
    ///
    /// Merge semantics match
    /// [`ChainMetadataStore::upsert`].
    pub async fn upsert(
        &self,
        key: &ContractMetadataKey,
        metadata: Document,
        options: UpdateOptions,
    ) -> Result<()> {
        let current = match self.store.get(key, GetOptions::default()).await {
            Ok(existing) => Some(existing.metadata),
            Err(error) if error.is_not_found() => None,
            Err(error) => return Err(error),
        };
        let merged = options.merge(metadata, current)?;
        let record = ContractMetadata {
            chain_selector: key.chain_selector,
            address: key.address.clone(),
            metadata: merged,
        };
        self.store.upsert(&record).await
    }

    /// Merges metadata into an existing record; fails with not-found if the
    /// contract has none.
    pub async fn update(
        &self,
        key: &ContractMetadataKey,
        metadata: Document,
        options: UpdateOptions,
    ) -> Result<()> {
        let current = self.store.get(key, GetOptions::default()).await?;
        let merged = options.merge(metadata, Some(current.metadata))?;
        let record = ContractMetadata {
            chain_selector: key.chain_selector,
            address: key.address.clone(),
            metadata: merged,
        };
        self.store.update(&record).await
    }

    /// Always fails: the catalog does not delete metadata.
    pub fn delete(&self, _key: &ContractMetadataKey) -> Result<()> {
        self.store.delete()
    }
}

/// Store for the per-scope [`EnvMetadata`] singleton.
///
/// The domain+environment scope is the key, so fetch and filter degenerate
/// to [`get`](Self::get) and are not exposed.
#[derive(Debug)]
pub struct EnvMetadataStore {
    store: Store<EnvMetadataEntity>,
}

impl EnvMetadataStore {
    pub(crate) fn new(session: Arc<Session>, scope: Scope) -> Self {
        Self { store: Store::new(session, scope) }
    }

    /// Reads the environment metadata record.
    pub async fn get(&self, options: GetOptions) -> Result<EnvMetadata> {
        self.store.get(&(), options).await
    }

    /// Inserts or merges the environment metadata document.
    ///
    /// Merge semantics match [`ChainMetadataStore::upsert`].
    pub async fn upsert(&self, metadata: Document, options: UpdateOptions) -> Result<()> {
        let current = match self.store.get(&(), GetOptions::default()).await {
            Ok(existing) => Some(existing.metadata),
            Err(error) if error.is_not_found() => None,
            Err(error) => return Err(error),
        };
        let merged = options.merge(metadata, current)?;
        self.store.upsert(&EnvMetadata::new(merged)).await
    }

    /// Merges into the existing document; fails with not-found if none has
    /// been written yet.
    pub async fn update(&self, metadata: Document, options: UpdateOptions) -> Result<()> {
        let current = self.store.get(&(), GetOptions::default()).await?;
        let merged = options.merge(metadata, Some(current.metadata))?;
        self.store.update(&EnvMetadata::new(merged)).await
    }

    /// Always fails: the catalog does not delete metadata.
    pub fn delete(&self) -> Result<()> {
        self.store.delete()
    }
}

// =============================================================================
// Canned predicates
// =============================================================================

/// Ready-made client-side predicates for [`filter`](AddressRefStore::filter)
/// calls.
pub mod filters {
    use super::*;

    /// Keeps address references deployed on one chain.
    #[must_use]
    pub fn address_by_chain(selector: ChainSelector) -> FilterPredicate<AddressRef> {
        Box::new(move |records| {
            records.into_iter().filter(|r| r.chain_selector == selector).collect()
        })
    }

    /// Keeps address references of one contract type.
    #[must_use]
    pub fn address_by_contract_type(contract_type: impl Into<String>) -> FilterPredicate<AddressRef> {
        let contract_type = contract_type.into();
        Box::new(move |records| {
            records.into_iter().filter(|r| r.contract_type == contract_type).collect()
        })
    }

    /// Keeps address references carrying a label.
    #[must_use]
    pub fn address_with_label(label: impl Into<String>) -> FilterPredicate<AddressRef> {
        let label = label.into();
        Box::new(move |records| {
            records.into_iter().filter(|r| r.labels.contains(&label)).collect()
        })
    }

    /// Keeps contract metadata records for one chain.
    #[must_use]
    pub fn contract_by_chain(selector: ChainSelector) -> FilterPredicate<ContractMetadata> {
        Box::new(move |records| {
            records.into_iter().filter(|r| r.chain_selector == selector).collect()
        })
    }
}
