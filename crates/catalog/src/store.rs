//! Generic record store machinery.
//!
//! The four entity stores share one operation surface (Get / Fetch / Filter
//! / Add / Upsert / Update / Delete) and one optimistic-concurrency
//! discipline. [`Store`] implements that surface once; a [`CatalogEntity`]
//! binding supplies the entity-specific filter construction, wire
//! conversion, and natural key.
//!
//! # Version cache
//!
//! Every record carries a server-assigned row version. The store caches the
//! last-observed version per natural key: entries appear on the first
//! successful read, refresh on every successful read, and are bumped by one
//! on every successful write without a confirming round-trip. That
//! optimistic increment assumes no other writer races this cache between
//! calls — an external writer is still caught by the server as a version
//! mismatch on this client's next write.

use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;
use snafu::ResultExt;

use chainreg_proto::proto::{
    CatalogRequest, EditSemantics, ResponseStatus, Scope, catalog_request, catalog_response,
};
use chainreg_types::{Document, DocumentError};

use crate::error::{
    CatalogError, DocumentSnafu, Result, UnexpectedPayloadSnafu, UnsupportedSnafu,
};
use crate::session::Session;
use crate::status;

/// A client-side predicate over a fetched record set.
///
/// Predicates run in the order given and are purely client-side; nothing is
/// pushed to the server.
pub type FilterPredicate<R> = Box<dyn Fn(Vec<R>) -> Vec<R> + Send + Sync>;

/// A merge function for metadata writes: `(incoming, current) -> merged`.
///
/// `current` is `None` when the key does not exist yet.
pub type MetadataUpdater = Arc<
    dyn Fn(Document, Option<Document>) -> std::result::Result<Document, DocumentError>
        + Send
        + Sync,
>;

/// Options for read operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetOptions {
    pub(crate) ignore_transaction: bool,
}

impl GetOptions {
    /// Default options: reads observe any transaction open on the session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bypasses any open transaction and reads committed state directly.
    ///
    /// Needed to verify that a rollback actually discarded uncommitted
    /// writes.
    #[must_use]
    pub fn ignore_transaction(mut self) -> Self {
        self.ignore_transaction = true;
        self
    }
}

/// Options for metadata write operations.
#[derive(Clone, Default)]
pub struct UpdateOptions {
    updater: Option<MetadataUpdater>,
}

impl UpdateOptions {
    /// Default options: the incoming document replaces the current one.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges current and incoming payloads through `updater` instead of
    /// replacing.
    #[must_use]
    pub fn with_updater(mut self, updater: MetadataUpdater) -> Self {
        self.updater = Some(updater);
        self
    }

    /// Applies the configured merge, defaulting to replace.
    pub(crate) fn merge(&self, incoming: Document, current: Option<Document>) -> Result<Document> {
        match &self.updater {
            Some(updater) => updater(incoming, current).context(DocumentSnafu),
            None => Ok(incoming),
        }
    }
}

impl std::fmt::Debug for UpdateOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateOptions").field("has_updater", &self.updater.is_some()).finish()
    }
}

/// Entity-specific pieces of a record store.
///
/// Implemented once per entity; [`Store`] supplies the shared behavior.
pub(crate) trait CatalogEntity: Send + Sync + 'static {
    /// Entity name used in error messages, e.g. `"address reference"`.
    const ENTITY: &'static str;
    /// Operation name reported by the unsupported delete error.
    const DELETE_OPERATION: &'static str;

    /// Natural key type.
    type Key: Clone + Eq + Hash + Send + Sync;
    /// Domain record type.
    type Record: Clone + Send + Sync;
    /// Wire record type.
    type Wire: Send;

    /// Extracts the natural key from a record.
    fn key_of(record: &Self::Record) -> Self::Key;

    /// Builds a find request for one key, or for the whole scope when `key`
    /// is `None`.
    fn find_request(
        scope: Scope,
        key: Option<&Self::Key>,
        ignore_transaction: bool,
    ) -> catalog_request::Payload;

    /// Builds an edit request carrying the expected row version.
    fn edit_request(
        scope: Scope,
        record: &Self::Record,
        semantics: EditSemantics,
        row_version: u64,
    ) -> Result<catalog_request::Payload>;

    /// Splits the matching find response into status and wire records.
    fn find_reply(
        payload: catalog_response::Payload,
    ) -> Result<(Option<ResponseStatus>, Vec<Self::Wire>)>;

    /// Extracts the status from the matching edit response.
    fn edit_reply(payload: catalog_response::Payload) -> Result<Option<ResponseStatus>>;

    /// Converts a wire record into `(record, row_version)`.
    fn from_wire(wire: Self::Wire) -> Result<(Self::Record, u64)>;
}

/// Shared store implementation over one entity binding.
pub(crate) struct Store<E: CatalogEntity> {
    session: Arc<Session>,
    scope: Scope,
    versions: RwLock<HashMap<E::Key, u64>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: CatalogEntity> Store<E> {
    pub(crate) fn new(session: Arc<Session>, scope: Scope) -> Self {
        Self { session, scope, versions: RwLock::new(HashMap::new()), _entity: PhantomData }
    }

    /// Reads one record by natural key.
    pub(crate) async fn get(&self, key: &E::Key, options: GetOptions) -> Result<E::Record> {
        let payload = E::find_request(self.scope.clone(), Some(key), options.ignore_transaction);
        let mut records = self.find(payload).await?;
        if records.is_empty() {
            return Err(CatalogError::NotFound {
                entity: E::ENTITY,
                message: "no matching record".to_owned(),
            });
        }
        Ok(records.swap_remove(0))
    }

    /// Reads every record in the store's domain+environment scope.
    pub(crate) async fn fetch(&self) -> Result<Vec<E::Record>> {
        let payload = E::find_request(self.scope.clone(), None, false);
        self.find(payload).await
    }

    /// Fetches, then applies predicates in order, short-circuiting once the
    /// result set is empty.
    pub(crate) async fn filter(
        &self,
        predicates: Vec<FilterPredicate<E::Record>>,
    ) -> Result<Vec<E::Record>> {
        let mut records = self.fetch().await?;
        for predicate in predicates {
            if records.is_empty() {
                break;
            }
            records = predicate(records);
        }
        Ok(records)
    }

    /// Writes with INSERT semantics; the server rejects existing keys.
    pub(crate) async fn add(&self, record: &E::Record) -> Result<()> {
        self.edit(record, EditSemantics::Insert).await
    }

    /// Writes with UPSERT semantics.
    pub(crate) async fn upsert(&self, record: &E::Record) -> Result<()> {
        self.edit(record, EditSemantics::Upsert).await
    }

    /// Writes with UPDATE semantics; the server rejects missing keys.
    pub(crate) async fn update(&self, record: &E::Record) -> Result<()> {
        self.edit(record, EditSemantics::Update).await
    }

    /// Always fails: the catalog is append/amend-only and the service
    /// rejects deletes, so the client does not even send them.
    pub(crate) fn delete(&self) -> Result<()> {
        UnsupportedSnafu { operation: E::DELETE_OPERATION }.fail()
    }

    async fn find(&self, payload: catalog_request::Payload) -> Result<Vec<E::Record>> {
        let response = self.roundtrip(payload).await?;
        let (response_status, wires) =
            E::find_reply(response).map_err(|e| status::for_entity(E::ENTITY, e))?;
        status::translate(response_status).map_err(|e| status::for_entity(E::ENTITY, e))?;

        let mut records = Vec::with_capacity(wires.len());
        let mut versions = self.versions.write();
        for wire in wires {
            let (record, version) =
                E::from_wire(wire).map_err(|e| status::for_entity(E::ENTITY, e))?;
            versions.insert(E::key_of(&record), version);
            records.push(record);
        }
        Ok(records)
    }

    async fn edit(&self, record: &E::Record, semantics: EditSemantics) -> Result<()> {
        let key = E::key_of(record);
        let submitted = self.cached_version(&key);
        let payload = E::edit_request(self.scope.clone(), record, semantics, submitted)
            .map_err(|e| status::for_entity(E::ENTITY, e))?;
        let response = self.roundtrip(payload).await?;
        let response_status =
            E::edit_reply(response).map_err(|e| status::for_entity(E::ENTITY, e))?;
        status::translate(response_status).map_err(|e| {
            let narrowed = status::for_entity(E::ENTITY, e);
            if narrowed.is_stale() {
                tracing::debug!(entity = E::ENTITY, submitted, "write rejected as stale");
            }
            narrowed
        })?;

        // Optimistic: bump the cache by one rather than re-reading the
        // server-assigned version.
        self.versions.write().insert(key, submitted + 1);
        Ok(())
    }

    async fn roundtrip(
        &self,
        payload: catalog_request::Payload,
    ) -> Result<catalog_response::Payload> {
        let request = CatalogRequest { payload: Some(payload) };
        let response = self
            .session
            .roundtrip(request)
            .await
            .map_err(|e| status::for_entity(E::ENTITY, e))?;
        response.payload.ok_or_else(|| {
            status::for_entity(E::ENTITY, UnexpectedPayloadSnafu { expected: E::ENTITY }.build())
        })
    }

    /// Last-observed version for a key; 0 for keys never seen.
    pub(crate) fn cached_version(&self, key: &E::Key) -> u64 {
        self.versions.read().get(key).copied().unwrap_or(0)
    }
}

impl<E: CatalogEntity> std::fmt::Debug for Store<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("entity", &E::ENTITY)
            .field("cached_versions", &self.versions.read().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn update_options_default_replaces() {
        let options = UpdateOptions::new();
        let incoming = Document::from_json(r#"{"a":1}"#).unwrap();
        let current = Document::from_json(r#"{"a":0,"b":2}"#).unwrap();
        let merged = options.merge(incoming.clone(), Some(current)).unwrap();
        assert_eq!(merged, incoming);
    }

    #[test]
    fn update_options_runs_updater() {
        let options = UpdateOptions::new().with_updater(Arc::new(|incoming, current| {
            // Shallow-merge incoming keys over the current object.
            let mut base = current.map(Document::into_value).unwrap_or_default();
            if let (Some(base), Some(over)) =
                (base.as_object_mut(), incoming.as_value().as_object())
            {
                for (k, v) in over {
                    base.insert(k.clone(), v.clone());
                }
            }
            Ok(Document::from_value(base))
        }));

        let incoming = Document::from_json(r#"{"a":1}"#).unwrap();
        let current = Document::from_json(r#"{"a":0,"b":2}"#).unwrap();
        let merged = options.merge(incoming, Some(current)).unwrap();
        assert_eq!(merged, Document::from_json(r#"{"a":1,"b":2}"#).unwrap());
    }

    #[test]
    fn update_options_updater_sees_missing_current() {
        let options = UpdateOptions::new().with_updater(Arc::new(|incoming, current| {
            assert!(current.is_none());
            Ok(incoming)
        }));
        let incoming = Document::from_json(r#"{"a":1}"#).unwrap();
        let merged = options.merge(incoming.clone(), None).unwrap();
        assert_eq!(merged, incoming);
    }
}
