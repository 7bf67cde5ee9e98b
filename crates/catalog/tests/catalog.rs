//! Integration tests for the catalog client against the in-process mock
//! server.
//!
//! ## Test Categories
//!
//! - **Round-trip**: Add/Get cycles through every store
//! - **Write semantics**: insert vs upsert vs update, delete rejection
//! - **Transactions**: isolation, commit visibility, rollback on error,
//!   panic, and disconnect
//! - **Versioning**: optimistic-concurrency monotonicity and staleness
//! - **Signing**: HMAC metadata on the session-opening call

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use prost::Message;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use chainreg_catalog::mock::MockCatalogServer;
use chainreg_catalog::{
    CatalogClient, CatalogConfig, CatalogError, Document, GetOptions, HmacConfig, KeyedMac,
    LocalHmacKey, UpdateOptions, filters,
};
use chainreg_proto::proto;
use chainreg_types::{AddressRef, ChainSelector, ContractMetadata, ContractMetadataKey, Version};

const DOMAIN: &str = "demo";
const ENVIRONMENT: &str = "staging";

// ============================================================================
// Helpers
// ============================================================================

async fn start_server() -> MockCatalogServer {
    MockCatalogServer::start().await.expect("mock server start")
}

fn client_for(server: &MockCatalogServer) -> CatalogClient {
    CatalogClient::connect(server.endpoint(), DOMAIN, ENVIRONMENT).expect("client")
}

fn sample_ref(chain: u64, contract_type: &str, qualifier: &str) -> AddressRef {
    AddressRef {
        chain_selector: ChainSelector::new(chain),
        contract_type: contract_type.to_owned(),
        version: Version::new(1, 2, 0),
        qualifier: qualifier.to_owned(),
        address: format!("0x{chain:040x}"),
        labels: BTreeSet::from(["canary".to_owned()]),
    }
}

fn contract_key(chain: u64, address: &str) -> ContractMetadataKey {
    ContractMetadataKey { chain_selector: ChainSelector::new(chain), address: address.to_owned() }
}

// ============================================================================
// Round-trip
// ============================================================================

#[tokio::test]
async fn address_ref_add_then_get_round_trips() {
    let server = start_server().await;
    let client = client_for(&server);

    let record = sample_ref(1, "Router", "primary");
    client.address_refs().add(&record).await.expect("add");

    let fetched =
        client.address_refs().get(&record.key(), GetOptions::new()).await.expect("get");
    assert_eq!(fetched, record);
}

#[tokio::test]
async fn contract_metadata_scenario_decodes_payload() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Info {
        #[serde(rename = "Name")]
        name: String,
        #[serde(rename = "Version")]
        version: String,
    }

    let server = start_server().await;
    let client = client_for(&server);

    let record = ContractMetadata {
        chain_selector: ChainSelector::new(1),
        address: "0x12345678".to_owned(),
        metadata: Document::new(&Info {
            name: "SomeContract".to_owned(),
            version: "1.0.0".to_owned(),
        })
        .unwrap(),
    };
    client.contract_metadata().add(&record).await.expect("add");

    let fetched = client
        .contract_metadata()
        .get(&contract_key(1, "0x12345678"), GetOptions::new())
        .await
        .expect("get");
    let info: Info = fetched.metadata.decode().expect("decode");
    assert_eq!(info.name, "SomeContract");
    assert_eq!(info.version, "1.0.0");
}

#[tokio::test]
async fn fetch_is_scoped_to_environment() {
    let server = start_server().await;
    let staging = client_for(&server);
    let mainnet =
        CatalogClient::connect(server.endpoint(), DOMAIN, "mainnet").expect("client");

    staging.address_refs().add(&sample_ref(1, "Router", "")).await.expect("add");

    let seen = mainnet.address_refs().fetch().await.expect("fetch");
    assert!(seen.is_empty(), "mainnet scope must not see staging records");

    let seen = staging.address_refs().fetch().await.expect("fetch");
    assert_eq!(seen.len(), 1);
}

// ============================================================================
// Write semantics
// ============================================================================

#[tokio::test]
async fn upsert_on_missing_key_behaves_like_add() {
    let server = start_server().await;
    let client = client_for(&server);

    let record = sample_ref(5, "OffRamp", "");
    client.address_refs().upsert(&record).await.expect("upsert");

    let fetched =
        client.address_refs().get(&record.key(), GetOptions::new()).await.expect("get");
    assert_eq!(fetched, record);
}

#[tokio::test]
async fn add_rejects_duplicate_key() {
    let server = start_server().await;
    let client = client_for(&server);

    let record = sample_ref(1, "Router", "");
    client.address_refs().add(&record).await.expect("first add");

    let err = client.address_refs().add(&record).await.expect_err("duplicate add");
    // Duplicates are a generic failure, not a distinguished kind.
    assert!(!err.is_not_found());
    assert!(!err.is_stale());
    assert_eq!(err.code(), Some(tonic::Code::AlreadyExists));
}

#[tokio::test]
async fn update_never_inserts() {
    let server = start_server().await;
    let client = client_for(&server);

    let record = sample_ref(9, "Token", "");
    let err = client.address_refs().update(&record).await.expect_err("update on missing");
    assert!(err.is_not_found());

    let err = client
        .address_refs()
        .get(&record.key(), GetOptions::new())
        .await
        .expect_err("nothing inserted");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn metadata_update_requires_existing_record() {
    let server = start_server().await;
    let client = client_for(&server);

    let err = client
        .chain_metadata()
        .update(ChainSelector::new(7), Document::default(), UpdateOptions::new())
        .await
        .expect_err("update on missing chain");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn upsert_merges_through_updater() {
    let server = start_server().await;
    let client = client_for(&server);

    let key = contract_key(1, "0xabc");
    client
        .contract_metadata()
        .upsert(&key, Document::from_json(r#"{"Name":"Router"}"#).unwrap(), UpdateOptions::new())
        .await
        .expect("seed");

    // Shallow-merge incoming keys over the current document.
    let merge = UpdateOptions::new().with_updater(Arc::new(|incoming, current| {
        let mut base = current.map(Document::into_value).unwrap_or_default();
        if let (Some(base), Some(over)) = (base.as_object_mut(), incoming.as_value().as_object()) {
            for (k, v) in over {
                base.insert(k.clone(), v.clone());
            }
        }
        Ok(Document::from_value(base))
    }));
    client
        .contract_metadata()
        .upsert(&key, Document::from_json(r#"{"Version":"1.0.0"}"#).unwrap(), merge)
        .await
        .expect("merge upsert");

    let fetched = client.contract_metadata().get(&key, GetOptions::new()).await.expect("get");
    assert_eq!(
        fetched.metadata,
        Document::from_json(r#"{"Name":"Router","Version":"1.0.0"}"#).unwrap()
    );
}

#[tokio::test]
async fn delete_is_rejected_by_all_stores_without_touching_the_server() {
    let server = start_server().await;
    let client = client_for(&server);

    let err = client.address_refs().delete(&sample_ref(1, "Router", "").key());
    assert!(err.expect_err("delete").is_unsupported());

    let err = client.chain_metadata().delete(ChainSelector::new(1));
    assert!(err.expect_err("delete").is_unsupported());

    let err = client.contract_metadata().delete(&contract_key(1, "0xabc"));
    assert!(err.expect_err("delete").is_unsupported());

    let err = client.env_metadata().delete();
    assert!(err.expect_err("delete").is_unsupported());

    assert_eq!(server.edit_count(), 0, "no delete may reach the service");
}

// ============================================================================
// Filter
// ============================================================================

#[tokio::test]
async fn filter_applies_predicates_in_order() {
    let server = start_server().await;
    let client = client_for(&server);

    client.address_refs().add(&sample_ref(1, "Router", "")).await.expect("add");
    client.address_refs().add(&sample_ref(2, "Router", "")).await.expect("add");
    client.address_refs().add(&sample_ref(2, "OffRamp", "")).await.expect("add");

    let matched = client
        .address_refs()
        .filter(vec![
            filters::address_by_chain(ChainSelector::new(2)),
            filters::address_by_contract_type("Router"),
        ])
        .await
        .expect("filter");
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].chain_selector, ChainSelector::new(2));
    assert_eq!(matched[0].contract_type, "Router");
}

#[tokio::test]
async fn filter_short_circuits_once_empty() {
    let server = start_server().await;
    let client = client_for(&server);

    client.address_refs().add(&sample_ref(1, "Router", "")).await.expect("add");

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let matched = client
        .address_refs()
        .filter(vec![
            filters::address_by_chain(ChainSelector::new(99)),
            Box::new(move |records| {
                counter.fetch_add(1, Ordering::SeqCst);
                records
            }),
        ])
        .await
        .expect("filter");
    assert!(matched.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0, "later predicates must not run");
}

// ============================================================================
// Transactions
// ============================================================================

#[tokio::test]
async fn transactional_write_is_invisible_until_commit() {
    let server = start_server().await;
    let client = client_for(&server);
    let key = contract_key(1, "0xfeed");

    client
        .with_transaction(|txn| {
            let key = key.clone();
            async move {
                txn.contract_metadata()
                    .upsert(&key, Document::from_json(r#"{"v":1}"#).unwrap(), UpdateOptions::new())
                    .await?;

                // The transaction's own view sees the write...
                txn.contract_metadata().get(&key, GetOptions::new()).await?;

                // ...but committed state does not.
                let err = txn
                    .contract_metadata()
                    .get(&key, GetOptions::new().ignore_transaction())
                    .await
                    .expect_err("uncommitted write must be invisible");
                assert!(err.is_not_found());
                Ok(())
            }
        })
        .await
        .expect("transaction");

    // After commit the bypassing read sees it too.
    let fetched = client
        .contract_metadata()
        .get(&key, GetOptions::new().ignore_transaction())
        .await
        .expect("committed read");
    assert_eq!(fetched.metadata, Document::from_json(r#"{"v":1}"#).unwrap());
}

#[tokio::test]
async fn callback_error_rolls_back_writes() {
    let server = start_server().await;
    let client = client_for(&server);
    let key = contract_key(1, "0xdead");

    let err = client
        .with_transaction(|txn| {
            let key = key.clone();
            async move {
                txn.contract_metadata()
                    .upsert(&key, Document::from_json(r#"{"v":1}"#).unwrap(), UpdateOptions::new())
                    .await?;
                Err::<(), _>(CatalogError::Unsupported { operation: "test failure" })
            }
        })
        .await
        .expect_err("callback error propagates");
    assert!(err.is_unsupported());

    let err = client
        .contract_metadata()
        .get(&key, GetOptions::new())
        .await
        .expect_err("write must be rolled back");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn explicit_rollback_discards_writes() {
    let server = start_server().await;
    let client = client_for(&server);
    let key = contract_key(1, "0xbeef");

    client.begin_transaction().await.expect("begin");
    client
        .contract_metadata()
        .upsert(&key, Document::from_json(r#"{"v":1}"#).unwrap(), UpdateOptions::new())
        .await
        .expect("staged write");
    client.rollback_transaction().await.expect("rollback");

    let err = client
        .contract_metadata()
        .get(&key, GetOptions::new())
        .await
        .expect_err("rolled-back write must be gone");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn panic_in_callback_rolls_back_and_resumes() {
    let server = start_server().await;
    let client = client_for(&server);
    let key = contract_key(1, "0xpanic");

    let task_client = client.clone();
    let task_key = key.clone();
    let joined = tokio::spawn(async move {
        task_client
            .with_transaction::<_, _, ()>(|txn| {
                let key = task_key.clone();
                async move {
                    txn.contract_metadata()
                        .upsert(
                            &key,
                            Document::from_json(r#"{"v":1}"#).unwrap(),
                            UpdateOptions::new(),
                        )
                        .await?;
                    panic!("kaboom");
                }
            })
            .await
    })
    .await;
    assert!(joined.expect_err("panic must resume").is_panic());

    let err = client
        .contract_metadata()
        .get(&key, GetOptions::new())
        .await
        .expect_err("write made before the panic must be rolled back");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn closing_the_session_implicitly_rolls_back() {
    let server = start_server().await;
    let client = client_for(&server);
    let key = contract_key(1, "0xdisc");

    client.begin_transaction().await.expect("begin");
    client
        .contract_metadata()
        .upsert(&key, Document::from_json(r#"{"v":1}"#).unwrap(), UpdateOptions::new())
        .await
        .expect("staged write");

    // Transaction state lives on the stream; closing it abandons the
    // transaction and a later operation opens a fresh stream.
    client.close().await;

    let err = client
        .contract_metadata()
        .get(&key, GetOptions::new())
        .await
        .expect_err("abandoned transaction must be rolled back");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn commit_and_rollback_without_transaction_are_noops() {
    let server = start_server().await;
    let client = client_for(&server);

    client.commit_transaction().await.expect("commit with nothing open");
    client.rollback_transaction().await.expect("rollback with nothing open");
}

#[tokio::test]
async fn second_begin_is_rejected() {
    let server = start_server().await;
    let client = client_for(&server);

    client.begin_transaction().await.expect("first begin");
    let err = client.begin_transaction().await.expect_err("second begin");
    assert_eq!(err.code(), Some(tonic::Code::FailedPrecondition));

    client.rollback_transaction().await.expect("cleanup");
}

// ============================================================================
// Versioning
// ============================================================================

#[tokio::test]
async fn sequential_writes_increment_the_server_version_by_one() {
    let server = start_server().await;
    let client = client_for(&server);

    let mut record = sample_ref(1, "Router", "");
    client.address_refs().add(&record).await.expect("add");

    record.address = "0x2222222222222222222222222222222222222222".to_owned();
    client.address_refs().update(&record).await.expect("first update");

    record.labels.insert("audited".to_owned());
    client.address_refs().update(&record).await.expect("second update");

    let wire_key = proto::AddressReferenceKey {
        chain_selector: 1,
        contract_type: "Router".to_owned(),
        version: "1.2.0".to_owned(),
        qualifier: String::new(),
    };
    assert_eq!(server.address_ref_version(DOMAIN, ENVIRONMENT, &wire_key), Some(3));
}

#[tokio::test]
async fn stale_write_from_a_lagging_client_fails() {
    let server = start_server().await;
    let writer = client_for(&server);
    let lagging = client_for(&server);

    let mut record = sample_ref(1, "Router", "");
    writer.address_refs().add(&record).await.expect("add");

    // The lagging client observes version 1.
    let observed =
        lagging.address_refs().get(&record.key(), GetOptions::new()).await.expect("get");
    assert_eq!(observed, record);

    // The writer moves the record to version 2.
    record.address = "0x3333333333333333333333333333333333333333".to_owned();
    writer.address_refs().update(&record).await.expect("writer update");

    // The lagging client's cached version (1) no longer matches.
    let mut lagging_edit = observed;
    lagging_edit.labels.insert("stale-attempt".to_owned());
    let err = lagging.address_refs().update(&lagging_edit).await.expect_err("stale update");
    assert!(err.is_stale());
}

// ============================================================================
// Failure injection
// ============================================================================

#[tokio::test]
async fn injected_status_surfaces_and_clears() {
    let server = start_server().await;
    let client = client_for(&server);

    client.address_refs().add(&sample_ref(1, "Router", "")).await.expect("add");

    server.inject_status(tonic::Code::Internal, "synthetic failure", 1);
    let err = client.address_refs().fetch().await.expect_err("injected failure");
    assert_eq!(err.code(), Some(tonic::Code::Internal));
    assert!(err.to_string().contains("synthetic failure"));

    // The failure was one-shot.
    let records = client.address_refs().fetch().await.expect("recovered fetch");
    assert_eq!(records.len(), 1);
}

// ============================================================================
// Signing
// ============================================================================

#[tokio::test]
async fn session_opening_call_carries_a_verifiable_hmac_signature() {
    let server = start_server().await;

    let secret = b"integration-secret".to_vec();
    let config = CatalogConfig::builder()
        .with_endpoint(server.endpoint())
        .with_domain(DOMAIN)
        .with_environment(ENVIRONMENT)
        .with_hmac(HmacConfig::new("key-1", "global"))
        .build()
        .expect("config");
    let client = CatalogClient::with_keyring(config, Arc::new(LocalHmacKey::new(secret.clone())))
        .expect("client");

    // The first operation opens (and signs) the session.
    let record = sample_ref(1, "Router", "");
    client.address_refs().add(&record).await.expect("add");

    let (signature, timestamp) = server.last_hmac().expect("signature captured");

    // Recompute over the channel-opening request: the add's edit payload.
    let first_request = proto::CatalogRequest {
        payload: Some(chainreg_proto::proto::catalog_request::Payload::AddressReferenceEdit(
            proto::AddressReferenceEditRequest {
                scope: Some(proto::Scope {
                    domain: DOMAIN.to_owned(),
                    environment: ENVIRONMENT.to_owned(),
                }),
                semantics: proto::EditSemantics::Insert as i32,
                reference: Some(chainreg_proto::convert::address_ref_to_proto(&record, 0)),
            },
        )),
    };
    let digest = hex::encode(Sha256::digest(first_request.encode_to_vec()));
    let message =
        format!("/catalog.v1.CatalogService/Session\n127.0.0.1\n{timestamp}\n{digest}");

    let keyring = LocalHmacKey::new(secret);
    let expected = keyring.mac("key-1", "global", message.as_bytes()).await.expect("mac");
    assert_eq!(signature, hex::encode(expected));
}

#[tokio::test]
async fn unsigned_client_sends_no_hmac_metadata() {
    let server = start_server().await;
    let client = client_for(&server);

    client.address_refs().fetch().await.expect("fetch");
    assert!(server.last_hmac().is_none());
}
