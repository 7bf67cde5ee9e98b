//! Transaction coordination over the session stream.
//!
//! The service binds transaction state to the stream itself — there is no
//! transaction token — so this coordinator is a thin layer sending the three
//! control messages and translating their statuses. One session carries at
//! most one open transaction; a second begin is rejected by the server with
//! `FailedPrecondition`. Commit and rollback without an open transaction
//! succeed silently by contract.

use std::sync::Arc;

use chainreg_proto::proto::{
    BeginTransactionRequest, CatalogRequest, CommitTransactionRequest, ResponseStatus,
    RollbackTransactionRequest, catalog_request, catalog_response,
};

use crate::error::{Result, UnexpectedPayloadSnafu};
use crate::session::Session;
use crate::status;

const ENTITY: &str = "transaction";

/// Sends transaction control messages over the shared session.
#[derive(Debug)]
pub(crate) struct TxnCoordinator {
    session: Arc<Session>,
}

impl TxnCoordinator {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Opens a transaction on the session.
    pub(crate) async fn begin(&self) -> Result<()> {
        tracing::debug!("begin transaction");
        self.control(
            catalog_request::Payload::BeginTransaction(BeginTransactionRequest {}),
            |payload| match payload {
                catalog_response::Payload::BeginTransaction(reply) => Some(reply.status),
                _ => None,
            },
        )
        .await
    }

    /// Commits the open transaction; a no-op when none is open.
    pub(crate) async fn commit(&self) -> Result<()> {
        tracing::debug!("commit transaction");
        self.control(
            catalog_request::Payload::CommitTransaction(CommitTransactionRequest {}),
            |payload| match payload {
                catalog_response::Payload::CommitTransaction(reply) => Some(reply.status),
                _ => None,
            },
        )
        .await
    }

    /// Rolls back the open transaction; a no-op when none is open.
    pub(crate) async fn rollback(&self) -> Result<()> {
        tracing::debug!("rollback transaction");
        self.control(
            catalog_request::Payload::RollbackTransaction(RollbackTransactionRequest {}),
            |payload| match payload {
                catalog_response::Payload::RollbackTransaction(reply) => Some(reply.status),
                _ => None,
            },
        )
        .await
    }

    async fn control(
        &self,
        payload: catalog_request::Payload,
        extract: fn(catalog_response::Payload) -> Option<Option<ResponseStatus>>,
    ) -> Result<()> {
        let request = CatalogRequest { payload: Some(payload) };
        let response = self
            .session
            .roundtrip(request)
            .await
            .map_err(|e| status::for_entity(ENTITY, e))?;

        let response_status = response
            .payload
            .and_then(extract)
            .ok_or_else(|| {
                status::for_entity(
                    ENTITY,
                    UnexpectedPayloadSnafu { expected: "transaction response" }.build(),
                )
            })?;

        status::translate(response_status).map_err(|e| status::for_entity(ENTITY, e))
    }
}
