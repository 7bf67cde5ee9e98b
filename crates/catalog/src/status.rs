//! Embedded response status translation.
//!
//! Every response payload carries a `ResponseStatus { code, message,
//! details }`. Translation maps it into the client error vocabulary:
//! a missing status is itself an error, code 0 is success, and anything
//! else becomes [`CatalogError::Remote`] with the original message and
//! detail payloads retained. Stores then narrow `NotFound` and `Aborted`
//! into their typed counterparts.

use chainreg_proto::proto::ResponseStatus;
use snafu::OptionExt;
use tonic::Code;

use crate::error::{CatalogError, MissingStatusSnafu, Result};

/// Translates an embedded status into the client error vocabulary.
pub(crate) fn translate(status: Option<ResponseStatus>) -> Result<()> {
    let status = status.context(MissingStatusSnafu)?;
    if status.code == Code::Ok as i32 {
        return Ok(());
    }
    Err(CatalogError::Remote {
        code: Code::from(status.code),
        message: status.message,
        details: status.details,
    })
}

/// Narrows a translated error for one entity.
///
/// `NotFound` and `Aborted` remote statuses become the entity's typed
/// not-found and stale errors; everything else is wrapped as a generic
/// operation failure so no cause is discarded.
pub(crate) fn for_entity(entity: &'static str, error: CatalogError) -> CatalogError {
    match error {
        CatalogError::Remote { code: Code::NotFound, message, .. } => {
            CatalogError::NotFound { entity, message }
        }
        CatalogError::Remote { code: Code::Aborted, message, .. } => {
            CatalogError::Stale { entity, message }
        }
        other => CatalogError::Operation { entity, source: Box::new(other) },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn status(code: Code, message: &str) -> ResponseStatus {
        ResponseStatus { code: code as i32, message: message.to_owned(), details: Vec::new() }
    }

    #[test]
    fn missing_status_is_an_error() {
        let err = translate(None).unwrap_err();
        assert!(matches!(err, CatalogError::MissingStatus { .. }));
    }

    #[test]
    fn code_zero_is_success() {
        assert!(translate(Some(status(Code::Ok, ""))).is_ok());
    }

    #[test]
    fn failure_keeps_message_and_code() {
        let err = translate(Some(status(Code::Internal, "boom"))).unwrap_err();
        assert_eq!(err.code(), Some(Code::Internal));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn not_found_narrows_per_entity() {
        let err = translate(Some(status(Code::NotFound, "no row"))).unwrap_err();
        let narrowed = for_entity("address reference", err);
        assert!(narrowed.is_not_found());
        assert!(narrowed.to_string().contains("address reference"));
        assert!(narrowed.to_string().contains("no row"));
    }

    #[test]
    fn aborted_narrows_to_stale() {
        let err = translate(Some(status(Code::Aborted, "row version mismatch"))).unwrap_err();
        let narrowed = for_entity("chain metadata", err);
        assert!(narrowed.is_stale());
        assert!(narrowed.to_string().contains("row version mismatch"));
    }

    #[test]
    fn other_codes_wrap_as_operation_failure() {
        let err = translate(Some(status(Code::AlreadyExists, "duplicate key"))).unwrap_err();
        let narrowed = for_entity("env metadata", err);
        assert!(!narrowed.is_not_found());
        assert!(!narrowed.is_stale());
        assert_eq!(narrowed.code(), Some(Code::AlreadyExists));
    }

    #[test]
    fn details_are_preserved() {
        let mut s = status(Code::Internal, "boom");
        s.details.push(prost_types::Any { type_url: "example.com/Detail".to_owned(), value: vec![1, 2, 3] });
        let err = translate(Some(s)).unwrap_err();
        match err {
            CatalogError::Remote { details, .. } => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].type_url, "example.com/Detail");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }
}
