//! Bidirectional conversions between domain and protobuf types.
//!
//! Domain records do not carry row versions — versions are transport-level
//! optimistic-concurrency state — so conversions take and return the version
//! alongside the record.

use chainreg_types::{
    AddressRef, AddressRefKey, ChainMetadata, ChainSelector, ContractMetadata,
    ContractMetadataKey, Document, DocumentError, EnvMetadata,
};
use snafu::{ResultExt, Snafu};

use crate::proto;

/// Errors converting wire records into domain records.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConvertError {
    /// Contract version string did not parse as semver.
    #[snafu(display("invalid contract version {value:?}: {source}"))]
    InvalidVersion {
        /// The offending version string.
        value: String,
        /// Parse failure.
        source: semver::Error,
    },

    /// A metadata payload was not a valid JSON document.
    #[snafu(display("invalid metadata document: {source}"))]
    InvalidDocument {
        /// Underlying document error.
        source: DocumentError,
    },
}

/// Result type alias for conversions.
pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

/// Converts an address reference to its wire form, stamping the row version
/// the client last observed.
#[must_use]
pub fn address_ref_to_proto(record: &AddressRef, row_version: u64) -> proto::AddressReference {
    proto::AddressReference {
        chain_selector: record.chain_selector.value(),
        contract_type: record.contract_type.clone(),
        version: record.version.to_string(),
        qualifier: record.qualifier.clone(),
        address: record.address.clone(),
        labels: record.labels.iter().cloned().collect(),
        row_version,
    }
}

/// Converts a wire address reference into `(record, row_version)`.
pub fn address_ref_from_proto(message: proto::AddressReference) -> Result<(AddressRef, u64)> {
    let version = message
        .version
        .parse()
        .context(InvalidVersionSnafu { value: message.version.clone() })?;
    let record = AddressRef {
        chain_selector: ChainSelector::new(message.chain_selector),
        contract_type: message.contract_type,
        version,
        qualifier: message.qualifier,
        address: message.address,
        labels: message.labels.into_iter().collect(),
    };
    Ok((record, message.row_version))
}

/// Converts an address reference key to its wire form.
#[must_use]
pub fn address_ref_key_to_proto(key: &AddressRefKey) -> proto::AddressReferenceKey {
    proto::AddressReferenceKey {
        chain_selector: key.chain_selector.value(),
        contract_type: key.contract_type.clone(),
        version: key.version.to_string(),
        qualifier: key.qualifier.clone(),
    }
}

/// Converts a chain metadata record to its wire form.
pub fn chain_metadata_to_proto(
    record: &ChainMetadata,
    row_version: u64,
) -> Result<proto::ChainMetadataRecord> {
    Ok(proto::ChainMetadataRecord {
        chain_selector: record.chain_selector.value(),
        metadata: record.metadata.to_json().context(InvalidDocumentSnafu)?,
        row_version,
    })
}

/// Converts a wire chain metadata record into `(record, row_version)`.
pub fn chain_metadata_from_proto(
    message: proto::ChainMetadataRecord,
) -> Result<(ChainMetadata, u64)> {
    let metadata = Document::from_json(&message.metadata).context(InvalidDocumentSnafu)?;
    let record =
        ChainMetadata { chain_selector: ChainSelector::new(message.chain_selector), metadata };
    Ok((record, message.row_version))
}

/// Converts a contract metadata record to its wire form.
pub fn contract_metadata_to_proto(
    record: &ContractMetadata,
    row_version: u64,
) -> Result<proto::ContractMetadataRecord> {
    Ok(proto::ContractMetadataRecord {
        chain_selector: record.chain_selector.value(),
        address: record.address.clone(),
        metadata: record.metadata.to_json().context(InvalidDocumentSnafu)?,
        row_version,
    })
}

/// Converts a wire contract metadata record into `(record, row_version)`.
pub fn contract_metadata_from_proto(
    message: proto::ContractMetadataRecord,
) -> Result<(ContractMetadata, u64)> {
    let metadata = Document::from_json(&message.metadata).context(InvalidDocumentSnafu)?;
    let record = ContractMetadata {
        chain_selector: ChainSelector::new(message.chain_selector),
        address: message.address,
        metadata,
    };
    Ok((record, message.row_version))
}

/// Converts a contract metadata key to its wire form.
#[must_use]
pub fn contract_metadata_key_to_proto(key: &ContractMetadataKey) -> proto::ContractMetadataKey {
    proto::ContractMetadataKey {
        chain_selector: key.chain_selector.value(),
        address: key.address.clone(),
    }
}

/// Converts an environment metadata record to its wire form.
pub fn env_metadata_to_proto(
    record: &EnvMetadata,
    row_version: u64,
) -> Result<proto::EnvMetadataRecord> {
    Ok(proto::EnvMetadataRecord {
        metadata: record.metadata.to_json().context(InvalidDocumentSnafu)?,
        row_version,
    })
}

/// Converts a wire environment metadata record into `(record, row_version)`.
pub fn env_metadata_from_proto(message: proto::EnvMetadataRecord) -> Result<(EnvMetadata, u64)> {
    let metadata = Document::from_json(&message.metadata).context(InvalidDocumentSnafu)?;
    Ok((EnvMetadata { metadata }, message.row_version))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::BTreeSet;

    use chainreg_types::Version;

    use super::*;

    #[test]
    fn address_ref_round_trips_through_proto() {
        let record = AddressRef {
            chain_selector: ChainSelector::new(42),
            contract_type: "OffRamp".to_owned(),
            version: Version::parse("2.0.1").unwrap(),
            qualifier: String::new(),
            address: "0xdeadbeef".to_owned(),
            labels: BTreeSet::from(["audited".to_owned(), "canary".to_owned()]),
        };
        let wire = address_ref_to_proto(&record, 3);
        let (restored, version) = address_ref_from_proto(wire).unwrap();
        assert_eq!(restored, record);
        assert_eq!(version, 3);
    }

    #[test]
    fn address_ref_with_bad_version_fails() {
        let wire = proto::AddressReference {
            chain_selector: 1,
            contract_type: "Router".to_owned(),
            version: "not-semver".to_owned(),
            ..Default::default()
        };
        let err = address_ref_from_proto(wire).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidVersion { .. }));
    }

    #[test]
    fn contract_metadata_round_trips_through_proto() {
        let record = ContractMetadata {
            chain_selector: ChainSelector::new(1),
            address: "0x12345678".to_owned(),
            metadata: Document::from_json(r#"{"Name":"SomeContract"}"#).unwrap(),
        };
        let wire = contract_metadata_to_proto(&record, 1).unwrap();
        let (restored, version) = contract_metadata_from_proto(wire).unwrap();
        assert_eq!(restored, record);
        assert_eq!(version, 1);
    }

    #[test]
    fn metadata_with_invalid_json_fails() {
        let wire = proto::ChainMetadataRecord {
            chain_selector: 1,
            metadata: "{broken".to_owned(),
            row_version: 1,
        };
        let err = chain_metadata_from_proto(wire).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidDocument { .. }));
    }
}
