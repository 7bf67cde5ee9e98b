//! Address references: deployed contract instances.

use std::collections::BTreeSet;
use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::selector::ChainSelector;

/// One deployed contract instance.
///
/// `(chain_selector, contract_type, version, qualifier)` is the natural key,
/// unique within a domain+environment scope. The identity fields are
/// immutable once the record exists; only `address` and `labels` may be
/// amended. The address string uses the chain family's native encoding and
/// is not validated at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRef {
    /// Chain the contract is deployed on.
    pub chain_selector: ChainSelector,
    /// Contract type name (e.g. `"Router"`).
    pub contract_type: String,
    /// Contract version.
    pub version: Version,
    /// Free-text disambiguator for multiple deployments of the same
    /// type+version on one chain. Empty when unused.
    pub qualifier: String,
    /// Deployed address in the chain family's encoding.
    pub address: String,
    /// Free-form labels.
    pub labels: BTreeSet<String>,
}

impl AddressRef {
    /// Returns the record's natural key.
    #[must_use]
    pub fn key(&self) -> AddressRefKey {
        AddressRefKey {
            chain_selector: self.chain_selector,
            contract_type: self.contract_type.clone(),
            version: self.version.clone(),
            qualifier: self.qualifier.clone(),
        }
    }
}

/// Natural key of an [`AddressRef`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressRefKey {
    /// Chain the contract is deployed on.
    pub chain_selector: ChainSelector,
    /// Contract type name.
    pub contract_type: String,
    /// Contract version.
    pub version: Version,
    /// Deployment qualifier, empty when unused.
    pub qualifier: String,
}

impl fmt::Display for AddressRefKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} {} {}",
            self.chain_selector, self.contract_type, self.version, self.qualifier
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn reference() -> AddressRef {
        AddressRef {
            chain_selector: ChainSelector::new(1),
            contract_type: "Router".to_owned(),
            version: Version::parse("1.2.0").unwrap(),
            qualifier: "primary".to_owned(),
            address: "0x1111111111111111111111111111111111111111".to_owned(),
            labels: BTreeSet::from(["canary".to_owned()]),
        }
    }

    #[test]
    fn key_copies_identity_fields_only() {
        let record = reference();
        let key = record.key();
        assert_eq!(key.chain_selector, record.chain_selector);
        assert_eq!(key.contract_type, record.contract_type);
        assert_eq!(key.version, record.version);
        assert_eq!(key.qualifier, record.qualifier);
    }

    #[test]
    fn keys_differ_by_qualifier() {
        let a = reference();
        let mut b = reference();
        b.qualifier = "secondary".to_owned();
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn key_display_includes_all_identity_fields() {
        let rendered = reference().key().to_string();
        assert!(rendered.contains("Router"));
        assert!(rendered.contains("1.2.0"));
        assert!(rendered.contains("primary"));
    }
}
