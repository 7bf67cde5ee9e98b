//! Metadata records: open JSON documents attached to chains, contracts, and
//! environments.

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::selector::ChainSelector;

/// Per-chain metadata, one record per chain per domain+environment scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainMetadata {
    /// Chain this record describes.
    pub chain_selector: ChainSelector,
    /// Open JSON payload.
    pub metadata: Document,
}

/// Per-contract metadata, keyed by `(chain_selector, address)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractMetadata {
    /// Chain the contract is deployed on.
    pub chain_selector: ChainSelector,
    /// Deployed contract address.
    pub address: String,
    /// Open JSON payload.
    pub metadata: Document,
}

impl ContractMetadata {
    /// Returns the record's natural key.
    #[must_use]
    pub fn key(&self) -> ContractMetadataKey {
        ContractMetadataKey { chain_selector: self.chain_selector, address: self.address.clone() }
    }
}

/// Natural key of a [`ContractMetadata`] record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractMetadataKey {
    /// Chain the contract is deployed on.
    pub chain_selector: ChainSelector,
    /// Deployed contract address.
    pub address: String,
}

/// Environment-level metadata. A singleton per domain+environment scope;
/// the scope itself is the key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvMetadata {
    /// Open JSON payload.
    pub metadata: Document,
}

impl EnvMetadata {
    /// Wraps a payload document.
    #[must_use]
    pub fn new(metadata: Document) -> Self {
        Self { metadata }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn contract_key_carries_chain_and_address() {
        let record = ContractMetadata {
            chain_selector: ChainSelector::new(7),
            address: "0xabc".to_owned(),
            metadata: Document::default(),
        };
        let key = record.key();
        assert_eq!(key.chain_selector, ChainSelector::new(7));
        assert_eq!(key.address, "0xabc");
    }

    #[test]
    fn contract_keys_differ_by_chain() {
        let a = ContractMetadataKey { chain_selector: ChainSelector::new(1), address: "0xabc".to_owned() };
        let b = ContractMetadataKey { chain_selector: ChainSelector::new(2), address: "0xabc".to_owned() };
        assert_ne!(a, b);
    }
}
