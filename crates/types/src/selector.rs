//! Chain selector newtype.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Framework-wide numeric identifier for a blockchain network.
///
/// Selectors are assigned by the framework and are independent of the
/// chain's native chain ID, so one numbering scheme covers every chain
/// family (EVM, Solana, Aptos, ...).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChainSelector(u64);

impl ChainSelector {
    /// Creates a selector from its raw numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for ChainSelector {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ChainSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_round_trips_raw_value() {
        let selector = ChainSelector::new(16015286601757825753);
        assert_eq!(selector.value(), 16015286601757825753);
        assert_eq!(selector, ChainSelector::from(16015286601757825753));
    }

    #[test]
    fn selector_displays_as_number() {
        assert_eq!(ChainSelector::new(1).to_string(), "1");
    }
}
