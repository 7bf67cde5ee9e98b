//! Core domain types for the chainreg deployment catalog.
//!
//! This crate provides the data model shared by the catalog client and any
//! tooling built on top of it:
//! - [`ChainSelector`], the framework-wide numeric chain identifier
//! - [`AddressRef`], one deployed contract instance and its natural key
//! - Metadata records ([`ChainMetadata`], [`ContractMetadata`], [`EnvMetadata`])
//! - [`Document`], the opaque JSON container metadata payloads travel in

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod address;
mod document;
mod metadata;
mod selector;

pub use address::{AddressRef, AddressRefKey};
pub use document::{Document, DocumentError};
pub use metadata::{ChainMetadata, ContractMetadata, ContractMetadataKey, EnvMetadata};
pub use selector::ChainSelector;

// Re-export so consumers name contract versions without a direct semver dep.
pub use semver::Version;
