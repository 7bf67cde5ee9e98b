//! Protobuf types and conversions for the chainreg catalog.
//!
//! This crate provides:
//! - Generated protobuf types and gRPC service stubs ([`proto`])
//! - Bidirectional conversions between domain types and proto types
//!   ([`convert`])
//!
//! The wire format lives in its own crate so that consumers needing only
//! message types don't pull in the full client.

#![deny(unsafe_code)]
// gRPC services return tonic::Status - standard practice for gRPC error handling
#![allow(clippy::result_large_err)]

/// Generated protobuf types and service stubs for `catalog.v1`.
pub mod proto {
    #![allow(clippy::all)]
    #![allow(missing_docs)]

    // Use pre-generated code when proto files or protoc aren't available
    #[cfg(use_pregenerated_proto)]
    include!("generated/catalog.v1.rs");

    // Use build-time generated code in development
    #[cfg(not(use_pregenerated_proto))]
    tonic::include_proto!("catalog.v1");
}

/// Serialized `FileDescriptorSet` for gRPC reflection.
///
/// Embedded at compile time from the prost-generated descriptor binary.
/// Only available when building from proto sources (not pre-generated code).
#[cfg(not(use_pregenerated_proto))]
pub const FILE_DESCRIPTOR_SET: &[u8] =
    tonic::include_file_descriptor_set!("catalog_v1_descriptor");

/// Bidirectional conversions between domain and protobuf types.
pub mod convert;
