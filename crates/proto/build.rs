//! Build script for chainreg-proto.
//!
//! Compiles protobuf definitions into Rust code using tonic-prost-build.
//! When the proto sources or a protoc binary aren't available (published
//! crates, minimal build environments), the pre-generated code committed
//! under src/generated/ is used instead.

use std::path::{Path, PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Declare custom cfg for conditional compilation
    println!("cargo::rustc-check-cfg=cfg(use_pregenerated_proto)");

    let proto_path = Path::new("../../proto/catalog/v1/catalog.proto");

    if proto_path.exists() && protoc_available() {
        println!("cargo::rerun-if-changed=../../proto/catalog/v1/catalog.proto");

        let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);

        tonic_prost_build::configure()
            .file_descriptor_set_path(out_dir.join("catalog_v1_descriptor.bin"))
            .build_server(true)
            .build_client(true)
            .emit_rerun_if_changed(true)
            .compile_protos(&["../../proto/catalog/v1/catalog.proto"], &["../../proto"])?;
    } else {
        // Signal that we're using pre-generated code
        println!("cargo::rustc-cfg=use_pregenerated_proto");
    }

    Ok(())
}

/// Checks whether a protoc binary is reachable (PROTOC env var or PATH).
fn protoc_available() -> bool {
    if std::env::var_os("PROTOC").is_some() {
        return true;
    }
    let Some(path) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path)
        .any(|dir| dir.join("protoc").is_file() || dir.join("protoc.exe").is_file())
}
