//! Build script for sysrepo-ffi-bridge.
//!
//! Links against libsysrepo only when the `sysrepo-link` feature is enabled,
//! so the crate builds and tests on hosts without the library installed.
//! `SYSREPO_LIB_DIR` adds an extra search path for non-standard installs.

use std::env;

fn main() {
    if env::var_os("CARGO_FEATURE_SYSREPO_LINK").is_some() {
        if let Some(dir) = env::var_os("SYSREPO_LIB_DIR") {
            println!("cargo:rustc-link-search=native={}", dir.to_string_lossy());
        }
        println!("cargo:rustc-link-lib=sysrepo");
    }

    println!("cargo:rerun-if-env-changed=SYSREPO_LIB_DIR");
    println!("cargo:rerun-if-changed=build.rs");
}
