//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Version line printed by `natya --version`.
pub fn version_line() -> String {
    format!("natya {} ({})", BUILD_DATE, BUILD_COMMIT)
}
