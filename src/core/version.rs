//! Build metadata accessors shared by the library and the `ceq` binary.
//! This includes the generated version.rs from the build script into a core module,
//! providing a single source of truth.

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Parse the statistics schema version string from the build script into u32.
/// Falls back to a stable default if parsing fails.
pub fn get_stats_schema_version() -> u32 {
    STATS_SCHEMA_VERSION.parse().unwrap_or(20250727)
}

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}

/// Version line used by `ceq --version`
pub fn long_version() -> String {
    format!(
        "{} (build {}, {}, stats schema {})",
        env!("CARGO_PKG_VERSION"),
        git_hash(),
        build_time(),
        get_stats_schema_version()
    )
}
