//! Derivation of build artifact and link-manifest paths.
//!
//! Both paths are pure functions of `(base_dir, service_name,
//! function_name)` and are recomputed on every call: same inputs, same
//! paths, and distinct service/function pairs never collide.

use std::path::{Path, PathBuf};

/// Directory below the base holding all build output.
const BUILD_DIR: &str = ".fc/build";

/// The build artifact directory for a function.
///
/// Layout: `<base>/.fc/build/artifacts/<service>/<function>`.
#[must_use]
pub fn build_artifact_path(base_dir: &Path, service_name: &str, function_name: &str) -> PathBuf {
    base_dir
        .join(BUILD_DIR)
        .join("artifacts")
        .join(service_name)
        .join(function_name)
}

/// The link-manifest file for a function.
///
/// Layout: `<base>/.fc/build/link-manifests/<service>-<function>.json`.
/// The manifest records which symlinks a linked build created so a later
/// run can clean up stale links.
#[must_use]
pub fn build_link_manifest_path(
    base_dir: &Path,
    service_name: &str,
    function_name: &str,
) -> PathBuf {
    base_dir
        .join(BUILD_DIR)
        .join("link-manifests")
        .join(format!("{service_name}-{function_name}.json"))
}
