//! The build-link orchestrator.

use std::path::PathBuf;

use anyhow::Context;
use tracing::debug;
use typed_builder::TypedBuilder;

use fcstack_core::{FcStackError, FcStackResult};

use crate::link::{LinkGenerator, LinkPlan};
use crate::paths::{build_artifact_path, build_link_manifest_path};
use crate::progress::Progress;
use crate::runtime::is_link_eligible;

/// Label shown while links are generated.
const SPINNER_LABEL: &str = "Generate symbolic link...";

/// A request to wire a function's build artifacts to its sources.
#[derive(Debug, Clone, TypedBuilder)]
pub struct BuildLinkRequest {
    /// Directory of the deployment configuration; the process working
    /// directory is used when absent or empty.
    #[builder(default)]
    pub config_dir_path: Option<PathBuf>,

    /// Code directory of the function. Required.
    #[builder(setter(into))]
    pub code_uri: String,

    /// Runtime identifier (e.g. `node14`, `python3.10`, `custom`).
    #[builder(setter(into))]
    pub runtime: String,

    /// Opt-in flag for linked builds on the `custom` runtime.
    #[builder(default)]
    pub use_link: bool,

    /// Service name. Required.
    #[builder(setter(into))]
    pub service_name: String,

    /// Function name. Required.
    #[builder(setter(into))]
    pub function_name: String,

    /// Glob patterns for entries to leave unlinked.
    #[builder(default)]
    pub exclude_files: Vec<String>,
}

/// Link a function's build artifact directory to its live sources.
///
/// A no-op (not an error) for runtimes that do not qualify for linked
/// builds. Otherwise validates the required fields, derives the artifact
/// and manifest paths, and delegates the filesystem work to `generator`
/// under a progress span. A generator failure marks the span failed and
/// propagates unchanged.
pub async fn build_link(
    request: &BuildLinkRequest,
    generator: &dyn LinkGenerator,
    progress: &dyn Progress,
) -> FcStackResult<()> {
    if !is_link_eligible(&request.runtime, request.use_link) {
        debug!(runtime = %request.runtime, "runtime not eligible for linked builds");
        return Ok(());
    }

    if request.code_uri.is_empty() {
        return Err(FcStackError::MissingParameter { field: "codeUri" });
    }
    if request.service_name.is_empty() {
        return Err(FcStackError::MissingParameter { field: "serviceName" });
    }
    if request.function_name.is_empty() {
        return Err(FcStackError::MissingParameter { field: "functionName" });
    }

    let base_dir = match &request.config_dir_path {
        Some(dir) if !dir.as_os_str().is_empty() => dir.clone(),
        _ => std::env::current_dir().context("cannot resolve working directory")?,
    };
    let artifact_path = build_artifact_path(&base_dir, &request.service_name, &request.function_name);
    let manifest_path =
        build_link_manifest_path(&base_dir, &request.service_name, &request.function_name);
    debug!(
        artifact = %artifact_path.display(),
        manifest = %manifest_path.display(),
        "linking build artifacts"
    );

    let plan = LinkPlan::builder()
        .base_dir(base_dir)
        .code_uri(request.code_uri.clone())
        .artifact_path(artifact_path)
        .manifest_path(manifest_path)
        .exclude_files(request.exclude_files.clone())
        .build();

    let span = progress.start(SPINNER_LABEL);
    match generator.generate_links(&plan).await {
        Ok(()) => {
            span.succeed();
            Ok(())
        }
        Err(e) => {
            span.fail();
            Err(e)
        }
    }
}
