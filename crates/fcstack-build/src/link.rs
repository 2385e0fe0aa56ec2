//! Symbolic-link generation for hot-update builds.
//!
//! The orchestrator hands a [`LinkPlan`] to a [`LinkGenerator`]. The
//! bundled [`SymlinkGenerator`] links every top-level entry of the code
//! directory into the artifact directory and records what it created in a
//! JSON manifest, so the next run can clean up links whose sources have
//! since disappeared.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

use fcstack_core::{FcStackError, FcStackResult};

/// Fixed inputs to one link-generation run.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct LinkPlan {
    /// Directory the deployment configuration lives in.
    #[builder(setter(into))]
    pub base_dir: PathBuf,

    /// Code directory to link from; resolved against `base_dir` when
    /// relative.
    #[builder(setter(into))]
    pub code_uri: PathBuf,

    /// Artifact directory receiving the links.
    #[builder(setter(into))]
    pub artifact_path: PathBuf,

    /// Manifest file recording the created links.
    #[builder(setter(into))]
    pub manifest_path: PathBuf,

    /// Glob patterns for top-level entries to leave unlinked.
    #[builder(default)]
    pub exclude_files: Vec<String>,
}

/// Performs the filesystem work of a linked build.
///
/// `#[async_trait]` because the orchestrator holds the generator as
/// `&dyn LinkGenerator` and the work suspends on filesystem I/O.
#[async_trait]
pub trait LinkGenerator: Send + Sync {
    /// Materialize the links described by `plan`.
    async fn generate_links(&self, plan: &LinkPlan) -> FcStackResult<()>;
}

/// One created symlink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    /// Absolute path of the linked source.
    pub source: PathBuf,
    /// Path of the link inside the artifact directory.
    pub target: PathBuf,
}

/// On-disk record of a link-generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkManifest {
    /// When the run finished.
    pub generated_at: DateTime<Utc>,
    /// The resolved code directory the links point into.
    pub code_uri: PathBuf,
    /// The created links, sorted by target path.
    pub links: Vec<LinkEntry>,
}

/// The filesystem-backed [`LinkGenerator`].
#[derive(Debug, Clone, Default)]
pub struct SymlinkGenerator;

#[async_trait]
impl LinkGenerator for SymlinkGenerator {
    async fn generate_links(&self, plan: &LinkPlan) -> FcStackResult<()> {
        let code_root = if plan.code_uri.is_absolute() {
            plan.code_uri.clone()
        } else {
            plan.base_dir.join(&plan.code_uri)
        };

        let patterns = compile_patterns(&plan.exclude_files)?;

        remove_stale_links(&plan.manifest_path).await?;

        tokio::fs::create_dir_all(&plan.artifact_path)
            .await
            .with_context(|| {
                format!("cannot create artifact directory {}", plan.artifact_path.display())
            })?;

        let mut links = Vec::new();
        let mut entries = tokio::fs::read_dir(&code_root)
            .await
            .with_context(|| format!("cannot read code directory {}", code_root.display()))?;

        while let Some(entry) = entries.next_entry().await.map_err(anyhow::Error::new)? {
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if patterns.iter().any(|p| p.matches(&name_str)) {
                debug!(entry = %name_str, "excluded from linking");
                continue;
            }

            let source = std::path::absolute(entry.path())
                .with_context(|| format!("cannot resolve {}", entry.path().display()))?;
            // Never link the build output tree into itself.
            if plan.artifact_path.starts_with(&source) {
                continue;
            }

            let target = plan.artifact_path.join(&name);
            remove_existing(&target).await?;
            symlink(&source, &target).await.with_context(|| {
                format!("cannot link {} -> {}", target.display(), source.display())
            })?;
            links.push(LinkEntry { source, target });
        }

        links.sort_by(|a, b| a.target.cmp(&b.target));
        debug!(count = links.len(), code_root = %code_root.display(), "generated symbolic links");

        let manifest = LinkManifest {
            generated_at: Utc::now(),
            code_uri: code_root,
            links,
        };
        write_manifest(&plan.manifest_path, &manifest).await
    }
}

/// Compile exclusion globs, rejecting malformed patterns up front.
fn compile_patterns(exclude_files: &[String]) -> FcStackResult<Vec<Pattern>> {
    exclude_files
        .iter()
        .map(|raw| {
            Pattern::new(raw)
                .map_err(|e| FcStackError::Config(format!("invalid exclude pattern '{raw}': {e}")))
        })
        .collect()
}

/// Remove symlinks recorded by a previous run.
///
/// A missing manifest means nothing to clean. An unreadable one is only a
/// lost cleanup opportunity, not a build failure.
async fn remove_stale_links(manifest_path: &Path) -> FcStackResult<()> {
    let raw = match tokio::fs::read(manifest_path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("cannot read link manifest {}", manifest_path.display()))
                .into());
        }
    };

    let Ok(manifest) = serde_json::from_slice::<LinkManifest>(&raw) else {
        warn!(manifest = %manifest_path.display(), "unreadable link manifest, skipping stale cleanup");
        return Ok(());
    };

    for entry in &manifest.links {
        match tokio::fs::symlink_metadata(&entry.target).await {
            Ok(meta) if meta.file_type().is_symlink() => {
                tokio::fs::remove_file(&entry.target)
                    .await
                    .with_context(|| format!("cannot remove stale link {}", entry.target.display()))?;
            }
            // Regular files are not ours to delete.
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(anyhow::Error::new(e).into()),
        }
    }
    Ok(())
}

/// Remove whatever currently occupies `target` so a fresh link can land.
async fn remove_existing(target: &Path) -> FcStackResult<()> {
    match tokio::fs::symlink_metadata(target).await {
        Ok(meta) if meta.is_dir() && !meta.file_type().is_symlink() => {
            tokio::fs::remove_dir_all(target)
                .await
                .with_context(|| format!("cannot clear {}", target.display()))?;
        }
        Ok(_) => {
            tokio::fs::remove_file(target)
                .await
                .with_context(|| format!("cannot clear {}", target.display()))?;
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(anyhow::Error::new(e).into()),
    }
    Ok(())
}

/// Write the manifest, creating its parent directory as needed.
async fn write_manifest(path: &Path, manifest: &LinkManifest) -> FcStackResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    let body = serde_json::to_vec_pretty(manifest).map_err(anyhow::Error::new)?;
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("cannot write link manifest {}", path.display()))?;
    Ok(())
}

#[cfg(unix)]
async fn symlink(source: &Path, target: &Path) -> std::io::Result<()> {
    tokio::fs::symlink(source, target).await
}

#[cfg(windows)]
async fn symlink(source: &Path, target: &Path) -> std::io::Result<()> {
    if tokio::fs::metadata(source).await?.is_dir() {
        tokio::fs::symlink_dir(source, target).await
    } else {
        tokio::fs::symlink_file(source, target).await
    }
}
