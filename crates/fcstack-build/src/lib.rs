//! Hot-update symlink builds for fcstack.
//!
//! After a build, interpreted runtimes (node, python, php, and custom
//! runtimes that opt in) can run straight off the source tree: instead of
//! copying files into the build artifact directory, the artifact directory
//! is populated with symbolic links into the live sources, so edits take
//! effect without rebuilding. This crate decides which runtimes qualify,
//! derives the artifact and link-manifest paths, and orchestrates the link
//! generation behind a progress spinner.

mod build_link;
mod link;
mod paths;
mod progress;
mod runtime;

pub use build_link::{BuildLinkRequest, build_link};
pub use link::{LinkEntry, LinkGenerator, LinkManifest, LinkPlan, SymlinkGenerator};
pub use paths::{build_artifact_path, build_link_manifest_path};
pub use progress::{NoopProgress, Progress, ProgressSpan, SpinnerProgress};
pub use runtime::is_link_eligible;
