//! Endpoint validation and the default-endpoint source.
//!
//! Two candidate endpoint sources exist: the endpoint pinned to a
//! credential record, and a locally configured default (a small JSON
//! document under the user's fcstack directory). Both run through
//! [`check_endpoint`] before use. Validation returning `false` is not an
//! error; callers treat it as "skip this endpoint".

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use fcstack_core::FcStackResult;

/// Domain suffix of first-party Function Compute endpoints.
const FC_ENDPOINT_SUFFIX: &str = ".fc.aliyuncs.com";

/// Environment variable overriding the default-endpoint document path.
const DEFAULT_PATH_ENV: &str = "FCSTACK_DEFAULT_PATH";

/// Path of the default-endpoint document below `$HOME`.
const DEFAULT_PATH_UNDER_HOME: &str = ".fcstack/fc-default.json";

/// Validate an endpoint against the caller's region and account ID.
///
/// The rule is deterministic and side-effect-free:
///
/// - the endpoint must contain a plausible host (non-empty, no whitespace,
///   at least one dot or `localhost`);
/// - a host matching the first-party pattern
///   `<uid>.<region>[-internal].fc.aliyuncs.com` must carry the caller's
///   account ID as `<uid>` and the caller's region;
/// - any other plausible host is accepted as a custom domain.
///
/// Returns `false` instead of erroring so callers can treat a bad
/// candidate as "do not use", not "abort with failure".
///
/// # Examples
///
/// ```
/// use fcstack_client::check_endpoint;
///
/// assert!(check_endpoint("cn-hangzhou", Some("123"), "https://123.cn-hangzhou.fc.aliyuncs.com"));
/// assert!(!check_endpoint("cn-hangzhou", Some("123"), "456.cn-hangzhou.fc.aliyuncs.com"));
/// assert!(check_endpoint("cn-hangzhou", Some("123"), "fc.example.com"));
/// ```
#[must_use]
pub fn check_endpoint(region: &str, account_id: Option<&str>, endpoint: &str) -> bool {
    let Some(host) = endpoint_host(endpoint) else {
        warn!(endpoint, "endpoint is not a plausible host, skipping");
        return false;
    };

    if let Some(prefix) = host.strip_suffix(FC_ENDPOINT_SUFFIX) {
        // First-party endpoint: <uid>.<region>[-internal]
        let Some((uid, endpoint_region)) = prefix.split_once('.') else {
            warn!(endpoint, "malformed first-party endpoint, skipping");
            return false;
        };
        if account_id != Some(uid) {
            warn!(
                endpoint,
                ?account_id,
                "endpoint account does not match credentials, skipping"
            );
            return false;
        }
        let plain = endpoint_region.strip_suffix("-internal").unwrap_or(endpoint_region);
        if plain != region {
            warn!(endpoint, region, "endpoint region does not match, skipping");
            return false;
        }
    }

    true
}

/// Extract the host portion of an endpoint string, or `None` when the
/// endpoint cannot name a host.
fn endpoint_host(endpoint: &str) -> Option<&str> {
    let trimmed = endpoint.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let host_port = without_scheme.split('/').next().unwrap_or_default();
    let host = host_port.split(':').next().unwrap_or_default();

    if host.is_empty() || host.chars().any(char::is_whitespace) {
        return None;
    }
    if !host.contains('.') && host != "localhost" {
        return None;
    }
    Some(host)
}

/// A source of the locally configured default endpoint.
///
/// `#[async_trait]` because the port must be object-safe: the factory
/// takes it as `&dyn DefaultEndpointSource`.
#[async_trait]
pub trait DefaultEndpointSource: Send + Sync {
    /// Fetch the configured default endpoint.
    ///
    /// Returns `Ok(None)` when no default is configured. A failing read of
    /// an existing configuration propagates as an error.
    async fn fetch(&self) -> FcStackResult<Option<String>>;
}

/// Shape of the default-endpoint JSON document.
#[derive(Debug, Deserialize)]
struct FcDefaultDocument {
    endpoint: Option<String>,
}

/// File-backed [`DefaultEndpointSource`].
///
/// Reads `{ "endpoint": "..." }` from `$FCSTACK_DEFAULT_PATH`, falling
/// back to `$HOME/.fcstack/fc-default.json`. A missing file means no
/// default is configured.
#[derive(Debug, Clone)]
pub struct FcDefaultFile {
    path: PathBuf,
}

impl FcDefaultFile {
    /// Resolve the document path from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let path = std::env::var(DEFAULT_PATH_ENV).map_or_else(
            |_| {
                let home = std::env::var("HOME").unwrap_or_default();
                PathBuf::from(home).join(DEFAULT_PATH_UNDER_HOME)
            },
            PathBuf::from,
        );
        Self { path }
    }

    /// Use an explicit document path.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DefaultEndpointSource for FcDefaultFile {
    async fn fetch(&self) -> FcStackResult<Option<String>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("cannot read fc-default document {}", self.path.display()))
                    .into());
            }
        };

        let document: FcDefaultDocument = serde_json::from_slice(&raw)
            .with_context(|| format!("malformed fc-default document {}", self.path.display()))?;

        Ok(document.endpoint.filter(|e| !e.trim().is_empty()))
    }
}
