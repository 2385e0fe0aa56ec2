//! Credential resolution port and its file-backed implementation.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use tracing::debug;

use fcstack_core::{Credentials, FcStackError, FcStackResult};

/// Environment variable overriding the credential store path.
const ACCESS_PATH_ENV: &str = "FCSTACK_ACCESS_PATH";

/// Path of the credential store below `$HOME`.
const ACCESS_PATH_UNDER_HOME: &str = ".fcstack/access.json";

/// Alias used when the caller does not name one.
const DEFAULT_ALIAS: &str = "default";

/// Resolves a credential record for an opaque access alias.
///
/// `#[async_trait]` because the factory takes the provider as
/// `&dyn CredentialProvider` and resolution may suspend on I/O.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Resolve credentials for `access` (or the default alias).
    ///
    /// Fields missing from the underlying record stay `None`; the provider
    /// never fabricates defaults. Failures propagate unchanged.
    async fn resolve(&self, access: Option<&str>) -> FcStackResult<Credentials>;
}

/// File-backed [`CredentialProvider`].
///
/// Reads a JSON map of access aliases to credential records from
/// `$FCSTACK_ACCESS_PATH`, falling back to `$HOME/.fcstack/access.json`.
/// Process environment variables (`ALIBABA_CLOUD_ACCESS_KEY_ID`,
/// `ALIBABA_CLOUD_ACCESS_KEY_SECRET`, `ALIBABA_CLOUD_SECURITY_TOKEN`,
/// `FC_ACCOUNT_ID`) take precedence over the store when the key pair is
/// present, mirroring how CI environments inject credentials.
#[derive(Debug, Clone)]
pub struct FileCredentialProvider {
    path: PathBuf,
}

impl FileCredentialProvider {
    /// Resolve the store path from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let path = std::env::var(ACCESS_PATH_ENV).map_or_else(
            |_| {
                let home = std::env::var("HOME").unwrap_or_default();
                PathBuf::from(home).join(ACCESS_PATH_UNDER_HOME)
            },
            PathBuf::from,
        );
        Self { path }
    }

    /// Use an explicit store path.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Build a credential record from environment variables, if the access
    /// key pair is present.
    fn from_process_env() -> Option<Credentials> {
        let access_key_id = std::env::var("ALIBABA_CLOUD_ACCESS_KEY_ID").ok()?;
        let access_key_secret = std::env::var("ALIBABA_CLOUD_ACCESS_KEY_SECRET").ok()?;

        Some(Credentials {
            account_id: std::env::var("FC_ACCOUNT_ID").ok(),
            access_key_id: Some(access_key_id),
            access_key_secret: Some(access_key_secret),
            security_token: std::env::var("ALIBABA_CLOUD_SECURITY_TOKEN").ok(),
            endpoint: None,
        })
    }
}

#[async_trait]
impl CredentialProvider for FileCredentialProvider {
    async fn resolve(&self, access: Option<&str>) -> FcStackResult<Credentials> {
        if let Some(creds) = Self::from_process_env() {
            debug!("resolved credentials from process environment");
            return Ok(creds);
        }

        let alias = access.unwrap_or(DEFAULT_ALIAS);
        let raw = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("cannot read credential store {}", self.path.display()))?;
        let store: HashMap<String, Credentials> = serde_json::from_slice(&raw)
            .with_context(|| format!("malformed credential store {}", self.path.display()))?;

        debug!(alias, "resolved credentials from store");
        store.get(alias).cloned().ok_or_else(|| {
            FcStackError::Config(format!(
                "access alias '{alias}' not found in {}",
                self.path.display()
            ))
        })
    }
}
