//! The configured Function Compute client handle.

use std::time::Duration;

use typed_builder::TypedBuilder;

use fcstack_core::FcStackResult;

/// Default client timeout in milliseconds (600 seconds).
const DEFAULT_TIMEOUT_MS: u64 = 600_000;

/// Resolved configuration for an [`FcClient`].
///
/// Produced by the factory after credential and endpoint resolution.
/// Credential fields stay optional: a partial record is passed through
/// verbatim and surfaces, if at all, on the first signed request.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct FcClientConfig {
    /// Cloud account ID.
    #[builder(default)]
    pub account_id: Option<String>,

    /// Access key ID.
    #[builder(default)]
    pub access_key_id: Option<String>,

    /// Access key secret.
    #[builder(default)]
    pub access_key_secret: Option<String>,

    /// STS security token, for temporary credentials.
    #[builder(default)]
    pub security_token: Option<String>,

    /// Target region.
    #[builder(setter(into))]
    pub region: String,

    /// Request timeout in milliseconds.
    #[builder(default = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Resolved endpoint; `None` means the service's addressing scheme
    /// (`<account>.<region>.fc.aliyuncs.com`) applies.
    #[builder(default)]
    pub endpoint: Option<String>,

    /// Whether to address the service over https.
    #[builder(default = true)]
    pub secure: bool,
}

/// An authenticated Function Compute client handle.
///
/// Owns a [`reqwest::Client`] configured with the resolved timeout. The
/// handle is cheap to clone and intended to be constructed once per
/// factory call; this fragment does not cache handles.
#[derive(Debug, Clone)]
pub struct FcClient {
    config: FcClientConfig,
    http: reqwest::Client,
}

impl FcClient {
    /// Build a client from a resolved configuration.
    pub fn new(config: FcClientConfig) -> FcStackResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(anyhow::Error::new)?;

        Ok(Self { config, http })
    }

    /// The resolved configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &FcClientConfig {
        &self.config
    }

    /// The underlying HTTP client.
    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The base URL all requests are issued against.
    ///
    /// Uses the resolved endpoint when one exists (adding a scheme if the
    /// endpoint is scheme-less), otherwise the service addressing scheme
    /// derived from account and region.
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.config.secure { "https" } else { "http" };

        match &self.config.endpoint {
            Some(endpoint) if endpoint.contains("://") => endpoint.clone(),
            Some(endpoint) => format!("{scheme}://{endpoint}"),
            None => {
                let account = self.config.account_id.as_deref().unwrap_or_default();
                format!("{scheme}://{account}.{}.fc.aliyuncs.com", self.config.region)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_default_timeout_and_secure() {
        let config = FcClientConfig::builder().region("cn-hangzhou").build();
        assert_eq!(config.timeout_ms, 600_000);
        assert!(config.secure);
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_should_derive_base_url_from_account_and_region() {
        let config = FcClientConfig::builder()
            .account_id(Some("123".to_owned()))
            .region("cn-hangzhou")
            .build();
        let client = FcClient::new(config).unwrap();
        assert_eq!(client.base_url(), "https://123.cn-hangzhou.fc.aliyuncs.com");
    }

    #[test]
    fn test_should_prefer_resolved_endpoint() {
        let config = FcClientConfig::builder()
            .region("cn-hangzhou")
            .endpoint(Some("fc.example.com".to_owned()))
            .build();
        let client = FcClient::new(config).unwrap();
        assert_eq!(client.base_url(), "https://fc.example.com");
    }

    #[test]
    fn test_should_keep_explicit_scheme() {
        let config = FcClientConfig::builder()
            .region("cn-hangzhou")
            .endpoint(Some("http://localhost:8080".to_owned()))
            .build();
        let client = FcClient::new(config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_should_use_http_when_insecure() {
        let config = FcClientConfig::builder()
            .account_id(Some("1".to_owned()))
            .region("cn-beijing")
            .secure(false)
            .build();
        let client = FcClient::new(config).unwrap();
        assert!(client.base_url().starts_with("http://"));
    }
}
