//! The client factory: credential resolution, endpoint precedence, and
//! construction of the [`FcClient`] handle.

use tracing::{debug, warn};
use typed_builder::TypedBuilder;

use fcstack_core::{Credentials, FcStackError, FcStackResult};

use crate::client::{FcClient, FcClientConfig};
use crate::credentials::CredentialProvider;
use crate::endpoint::{DefaultEndpointSource, check_endpoint};

/// Default client timeout in seconds when the caller does not specify one.
const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Caller-facing inputs to [`make_fc_client`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct MakeClientProps {
    /// Access alias used when credentials must be looked up.
    #[builder(default)]
    pub access: Option<String>,

    /// Target region. Required; validated before anything else.
    #[builder(setter(into))]
    pub region: String,

    /// Request timeout in seconds.
    #[builder(default)]
    pub timeout: Option<u64>,

    /// Caller-supplied credentials, used verbatim when present.
    #[builder(default)]
    pub credentials: Option<Credentials>,
}

/// Why client construction was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipReason {
    /// The endpoint that failed validation.
    pub endpoint: String,
    /// The region it was validated against.
    pub region: String,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "endpoint {} is not usable for region {}",
            self.endpoint, self.region
        )
    }
}

/// Outcome of [`make_fc_client`].
///
/// An endpoint that fails validation deliberately skips client
/// construction instead of falling back to the next candidate or raising
/// an error. The skip is a distinguished variant so callers cannot
/// mistake it for success.
#[derive(Debug)]
pub enum ClientBuild {
    /// A configured client handle.
    Built(FcClient),
    /// Construction was skipped because a candidate endpoint was invalid.
    Skipped(SkipReason),
}

impl ClientBuild {
    /// The built client, if construction was not skipped.
    #[must_use]
    pub fn built(self) -> Option<FcClient> {
        match self {
            Self::Built(client) => Some(client),
            Self::Skipped(_) => None,
        }
    }

    /// Whether construction was skipped.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Build an authenticated Function Compute client.
///
/// Validates the region, resolves credentials (caller-supplied record
/// verbatim, otherwise the injected provider keyed by the access alias),
/// and resolves the endpoint with strict precedence: the credential
/// record's endpoint, then the configured default, then the service's
/// built-in addressing scheme. Candidates run through
/// [`check_endpoint`]; an invalid candidate yields
/// [`ClientBuild::Skipped`] rather than an error or a fallback.
///
/// Collaborator failures (credential provider, default-endpoint source)
/// propagate unchanged.
pub async fn make_fc_client(
    props: MakeClientProps,
    credential_provider: &dyn CredentialProvider,
    default_endpoint: &dyn DefaultEndpointSource,
) -> FcStackResult<ClientBuild> {
    debug!(region = %props.region, timeout = ?props.timeout, access = ?props.access, "make fc client");

    if props.region.trim().is_empty() {
        return Err(FcStackError::MissingParameter { field: "region" });
    }
    let timeout_ms = props.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS) * 1000;

    let credentials = match props.credentials {
        Some(creds) if !creds.is_unset() => creds,
        _ => credential_provider.resolve(props.access.as_deref()).await?,
    };

    let mut endpoint: Option<String> = None;
    let explicit = credentials.endpoint.clone().filter(|e| !e.trim().is_empty());
    if let Some(candidate) = explicit {
        // The credential record's endpoint wins; it never falls back.
        if !check_endpoint(&props.region, credentials.account_id.as_deref(), &candidate) {
            warn!(endpoint = %candidate, "credential endpoint rejected, skipping client construction");
            return Ok(ClientBuild::Skipped(SkipReason {
                endpoint: candidate,
                region: props.region,
            }));
        }
        endpoint = Some(candidate);
    } else if let Some(candidate) = default_endpoint.fetch().await? {
        if !check_endpoint(&props.region, credentials.account_id.as_deref(), &candidate) {
            warn!(endpoint = %candidate, "default endpoint rejected, skipping client construction");
            return Ok(ClientBuild::Skipped(SkipReason {
                endpoint: candidate,
                region: props.region,
            }));
        }
        endpoint = Some(candidate);
    }

    if let Some(ep) = &endpoint {
        debug!(endpoint = %ep, "using endpoint");
    }

    let config = FcClientConfig::builder()
        .account_id(credentials.account_id)
        .access_key_id(credentials.access_key_id)
        .access_key_secret(credentials.access_key_secret)
        .security_token(credentials.security_token)
        .region(props.region)
        .timeout_ms(timeout_ms)
        .endpoint(endpoint)
        .build();

    Ok(ClientBuild::Built(FcClient::new(config)?))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    /// Credential provider stub that counts resolutions.
    struct StubProvider {
        creds: Credentials,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn returning(creds: Credentials) -> Self {
            Self {
                creds,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CredentialProvider for StubProvider {
        async fn resolve(&self, _access: Option<&str>) -> FcStackResult<Credentials> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.creds.clone())
        }
    }

    /// Default-endpoint stub with a fixed answer.
    struct StubDefault(Option<String>);

    #[async_trait]
    impl DefaultEndpointSource for StubDefault {
        async fn fetch(&self) -> FcStackResult<Option<String>> {
            Ok(self.0.clone())
        }
    }

    fn full_credentials() -> Credentials {
        Credentials {
            account_id: Some("123".to_owned()),
            access_key_id: Some("ak".to_owned()),
            access_key_secret: Some("sk".to_owned()),
            security_token: None,
            endpoint: None,
        }
    }

    #[tokio::test]
    async fn test_should_fail_fast_on_empty_region() {
        let provider = StubProvider::returning(full_credentials());
        let props = MakeClientProps::builder().region("").build();

        let err = make_fc_client(props, &provider, &StubDefault(None))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("region"));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_should_use_caller_credentials_verbatim() {
        let provider = StubProvider::returning(Credentials::default());
        let props = MakeClientProps::builder()
            .region("cn-hangzhou")
            .credentials(Some(full_credentials()))
            .build();

        let client = make_fc_client(props, &provider, &StubDefault(None))
            .await
            .unwrap()
            .built()
            .unwrap();
        assert_eq!(provider.call_count(), 0);
        assert_eq!(client.config().account_id.as_deref(), Some("123"));
        assert_eq!(client.config().timeout_ms, 600_000);
    }

    #[tokio::test]
    async fn test_should_resolve_credentials_when_record_is_empty() {
        let provider = StubProvider::returning(full_credentials());
        let props = MakeClientProps::builder()
            .region("cn-hangzhou")
            .credentials(Some(Credentials::default()))
            .build();

        let client = make_fc_client(props, &provider, &StubDefault(None))
            .await
            .unwrap()
            .built()
            .unwrap();
        assert_eq!(provider.call_count(), 1);
        assert_eq!(client.config().access_key_id.as_deref(), Some("ak"));
    }

    #[tokio::test]
    async fn test_should_skip_on_invalid_credential_endpoint() {
        let provider = StubProvider::returning(Credentials::default());
        let creds = Credentials {
            endpoint: Some("bad".to_owned()),
            ..full_credentials()
        };
        let props = MakeClientProps::builder()
            .region("cn-hangzhou")
            .credentials(Some(creds))
            .build();

        let build = make_fc_client(props, &provider, &StubDefault(None))
            .await
            .unwrap();
        assert!(build.is_skipped());
        assert!(build.built().is_none());
    }

    #[tokio::test]
    async fn test_should_prefer_credential_endpoint_over_default() {
        let provider = StubProvider::returning(Credentials::default());
        let creds = Credentials {
            endpoint: Some("https://123.cn-hangzhou.fc.aliyuncs.com".to_owned()),
            ..full_credentials()
        };
        let props = MakeClientProps::builder()
            .region("cn-hangzhou")
            .credentials(Some(creds))
            .build();

        let client = make_fc_client(
            props,
            &provider,
            &StubDefault(Some("fc.fallback.example.com".to_owned())),
        )
        .await
        .unwrap()
        .built()
        .unwrap();
        assert_eq!(
            client.config().endpoint.as_deref(),
            Some("https://123.cn-hangzhou.fc.aliyuncs.com")
        );
    }

    #[tokio::test]
    async fn test_should_fall_back_to_default_endpoint() {
        let provider = StubProvider::returning(Credentials::default());
        let props = MakeClientProps::builder()
            .region("cn-hangzhou")
            .credentials(Some(full_credentials()))
            .build();

        let client = make_fc_client(
            props,
            &provider,
            &StubDefault(Some("fc.example.com".to_owned())),
        )
        .await
        .unwrap()
        .built()
        .unwrap();
        assert_eq!(client.config().endpoint.as_deref(), Some("fc.example.com"));
    }

    #[tokio::test]
    async fn test_should_skip_on_invalid_default_endpoint() {
        let provider = StubProvider::returning(Credentials::default());
        let props = MakeClientProps::builder()
            .region("cn-hangzhou")
            .credentials(Some(full_credentials()))
            .build();

        let build = make_fc_client(
            props,
            &provider,
            &StubDefault(Some("nodots".to_owned())),
        )
        .await
        .unwrap();
        assert!(build.is_skipped());
    }

    #[tokio::test]
    async fn test_should_leave_endpoint_unset_without_candidates() {
        let provider = StubProvider::returning(Credentials::default());
        let props = MakeClientProps::builder()
            .region("cn-hangzhou")
            .credentials(Some(full_credentials()))
            .build();

        let client = make_fc_client(props, &provider, &StubDefault(None))
            .await
            .unwrap()
            .built()
            .unwrap();
        assert!(client.config().endpoint.is_none());
        assert_eq!(client.base_url(), "https://123.cn-hangzhou.fc.aliyuncs.com");
    }

    #[tokio::test]
    async fn test_should_convert_timeout_seconds_to_millis() {
        let provider = StubProvider::returning(Credentials::default());
        let props = MakeClientProps::builder()
            .region("cn-hangzhou")
            .timeout(Some(30))
            .credentials(Some(full_credentials()))
            .build();

        let client = make_fc_client(props, &provider, &StubDefault(None))
            .await
            .unwrap()
            .built()
            .unwrap();
        assert_eq!(client.config().timeout_ms, 30_000);
    }

    #[tokio::test]
    async fn test_should_produce_identical_config_on_repeat_calls() {
        let provider = StubProvider::returning(full_credentials());
        let source = StubDefault(Some("fc.example.com".to_owned()));
        let props = || {
            MakeClientProps::builder()
                .region("cn-hangzhou")
                .timeout(Some(120))
                .build()
        };

        let first = make_fc_client(props(), &provider, &source)
            .await
            .unwrap()
            .built()
            .unwrap();
        let second = make_fc_client(props(), &provider, &source)
            .await
            .unwrap()
            .built()
            .unwrap();
        assert_eq!(first.config(), second.config());
    }
}
