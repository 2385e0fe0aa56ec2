//! Function Compute client construction for fcstack.
//!
//! This crate resolves everything needed to talk to a Function Compute
//! region (credentials, timeout, and the service endpoint) and builds a
//! configured [`FcClient`] handle. Endpoint selection follows a strict
//! precedence: an endpoint pinned to the credential record wins over the
//! locally configured default, which wins over the service's built-in
//! addressing scheme. An endpoint that fails validation does not fall back
//! to the next candidate; it skips client construction entirely, surfaced
//! as [`ClientBuild::Skipped`].
//!
//! Credential and default-endpoint lookups are injected ports, never
//! ambient global state, so the factory is fully testable with stubs.

mod client;
mod credentials;
mod endpoint;
mod factory;

pub use client::{FcClient, FcClientConfig};
pub use credentials::{CredentialProvider, FileCredentialProvider};
pub use endpoint::{DefaultEndpointSource, FcDefaultFile, check_endpoint};
pub use factory::{ClientBuild, MakeClientProps, SkipReason, make_fc_client};
