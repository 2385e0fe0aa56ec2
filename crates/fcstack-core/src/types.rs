//! Credential record shared between the provider and the client factory.

use serde::{Deserialize, Serialize};

/// A Function Compute credential record.
///
/// Every field is individually optional: records coming out of a
/// credential store may be partial, and the factory passes absent fields
/// through to the client untouched rather than defaulting them. Serde
/// names follow the wire casing used by the credential store documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Cloud account ID.
    #[serde(rename = "AccountID", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    /// Access key ID.
    #[serde(rename = "AccessKeyID", skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,

    /// Access key secret.
    #[serde(rename = "AccessKeySecret", skip_serializing_if = "Option::is_none")]
    pub access_key_secret: Option<String>,

    /// STS security token, present only for temporary credentials.
    #[serde(rename = "SecurityToken", skip_serializing_if = "Option::is_none")]
    pub security_token: Option<String>,

    /// Endpoint pinned to this credential record, if any.
    #[serde(rename = "endpoint", skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Credentials {
    /// Returns true when every field is absent.
    ///
    /// A fully-empty record supplied by a caller is treated the same as no
    /// record at all: the factory still consults the credential provider.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.account_id.is_none()
            && self.access_key_id.is_none()
            && self.access_key_secret.is_none()
            && self.security_token.is_none()
            && self.endpoint.is_none()
    }
}
