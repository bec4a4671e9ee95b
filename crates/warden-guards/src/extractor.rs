//! Bearer credential extraction
//!
//! The credential is read from the configured header. A query parameter of the
//! same name, when present and non-blank, takes precedence over the header.

use crate::request::RequestParts;
use warden_core::{WardenConfig, DEFAULT_AUTHORIZE_HEADER};

/// Where a credential was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Request header
    Header,
    /// Query parameter of the same name
    QueryParam,
}

/// Extracted bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    source: CredentialSource,
}

impl Credential {
    /// Raw credential value.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Where the credential was read.
    pub fn source(&self) -> CredentialSource {
        self.source
    }

    /// Take the raw credential value.
    pub fn into_token(self) -> String {
        self.token
    }
}

/// Reads the credential from a request.
#[derive(Debug, Clone)]
pub struct TokenExtractor {
    name: String,
}

impl TokenExtractor {
    /// Extractor reading `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Extractor reading the configured `authorize_header`.
    pub fn from_config(config: &WardenConfig) -> Self {
        Self::new(config.authorize_header.clone())
    }

    /// Header / query parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extract the credential, `None` when neither source has a non-blank value.
    pub fn extract(&self, request: &dyn RequestParts) -> Option<Credential> {
        if let Some(token) = request.query_param(&self.name).filter(|v| has_text(v)) {
            return Some(Credential {
                token: token.to_string(),
                source: CredentialSource::QueryParam,
            });
        }
        request
            .header(&self.name)
            .filter(|v| has_text(v))
            .map(|token| Credential {
                token: token.to_string(),
                source: CredentialSource::Header,
            })
    }

    /// Like [`extract`](Self::extract), returning only the value.
    pub fn extract_token(&self, request: &dyn RequestParts) -> Option<String> {
        self.extract(request).map(Credential::into_token)
    }
}

impl Default for TokenExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_AUTHORIZE_HEADER)
    }
}

fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestHead;

    #[test]
    fn test_query_param_overrides_header() {
        let request = RequestHead::new()
            .with_header("Authorization", "A")
            .with_query("Authorization", "B");
        let credential = TokenExtractor::default().extract(&request).unwrap();
        assert_eq!(credential.token(), "B");
        assert_eq!(credential.source(), CredentialSource::QueryParam);
    }

    #[test]
    fn test_header_used_without_query_param() {
        let request = RequestHead::new().with_header("authorization", "A");
        let credential = TokenExtractor::default().extract(&request).unwrap();
        assert_eq!(credential.token(), "A");
        assert_eq!(credential.source(), CredentialSource::Header);
    }

    #[test]
    fn test_blank_query_param_does_not_override() {
        let request = RequestHead::new()
            .with_header("Authorization", "A")
            .with_query("Authorization", "  ");
        assert_eq!(
            TokenExtractor::default().extract_token(&request).as_deref(),
            Some("A")
        );
    }

    #[test]
    fn test_absent_or_blank_credential() {
        let extractor = TokenExtractor::default();
        assert!(extractor.extract(&RequestHead::new()).is_none());

        let request = RequestHead::new().with_header("Authorization", "");
        assert!(extractor.extract(&request).is_none());

        let request = RequestHead::new().with_header("Authorization", " \t");
        assert!(extractor.extract(&request).is_none());
    }

    #[test]
    fn test_configured_name() {
        let config = WardenConfig {
            authorize_header: "X-Token".to_string(),
            ..WardenConfig::default()
        };
        let extractor = TokenExtractor::from_config(&config);
        let request = RequestHead::new()
            .with_header("Authorization", "ignored")
            .with_header("x-token", "T");
        assert_eq!(extractor.extract_token(&request).as_deref(), Some("T"));
    }
}
