//! Credential verification.
//!
//! An [`IdentityGateway`] turns the bearer credential a representative
//! presents into a stable [`RepIdentity`]. The engine trusts whatever the
//! gateway returns and never sees the credential itself.

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind as JwtErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use walkin_types::models::AuthConfig;
use walkin_types::{AuthMode, QueueError, RepIdentity};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("missing credential")]
    MissingCredential,
    #[error("invalid credential: {0}")]
    InvalidCredential(String),
    #[error("credential expired")]
    Expired,
}

impl From<IdentityError> for QueueError {
    fn from(err: IdentityError) -> Self {
        QueueError::unauthenticated(err.to_string())
    }
}

#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Verify `credential` and return the identity it was issued to.
    async fn resolve(&self, credential: &str) -> Result<RepIdentity, IdentityError>;
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// HS256 JWT verifier. The `sub` claim is the representative identity.
pub struct JwtIdentityGateway {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityGateway {
    pub fn new(secret: &str, issuer: Option<&str>, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self { key: DecodingKey::from_secret(secret.as_bytes()), validation }
    }
}

#[async_trait]
impl IdentityGateway for JwtIdentityGateway {
    async fn resolve(&self, credential: &str) -> Result<RepIdentity, IdentityError> {
        if credential.is_empty() {
            return Err(IdentityError::MissingCredential);
        }

        let data = decode::<Claims>(credential, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                JwtErrorKind::ExpiredSignature => IdentityError::Expired,
                _ => IdentityError::InvalidCredential(e.to_string()),
            }
        })?;

        if data.claims.sub.trim().is_empty() {
            return Err(IdentityError::InvalidCredential("empty subject".to_string()));
        }
        Ok(RepIdentity::new(data.claims.sub))
    }
}

/// Fixed token table for local development and tests.
pub struct StaticTokenGateway {
    tokens: HashMap<String, RepIdentity>,
}

impl StaticTokenGateway {
    pub fn new<I, K, V>(tokens: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let tokens = tokens
            .into_iter()
            .map(|(token, identity)| (token.into(), RepIdentity::new(identity)))
            .collect();
        Self { tokens }
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[async_trait]
impl IdentityGateway for StaticTokenGateway {
    async fn resolve(&self, credential: &str) -> Result<RepIdentity, IdentityError> {
        if credential.is_empty() {
            return Err(IdentityError::MissingCredential);
        }

        // Compare against every entry so timing does not reveal a prefix match.
        let mut found = None;
        for (token, identity) in &self.tokens {
            if constant_time_compare(credential, token) {
                found = Some(identity.clone());
            }
        }
        found.ok_or_else(|| IdentityError::InvalidCredential("unknown token".to_string()))
    }
}

/// Build the gateway selected by `auth.mode`.
pub fn gateway_from_config(config: &AuthConfig) -> Arc<dyn IdentityGateway> {
    match config.mode {
        AuthMode::Jwt => Arc::new(JwtIdentityGateway::new(
            &config.jwt_secret,
            config.jwt_issuer.as_deref(),
            config.jwt_audience.as_deref(),
        )),
        AuthMode::Static => Arc::new(StaticTokenGateway::new(
            config.static_tokens.iter().map(|(k, v)| (k.clone(), v.clone())),
        )),
    }
}
