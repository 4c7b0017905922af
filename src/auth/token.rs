//! OAuth2 client-credentials token exchange with private-key JWT assertions.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{OktaError, Result};

const CLIENT_ASSERTION_TYPE: &str = "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";
/// Lifetime of each signed client assertion.
const ASSERTION_TTL_SECS: i64 = 300;
/// Cached tokens are refreshed this long before their actual expiry, to
/// absorb clock skew and in-flight request latency.
const REFRESH_BUFFER_SECS: i64 = 60;

/// Exchanges a signed JWT assertion for bearer access tokens and caches the
/// result until it comes within the refresh buffer of expiry.
///
/// Each [`OktaClient`](crate::client::OktaClient) owns its own provider, so
/// clients with different scope sets never share a cached token. Two calls
/// racing on a stale token may each trigger a refresh; both produce valid
/// tokens, so the race is tolerated rather than locked out.
pub struct TokenProvider {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    key: EncodingKey,
    scopes: Vec<String>,
    cached: Mutex<Option<CachedToken>>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct AssertionClaims {
    iss: String,
    sub: String,
    aud: String,
    iat: i64,
    exp: i64,
    jti: String,
}

#[derive(Deserialize)]
struct TokenGrant {
    access_token: String,
    expires_in: i64,
}

impl TokenProvider {
    /// `scopes` must already be deduplicated and non-empty; the client
    /// constructor enforces that before building a provider.
    pub fn new(org_url: &str, client_id: String, key: EncodingKey, scopes: Vec<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: format!("{org_url}/oauth2/v1/token"),
            client_id,
            key,
            scopes,
            cached: Mutex::new(None),
        }
    }

    /// Return a bearer token, refreshing first if none is cached or the
    /// cached one is within the refresh buffer of expiry.
    pub async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.read_cached() {
            return Ok(token);
        }
        self.refresh().await
    }

    fn read_cached(&self) -> Option<String> {
        let guard = self.cached.lock().ok()?;
        let cached = guard.as_ref()?;
        if cached.expires_at - Utc::now() < Duration::seconds(REFRESH_BUFFER_SECS) {
            return None;
        }
        Some(cached.access_token.clone())
    }

    fn write_cached(&self, token: CachedToken) {
        if let Ok(mut guard) = self.cached.lock() {
            *guard = Some(token);
        }
    }

    async fn refresh(&self) -> Result<String> {
        let assertion = self.sign_assertion()?;
        let scope = self.scopes.join(" ");

        let resp = self
            .http
            .post(&self.token_url)
            .header("Accept", "application/json")
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_assertion_type", CLIENT_ASSERTION_TYPE),
                ("client_assertion", assertion.as_str()),
                ("scope", scope.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OktaError::TokenRequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let now = Utc::now();
        let bytes = resp.bytes().await?;
        let grant: TokenGrant = serde_json::from_slice(&bytes)?;
        debug!(
            scopes = %scope,
            expires_in = grant.expires_in,
            "access token granted"
        );

        self.write_cached(CachedToken {
            access_token: grant.access_token.clone(),
            expires_at: now + Duration::seconds(grant.expires_in),
        });
        Ok(grant.access_token)
    }

    /// Build and sign the RFC 7523 client assertion: issuer and subject are
    /// the client id, audience is the token endpoint, and each assertion
    /// carries a fresh `jti` so it cannot be replayed.
    fn sign_assertion(&self) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: self.client_id.clone(),
            sub: self.client_id.clone(),
            aud: self.token_url.clone(),
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
            jti: Uuid::new_v4().to_string(),
        };
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.key,
        )?)
    }
}
