//! Request clients for the Okta API (standard and governance variants).

pub mod paginate;

pub use paginate::{collect_records, paginate};

use std::collections::BTreeSet;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::auth::{resolve_private_key, TokenProvider};
use crate::config::{AuthConfig, OktaConfig};
use crate::error::{ApiError, OktaError, Result};

/// Rate-limited requests are replayed at most this many times before the
/// final 429 is surfaced to the caller.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;
/// Wait applied when a 429 carries no usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

const GOVERNANCE_HEADER_NAME: &str = "x-okta-user-agent-extended";
const GOVERNANCE_HEADER_VALUE: &str = "okta-governance-client";

/// A successful API response: status, response headers, and the parsed body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub data: Value,
}

enum AuthMode {
    OAuth(TokenProvider),
    /// Pre-built `Authorization` value, attached verbatim to every request.
    Static(HeaderValue),
}

/// HTTP client for one Okta org, authenticated with either OAuth2
/// client-credentials or a static SSWS token.
///
/// Rate-limit handling note: a 429 replays the identical request, including
/// any body. A non-idempotent write that the server partially processed
/// before rate-limiting it could in principle be applied twice; this matches
/// the API's documented retry convention and is a known risk.
///
/// # Example
/// ```no_run
/// use okta_core::client::OktaClient;
/// use okta_core::config::OktaConfig;
///
/// # async fn example() -> okta_core::error::Result<()> {
/// let config = OktaConfig::from_env()?;
/// let client = OktaClient::new(config, &["okta.users.read"])?;
/// let users = client.get("/users", &[("limit", "200")]).await?;
/// println!("{}", users.data);
/// # Ok(())
/// # }
/// ```
pub struct OktaClient {
    http: reqwest::Client,
    base_url: String,
    auth: AuthMode,
    governance: bool,
}

impl OktaClient {
    /// Build a client for the standard API surface (`{org}/api/v1`).
    ///
    /// `required_scopes` are the OAuth scopes this client's callers need;
    /// they are merged with `config.extra_scopes` and deduplicated. The
    /// token endpoint rejects scope-less requests, so an empty result is a
    /// construction-time failure rather than a runtime one.
    pub fn new(config: OktaConfig, required_scopes: &[&str]) -> Result<Self> {
        Self::build(config, required_scopes, false)
    }

    /// Build a client rooted at the governance sub-path
    /// (`{org}/api/v1/governance`) with the fixed governance header attached
    /// to every request. Otherwise identical to [`new`](Self::new).
    pub fn governance(config: OktaConfig, required_scopes: &[&str]) -> Result<Self> {
        Self::build(config, required_scopes, true)
    }

    fn build(config: OktaConfig, required_scopes: &[&str], governance: bool) -> Result<Self> {
        let org_url = config.org_url.trim_end_matches('/').to_string();
        if org_url.is_empty() {
            return Err(OktaError::Configuration(
                "org base URL is required".to_string(),
            ));
        }

        let auth = match config.auth {
            AuthConfig::OAuth {
                client_id,
                private_key,
            } => {
                if client_id.trim().is_empty() || private_key.trim().is_empty() {
                    return Err(OktaError::AuthenticationRequired);
                }
                let scopes = merge_scopes(required_scopes, &config.extra_scopes);
                if scopes.is_empty() {
                    return Err(OktaError::EmptyScopeSet);
                }
                let key = resolve_private_key(&private_key)?;
                AuthMode::OAuth(TokenProvider::new(&org_url, client_id, key, scopes))
            }
            AuthConfig::ApiToken(token) => {
                if token.trim().is_empty() {
                    return Err(OktaError::AuthenticationRequired);
                }
                let value = HeaderValue::from_str(&format!("SSWS {token}")).map_err(|_| {
                    OktaError::Configuration(
                        "API token contains characters that cannot appear in a header".to_string(),
                    )
                })?;
                AuthMode::Static(value)
            }
        };

        let suffix = if governance {
            "/api/v1/governance"
        } else {
            "/api/v1"
        };
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: format!("{org_url}{suffix}"),
            auth,
            governance,
        })
    }

    pub async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<ApiResponse> {
        self.request(Method::GET, path, None, params).await
    }

    pub async fn post(
        &self,
        path: &str,
        body: Option<&Value>,
        params: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        self.request(Method::POST, path, body, params).await
    }

    pub async fn put(
        &self,
        path: &str,
        body: Option<&Value>,
        params: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        self.request(Method::PUT, path, body, params).await
    }

    pub async fn patch(
        &self,
        path: &str,
        body: Option<&Value>,
        params: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        self.request(Method::PATCH, path, body, params).await
    }

    pub async fn delete(&self, path: &str, params: &[(&str, &str)]) -> Result<ApiResponse> {
        self.request(Method::DELETE, path, None, params).await
    }

    /// Dispatch one logical request, replaying on 429 up to the retry
    /// ceiling. The retry counter is scoped to this call only.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        params: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        let url = self.resolve_url(path);
        let mut attempt: u32 = 0;
        loop {
            let mut req = self
                .http
                .request(method.clone(), &url)
                .header(header::ACCEPT, "application/json")
                .header(header::CONTENT_TYPE, "application/json");
            if !params.is_empty() {
                req = req.query(params);
            }
            req = match &self.auth {
                AuthMode::OAuth(provider) => {
                    let token = provider.access_token().await?;
                    req.header(header::AUTHORIZATION, format!("Bearer {token}"))
                }
                AuthMode::Static(value) => req.header(header::AUTHORIZATION, value.clone()),
            };
            if self.governance {
                req = req.header(GOVERNANCE_HEADER_NAME, GOVERNANCE_HEADER_VALUE);
            }
            if let Some(body) = body {
                req = req.json(body);
            }

            debug!(%method, %url, attempt, "dispatching request");
            let resp = req.send().await?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && attempt < MAX_RATE_LIMIT_RETRIES {
                attempt += 1;
                let wait_secs = retry_after_secs(resp.headers());
                warn!(
                    attempt,
                    max_retries = MAX_RATE_LIMIT_RETRIES,
                    wait_secs,
                    "rate limited; waiting before retry"
                );
                sleep(Duration::from_secs(wait_secs)).await;
                continue;
            }

            return finish(resp).await;
        }
    }

    fn resolve_url(&self, path: &str) -> String {
        // Pagination cursors arrive as absolute URLs; everything else is
        // relative to the client's base path.
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// Consume a response: parse success bodies, translate structured API
/// errors, and fall back to a plain HTTP error for anything unrecognized.
async fn finish(resp: reqwest::Response) -> Result<ApiResponse> {
    let status = resp.status();
    let headers = resp.headers().clone();

    if status.is_success() {
        let bytes = resp.bytes().await?;
        let data = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        return Ok(ApiResponse {
            status: status.as_u16(),
            headers,
            data,
        });
    }

    let body = resp.text().await.unwrap_or_default();
    if let Ok(value) = serde_json::from_str::<Value>(&body) {
        if let Some(api_error) = ApiError::from_body(&value) {
            return Err(OktaError::Api(api_error));
        }
    }
    Err(OktaError::Http {
        status: status.as_u16(),
        body,
    })
}

fn merge_scopes(required: &[&str], extra: &[String]) -> Vec<String> {
    let set: BTreeSet<String> = required
        .iter()
        .map(|scope| scope.to_string())
        .chain(extra.iter().cloned())
        .filter(|scope| !scope.trim().is_empty())
        .collect();
    set.into_iter().collect()
}

fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PEM: &str = include_str!("../../tests/support/test_rsa.pem");

    fn oauth_config() -> OktaConfig {
        OktaConfig::new(
            "https://acme.okta.com",
            AuthConfig::OAuth {
                client_id: "0oa1abcd".to_string(),
                private_key: TEST_PEM.to_string(),
            },
        )
    }

    #[test]
    fn merge_scopes_dedups_and_sorts() {
        let merged = merge_scopes(
            &["okta.users.read", "okta.groups.read", "okta.users.read"],
            &["okta.groups.read".to_string(), "okta.apps.read".to_string()],
        );
        assert_eq!(
            merged,
            vec!["okta.apps.read", "okta.groups.read", "okta.users.read"]
        );
    }

    #[test]
    fn merge_scopes_drops_blank_entries() {
        let merged = merge_scopes(&["", "okta.users.read"], &["  ".to_string()]);
        assert_eq!(merged, vec!["okta.users.read"]);
    }

    #[test]
    fn empty_scope_set_fails_construction() {
        let result = OktaClient::new(oauth_config(), &[]);
        assert!(matches!(result, Err(OktaError::EmptyScopeSet)));
    }

    #[test]
    fn extra_scopes_alone_satisfy_the_scope_requirement() {
        let config = oauth_config().with_extra_scopes(["okta.logs.read"]);
        assert!(OktaClient::new(config, &[]).is_ok());
    }

    #[test]
    fn empty_org_url_fails_construction() {
        let config = OktaConfig::new("", AuthConfig::ApiToken("t".to_string()));
        assert!(matches!(
            OktaClient::new(config, &[]),
            Err(OktaError::Configuration(_))
        ));
    }

    #[test]
    fn blank_oauth_fields_require_authentication() {
        let config = OktaConfig::new(
            "https://acme.okta.com",
            AuthConfig::OAuth {
                client_id: String::new(),
                private_key: TEST_PEM.to_string(),
            },
        );
        assert!(matches!(
            OktaClient::new(config, &["okta.users.read"]),
            Err(OktaError::AuthenticationRequired)
        ));
    }

    #[test]
    fn blank_api_token_requires_authentication() {
        let config = OktaConfig::new("https://acme.okta.com", AuthConfig::ApiToken("  ".into()));
        assert!(matches!(
            OktaClient::new(config, &[]),
            Err(OktaError::AuthenticationRequired)
        ));
    }

    #[test]
    fn governance_client_uses_governance_base_path() {
        let config = OktaConfig::new("https://acme.okta.com", AuthConfig::ApiToken("t".into()));
        let client = OktaClient::governance(config, &[]).unwrap();
        assert_eq!(
            client.resolve_url("/requests"),
            "https://acme.okta.com/api/v1/governance/requests"
        );
    }

    #[test]
    fn resolve_url_keeps_absolute_urls_verbatim() {
        let config = OktaConfig::new("https://acme.okta.com", AuthConfig::ApiToken("t".into()));
        let client = OktaClient::new(config, &[]).unwrap();
        let cursor = "https://acme.okta.com/api/v1/users?after=abc";
        assert_eq!(client.resolve_url(cursor), cursor);
    }

    #[test]
    fn resolve_url_inserts_missing_leading_slash() {
        let config = OktaConfig::new("https://acme.okta.com", AuthConfig::ApiToken("t".into()));
        let client = OktaClient::new(config, &[]).unwrap();
        assert_eq!(
            client.resolve_url("users"),
            "https://acme.okta.com/api/v1/users"
        );
    }

    #[test]
    fn retry_after_header_is_read_as_whole_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert(header::RETRY_AFTER, HeaderValue::from_static("7"));
        assert_eq!(retry_after_secs(&headers), 7);
    }

    #[test]
    fn retry_after_defaults_to_one_second() {
        assert_eq!(retry_after_secs(&HeaderMap::new()), 1);

        let mut headers = HeaderMap::new();
        headers.insert(header::RETRY_AFTER, HeaderValue::from_static("soon"));
        assert_eq!(retry_after_secs(&headers), 1);
    }
}
