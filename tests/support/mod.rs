#![allow(dead_code)]

//! Shared fixtures for integration tests.

use okta_core::config::{AuthConfig, OktaConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_PEM: &str = include_str!("test_rsa.pem");
pub const TEST_JWK: &str = include_str!("test_rsa_jwk.json");
pub const TEST_CLIENT_ID: &str = "0oa1abcd2efgHIJKL345";
pub const TEST_API_TOKEN: &str = "00aBcDeFgHiJkLmNoPqR";

pub fn oauth_config(server: &MockServer) -> OktaConfig {
    OktaConfig::new(
        server.uri(),
        AuthConfig::OAuth {
            client_id: TEST_CLIENT_ID.to_string(),
            private_key: TEST_PEM.to_string(),
        },
    )
}

pub fn api_token_config(server: &MockServer) -> OktaConfig {
    OktaConfig::new(server.uri(), AuthConfig::ApiToken(TEST_API_TOKEN.to_string()))
}

/// Mount the token endpoint with a fixed grant and an expected call count.
pub async fn mount_token_endpoint(
    server: &MockServer,
    access_token: &str,
    expires_in: i64,
    expected_calls: u64,
) {
    Mock::given(method("POST"))
        .and(path("/oauth2/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "access_token": access_token,
            "expires_in": expires_in,
            "scope": "okta.users.read"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}
