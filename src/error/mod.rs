//! Error types for the Okta core.

pub mod codes;

pub use codes::friendly_description;

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Primary error type for all core operations.
#[derive(Error, Debug)]
pub enum OktaError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication is not configured: set OKTA_CLIENT_ID and OKTA_PRIVATE_KEY for OAuth, or OKTA_API_TOKEN")]
    AuthenticationRequired,

    #[error("OAuth scope set is empty: declare required scopes or set OKTA_ADDITIONAL_SCOPES")]
    EmptyScopeSet,

    #[error("Invalid credential format: {0}")]
    InvalidCredentialFormat(String),

    #[error("Key error: {0}")]
    Key(#[from] jsonwebtoken::errors::Error),

    #[error("Token request failed (status {status}): {body}")]
    TokenRequestFailed { status: u16, body: String },

    /// A 4xx/5xx response whose body matched the Okta error shape.
    #[error("{0}")]
    Api(ApiError),

    /// A non-2xx response with no recognizable error body.
    #[error("HTTP error (status {status}): {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, OktaError>;

/// Structured error parsed from an Okta API response body.
///
/// Display format is `{code}: {friendly description}` when the code has an
/// entry in the static lookup table, falling back to the raw `errorSummary`
/// from the response otherwise.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub code: String,
    pub summary: String,
    pub link: String,
    pub id: String,
    pub causes: Vec<ErrorCause>,
    pub friendly: Option<&'static str>,
}

/// A sub-cause reported under `errorCauses[]`.
#[derive(Debug, Clone)]
pub struct ErrorCause {
    pub summary: String,
}

impl ApiError {
    /// Try to interpret a response body as an Okta structured error.
    ///
    /// Returns `None` unless the body carries at minimum a string-coercible
    /// `errorCode` and `errorSummary`; all other fields default to empty.
    /// Never fails; a non-matching body pushes the caller to treat the
    /// response as a plain transport-level error.
    pub fn from_body(body: &Value) -> Option<Self> {
        let code = coerce_string(body.get("errorCode")?)?;
        let summary = coerce_string(body.get("errorSummary")?)?;
        let link = body
            .get("errorLink")
            .and_then(coerce_string)
            .unwrap_or_default();
        let id = body
            .get("errorId")
            .and_then(coerce_string)
            .unwrap_or_default();
        let causes = body
            .get("errorCauses")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("errorSummary"))
                    .filter_map(coerce_string)
                    .map(|summary| ErrorCause { summary })
                    .collect()
            })
            .unwrap_or_default();
        let friendly = friendly_description(&code);
        Some(Self {
            code,
            summary,
            link,
            id,
            causes,
            friendly,
        })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.code,
            self.friendly.unwrap_or(self.summary.as_str())
        )
    }
}

impl std::error::Error for ApiError {}

/// Coerce a JSON scalar to a string the way a dynamic caller would.
fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
