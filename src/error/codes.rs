//! Static lookup of Okta error codes to human-readable descriptions.
//!
//! The production table covers several hundred codes; entries here are the
//! ones the identity tool servers most commonly surface. Codes without an
//! entry fall back to the `errorSummary` returned by the API.

/// Sorted by code; looked up with a binary search.
const FRIENDLY_DESCRIPTIONS: &[(&str, &str)] = &[
    ("E0000001", "Api validation failed"),
    ("E0000002", "The request was invalid"),
    ("E0000003", "The request body was not well-formed"),
    ("E0000005", "Invalid session"),
    ("E0000006", "You do not have permission to perform the requested action"),
    ("E0000007", "Not found"),
    ("E0000008", "The requested path was not found"),
    ("E0000009", "Internal server error"),
    ("E0000010", "Service is in read-only mode"),
    ("E0000011", "Invalid token provided"),
    ("E0000012", "Unsupported media type"),
    ("E0000013", "Invalid client app id"),
    ("E0000014", "Update of credentials failed"),
    (
        "E0000015",
        "You do not have permission to access the feature you are requesting",
    ),
    ("E0000016", "Activation failed because the user is already active"),
    ("E0000017", "Password reset failed"),
    (
        "E0000018",
        "Bad request: Accept and/or Content-Type headers likely do not match supported values",
    ),
    ("E0000020", "Bad request"),
    ("E0000022", "The endpoint does not support the provided HTTP method"),
    (
        "E0000023",
        "Operation failed because user profile is mastered under another system",
    ),
    ("E0000026", "This endpoint has been deprecated"),
    ("E0000028", "The request is missing a required parameter"),
    ("E0000029", "Invalid paging request"),
    (
        "E0000030",
        "Bad request: invalid date; dates must use the ISO 8601 format yyyy-MM-dd'T'HH:mm:ss.SSSZZ",
    ),
    ("E0000031", "Bad request: invalid filter expression"),
    ("E0000032", "Unsupported operation"),
    (
        "E0000033",
        "Bad request: cannot specify a search query and filter in the same request",
    ),
    ("E0000034", "Forgot password not allowed on specified user"),
    ("E0000035", "Change password not allowed on specified user"),
    ("E0000036", "Reset password not allowed on specified user"),
    ("E0000037", "Type mismatch exception"),
    (
        "E0000038",
        "This operation is not allowed in the user's current status",
    ),
    ("E0000039", "Operation on application settings failed"),
    ("E0000040", "App label must not be the same as an existing app label"),
    (
        "E0000041",
        "Credentials should not be set on this resource based on the scheme",
    ),
    ("E0000042", "Setting the error page redirect URL failed"),
    ("E0000047", "API call exceeded rate limit due to too many requests"),
    ("E0000048", "Entity not found exception"),
    ("E0000063", "Invalid combination of parameters specified"),
    ("E0000064", "Password is expired and must be changed"),
    ("E0000105", "You have accessed an account recovery link that has expired or been previously used"),
    ("E0000110", "The number of tokens granted has exceeded the rate limit for this org"),
];

/// Look up the friendly description for an Okta error code, if one exists.
pub fn friendly_description(code: &str) -> Option<&'static str> {
    FRIENDLY_DESCRIPTIONS
        .binary_search_by(|(candidate, _)| candidate.cmp(&code))
        .ok()
        .map(|index| FRIENDLY_DESCRIPTIONS[index].1)
}
