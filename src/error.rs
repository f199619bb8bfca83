//! Error types for the PATS SDK.
//!
//! Every failure surfaces as a [`PatsError`]. Transport-level HTTP statuses
//! are mapped onto variants by [`relay_error`]; the message wording for each
//! status is part of the upstream contract and is preserved verbatim from
//! the vendor documentation.

#[derive(Debug, thiserror::Error)]
pub enum PatsError {
    /// Connection-level failure before any HTTP status was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A header name or value could not be encoded.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// 400 -- the request body or parameters did not validate upstream.
    #[error("Bad Request. The parameters you provided did not validate: {reason}")]
    BadRequest { reason: String },

    /// 401 -- bad or missing API key. The key value is included for
    /// diagnosis, matching the upstream message contract.
    #[error("{reason} Probably invalid API key {api_key}")]
    Unauthorized { reason: String, api_key: String },

    /// 404 -- the entity named in the request does not exist.
    #[error("Not found: {reason}")]
    NotFound { reason: String },

    /// 406 -- the vendor rate-limits by IP address.
    #[error("Not acceptable, your IP address has exceeded the API limit")]
    RateLimited,

    /// 409 -- the counterparty has not yet approved the retrieve request.
    #[error("Not approved, the user has yet to approve your retrieve request")]
    PendingApproval,

    /// 500 -- upstream failure on the PATS/Mediaocean side.
    #[error("Internal server error")]
    ServerError,

    /// Any status with no dedicated mapping.
    #[error("Error: {reason}")]
    Unmapped { status: u16, reason: String },

    /// A 201 Created response that violated the protocol by omitting the
    /// Location header carrying the new resource URI.
    #[error("201 Created response did not include a Location header")]
    MissingLocation,

    /// Field-level validation failure, either relayed from a 422 payload or
    /// detected inside a nominally successful 200 response. The message is
    /// the joined field summary and nothing else.
    #[error("{reason}")]
    Validation { reason: String },

    /// Construction-time validation failure on a value object. Raised
    /// before any network activity, so it never consumes a request attempt.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A successful response whose shape did not match what the endpoint
    /// is documented to return.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

pub type Result<T> = std::result::Result<T, PatsError>;

/// Map an HTTP status code (or an application-level code relayed inside a
/// 422 payload) plus a free-text reason onto the matching [`PatsError`]
/// variant.
///
/// This function always produces an error value -- callers wrap it in
/// `Err` and return. Absence of an error is the only success signal at
/// this layer.
pub fn relay_error(status: u16, reason: &str, api_key: &str) -> PatsError {
    match status {
        400 => PatsError::BadRequest {
            reason: reason.to_string(),
        },
        401 => PatsError::Unauthorized {
            reason: reason.to_string(),
            api_key: api_key.to_string(),
        },
        404 => PatsError::NotFound {
            reason: reason.to_string(),
        },
        406 => PatsError::RateLimited,
        409 => PatsError::PendingApproval,
        422 => PatsError::Validation {
            reason: reason.to_string(),
        },
        500 => PatsError::ServerError,
        _ => PatsError::Unmapped {
            status,
            reason: reason.to_string(),
        },
    }
}
