use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;

pub(crate) const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;
pub(crate) const CONFIG_ERROR_REDIRECT_WITH_AUTH: &str =
    "bearer token auth requires redirects to be disabled";

/// Error payload returned by Azure Resource Manager and Microsoft Graph.
///
/// Both services wrap the detail in an `error` envelope:
/// `{"error":{"code":"AuthorizationFailed","message":"..."}}`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiError {
    /// HTTP status of the failed response.
    #[serde(skip)]
    pub status: u16,
    pub code: String,
    pub message: String,
    pub target: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND.as_u16()
    }

    pub fn is_forbidden(&self) -> bool {
        self.status == StatusCode::FORBIDDEN.as_u16()
            || self.code.eq_ignore_ascii_case("AuthorizationFailed")
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code.is_empty(), self.message.is_empty()) {
            (true, true) => write!(f, "status={}", self.status),
            (false, true) => write!(f, "status={}, code={}", self.status, self.code),
            (true, false) => write!(f, "status={}, message={}", self.status, self.message),
            (false, false) => write!(
                f,
                "status={}, code={}, message={}",
                self.status, self.code, self.message
            ),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("cannot resolve signed-in principal: {0}")]
    MissingPrincipal(String),
    #[error("role definition not found: {0}")]
    RoleNotFound(String),
    #[error("azure api error: {0}")]
    Api(ApiError),
}

pub(crate) fn read_body_with_limit<R: Read>(reader: &mut R, limit: usize) -> Result<Vec<u8>, Error> {
    let mut body = Vec::new();
    reader.take(limit as u64).read_to_end(&mut body)?;
    Ok(body)
}

pub(crate) fn fallback_message(status: StatusCode, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string()
    } else {
        text.to_string()
    }
}

pub(crate) fn parse_error_from_body(status: StatusCode, body: &[u8]) -> Error {
    let mut err = serde_json::from_slice::<ApiErrorEnvelope>(body)
        .map(|envelope| envelope.error)
        .unwrap_or_default();
    err.status = status.as_u16();
    if err.message.is_empty() {
        err.message = fallback_message(status, body);
    }
    Error::Api(err)
}
