use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the WongPrime API client
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure (connection refused, DNS, TLS, ...)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status code
    #[error("Server returned {status}: {detail}")]
    Status { status: u16, detail: String },

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Base URL or endpoint path could not be joined
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request rejected before being sent
    #[error("Invalid input: {0}")]
    Validation(String),
}

impl ApiError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        ApiError::Validation(msg.into())
    }

    /// Whether the server reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    /// Build a status error from a raw response body.
    ///
    /// FastAPI wraps errors as `{"detail": ...}`; the detail may be a plain
    /// string or a list of validation objects.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| value.get("detail").cloned())
            .map(|detail| match detail {
                serde_json::Value::String(s) => s,
                serde_json::Value::Array(items) => items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect::<Vec<_>>()
                    .join("; "),
                other => other.to_string(),
            })
            .filter(|detail| !detail.is_empty())
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    "no details".to_string()
                } else {
                    trimmed.to_string()
                }
            });

        ApiError::Status { status, detail }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_uses_fastapi_detail() {
        let err = ApiError::from_status(404, r#"{"detail":"Producto no encontrado"}"#);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Server returned 404: Producto no encontrado");
    }

    #[test]
    fn test_status_error_joins_validation_messages() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address"},{"loc":["body","precio_objetivo"],"msg":"ensure this value is greater than 0"}]}"#;
        let err = ApiError::from_status(422, body);
        match err {
            ApiError::Status { status, detail } => {
                assert_eq!(status, 422);
                assert_eq!(
                    detail,
                    "value is not a valid email address; ensure this value is greater than 0"
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_error_falls_back_to_body() {
        let err = ApiError::from_status(500, "Internal Server Error\n");
        assert_eq!(err.to_string(), "Server returned 500: Internal Server Error");

        let err = ApiError::from_status(502, "");
        assert_eq!(err.to_string(), "Server returned 502: no details");
    }
}
