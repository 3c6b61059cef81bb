//! API Error Types
//!
//! Errors returned by the chat backend client, plus the mapping from a
//! server rejection to the single string shown to the user.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when talking to the chat backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection failure, timeout, or any other transport problem
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("API error {status}: {body}")]
    Rejected { status: u16, body: ErrorBody },

    /// The server answered with a body of an unexpected shape
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Server error body, if the server answered at all
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            ApiError::Rejected { body, .. } => Some(body),
            _ => None,
        }
    }

    /// HTTP status of a rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// One user-facing line for a failed form submission
    ///
    /// With `field` set, an itemized error list for that field wins;
    /// otherwise the server's `detail` string; otherwise `fallback`.
    pub fn user_message(&self, field: Option<&str>, fallback: &str) -> String {
        let Some(body) = self.body() else {
            return fallback.to_string();
        };

        if let Some(field) = field {
            if body.has_field(field) {
                return body
                    .field_error(field)
                    .map(str::to_string)
                    .unwrap_or_else(|| fallback.to_string());
            }
        }

        body.detail()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Parsed error body of a rejected request
///
/// Servers answer either `{"detail": "..."}` or
/// `{"<field>": ["first error", ...]}`; anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBody(Value);

impl ErrorBody {
    /// Parse a raw response body; non-JSON text is kept as a string value
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(value) => Self(value),
            Err(_) => Self(Value::String(text.to_string())),
        }
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Whether the body carries an itemized error list for `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.0.get(field).map(Value::is_array).unwrap_or(false)
    }

    /// First itemized error for `field`, if it is a non-empty string
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)?
            .as_array()?
            .first()?
            .as_str()
            .filter(|s| !s.is_empty())
    }

    /// Generic `detail` message, if it is a non-empty string
    pub fn detail(&self) -> Option<&str> {
        self.0
            .get("detail")?
            .as_str()
            .filter(|s| !s.is_empty())
    }
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Value::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other),
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rejected(body: Value) -> ApiError {
        ApiError::Rejected {
            status: 400,
            body: ErrorBody::from_value(body),
        }
    }

    #[test]
    fn test_field_error_wins_over_detail() {
        let err = rejected(json!({
            "username": ["Username is already taken."],
            "detail": "Bad request"
        }));
        assert_eq!(
            err.user_message(Some("username"), "fallback"),
            "Username is already taken."
        );
    }

    #[test]
    fn test_detail_used_without_field_errors() {
        let err = rejected(json!({"detail": "Invalid credentials."}));
        assert_eq!(
            err.user_message(Some("username"), "fallback"),
            "Invalid credentials."
        );
        assert_eq!(err.user_message(None, "fallback"), "Invalid credentials.");
    }

    #[test]
    fn test_fallback_when_nothing_usable() {
        let err = rejected(json!({"password": ["Too short."]}));
        assert_eq!(err.user_message(Some("username"), "fallback"), "fallback");

        let err = rejected(json!({"username": [""], "detail": "ignored"}));
        assert_eq!(err.user_message(Some("username"), "fallback"), "fallback");

        let err = rejected(json!({"detail": ""}));
        assert_eq!(err.user_message(None, "fallback"), "fallback");
    }

    #[test]
    fn test_decode_error_uses_fallback() {
        let err = ApiError::Decode("missing field `token`".to_string());
        assert_eq!(err.user_message(None, "fallback"), "fallback");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_parse_non_json_body() {
        let body = ErrorBody::parse("<html>502 Bad Gateway</html>");
        assert_eq!(body.detail(), None);
        assert_eq!(body.to_string(), "<html>502 Bad Gateway</html>");
    }
}
