//! Wire types shared by the admin API clients

use serde::{Deserialize, Serialize};

/// Display-only identity of the signed-in admin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AdminIdentity {
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent admin requests
    pub token: String,
    /// Identity of the admin that signed in
    pub admin: AdminIdentity,
}

/// Error body returned by the backend.
///
/// Different endpoints use either `message` or `error` for the human-readable
/// text, so both are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// The first non-empty message the backend supplied
    pub fn into_message(self) -> Option<String> {
        self.message
            .filter(|m| !m.is_empty())
            .or_else(|| self.error.filter(|e| !e.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_prefers_message() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"message":"Token revoked","error":"unauthorized"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Token revoked"));
    }

    #[test]
    fn test_error_body_falls_back_to_error() {
        let body: ErrorBody = serde_json::from_str(r#"{"message":"","error":"Bad creds"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Bad creds"));

        let empty: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.into_message(), None);
    }

    #[test]
    fn test_login_response_without_name() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"token":"abc","admin":{"email":"a@shloksagar.in"}}"#).unwrap();
        assert_eq!(response.token, "abc");
        assert_eq!(response.admin.email, "a@shloksagar.in");
        assert!(response.admin.name.is_empty());
    }
}
