//! Server-side token verification

use async_trait::async_trait;
use shloksagar_http::{ClientError, TypedClientBuilder};
use thiserror::Error;

/// Why the backend did not vouch for a token.
///
/// Both variants are handled the same way by the guard: the session is
/// treated as invalid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("Token rejected with status {0}")]
    Rejected(u16),

    #[error("Verification request failed: {0}")]
    Transport(String),
}

impl From<ClientError> for VerifyError {
    fn from(error: ClientError) -> Self {
        error
            .status()
            .map_or_else(|| Self::Transport(error.to_string()), Self::Rejected)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TokenVerifier {
    async fn verify(&self, token: &str) -> Result<(), VerifyError>;
}

/// Verifies tokens against `GET {api}/admin/auth/verify`
#[derive(Debug, Clone)]
pub struct ApiVerifier {
    api_url: String,
}

impl ApiVerifier {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TokenVerifier for ApiVerifier {
    async fn verify(&self, token: &str) -> Result<(), VerifyError> {
        let client = TypedClientBuilder::new()
            .base_url(self.api_url.as_str())
            .build_authenticated(token)?;
        client.verify().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_api_verifier_accepts_2xx() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/auth/verify"))
            .and(header("authorization", "Bearer good"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let verifier = ApiVerifier::new(mock_server.uri());
        assert_eq!(verifier.verify("good").await, Ok(()));
    }

    #[tokio::test]
    async fn test_api_verifier_maps_401() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/auth/verify"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let verifier = ApiVerifier::new(mock_server.uri());
        assert_eq!(
            verifier.verify("revoked").await,
            Err(VerifyError::Rejected(401))
        );
    }

    #[tokio::test]
    async fn test_api_verifier_transport_failure() {
        let verifier = ApiVerifier::new("http://127.0.0.1:9");
        assert!(matches!(
            verifier.verify("tok").await,
            Err(VerifyError::Transport(_))
        ));
    }
}
