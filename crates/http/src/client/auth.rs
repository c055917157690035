//! Login and token verification

use super::{AuthenticatedAdminClient, ClientError, PublicAdminClient};
use crate::types::{LoginRequest, LoginResponse};
use reqwest::Method;

/// Login endpoint, relative to the API base
pub const LOGIN_PATH: &str = "/admin/auth/login";

/// Token verification endpoint, relative to the API base
pub const VERIFY_PATH: &str = "/admin/auth/verify";

impl PublicAdminClient {
    /// Exchange admin credentials for a bearer token
    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            email: email.into(),
            password: password.into(),
        };
        let request = self.request(Method::POST, LOGIN_PATH).json(&body);

        let response: LoginResponse = self.execute(request).await?;
        tracing::info!(email = %response.admin.email, "Admin login succeeded");
        Ok(response)
    }
}

impl AuthenticatedAdminClient {
    /// Ask the backend whether the bearer token is still accepted.
    ///
    /// Any 2xx response counts as valid; the body is ignored.
    pub async fn verify(&self) -> Result<(), ClientError> {
        let request = self
            .request(Method::GET, VERIFY_PATH)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        self.execute_empty(request).await
    }
}
