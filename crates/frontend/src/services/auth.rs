//! Login against the admin API

use shloksagar_core::SessionConfig;
use shloksagar_http::{ClientError, LoginResponse, TypedClientBuilder};

#[derive(Clone)]
pub struct AuthApiService {
    api_url: String,
}

impl AuthApiService {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
        }
    }

    pub async fn login(&self, email: String, password: String) -> Result<LoginResponse, ClientError> {
        let client = TypedClientBuilder::new()
            .base_url(self.api_url.as_str())
            .build_public()?;
        client.login(email, password).await
    }
}
