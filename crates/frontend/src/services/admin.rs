//! Authenticated admin requests used by the content panels
//!
//! A 401 from any call here signs the admin out through
//! [`notify_unauthorized`].

use crate::auth::SessionHandle;
use crate::auth::unauthorized::notify_unauthorized;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shloksagar_http::{AuthenticatedAdminClient, ClientError, TypedClientBuilder};

#[derive(Clone)]
pub struct AdminApi {
    client: AuthenticatedAdminClient,
}

impl AdminApi {
    /// Client for the current session; fails when no token is stored
    pub fn from_session(session: &SessionHandle) -> Result<Self, ClientError> {
        let token = session
            .guard
            .sessions()
            .token()
            .ok_or_else(|| ClientError::AuthenticationFailed("No admin session".to_string()))?;
        let config = session.config();

        let client = TypedClientBuilder::new()
            .base_url(config.api_url.as_str())
            .admin_key(config.admin_key.clone())
            .build_authenticated(token)?;
        Ok(Self { client })
    }

    pub async fn fetch<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.client
            .admin_fetch(method, endpoint, body)
            .await
            .inspect_err(|error| {
                if error.is_auth_failure() {
                    notify_unauthorized();
                }
            })
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        self.fetch(Method::GET, endpoint, None::<&()>).await
    }
}
