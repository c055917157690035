//! Generic access to the `/admin` resources used by the content panels

use super::{AuthenticatedAdminClient, ClientError};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Prefix shared by every admin resource
pub const ADMIN_PREFIX: &str = "/admin";

impl AuthenticatedAdminClient {
    /// Call an admin endpoint, e.g. `admin_fetch(Method::GET, "/quotes", None::<&()>)`.
    ///
    /// `endpoint` is relative to `/admin` and may carry a query string.
    /// Failures are logged before being returned so panels can stay terse.
    pub async fn admin_fetch<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let path = format!("{ADMIN_PREFIX}{endpoint}");
        let mut request = self
            .request(method.clone(), &path)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        self.execute(request).await.inspect_err(|error| {
            tracing::error!(
                endpoint = %format!("{}{path}", self.base_url()),
                method = %method,
                status = ?error.status(),
                %error,
                "API error"
            );
        })
    }
}
