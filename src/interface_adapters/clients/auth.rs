use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::domain::{
    AuthApi, LoginRequest, MemberProfile, NormalizedError, SignupRequest, TransportFailure,
};
use crate::interface_adapters::protocol::{ApiEnvelope, EndpointGroup};
use crate::interface_adapters::transport::TransportClient;
use crate::use_cases::classify::{classify, structured};

// Auth and member endpoints behind the `AuthApi` port.
#[derive(Clone)]
pub struct HttpAuthApi {
    transport: TransportClient,
}

impl HttpAuthApi {
    pub fn new(transport: TransportClient) -> Self {
        Self { transport }
    }
}

// The backend's own error if it sent one, otherwise a fixed failure for the
// operation that keeps whatever status was observed.
fn structured_or(
    failure: &TransportFailure,
    synthesize: fn(u16) -> NormalizedError,
) -> NormalizedError {
    structured(failure).unwrap_or_else(|| synthesize(failure.status().unwrap_or(0)))
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn me(&self) -> Result<Option<MemberProfile>, NormalizedError> {
        // Any 2xx counts, so the body is read leniently.
        let path = format!("{}/me", EndpointGroup::Auth.prefix());
        let body = self
            .transport
            .send_text(Method::GET, &path, None::<&()>)
            .await
            .map_err(|failure| classify(&failure))?;
        let profile = serde_json::from_str::<ApiEnvelope<MemberProfile>>(&body)
            .ok()
            .and_then(|envelope| envelope.data);
        Ok(profile)
    }

    async fn login(&self, req: &LoginRequest) -> Result<(), NormalizedError> {
        self.transport
            .fetch::<_, Value>(EndpointGroup::Auth, Method::POST, "/login", Some(req))
            .await
            .map(|_| ())
            .map_err(|failure| structured_or(&failure, NormalizedError::login_failed))
    }

    async fn logout(&self) -> Result<(), NormalizedError> {
        self.transport
            .fetch::<(), Value>(EndpointGroup::Auth, Method::POST, "/logout", None)
            .await
            .map(|_| ())
            .map_err(|failure| classify(&failure))
    }

    async fn signup(&self, req: &SignupRequest) -> Result<(), NormalizedError> {
        self.transport
            .fetch::<_, Value>(EndpointGroup::Members, Method::POST, "", Some(req))
            .await
            .map(|_| ())
            .map_err(|failure| structured_or(&failure, NormalizedError::signup_failed))
    }
}
