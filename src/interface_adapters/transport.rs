use reqwest::cookie::Jar;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{ExpiryHook, TransportFailure};
use crate::interface_adapters::protocol::{ApiEnvelope, EndpointGroup, ResponseShape};
use crate::use_cases::classify::{classify, failure_from_reqwest};
use crate::use_cases::messages::is_auth_expired;

// The single HTTP entry point. Every request carries the shared cookie jar,
// and every failure passes through `on_failure` before reaching the caller.
#[derive(Clone)]
pub struct TransportClient {
    http: Client,
    base_url: Url,
    jar: Arc<Jar>,
    expiry: ExpiryHook,
}

impl TransportClient {
    pub fn new(base_url: Url, timeout: Duration, expiry: ExpiryHook) -> Result<Self, reqwest::Error> {
        let jar = Arc::new(Jar::default());
        let http = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url,
            jar,
            expiry,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn cookie_jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }

    pub fn expiry_hook(&self) -> &ExpiryHook {
        &self.expiry
    }

    // Routes the call through the response shape pinned for `group`. Raw
    // payloads always come back as `Some`.
    pub async fn fetch<B, T>(
        &self,
        group: EndpointGroup,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<T>, TransportFailure>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let path = format!("{}{}", group.prefix(), path);
        match group.shape() {
            ResponseShape::Enveloped => self.send_enveloped(method, &path, body).await,
            ResponseShape::Raw => self.send_raw(method, &path, body).await.map(Some),
        }
    }

    // Decodes `{success, data, error}`. `success: false` is a failure even
    // when the status is 2xx.
    pub async fn send_enveloped<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<T>, TransportFailure>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (status, text) = self.dispatch(method, path, body).await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let envelope: ApiEnvelope<T> = serde_json::from_str(&text).map_err(|e| {
            self.on_failure(TransportFailure::Local {
                message: format!("invalid response envelope: {e}"),
            })
        })?;
        if !envelope.success {
            return Err(self.on_failure(TransportFailure::Response {
                status,
                body: Some(text),
            }));
        }
        Ok(envelope.data)
    }

    // Decodes the whole body as `T`. An empty body decodes as JSON `null`.
    pub async fn send_raw<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, TransportFailure>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (_, text) = self.dispatch(method, path, body).await?;
        let source = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(source).map_err(|e| {
            self.on_failure(TransportFailure::Local {
                message: format!("invalid response body: {e}"),
            })
        })
    }

    // Body text of a 2xx response, undecoded.
    pub async fn send_text<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String, TransportFailure>
    where
        B: Serialize + ?Sized,
    {
        self.dispatch(method, path, body).await.map(|(_, text)| text)
    }

    async fn dispatch<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(u16, String), TransportFailure>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path).map_err(|f| self.on_failure(f))?;
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let request = self.on_request(request);

        let response = request
            .send()
            .await
            .map_err(|e| self.on_failure(failure_from_reqwest(&e)))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| {
            self.on_failure(TransportFailure::NoResponse {
                message: format!("response body interrupted: {e}"),
            })
        })?;

        if !status.is_success() {
            return Err(self.on_failure(TransportFailure::Response {
                status: status.as_u16(),
                body: (!text.is_empty()).then_some(text),
            }));
        }
        Ok((status.as_u16(), text))
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportFailure> {
        let joined = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| TransportFailure::Local {
            message: format!("invalid request url {joined}: {e}"),
        })
    }

    // Extension point for per-request headers. Requests pass through as-is.
    fn on_request(&self, request: RequestBuilder) -> RequestBuilder {
        request
    }

    // Runs on every failure. Session invalidation is a side effect only; the
    // failure goes back to the caller unchanged.
    fn on_failure(&self, failure: TransportFailure) -> TransportFailure {
        let normalized = classify(&failure);
        if is_auth_expired(&normalized) {
            let notified = self.expiry.fire();
            tracing::info!(
                code = %normalized.code,
                status = normalized.status,
                notified,
                "authentication expired"
            );
        } else {
            tracing::debug!(
                code = %normalized.code,
                status = normalized.status,
                "request failed"
            );
        }
        failure
    }
}
