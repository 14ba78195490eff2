use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{ApiFailure, SessionInvalidator, TransportReason};
use crate::use_cases::interceptor::{ErrorInterceptor, HandleOptions};

// Thin wrapper around reqwest for calls to the tour backend.
// Every failed call goes through the error interceptor before it is returned.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    bearer_token: Option<String>,
    interceptor: Arc<ErrorInterceptor>,
    session: Arc<dyn SessionInvalidator>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        interceptor: Arc<ErrorInterceptor>,
        session: Arc<dyn SessionInvalidator>,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            bearer_token: None,
            interceptor,
            session,
        })
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn interceptor(&self) -> &Arc<ErrorInterceptor> {
        &self.interceptor
    }

    pub async fn get<R>(&self, path: &str, options: &HandleOptions) -> Result<R, ApiFailure>
    where
        R: DeserializeOwned,
    {
        self.send(Method::GET, path, None::<&()>, options).await
    }

    pub async fn post<B, R>(
        &self,
        path: &str,
        body: &B,
        options: &HandleOptions,
    ) -> Result<R, ApiFailure>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(Method::POST, path, Some(body), options).await
    }

    pub async fn put<B, R>(
        &self,
        path: &str,
        body: &B,
        options: &HandleOptions,
    ) -> Result<R, ApiFailure>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(Method::PUT, path, Some(body), options).await
    }

    pub async fn delete<R>(&self, path: &str, options: &HandleOptions) -> Result<R, ApiFailure>
    where
        R: DeserializeOwned,
    {
        self.send(Method::DELETE, path, None::<&()>, options).await
    }

    #[tracing::instrument(name = "api_call", skip_all, fields(method = %method, path = %path))]
    pub async fn send<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: &HandleOptions,
    ) -> Result<R, ApiFailure>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.http.request(method, self.url(path));
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        match execute(request).await {
            Ok(value) => {
                tracing::debug!("api call succeeded.");
                Ok(value)
            }
            Err(failure) => {
                // The auth collaborator drops the session before the user sees the error.
                if failure.status() == Some(StatusCode::UNAUTHORIZED.as_u16()) {
                    self.session.invalidate_session().await;
                }
                self.interceptor.handle_error(failure, options)
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

async fn execute<R>(request: RequestBuilder) -> Result<R, ApiFailure>
where
    R: DeserializeOwned,
{
    let res = request.send().await.map_err(transport_failure)?;
    let status = res.status();

    // Keep the upstream status and JSON body so the interceptor can classify them.
    if !status.is_success() {
        let body = res
            .bytes()
            .await
            .ok()
            .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok());
        return Err(ApiFailure::response(status.as_u16(), body));
    }

    let bytes = res.bytes().await.map_err(transport_failure)?;
    // Empty bodies (204, bare 200) decode as JSON null so `()` and `Option<_>` work.
    let bytes: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
    serde_json::from_slice(bytes).map_err(|err| ApiFailure::Decode {
        status: status.as_u16(),
        detail: err.to_string(),
    })
}

fn transport_failure(err: reqwest::Error) -> ApiFailure {
    let reason = if err.is_timeout() {
        TransportReason::Timeout
    } else if err.is_connect() {
        TransportReason::Connect
    } else {
        TransportReason::Other
    };
    ApiFailure::transport(reason, err.to_string())
}
