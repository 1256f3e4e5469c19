//! Pluggable HTTP execution.
//!
//! `HttpTransport` is the one seam between the client and the network. It
//! takes a fully built `HttpRequest` and hands back whatever response came
//! over the wire, whatever the status. Status interpretation stays in
//! `Client`.

use async_trait::async_trait;
use reqwest::Method;

use crate::error::NetworkError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError>;
}

/// Default transport backed by `reqwest`.
///
/// Uses reqwest's defaults for timeouts and redirects; no retries.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a preconfigured `reqwest::Client`, e.g. one with a timeout.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError> {
        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| NetworkError::with_source(format!("{} request failed", request.method), e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().await.map(|b| b.to_vec());
        finish_response(status, headers, body)
    }
}

/// Assemble the response once its body has been read.
///
/// A body that fails to read is a network error for 2xx responses. For
/// anything else the status is what callers classify on, so the response
/// is kept with an empty body.
fn finish_response<E>(
    status: u16,
    headers: Vec<(String, String)>,
    body: Result<Vec<u8>, E>,
) -> Result<HttpResponse, NetworkError>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let response = HttpResponse {
        status,
        headers,
        body: Vec::new(),
    };
    match body {
        Ok(body) => Ok(HttpResponse { body, ..response }),
        Err(e) if response.is_success() => {
            Err(NetworkError::with_source("failed to read response body", e))
        }
        Err(e) => {
            tracing::warn!(status, error = %e, "failed to read error response body");
            Ok(response)
        }
    }
}
