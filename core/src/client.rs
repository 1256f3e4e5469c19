//! Request builder, response classifier and executor for the Yext API.
//!
//! # Design
//! `Client` holds only the resolved base URL, the API key, the `v` parameter
//! and a shared transport; nothing changes after construction, so one client
//! can serve concurrent calls. Each call is split into `build_call`, which
//! produces an `HttpRequest`, and `parse_call`, which turns an `HttpResponse`
//! into an envelope or an `ApiError::Status`. `call` runs the two around a
//! single transport round-trip.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::config::Config;
use crate::envelope::{ApiResponse, MessageType};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::QueryParams;
use crate::transport::{HttpTransport, ReqwestTransport};

const API_KEY_PARAM: &str = "api_key";
const V_PARAM: &str = "v";
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Client for making calls to Yext APIs.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    api_key: String,
    v_param: String,
    transport: Arc<dyn HttpTransport>,
}

impl Client {
    /// Build a client that talks to the network through `reqwest`.
    pub fn new(config: Config) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Build a client on top of a custom transport.
    pub fn with_transport(config: Config, transport: Arc<dyn HttpTransport>) -> Self {
        let base_url = config.base_url();
        let v_param = config.v_param().to_string();
        Self {
            base_url,
            api_key: config.api_key,
            v_param,
            transport,
        }
    }

    /// `https://{host}/v2/accounts/{accountId}/`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn v_param(&self) -> &str {
        &self.v_param
    }

    /// Build the request for one API call without sending it.
    ///
    /// `path` is appended to the base URL verbatim. `api_key` and `v` always
    /// come first in the query string, followed by `query` in order, with
    /// sequence values repeated under the same key.
    pub fn build_call<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        query: &QueryParams,
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError> {
        let raw = format!("{}{path}", self.base_url);
        let mut url = url::Url::parse(&raw).map_err(|source| ApiError::InvalidUrl {
            url: raw.clone(),
            source,
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(API_KEY_PARAM, &self.api_key);
            pairs.append_pair(V_PARAM, &self.v_param);
            for (key, value) in query {
                for v in value.values() {
                    pairs.append_pair(key, v);
                }
            }
        }

        let (headers, body) = match body {
            Some(body) => {
                let json = serde_json::to_string(body).map_err(ApiError::Serialization)?;
                (
                    vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())],
                    Some(json),
                )
            }
            None => (Vec::new(), None),
        };

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers,
            body,
        })
    }

    /// Classify a response: 2xx bodies must be JSON and are split into an
    /// envelope without checking its shape, anything else becomes
    /// `ApiError::Status` with the response left unparsed.
    pub fn parse_call(
        &self,
        method: HttpMethod,
        path: &str,
        response: HttpResponse,
    ) -> Result<ApiResponse, ApiError> {
        if !response.is_success() {
            return Err(ApiError::Status {
                method,
                path: path.to_string(),
                response,
            });
        }
        let body: serde_json::Value = serde_json::from_slice(&response.body).map_err(|e| {
            tracing::debug!(
                %method,
                path,
                content_type = response.header("content-type").unwrap_or_default(),
                "success body is not JSON"
            );
            ApiError::Deserialization(e)
        })?;
        let envelope = ApiResponse::from_value(body);
        for message in &envelope.meta.errors {
            let severity = match message.kind {
                MessageType::FatalError => "fatal",
                MessageType::NonFatalError => "non-fatal",
                MessageType::Warning => "warning",
                MessageType::Unknown => "unknown",
            };
            tracing::warn!(
                %method,
                path,
                uuid = %envelope.meta.uuid,
                code = message.code,
                severity,
                "{}",
                message.message
            );
        }
        Ok(envelope)
    }

    /// Make one call to the Yext API.
    ///
    /// Fails with `ApiError::Status` when the response status is not 2xx.
    pub async fn call<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        query: &QueryParams,
        body: Option<&B>,
    ) -> Result<ApiResponse, ApiError> {
        let request = self.build_call(method, path, query, body)?;
        tracing::debug!(%method, path, has_body = request.body.is_some(), "sending request");
        let response = self.transport.execute(request).await?;
        tracing::debug!(%method, path, status = response.status, "received response");
        self.parse_call(method, path, response)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("v_param", &self.v_param)
            .finish_non_exhaustive()
    }
}
