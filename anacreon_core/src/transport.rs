//! The HTTP boundary.
//!
//! [`Transport`] is the seam the client is generic over: it sends one JSON
//! request and hands back the JSON body. [`HttpTransport`] is the `reqwest`
//! implementation; tests substitute a scripted one.

use std::future::Future;

use anacreon_wire::check_error_envelope;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::config::ClientConfig;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("http client could not be built: {message}")]
    BuildClient { message: String },
    #[error("request to `{endpoint}` failed: {message}")]
    Http { endpoint: String, message: String },
    #[error("`{endpoint}` answered http {code}: {body}")]
    HttpStatus {
        endpoint: String,
        code: u16,
        body: String,
    },
    #[error("`{endpoint}` returned a body that is not JSON: {message}")]
    DecodeResponse { endpoint: String, message: String },
}

pub trait Transport: Send + Sync + 'static {
    /// POSTs `body` as JSON to `endpoint`.
    fn post(
        &self,
        endpoint: &'static str,
        body: Value,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;

    /// GETs `endpoint` with the given query parameters.
    fn get(
        &self,
        endpoint: &'static str,
        query: Vec<(&'static str, String)>,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent())
            .build()
            .map_err(|err| TransportError::BuildClient {
                message: err.to_string(),
            })?;

        Ok(Self {
            base_url: config.base_url(),
            client,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    async fn read_body(
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> Result<Value, TransportError> {
        let status = response.status();
        let text = response.text().await.map_err(|err| TransportError::Http {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        })?;
        tracing::trace!(
            target: "anacreon::transport",
            endpoint,
            status = status.as_u16(),
            bytes = text.len(),
            "response.received"
        );

        let parsed = serde_json::from_str::<Value>(&text);
        match parsed {
            Ok(body) if status.is_success() => Ok(body),
            // Rejected actions come back with an error status and the envelope
            // as the body; the client turns that into an API error.
            Ok(body) if check_error_envelope(&body).is_err() => Ok(body),
            Ok(_) => Err(TransportError::HttpStatus {
                endpoint: endpoint.to_string(),
                code: status.as_u16(),
                body: text,
            }),
            Err(_) if !status.is_success() => Err(TransportError::HttpStatus {
                endpoint: endpoint.to_string(),
                code: status.as_u16(),
                body: text,
            }),
            Err(err) => Err(TransportError::DecodeResponse {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }),
        }
    }
}

impl Transport for HttpTransport {
    async fn post(&self, endpoint: &'static str, body: Value) -> Result<Value, TransportError> {
        tracing::trace!(target: "anacreon::transport", endpoint, "request.post");
        let response = self
            .client
            .post(self.url(endpoint))
            .json(&body)
            .send()
            .await
            .map_err(|err| TransportError::Http {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            })?;
        Self::read_body(endpoint, response).await
    }

    async fn get(
        &self,
        endpoint: &'static str,
        query: Vec<(&'static str, String)>,
    ) -> Result<Value, TransportError> {
        tracing::trace!(target: "anacreon::transport", endpoint, "request.get");
        let response = self
            .client
            .get(self.url(endpoint))
            .query(&query)
            .send()
            .await
            .map_err(|err| TransportError::Http {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            })?;
        Self::read_body(endpoint, response).await
    }
}
