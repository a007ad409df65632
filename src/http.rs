//! The injected HTTP capability.
//!
//! The recognizer never talks to the network directly. It goes through an
//! [`HttpClient`], which keeps the transport swappable in tests and lets a
//! host application supply its own client (proxying, custom TLS, etc).

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{error::OcrError, prelude::*};

/// An HTTP response, decoupled from any particular transport.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,

    /// Canonical status text ("Unauthorized", etc).
    pub status_text: String,

    /// The response body, parsed as JSON when possible, otherwise the raw
    /// body as a JSON string.
    pub data: Value,
}

impl HttpResponse {
    /// Was this a 2xx response?
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Interface trait for HTTP transports.
#[async_trait]
pub trait HttpClient: Send + Sync + 'static {
    /// POST a JSON body and return the response, whatever its status.
    ///
    /// Only transport-level failures (DNS, refused connections, broken
    /// streams) are errors here; non-2xx statuses come back as a normal
    /// [`HttpResponse`] for the caller to classify.
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: Value,
    ) -> Result<HttpResponse, OcrError>;
}

/// The default transport, backed by `reqwest`.
///
/// No request timeout is set here; callers own their own deadline policy.
#[derive(Clone, Debug)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new `reqwest`-backed transport.
    pub fn new() -> Result<Self, OcrError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| OcrError::Network(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: Value,
    ) -> Result<HttpResponse, OcrError> {
        let mut request = self.client.post(url);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        // `json` only sets Content-Type when the caller did not.
        let request = request.json(&body);

        let response = request
            .send()
            .await
            .map_err(|err| OcrError::Network(err.to_string()))?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let data = match response.text().await {
            Ok(text) => {
                trace!(%status, body = %text, "HTTP response");
                // Error bodies are not always JSON; keep whatever we got.
                serde_json::from_str::<Value>(&text).unwrap_or_else(|_| Value::String(text))
            }
            // Error bodies sometimes die mid-stream. Keep the status
            // information we already have instead of failing the call.
            Err(err) if !status.is_success() => {
                warn!(%status, %err, "failed to read error body");
                unreadable_body_placeholder(status.as_u16(), &status_text)
            }
            Err(err) => return Err(OcrError::Network(err.to_string())),
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text,
            data,
        })
    }
}

/// Diagnostic body used when an error response's body cannot be read.
fn unreadable_body_placeholder(status: u16, status_text: &str) -> Value {
    Value::String(format!(
        "Unable to parse error details. Status: {status}, {status_text}"
    ))
}

/// Format a failed response into a single diagnostic string.
///
/// The result carries the status, status text, and the echoed error body,
/// pretty-printed so it stays readable when surfaced to a user.
pub fn format_error_details(response: &HttpResponse) -> String {
    let details = json!({
        "status": response.status,
        "statusText": response.status_text,
        "errorDetails": response.data,
    });
    serde_json::to_string_pretty(&details)
        .expect("a JSON value always renders as a string")
}
