//! The recognition orchestrator.
//!
//! One call, one request: validate, compress, build the payload, POST it,
//! and unwrap the response. No retries, no caching, no shared state between
//! calls; concurrent calls are independent.

use std::sync::Arc;

use url::Url;

use crate::{
    compress::{CompressOptions, compress_image},
    error::OcrError,
    http::{HttpClient, ReqwestClient, format_error_details},
    image_codec::{ImageCodec, RasterCodec},
    prelude::*,
    prompt::system_prompt,
    request::{build_payload, extract_text},
};

/// The default chat-completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// The route suffix every resolved endpoint must end in.
pub const COMPLETIONS_ROUTE: &str = "/chat/completions";

/// The canonical path we rewrite to when a caller supplies a bare host or
/// base path.
pub const CANONICAL_PATH: &str = "/v1/chat/completions";

/// The default model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// The default cap on generated tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Configuration for one recognition call. Read-only to the recognizer.
#[derive(Clone, Debug)]
pub struct RecognitionConfig {
    /// The API key. Required.
    pub api_key: String,

    /// The model to use. Defaults to [`DEFAULT_MODEL`].
    pub model: Option<String>,

    /// Endpoint URL or bare base URL. Defaults to [`DEFAULT_ENDPOINT`];
    /// paths not ending in the completions route are rewritten to
    /// [`CANONICAL_PATH`].
    pub request_path: Option<String>,

    /// Custom system-prompt template; `$lang` expands to the target
    /// language. Defaults to the built-in OCR prompt.
    pub custom_prompt: Option<String>,

    /// Cap on generated tokens, or `None` to omit the field.
    pub max_tokens: Option<u32>,

    /// Image compression options.
    pub compression: CompressOptions,
}

impl RecognitionConfig {
    /// Create a configuration with defaults for everything but the API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: None,
            request_path: None,
            custom_prompt: None,
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            compression: CompressOptions::default(),
        }
    }
}

/// Resolve the endpoint URL for a request.
///
/// Callers may supply a full completions URL, a bare host, or a base path;
/// anything whose path does not already end in `/chat/completions` gets the
/// canonical path. Host, port and query are preserved.
pub fn resolve_endpoint(request_path: Option<&str>) -> Result<Url, OcrError> {
    let raw = match request_path {
        Some(path) if !path.trim().is_empty() => path,
        _ => DEFAULT_ENDPOINT,
    };
    let mut url = Url::parse(raw)
        .map_err(|err| OcrError::Recognition(format!("invalid request path {raw:?}: {err}")))?;
    if !url.path().ends_with(COMPLETIONS_ROUTE) {
        url.set_path(CANONICAL_PATH);
    }
    Ok(url)
}

/// A vision-model OCR client.
///
/// Holds the injected transport and image codec; all per-call state lives in
/// the arguments to [`OcrClient::recognize`].
pub struct OcrClient {
    http: Arc<dyn HttpClient>,
    codec: Arc<dyn ImageCodec>,
}

impl OcrClient {
    /// Create a client with the default `reqwest` transport and `image`
    /// codec.
    pub fn new() -> Result<Self, OcrError> {
        Ok(Self::with_parts(
            Arc::new(ReqwestClient::new()?),
            Arc::new(RasterCodec),
        ))
    }

    /// Create a client from explicit transport and codec implementations.
    pub fn with_parts(http: Arc<dyn HttpClient>, codec: Arc<dyn ImageCodec>) -> Self {
        Self { http, codec }
    }

    /// Recognize the text in a Base64-encoded image.
    ///
    /// `target_language` is a hint substituted into the prompt; the model
    /// itself decides what script it is looking at. Returns the extracted
    /// text (possibly empty) or a classified [`OcrError`].
    #[instrument(level = "debug", skip_all, fields(lang = %target_language))]
    pub async fn recognize(
        &self,
        image_base64: &str,
        target_language: &str,
        config: &RecognitionConfig,
    ) -> Result<String, OcrError> {
        // Fail fast, before any compression or network work.
        if image_base64.trim().is_empty() {
            return Err(OcrError::MissingInput);
        }
        if config.api_key.trim().is_empty() {
            return Err(OcrError::MissingCredential);
        }

        let url = resolve_endpoint(config.request_path.as_deref())?;
        debug!(%url, "resolved endpoint");

        let compressed =
            compress_image(self.codec.clone(), image_base64, &config.compression).await?;
        debug!(
            width = compressed.width,
            height = compressed.height,
            "compressed image"
        );

        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        let prompt = system_prompt(config.custom_prompt.as_deref(), target_language);
        let payload = build_payload(&compressed.base64, &prompt, model, config.max_tokens);
        let body = serde_json::to_value(&payload)
            .map_err(|err| OcrError::Recognition(err.to_string()))?;

        let headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            (
                "Authorization".to_string(),
                format!("Bearer {}", config.api_key),
            ),
        ];
        let response = self.http.post_json(url.as_str(), &headers, body).await?;

        if !response.ok() {
            return Err(OcrError::ApiRequest(format_error_details(&response)));
        }
        extract_text(response.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_the_canonical_path() {
        let url = resolve_endpoint(Some("https://llm.example.com")).unwrap();
        assert_eq!(url.as_str(), "https://llm.example.com/v1/chat/completions");
    }

    #[test]
    fn base_path_is_rewritten() {
        let url = resolve_endpoint(Some("https://llm.example.com/v1")).unwrap();
        assert_eq!(url.as_str(), "https://llm.example.com/v1/chat/completions");
    }

    #[test]
    fn complete_route_is_left_alone() {
        let url =
            resolve_endpoint(Some("https://gw.example.com/openai/v1/chat/completions")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://gw.example.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn port_and_query_are_preserved() {
        let url = resolve_endpoint(Some("http://localhost:4000/v1?version=2")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:4000/v1/chat/completions?version=2"
        );
    }

    #[test]
    fn missing_path_uses_the_default_endpoint() {
        assert_eq!(resolve_endpoint(None).unwrap().as_str(), DEFAULT_ENDPOINT);
        assert_eq!(
            resolve_endpoint(Some("  ")).unwrap().as_str(),
            DEFAULT_ENDPOINT
        );
    }

    #[test]
    fn unparseable_path_is_a_recognition_error() {
        let err = resolve_endpoint(Some("not a url")).unwrap_err();
        assert!(matches!(err, OcrError::Recognition(_)));
    }
}
