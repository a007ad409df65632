//! Classified recognition errors.
//!
//! Every failure a caller can see is one of these variants. Nothing is
//! retried internally, and `ApiRequest` diagnostics are passed through
//! verbatim rather than being re-wrapped by the catch-all.

use thiserror::Error;

/// An error which occurred while recognizing text in an image.
#[derive(Debug, Error)]
pub enum OcrError {
    /// No image data was supplied.
    #[error("base64 image data is required")]
    MissingInput,

    /// No API key was supplied.
    #[error("API key is required")]
    MissingCredential,

    /// The image bytes (or their base64 encoding) could not be decoded.
    #[error("image decoding failed: {0}")]
    ImageDecode(String),

    /// Image processing exceeded its time ceiling.
    #[error("image processing timed out after {0} seconds")]
    ImageTimeout(u64),

    /// The image decoded but could not be scaled or re-encoded.
    #[error("image processing failed: {0}")]
    ImageProcessing(String),

    /// The HTTP transport failed before a response arrived.
    #[error("network error: unable to connect to the API: {0}")]
    Network(String),

    /// The API answered with a non-success status. The message carries the
    /// status, status text and echoed error body.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The API answered 2xx but the body did not contain
    /// `choices[0].message.content`.
    #[error("invalid API response structure")]
    MalformedResponse,

    /// Any other failure, with its original message preserved.
    #[error("OCR recognition error: {0}")]
    Recognition(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_request_message_is_passed_through_verbatim() {
        let details = r#"{"status": 401, "statusText": "Unauthorized"}"#;
        let err = OcrError::ApiRequest(details.to_string());
        assert!(err.to_string().contains(details));
    }
}
