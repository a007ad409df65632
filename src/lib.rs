//! Extract text from images using OpenAI-compatible vision models.
//!
//! This crate is a single-purpose request adapter: it downsizes an image,
//! wraps it in a vision chat-completion request, POSTs it to an
//! OpenAI-compatible endpoint, and returns the recognized text. The HTTP
//! transport ([`http::HttpClient`]) and pixel handling
//! ([`image_codec::ImageCodec`]) are injected capabilities, so hosts and
//! tests can substitute their own.
//!
//! ```no_run
//! use ocr_relay::{OcrClient, RecognitionConfig};
//!
//! # async fn example(image_base64: &str) -> anyhow::Result<()> {
//! let client = OcrClient::new()?;
//! let config = RecognitionConfig::new("sk-...");
//! let text = client.recognize(image_base64, "English", &config).await?;
//! # Ok(())
//! # }
//! ```

pub mod compress;
pub mod data_url;
pub mod error;
pub mod http;
pub mod image_codec;
mod prelude;
pub mod prompt;
pub mod recognize;
pub mod request;

pub use compress::{CompressOptions, CompressedImage, compress_image};
pub use error::OcrError;
pub use recognize::{OcrClient, RecognitionConfig};
