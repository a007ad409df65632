use std::{path::PathBuf, str::FromStr};

use anyhow::{Context as _, Result};
use base64::{Engine as _, prelude::BASE64_STANDARD};
use clap::Parser;
use ocr_relay::{CompressOptions, OcrClient, RecognitionConfig};
use tracing::{debug, instrument};
use tracing_subscriber::{
    EnvFilter, Layer as _, filter::Directive, fmt::format::FmtSpan, layer::SubscriberExt,
    util::SubscriberInitExt as _,
};

/// Recognize text in an image using an OpenAI-compatible vision model.
#[derive(Debug, Parser)]
#[clap(
    version,
    author,
    after_help = r#"
Environment Variables:
  - OPENAI_API_KEY: The API key to use.
  - OPENAI_API_BASE (optional): Override the server URL. Paths not ending
    in "/chat/completions" are rewritten to "/v1/chat/completions".

  These variables may be set in a standard `.env` file.
"#
)]
struct Opts {
    /// Path to the image to recognize.
    image: PathBuf,

    /// Target language hint, substituted for `$lang` in the prompt.
    #[clap(long, default_value = "English")]
    lang: String,

    /// The model to use.
    #[clap(long)]
    model: Option<String>,

    /// Override the completions endpoint URL (also: OPENAI_API_BASE).
    #[clap(long)]
    request_path: Option<String>,

    /// Custom system-prompt template. `$lang` expands to --lang.
    #[clap(long)]
    prompt: Option<String>,

    /// An upper limit on the number of tokens to generate.
    #[clap(long, default_value_t = ocr_relay::recognize::DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Never enlarge images already within the size cap.
    #[clap(long)]
    no_upscale: bool,
}

/// Our entry point, which can return an error. [`anyhow::Result`] will
/// automatically print a nice error message with optional backtrace.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing.
    let directive =
        Directive::from_str("warn").expect("built-in directive should be valid");
    let env_filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(subscriber).init();

    // Call our real `main` function now that logging is set up.
    real_main().await
}

/// Our real entry point.
#[instrument(level = "debug", name = "main", skip_all)]
async fn real_main() -> Result<()> {
    // Load environment variables from a `.env` file, if it exists.
    dotenvy::dotenv().ok();

    let opts = Opts::parse();
    debug!("Parsed options: {:?}", opts);

    let api_key = std::env::var("OPENAI_API_KEY")
        .context("OPENAI_API_KEY must be set (a `.env` file works)")?;
    let request_path = opts
        .request_path
        .or_else(|| std::env::var("OPENAI_API_BASE").ok());

    let bytes = tokio::fs::read(&opts.image)
        .await
        .with_context(|| format!("failed to read {}", opts.image.display()))?;
    let image_base64 = BASE64_STANDARD.encode(&bytes);

    let config = RecognitionConfig {
        model: opts.model,
        request_path,
        custom_prompt: opts.prompt,
        max_tokens: Some(opts.max_tokens),
        compression: CompressOptions {
            no_upscale: opts.no_upscale,
            ..CompressOptions::default()
        },
        ..RecognitionConfig::new(api_key)
    };

    let client = OcrClient::new()?;
    let text = client.recognize(&image_base64, &opts.lang, &config).await?;
    println!("{text}");
    Ok(())
}
