//! System-prompt resolution.

/// The default OCR prompt, used if no custom prompt is configured.
const DEFAULT_OCR_PROMPT: &str = include_str!("prompt/default_ocr_prompt.txt");

/// Placeholder replaced with the target language in custom prompts.
pub const LANG_TOKEN: &str = "$lang";

/// Get our default OCR prompt.
pub fn default_ocr_prompt() -> &'static str {
    DEFAULT_OCR_PROMPT.trim_ascii_end()
}

/// Resolve the system prompt for a recognition request.
///
/// When a custom template is supplied, every literal occurrence of `$lang`
/// is replaced with `target_language`. Otherwise the built-in prompt is used
/// verbatim.
pub fn system_prompt(template: Option<&str>, target_language: &str) -> String {
    match template {
        Some(template) => template.replace(LANG_TOKEN, target_language),
        None => default_ocr_prompt().to_string(),
    }
}
