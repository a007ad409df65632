//! Building and parsing `data:` URLs.

/// Build a `data:` URL around data that is already Base64-encoded.
///
/// Some sources indicate that the Base64 data should be percent-encoded,
/// but in practice this breaks several vision APIs.
pub fn base64_data_url(mime_type: &str, base64_data: &str) -> String {
    format!("data:{};base64,{}", mime_type, base64_data)
}

/// Regex for parsing a `data:` URL.
pub const DATA_URL_RE: &str = r"^data:(?P<mime_type>[^;]+);base64,(?P<data>.+)$";

/// Parse a `data:` URL into a MIME type and Base64-encoded data.
pub fn parse_data_url(data_url: &str) -> Option<(String, &str)> {
    let re = regex::Regex::new(DATA_URL_RE).ok()?;
    let caps = re.captures(data_url)?;
    let mime_type = caps.name("mime_type")?.as_str().to_string();
    let data = caps.name("data")?.as_str();
    Some((mime_type, data))
}
