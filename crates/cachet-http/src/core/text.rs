use mime::Mime;

/// Extracts the `charset` parameter of a `Content-Type` value.
///
/// A value that is not a valid media type has no charset.
pub fn charset_of(content_type: &str) -> Option<String> {
    let media_type = content_type.trim().parse::<Mime>().ok()?;
    media_type
        .get_param(mime::CHARSET)
        .map(|charset| charset.as_str().trim_matches('"').to_string())
}

/// Decodes a response body, defaulting to UTF-8 when no charset is declared.
///
/// Only UTF-8 and its ASCII subset plus ISO-8859-1 are understood; any other declared
/// charset is a decoding failure.
pub fn decode_body(bytes: Vec<u8>, content_type: Option<&str>) -> Result<String, String> {
    let charset = content_type
        .and_then(charset_of)
        .map_or_else(|| "utf-8".to_string(), |charset| charset.to_ascii_lowercase());

    match charset.as_str() {
        "utf-8" | "utf8" | "us-ascii" | "ascii" => {
            String::from_utf8(bytes).map_err(|e| format!("invalid {charset}: {e}"))
        }
        "iso-8859-1" | "latin1" | "latin-1" => Ok(bytes.into_iter().map(char::from).collect()),
        other => Err(format!("unsupported charset {other}")),
    }
}
