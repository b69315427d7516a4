use url::Url;

use crate::error::{Error, Result};

/// Trims `s` and replaces every space with `%20`.
///
/// Lets URLs copied with literal spaces parse; already encoded input is unchanged.
///
/// # Examples
///
/// ```
/// use cachet_http::encode_url_whitespace;
///
/// assert_eq!(
///     encode_url_whitespace(" http://example.org/zoological names.zip "),
///     "http://example.org/zoological%20names.zip"
/// );
/// ```
pub fn encode_url_whitespace(s: &str) -> String { s.trim().replace(' ', "%20") }

/// Parses `url`, mapping failures to [`Error::InvalidUrl`].
pub fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| Error::InvalidUrl {
        url:    url.to_string(),
        reason: e.to_string(),
    })
}
