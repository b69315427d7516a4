//! HTTP date handling for `If-Modified-Since` and `Last-Modified`.

use std::time::SystemTime;

use chrono::{DateTime, NaiveDateTime, Utc};

const RFC_1123: &str = "%a, %d %b %Y %H:%M:%S GMT";
const RFC_850: &str = "%A, %d-%b-%y %H:%M:%S GMT";
const ASCTIME: &str = "%a %b %d %H:%M:%S %Y";

/// Formats `time` as an RFC 1123 date, truncated to whole seconds.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, UNIX_EPOCH};
/// use cachet_http::format_http_date;
///
/// let time = UNIX_EPOCH + Duration::from_secs(784_111_777);
/// assert_eq!(format_http_date(time), "Sun, 06 Nov 1994 08:49:37 GMT");
/// ```
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(RFC_1123).to_string()
}

/// Parses an RFC 1123, RFC 850 or asctime date.
///
/// Returns `None` for anything else so that a malformed header reads as absent.
pub fn parse_http_date(value: &str) -> Option<SystemTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Some(parsed.with_timezone(&Utc).into());
    }

    // asctime pads single-digit days with a space
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    [RFC_850, ASCTIME]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&collapsed, format).ok())
        .map(|naive| naive.and_utc().into())
}
