//! Pure transformations: status classification, HTTP dates, body decoding and URL
//! helpers. Nothing here performs I/O.

mod httpdate;
mod status;
mod text;
mod urls;

pub use httpdate::{format_http_date, parse_http_date};
pub use status::{FetchOutcome, NOT_MODIFIED, TransferOutcome, is_not_modified, is_success};
pub use text::decode_body;
pub use urls::{encode_url_whitespace, parse_url};
